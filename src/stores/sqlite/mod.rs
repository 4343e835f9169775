//! SQLite backed implementations of the store traits.

mod budget;
mod goal;
mod notification;
mod transaction;
mod user;

pub use budget::SQLiteBudgetStore;
pub use goal::SQLiteGoalStore;
pub use notification::SQLiteNotificationStore;
pub use transaction::SQLiteTransactionStore;
pub use user::SQLiteUserStore;

#[cfg(test)]
pub(crate) mod test_utils {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;

    use crate::{
        db::initialize,
        models::{PasswordHash, User},
        stores::UserStore,
    };

    use super::SQLiteUserStore;

    /// An initialized in-memory database for store tests.
    pub(crate) fn test_connection() -> Arc<Mutex<Connection>> {
        let connection = Connection::open_in_memory().expect("could not open in-memory database");
        initialize(&connection).expect("could not initialize database");

        Arc::new(Mutex::new(connection))
    }

    /// Insert a user for tests that need an owner for foreign keys.
    pub(crate) fn test_user(connection: Arc<Mutex<Connection>>) -> User {
        SQLiteUserStore::new(connection)
            .create(
                "Test User",
                "test@test.com",
                PasswordHash::from_raw_password("averysecurepassword1", 4).unwrap(),
            )
            .unwrap()
    }
}
