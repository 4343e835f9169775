//! The domain models: transactions, budgets, goals and users.

mod budget;
mod goal;
mod notification;
mod password;
mod transaction;
mod user;

pub use budget::Budget;
pub use goal::{Goal, GoalStatus};
pub use notification::{Notification, NotificationKind};
pub use password::{PasswordHash, ValidatedPassword};
pub use transaction::{Transaction, TransactionBuilder, TransactionType};
pub use user::{User, UserID};

/// The type to use for the ID of rows in the application database.
pub type DatabaseID = i64;
