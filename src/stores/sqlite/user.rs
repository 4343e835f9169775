//! Implements a SQLite backed user store.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row};

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{PasswordHash, User, UserID},
    stores::UserStore,
};

/// Stores users in a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteUserStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteUserStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl UserStore for SQLiteUserStore {
    /// Create a new user in the database.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::DuplicateEmail] if `email` already belongs to a user,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn create(
        &mut self,
        name: &str,
        email: &str,
        password_hash: PasswordHash,
    ) -> Result<User, Error> {
        let id = {
            let connection = self.connection.lock().unwrap();

            connection.execute(
                "INSERT INTO user (name, email, password_hash) VALUES (?1, ?2, ?3)",
                (name, email, password_hash.as_ref()),
            )?;

            connection.last_insert_rowid()
        };

        Ok(User {
            id: UserID::new(id),
            name: name.to_string(),
            email: email.to_string(),
            password_hash,
        })
    }

    /// Retrieve a user in the database by their `id`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a valid user,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn get(&self, id: UserID) -> Result<User, Error> {
        let user = self
            .connection
            .lock()
            .unwrap()
            .prepare("SELECT id, name, email, password_hash FROM user WHERE id = :id")?
            .query_row(&[(":id", &id.as_i64())], Self::map_row)?;

        Ok(user)
    }

    /// Retrieve a user in the database by their email address.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `email` does not belong to a registered user,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn get_by_email(&self, email: &str) -> Result<User, Error> {
        let user = self
            .connection
            .lock()
            .unwrap()
            .prepare("SELECT id, name, email, password_hash FROM user WHERE email = :email")?
            .query_row(&[(":email", &email)], Self::map_row)?;

        Ok(user)
    }
}

impl CreateTable for SQLiteUserStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS user (
                    id INTEGER PRIMARY KEY,
                    name TEXT NOT NULL,
                    email TEXT NOT NULL UNIQUE,
                    password_hash TEXT NOT NULL
                    )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteUserStore {
    type ReturnType = User;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let password_hash: String = row.get(offset + 3)?;

        Ok(User {
            id: UserID::new(row.get(offset)?),
            name: row.get(offset + 1)?,
            email: row.get(offset + 2)?,
            password_hash: PasswordHash::from_hash_string(&password_hash),
        })
    }
}
