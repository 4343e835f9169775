//! This file defines the `User` model and its ID newtype.

use std::fmt::Display;

use rusqlite::types::{FromSql, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

use crate::models::{DatabaseID, PasswordHash};

/// A newtype wrapper for user IDs.
///
/// Distinguishes user IDs from other integer row IDs so they cannot be mixed
/// up at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserID(DatabaseID);

impl UserID {
    /// Create a new user ID.
    pub fn new(id: DatabaseID) -> Self {
        Self(id)
    }

    /// The underlying integer ID.
    pub fn as_i64(&self) -> DatabaseID {
        self.0
    }
}

impl Display for UserID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl ToSql for UserID {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        self.0.to_sql()
    }
}

impl FromSql for UserID {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        DatabaseID::column_result(value).map(UserID)
    }
}

/// A registered user of the application.
///
/// The password is only ever held as a bcrypt hash.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    /// The ID of the user.
    pub id: UserID,
    /// The display name entered at registration.
    pub name: String,
    /// The email address used to log in. Unique per user.
    pub email: String,
    /// The salted and hashed password.
    pub password_hash: PasswordHash,
}
