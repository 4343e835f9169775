/*! This module defines the traits for interacting with the application's
database and the function that sets up the schema. */

use rusqlite::{Connection, Error, Row};

use crate::stores::sqlite::{
    SQLiteBudgetStore, SQLiteGoalStore, SQLiteNotificationStore, SQLiteTransactionStore,
    SQLiteUserStore,
};

/// A trait for adding an object schema to a database.
pub trait CreateTable {
    /// Create the table for the model.
    ///
    /// # Errors
    /// Returns an error if there is an SQL error.
    fn create_table(connection: &Connection) -> Result<(), Error>;
}

/// A trait for mapping from a `rusqlite::Row` of a SQLite database to a
/// concrete rust type.
pub trait MapRow {
    /// The type to map the row to.
    type ReturnType;

    /// Map a row to `ReturnType`, reading columns from the start of the row.
    ///
    /// # Errors
    /// Returns an error if a column is missing or has an unexpected type.
    fn map_row(row: &Row) -> Result<Self::ReturnType, Error> {
        Self::map_row_with_offset(row, 0)
    }

    /// Map a row to `ReturnType`, reading columns starting at `offset`.
    ///
    /// # Errors
    /// Returns an error if a column is missing or has an unexpected type.
    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, Error>;
}

/// Create the tables for the application models.
///
/// # Errors
/// Returns an error if any of the tables could not be created.
pub fn initialize(connection: &Connection) -> Result<(), crate::Error> {
    connection.pragma_update(None, "foreign_keys", true)?;

    SQLiteUserStore::create_table(connection)?;
    SQLiteTransactionStore::create_table(connection)?;
    SQLiteBudgetStore::create_table(connection)?;
    SQLiteGoalStore::create_table(connection)?;
    SQLiteNotificationStore::create_table(connection)?;

    Ok(())
}
