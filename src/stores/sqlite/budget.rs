//! Implements a SQLite backed budget store.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row};

use crate::{
    Error,
    analytics::canonical_category,
    db::{CreateTable, MapRow},
    models::{Budget, DatabaseID, UserID},
    stores::BudgetStore,
};

/// Stores budgets in a SQLite database.
///
/// A user can have at most one budget per category, where categories are
/// matched case-insensitively. The table stores the lower-cased category
/// alongside the display label to enforce this with a unique index.
#[derive(Debug, Clone)]
pub struct SQLiteBudgetStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteBudgetStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl BudgetStore for SQLiteBudgetStore {
    /// Create a budget, or update the amount of the existing budget with the
    /// same canonical category.
    ///
    /// The display label of an existing budget is kept as it was first
    /// entered, only the amount changes.
    ///
    /// # Errors
    /// This function will return a [Error::SqlError] if there is an SQL
    /// error, e.g. `user_id` does not refer to a valid user.
    fn upsert(
        &mut self,
        user_id: UserID,
        category: &str,
        amount: f64,
    ) -> Result<(Budget, bool), Error> {
        let category_key = canonical_category(category);
        let connection = self.connection.lock().unwrap();

        let existing = connection
            .prepare(
                "SELECT id, user_id, category, amount FROM budget
                 WHERE user_id = ?1 AND category_key = ?2",
            )?
            .query_row((user_id, &category_key), Self::map_row);

        match existing {
            Ok(mut budget) => {
                connection.execute(
                    "UPDATE budget SET amount = ?1 WHERE id = ?2",
                    (amount, budget.id),
                )?;
                budget.amount = amount;

                Ok((budget, false))
            }
            Err(rusqlite::Error::QueryReturnedNoRows) => {
                connection.execute(
                    "INSERT INTO budget (user_id, category, category_key, amount)
                     VALUES (?1, ?2, ?3, ?4)",
                    (user_id, category, &category_key, amount),
                )?;

                Ok((
                    Budget {
                        id: connection.last_insert_rowid(),
                        user_id,
                        category: category.to_string(),
                        amount,
                    },
                    true,
                ))
            }
            Err(error) => Err(error.into()),
        }
    }

    /// Retrieve a budget in the database by its `id`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a valid budget,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn get(&self, id: DatabaseID) -> Result<Budget, Error> {
        let budget = self
            .connection
            .lock()
            .unwrap()
            .prepare("SELECT id, user_id, category, amount FROM budget WHERE id = :id")?
            .query_row(&[(":id", &id)], Self::map_row)?;

        Ok(budget)
    }

    /// Retrieve all of a user's budgets, ordered by category name.
    ///
    /// # Errors
    /// This function will return a [Error::SqlError] if there is an SQL error.
    fn get_by_user(&self, user_id: UserID) -> Result<Vec<Budget>, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(
                "SELECT id, user_id, category, amount FROM budget
                 WHERE user_id = :user_id ORDER BY category_key ASC",
            )?
            .query_map(&[(":user_id", &user_id.as_i64())], Self::map_row)?
            .map(|maybe_budget| maybe_budget.map_err(Error::SqlError))
            .collect()
    }

    /// Overwrite the stored budget with the same ID as `budget`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if the budget is not in the database,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn update(&mut self, budget: &Budget) -> Result<(), Error> {
        let rows_affected = self.connection.lock().unwrap().execute(
            "UPDATE budget SET category = ?1, category_key = ?2, amount = ?3 WHERE id = ?4",
            (
                &budget.category,
                canonical_category(&budget.category),
                budget.amount,
                budget.id,
            ),
        )?;

        if rows_affected == 0 {
            return Err(Error::NotFound);
        }

        Ok(())
    }

    /// Delete a budget from the database by its ID.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if the budget is not in the database,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn delete(&mut self, id: DatabaseID) -> Result<(), Error> {
        let rows_affected = self
            .connection
            .lock()
            .unwrap()
            .execute("DELETE FROM budget WHERE id = ?1", (id,))?;

        if rows_affected == 0 {
            return Err(Error::NotFound);
        }

        Ok(())
    }
}

impl CreateTable for SQLiteBudgetStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS budget (
                    id INTEGER PRIMARY KEY,
                    user_id INTEGER NOT NULL,
                    category TEXT NOT NULL,
                    category_key TEXT NOT NULL,
                    amount REAL NOT NULL,
                    UNIQUE(user_id, category_key),
                    FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                    )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteBudgetStore {
    type ReturnType = Budget;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        Ok(Budget {
            id: row.get(offset)?,
            user_id: UserID::new(row.get(offset + 1)?),
            category: row.get(offset + 2)?,
            amount: row.get(offset + 3)?,
        })
    }
}
