//! Implements a SQLite backed goal store.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row};

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{DatabaseID, Goal, UserID},
    stores::{GoalStore, NewGoal},
};

/// Stores savings goals in a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteGoalStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteGoalStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl GoalStore for SQLiteGoalStore {
    /// Create a new goal in the database.
    ///
    /// The stored status is derived from the amounts, so a goal created with
    /// `saved_amount >= target_amount` starts out completed.
    ///
    /// # Errors
    /// This function will return a [Error::SqlError] if there is an SQL
    /// error, e.g. `new_goal.user_id` does not refer to a valid user.
    fn create(&mut self, new_goal: NewGoal) -> Result<Goal, Error> {
        let mut goal = Goal {
            id: 0,
            user_id: new_goal.user_id,
            title: new_goal.title,
            description: new_goal.description,
            target_amount: new_goal.target_amount,
            saved_amount: new_goal.saved_amount,
            target_date: new_goal.target_date,
            status: crate::models::GoalStatus::Active,
        };
        goal.status = goal.resolved_status();

        let connection = self.connection.lock().unwrap();

        connection.execute(
            "INSERT INTO goal (user_id, title, description, target_amount, saved_amount, target_date, status)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            (
                goal.user_id,
                &goal.title,
                &goal.description,
                goal.target_amount,
                goal.saved_amount,
                goal.target_date,
                goal.status,
            ),
        )?;

        goal.id = connection.last_insert_rowid();

        Ok(goal)
    }

    /// Retrieve a goal in the database by its `id`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a valid goal,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn get(&self, id: DatabaseID) -> Result<Goal, Error> {
        let goal = self
            .connection
            .lock()
            .unwrap()
            .prepare(
                "SELECT id, user_id, title, description, target_amount, saved_amount, target_date, status
                 FROM goal WHERE id = :id",
            )?
            .query_row(&[(":id", &id)], Self::map_row)?;

        Ok(goal)
    }

    /// Retrieve all of a user's goals, most recently created first.
    ///
    /// # Errors
    /// This function will return a [Error::SqlError] if there is an SQL error.
    fn get_by_user(&self, user_id: UserID) -> Result<Vec<Goal>, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(
                "SELECT id, user_id, title, description, target_amount, saved_amount, target_date, status
                 FROM goal WHERE user_id = :user_id ORDER BY id DESC",
            )?
            .query_map(&[(":user_id", &user_id.as_i64())], Self::map_row)?
            .map(|maybe_goal| maybe_goal.map_err(Error::SqlError))
            .collect()
    }

    /// Overwrite the stored goal with the same ID as `goal`.
    ///
    /// The stored status is re-derived from the amounts, so saving enough
    /// money through an update completes the goal.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if the goal is not in the database,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn update(&mut self, goal: &Goal) -> Result<(), Error> {
        let rows_affected = self.connection.lock().unwrap().execute(
            "UPDATE goal
             SET title = ?1, description = ?2, target_amount = ?3, saved_amount = ?4,
                 target_date = ?5, status = ?6
             WHERE id = ?7",
            (
                &goal.title,
                &goal.description,
                goal.target_amount,
                goal.saved_amount,
                goal.target_date,
                goal.resolved_status(),
                goal.id,
            ),
        )?;

        if rows_affected == 0 {
            return Err(Error::NotFound);
        }

        Ok(())
    }

    /// Delete a goal from the database by its ID.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if the goal is not in the database,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn delete(&mut self, id: DatabaseID) -> Result<(), Error> {
        let rows_affected = self
            .connection
            .lock()
            .unwrap()
            .execute("DELETE FROM goal WHERE id = ?1", (id,))?;

        if rows_affected == 0 {
            return Err(Error::NotFound);
        }

        Ok(())
    }
}

impl CreateTable for SQLiteGoalStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS goal (
                    id INTEGER PRIMARY KEY,
                    user_id INTEGER NOT NULL,
                    title TEXT NOT NULL,
                    description TEXT NOT NULL,
                    target_amount REAL NOT NULL,
                    saved_amount REAL NOT NULL,
                    target_date TEXT,
                    status TEXT NOT NULL,
                    FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                    )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteGoalStore {
    type ReturnType = Goal;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        Ok(Goal {
            id: row.get(offset)?,
            user_id: UserID::new(row.get(offset + 1)?),
            title: row.get(offset + 2)?,
            description: row.get(offset + 3)?,
            target_amount: row.get(offset + 4)?,
            saved_amount: row.get(offset + 5)?,
            target_date: row.get(offset + 6)?,
            status: row.get(offset + 7)?,
        })
    }
}
