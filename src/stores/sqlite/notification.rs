//! Implements a SQLite backed notification store.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{DatabaseID, Notification, NotificationKind, UserID},
    stores::NotificationStore,
};

/// How many notifications a full listing returns, matching the size of the
/// client's notification panel.
const LIST_LIMIT: u32 = 6;

/// Stores in-app notifications in a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteNotificationStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteNotificationStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl NotificationStore for SQLiteNotificationStore {
    /// Create an unread notification stamped with the current UTC time.
    ///
    /// # Errors
    /// This function will return a [Error::SqlError] if there is an SQL
    /// error, e.g. `user_id` does not refer to a valid user.
    fn create(
        &mut self,
        user_id: UserID,
        message: &str,
        kind: NotificationKind,
    ) -> Result<Notification, Error> {
        let created_at = OffsetDateTime::now_utc();

        let connection = self.connection.lock().unwrap();

        connection.execute(
            "INSERT INTO notification (user_id, message, type, is_read, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            (user_id, message, kind, false, created_at),
        )?;

        Ok(Notification {
            id: connection.last_insert_rowid(),
            user_id,
            message: message.to_string(),
            kind,
            read: false,
            created_at,
        })
    }

    /// Retrieve a notification in the database by its `id`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a valid notification,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn get(&self, id: DatabaseID) -> Result<Notification, Error> {
        let notification = self
            .connection
            .lock()
            .unwrap()
            .prepare(
                "SELECT id, user_id, message, type, is_read, created_at
                 FROM notification WHERE id = :id",
            )?
            .query_row(&[(":id", &id)], Self::map_row)?;

        Ok(notification)
    }

    /// Retrieve a user's notifications, newest first.
    ///
    /// # Errors
    /// This function will return a [Error::SqlError] if there is an SQL error.
    fn get_by_user(
        &self,
        user_id: UserID,
        unread_only: bool,
    ) -> Result<Vec<Notification>, Error> {
        let query = if unread_only {
            "SELECT id, user_id, message, type, is_read, created_at
             FROM notification WHERE user_id = :user_id AND is_read = 0
             ORDER BY created_at DESC, id DESC"
                .to_string()
        } else {
            format!(
                "SELECT id, user_id, message, type, is_read, created_at
                 FROM notification WHERE user_id = :user_id
                 ORDER BY created_at DESC, id DESC LIMIT {LIST_LIMIT}"
            )
        };

        self.connection
            .lock()
            .unwrap()
            .prepare(&query)?
            .query_map(&[(":user_id", &user_id.as_i64())], Self::map_row)?
            .map(|maybe_notification| maybe_notification.map_err(Error::SqlError))
            .collect()
    }

    /// Whether the user already has a notification with this exact message
    /// created at or after `threshold`.
    ///
    /// # Errors
    /// This function will return a [Error::SqlError] if there is an SQL error.
    fn exists_since(
        &self,
        user_id: UserID,
        message: &str,
        threshold: OffsetDateTime,
    ) -> Result<bool, Error> {
        let count: i64 = self.connection.lock().unwrap().query_row(
            "SELECT COUNT(*) FROM notification
             WHERE user_id = ?1 AND message = ?2 AND created_at >= ?3",
            (user_id, message, threshold),
            |row| row.get(0),
        )?;

        Ok(count > 0)
    }

    /// Mark a single notification as read.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if the notification is not in the database,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn mark_read(&mut self, id: DatabaseID) -> Result<(), Error> {
        let rows_affected = self
            .connection
            .lock()
            .unwrap()
            .execute("UPDATE notification SET is_read = 1 WHERE id = ?1", (id,))?;

        if rows_affected == 0 {
            return Err(Error::NotFound);
        }

        Ok(())
    }

    /// Mark all of a user's notifications as read.
    ///
    /// # Errors
    /// This function will return a [Error::SqlError] if there is an SQL error.
    fn mark_all_read(&mut self, user_id: UserID) -> Result<(), Error> {
        self.connection.lock().unwrap().execute(
            "UPDATE notification SET is_read = 1 WHERE user_id = ?1 AND is_read = 0",
            (user_id,),
        )?;

        Ok(())
    }

    /// Delete all but the user's `keep` newest notifications.
    ///
    /// # Errors
    /// This function will return a [Error::SqlError] if there is an SQL error.
    fn prune(&mut self, user_id: UserID, keep: u32) -> Result<(), Error> {
        self.connection.lock().unwrap().execute(
            "DELETE FROM notification WHERE user_id = ?1 AND id NOT IN (
                 SELECT id FROM notification WHERE user_id = ?1
                 ORDER BY created_at DESC, id DESC LIMIT ?2
             )",
            (user_id, keep),
        )?;

        Ok(())
    }
}

impl CreateTable for SQLiteNotificationStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS notification (
                    id INTEGER PRIMARY KEY,
                    user_id INTEGER NOT NULL,
                    message TEXT NOT NULL,
                    type TEXT NOT NULL,
                    is_read INTEGER NOT NULL,
                    created_at TEXT NOT NULL,
                    FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                    )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteNotificationStore {
    type ReturnType = Notification;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        Ok(Notification {
            id: row.get(offset)?,
            user_id: UserID::new(row.get(offset + 1)?),
            message: row.get(offset + 2)?,
            kind: row.get(offset + 3)?,
            read: row.get(offset + 4)?,
            created_at: row.get(offset + 5)?,
        })
    }
}
