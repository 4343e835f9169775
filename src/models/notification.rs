//! This file defines the `Notification` model, an in-app suggestion message.

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::models::{DatabaseID, UserID};

/// The flavor of a notification, used by the client to pick an icon/color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// Positive reinforcement, e.g. a healthy savings rate.
    Success,
    /// Something needs attention, e.g. an exceeded budget.
    Warning,
    /// A concrete spending suggestion.
    Tip,
    /// Neutral information, e.g. a nudge towards active goals.
    Info,
}

impl NotificationKind {
    /// The lower-case string used on the wire and in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Success => "success",
            NotificationKind::Warning => "warning",
            NotificationKind::Tip => "tip",
            NotificationKind::Info => "info",
        }
    }
}

impl ToSql for NotificationKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for NotificationKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "success" => Ok(NotificationKind::Success),
            "warning" => Ok(NotificationKind::Warning),
            "tip" => Ok(NotificationKind::Tip),
            "info" => Ok(NotificationKind::Info),
            _ => Err(FromSqlError::InvalidType),
        }
    }
}

/// A message generated for a user from their recent spending activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// The ID of the notification.
    pub id: DatabaseID,
    /// The ID of the user the notification is for.
    pub user_id: UserID,
    /// The human-readable message.
    pub message: String,
    /// The flavor of the notification.
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    /// Whether the user has marked the notification as read.
    #[serde(rename = "is_read")]
    pub read: bool,
    /// When the notification was generated.
    pub created_at: OffsetDateTime,
}
