//! Defines the notification store trait.

use time::OffsetDateTime;

use crate::{
    Error,
    models::{DatabaseID, Notification, NotificationKind, UserID},
};

/// Handles the creation and retrieval of in-app notifications.
pub trait NotificationStore {
    /// Create an unread notification for `user_id`, stamped with the current
    /// time.
    fn create(
        &mut self,
        user_id: UserID,
        message: &str,
        kind: NotificationKind,
    ) -> Result<Notification, Error>;

    /// Retrieve a notification from the store by its ID.
    fn get(&self, id: DatabaseID) -> Result<Notification, Error>;

    /// Retrieve a user's notifications, newest first.
    ///
    /// When `unread_only` is false the result is capped to the most recent
    /// few, which is all the client's notification panel shows.
    fn get_by_user(
        &self,
        user_id: UserID,
        unread_only: bool,
    ) -> Result<Vec<Notification>, Error>;

    /// Whether the user already has a notification with this exact message
    /// created at or after `threshold`. Used to suppress duplicates when
    /// suggestions are regenerated.
    fn exists_since(
        &self,
        user_id: UserID,
        message: &str,
        threshold: OffsetDateTime,
    ) -> Result<bool, Error>;

    /// Mark a single notification as read.
    fn mark_read(&mut self, id: DatabaseID) -> Result<(), Error>;

    /// Mark all of a user's notifications as read.
    fn mark_all_read(&mut self, user_id: UserID) -> Result<(), Error>;

    /// Delete all but the user's `keep` newest notifications.
    fn prune(&mut self, user_id: UserID, keep: u32) -> Result<(), Error>;
}
