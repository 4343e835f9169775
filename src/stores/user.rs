//! Defines the user store trait.

use crate::{
    Error,
    models::{PasswordHash, User, UserID},
};

/// Handles the creation and retrieval of users.
pub trait UserStore {
    /// Create a new user in the store.
    ///
    /// # Errors
    /// Returns [Error::DuplicateEmail] if `email` already belongs to a user.
    fn create(&mut self, name: &str, email: &str, password_hash: PasswordHash)
    -> Result<User, Error>;

    /// Retrieve a user from the store by their ID.
    fn get(&self, id: UserID) -> Result<User, Error>;

    /// Retrieve a user from the store by their email address.
    fn get_by_email(&self, email: &str) -> Result<User, Error>;
}
