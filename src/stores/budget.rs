//! Defines the budget store trait.

use crate::{
    Error,
    models::{Budget, DatabaseID, UserID},
};

/// Handles the creation and retrieval of budgets.
pub trait BudgetStore {
    /// Create a budget, or update the amount of the existing budget with the
    /// same canonical category.
    ///
    /// Returns the stored budget and whether a new row was created.
    fn upsert(&mut self, user_id: UserID, category: &str, amount: f64)
    -> Result<(Budget, bool), Error>;

    /// Retrieve a budget from the store by its ID.
    fn get(&self, id: DatabaseID) -> Result<Budget, Error>;

    /// Retrieve all of a user's budgets, ordered by category name.
    fn get_by_user(&self, user_id: UserID) -> Result<Vec<Budget>, Error>;

    /// Overwrite the stored budget with the same ID as `budget`.
    fn update(&mut self, budget: &Budget) -> Result<(), Error>;

    /// Delete a budget from the store by its ID.
    fn delete(&mut self, id: DatabaseID) -> Result<(), Error>;
}
