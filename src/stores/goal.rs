//! Defines the goal store trait.

use time::Date;

use crate::{
    Error,
    models::{DatabaseID, Goal, UserID},
};

/// The fields needed to create a new [Goal].
#[derive(Debug, Clone, PartialEq)]
pub struct NewGoal {
    /// The ID of the user that owns the goal.
    pub user_id: UserID,
    /// A short name for the goal.
    pub title: String,
    /// A longer free-text description. May be empty.
    pub description: String,
    /// The amount the user wants to save.
    pub target_amount: f64,
    /// The amount already saved, usually 0 for a new goal.
    pub saved_amount: f64,
    /// The date the user wants to reach the target by, if any.
    pub target_date: Option<Date>,
}

/// Handles the creation and retrieval of savings goals.
pub trait GoalStore {
    /// Create a new goal in the store.
    fn create(&mut self, new_goal: NewGoal) -> Result<Goal, Error>;

    /// Retrieve a goal from the store by its ID.
    fn get(&self, id: DatabaseID) -> Result<Goal, Error>;

    /// Retrieve all of a user's goals, most recently created first.
    fn get_by_user(&self, user_id: UserID) -> Result<Vec<Goal>, Error>;

    /// Overwrite the stored goal with the same ID as `goal`.
    fn update(&mut self, goal: &Goal) -> Result<(), Error>;

    /// Delete a goal from the store by its ID.
    fn delete(&mut self, id: DatabaseID) -> Result<(), Error>;
}
