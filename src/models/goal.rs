//! This file defines the `Goal` model, a savings target.

use std::fmt::Display;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::models::{DatabaseID, UserID};

/// Whether a savings goal is still being saved towards or has been reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalStatus {
    /// The goal is still being saved towards.
    Active,
    /// The saved amount has reached the target amount.
    Completed,
}

impl GoalStatus {
    /// The lower-case string used on the wire and in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalStatus::Active => "active",
            GoalStatus::Completed => "completed",
        }
    }
}

impl Display for GoalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ToSql for GoalStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for GoalStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "active" => Ok(GoalStatus::Active),
            "completed" => Ok(GoalStatus::Completed),
            _ => Err(FromSqlError::InvalidType),
        }
    }
}

/// A savings target with a current saved amount and an optional due date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    /// The ID of the goal.
    pub id: DatabaseID,
    /// The ID of the user that owns the goal.
    pub user_id: UserID,
    /// A short name for the goal, e.g. "Emergency fund".
    pub title: String,
    /// A longer free-text description. May be empty.
    pub description: String,
    /// The amount the user wants to save. Always non-negative.
    pub target_amount: f64,
    /// The amount saved so far. Always non-negative.
    pub saved_amount: f64,
    /// The date the user wants to reach the target by, if any.
    pub target_date: Option<Date>,
    /// Whether the goal is active or completed.
    pub status: GoalStatus,
}

impl Goal {
    /// The status the goal should have given its amounts.
    ///
    /// Goals complete automatically once the saved amount reaches the target.
    pub fn resolved_status(&self) -> GoalStatus {
        if self.target_amount > 0.0 && self.saved_amount >= self.target_amount {
            GoalStatus::Completed
        } else {
            GoalStatus::Active
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::models::UserID;

    use super::{Goal, GoalStatus};

    fn goal(target_amount: f64, saved_amount: f64) -> Goal {
        Goal {
            id: 1,
            user_id: UserID::new(1),
            title: "Emergency fund".to_string(),
            description: String::new(),
            target_amount,
            saved_amount,
            target_date: None,
            status: GoalStatus::Active,
        }
    }

    #[test]
    fn goal_completes_when_target_reached() {
        assert_eq!(goal(1000.0, 1000.0).resolved_status(), GoalStatus::Completed);
        assert_eq!(goal(1000.0, 1500.0).resolved_status(), GoalStatus::Completed);
    }

    #[test]
    fn goal_stays_active_below_target() {
        assert_eq!(goal(1000.0, 999.99).resolved_status(), GoalStatus::Active);
    }

    #[test]
    fn zero_target_goal_stays_active() {
        assert_eq!(goal(0.0, 0.0).resolved_status(), GoalStatus::Active);
    }
}
