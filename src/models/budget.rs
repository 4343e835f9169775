//! This file defines the `Budget` model, a per-category spending cap.

use serde::{Deserialize, Serialize};

use crate::models::{DatabaseID, UserID};

/// A per-category spending cap against which actual expense is measured.
///
/// A user has at most one budget per category (matched case-insensitively).
/// The amount actually spent against a budget is derived from the user's
/// expense transactions, see [budget_usage](crate::analytics::budget_usage).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    /// The ID of the budget.
    pub id: DatabaseID,
    /// The ID of the user that owns the budget.
    pub user_id: UserID,
    /// The category label the cap applies to, case-preserved for display.
    pub category: String,
    /// The cap. Always non-negative.
    pub amount: f64,
}
