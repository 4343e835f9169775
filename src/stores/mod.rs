//! Contains traits and implementations for objects that store the domain
//! [models](crate::models).

mod budget;
mod goal;
mod notification;
mod transaction;
mod user;

pub mod sqlite;

pub use budget::BudgetStore;
pub use goal::{GoalStore, NewGoal};
pub use notification::NotificationStore;
pub use transaction::{SortOrder, TransactionQuery, TransactionStore};
pub use user::UserStore;
