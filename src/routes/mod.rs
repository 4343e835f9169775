//! The HTTP route handlers for the JSON API.

pub mod ai;
pub mod budgets;
pub mod endpoints;
pub mod goals;
pub mod notifications;
pub mod transactions;
pub mod users;
