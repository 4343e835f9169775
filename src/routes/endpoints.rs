//! The API endpoint URIs.
//!
//! For endpoints that take a path parameter, e.g. `/transactions/{id}`, use
//! [format_endpoint].

/// The prefix all API routes are nested under.
pub const API_USER: &str = "/api/user";
/// The route for registering a new user.
pub const REGISTER: &str = "/register";
/// The route for logging in an existing user.
pub const LOG_IN: &str = "/login";
/// The route for fetching the authenticated user's profile.
pub const PROFILE: &str = "/profile";
/// The route for listing and creating transactions.
pub const TRANSACTIONS: &str = "/transactions";
/// The route for updating or deleting a single transaction.
pub const TRANSACTION: &str = "/transactions/{id}";
/// The route for the aggregated transaction analytics.
pub const TRANSACTION_ANALYTICS: &str = "/transactions/analytics";
/// The route for listing and upserting budgets.
pub const BUDGETS: &str = "/budgets";
/// The route for updating or deleting a single budget.
pub const BUDGET: &str = "/budgets/{id}";
/// The route for listing and creating savings goals.
pub const GOALS: &str = "/goals";
/// The route for updating or deleting a single goal.
pub const GOAL: &str = "/goals/{id}";
/// The route for listing notifications.
pub const NOTIFICATIONS: &str = "/notifications";
/// The route for generating notifications from recent activity.
pub const NOTIFICATIONS_GENERATE: &str = "/notifications/generate";
/// The route for marking a single notification as read.
pub const NOTIFICATION_READ: &str = "/notifications/{id}/read";
/// The route for marking all notifications as read.
pub const NOTIFICATIONS_READ_ALL: &str = "/notifications/read-all";
/// The route for free-form financial advice.
pub const SMART_ADVISOR: &str = "/ai/smart-advisor";
/// The route for the need/want expense analysis.
pub const ANALYZE_EXPENSE: &str = "/ai/analyze-expense";

/// Replace the `{...}` parameter in `endpoint_path` with `id`.
///
/// Assumes the path has at most one parameter.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    match (endpoint_path.find('{'), endpoint_path.find('}')) {
        (Some(start), Some(end)) if start < end => {
            let mut formatted = endpoint_path.to_string();
            formatted.replace_range(start..=end, &id.to_string());
            formatted
        }
        _ => endpoint_path.to_string(),
    }
}
