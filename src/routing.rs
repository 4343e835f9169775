//! Application router configuration.

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::{
    Error,
    app_state::AppState,
    routes::{
        ai::{analyze_expense, smart_advisor},
        budgets::{delete_budget, get_budgets, update_budget, upsert_budget},
        endpoints,
        goals::{create_goal, delete_goal, get_goals, update_goal},
        notifications::{
            generate_notifications, get_notifications, mark_all_notifications_read,
            mark_notification_read,
        },
        transactions::{
            create_transaction, delete_transaction, get_analytics, get_transactions,
            update_transaction,
        },
        users::{get_profile, log_in, register},
    },
};

/// Return a router with all the app's routes nested under `/api/user`.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route(endpoints::REGISTER, post(register))
        .route(endpoints::LOG_IN, post(log_in))
        .route(endpoints::PROFILE, get(get_profile))
        .route(
            endpoints::TRANSACTIONS,
            get(get_transactions).post(create_transaction),
        )
        .route(endpoints::TRANSACTION_ANALYTICS, get(get_analytics))
        .route(
            endpoints::TRANSACTION,
            put(update_transaction).delete(delete_transaction),
        )
        .route(endpoints::BUDGETS, get(get_budgets).post(upsert_budget))
        .route(endpoints::BUDGET, put(update_budget).delete(delete_budget))
        .route(endpoints::GOALS, get(get_goals).post(create_goal))
        .route(endpoints::GOAL, put(update_goal).delete(delete_goal))
        .route(endpoints::NOTIFICATIONS, get(get_notifications))
        .route(
            endpoints::NOTIFICATIONS_GENERATE,
            post(generate_notifications),
        )
        .route(endpoints::NOTIFICATION_READ, put(mark_notification_read))
        .route(
            endpoints::NOTIFICATIONS_READ_ALL,
            put(mark_all_notifications_read),
        )
        .route(endpoints::SMART_ADVISOR, post(smart_advisor))
        .route(endpoints::ANALYZE_EXPENSE, post(analyze_expense));

    Router::new()
        .nest(endpoints::API_USER, api_routes)
        .fallback(not_found)
        .with_state(state)
}

/// Unknown paths get the standard JSON error envelope rather than an empty
/// 404 body.
async fn not_found() -> Error {
    Error::NotFound
}
