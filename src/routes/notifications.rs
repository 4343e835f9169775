//! Routes for generating, listing and acknowledging notifications.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use serde_json::{Value, json};
use time::{Duration, OffsetDateTime};

use crate::{
    Error,
    app_state::AppState,
    auth::Claims,
    frequency::Frequency,
    models::DatabaseID,
    response::{success, success_message},
    stores::{
        BudgetStore, GoalStore, NotificationStore, TransactionQuery, TransactionStore,
        sqlite::{
            SQLiteBudgetStore, SQLiteGoalStore, SQLiteNotificationStore, SQLiteTransactionStore,
        },
    },
    suggestions::suggest,
};

/// How many days of transactions the suggestion rules look at.
const SUGGESTION_WINDOW_DAYS: u16 = 30;

/// How long an identical message suppresses regeneration.
const DUPLICATE_WINDOW: Duration = Duration::hours(24);

/// How many notifications are kept per user after generation.
const KEPT_NOTIFICATIONS: u32 = 5;

/// Run the suggestion rules over the user's recent activity and store the
/// results as notifications.
///
/// A suggestion whose exact message was already generated within the last
/// 24 hours is skipped, so refreshing the dashboard does not pile up
/// duplicates. After generation only the newest few notifications are kept.
pub async fn generate_notifications(
    State(state): State<AppState>,
    claims: Claims,
) -> Result<Json<Value>, Error> {
    let mut query = TransactionQuery::for_user(claims.user_id());
    query.date_range = Frequency::Days(SUGGESTION_WINDOW_DAYS).date_range();
    let transactions =
        SQLiteTransactionStore::new(state.db_connection.clone()).get_query(&query)?;
    let budgets = SQLiteBudgetStore::new(state.db_connection.clone()).get_by_user(claims.user_id())?;
    let goals = SQLiteGoalStore::new(state.db_connection.clone()).get_by_user(claims.user_id())?;

    let mut store = SQLiteNotificationStore::new(state.db_connection.clone());
    let threshold = OffsetDateTime::now_utc() - DUPLICATE_WINDOW;
    let mut count = 0u32;

    for suggestion in suggest(&transactions, &budgets, &goals) {
        if !store.exists_since(claims.user_id(), &suggestion.message, threshold)? {
            store.create(claims.user_id(), &suggestion.message, suggestion.kind)?;
            count += 1;
        }
    }

    store.prune(claims.user_id(), KEPT_NOTIFICATIONS)?;

    let message = if count > 0 {
        format!("Generated {count} new notifications")
    } else {
        "No new notifications to generate".to_string()
    };

    Ok(success(json!({ "count": count, "message": message })))
}

/// The query parameters for the notification list route.
#[derive(Debug, Default, Deserialize)]
pub struct NotificationListParams {
    /// When true, only unread notifications are returned.
    #[serde(rename = "unreadOnly")]
    pub unread_only: Option<bool>,
}

/// List the authenticated user's notifications, newest first.
pub async fn get_notifications(
    State(state): State<AppState>,
    claims: Claims,
    Query(params): Query<NotificationListParams>,
) -> Result<Json<Value>, Error> {
    let notifications = SQLiteNotificationStore::new(state.db_connection.clone())
        .get_by_user(claims.user_id(), params.unread_only.unwrap_or(false))?;

    Ok(success(json!({ "notifications": notifications })))
}

/// Mark a notification belonging to the authenticated user as read.
pub async fn mark_notification_read(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<DatabaseID>,
) -> Result<Json<Value>, Error> {
    let mut store = SQLiteNotificationStore::new(state.db_connection.clone());

    let notification = store.get(id)?;
    if notification.user_id != claims.user_id() {
        return Err(Error::Forbidden);
    }

    store.mark_read(id)?;

    Ok(success_message("Notification marked as read"))
}

/// Mark all of the authenticated user's notifications as read.
pub async fn mark_all_notifications_read(
    State(state): State<AppState>,
    claims: Claims,
) -> Result<Json<Value>, Error> {
    SQLiteNotificationStore::new(state.db_connection.clone()).mark_all_read(claims.user_id())?;

    Ok(success_message("All notifications marked as read"))
}

#[cfg(test)]
mod notification_route_tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    use crate::routes::test_utils::{
        create_second_user_and_token, create_user_and_token, test_server,
    };

    /// Seed an overspent budget so that generation always has something to
    /// say.
    async fn seed_overspent_budget(server: &axum_test::TestServer, token: &str) {
        server
            .post("/api/user/transactions")
            .authorization_bearer(token.to_string())
            .json(&json!({ "amount": 150.0, "type": "expense", "category": "Rent" }))
            .await
            .assert_status_ok();
        server
            .post("/api/user/budgets")
            .authorization_bearer(token.to_string())
            .json(&json!({ "category": "Rent", "amount": 100.0 }))
            .await
            .assert_status_ok();
    }

    #[tokio::test]
    async fn generate_creates_notifications_from_activity() {
        let (server, state) = test_server();
        let (_, token) = create_user_and_token(&state);
        seed_overspent_budget(&server, &token).await;

        let response = server
            .post("/api/user/notifications/generate")
            .authorization_bearer(token.clone())
            .await;

        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["count"], json!(1));
        assert_eq!(body["message"], json!("Generated 1 new notifications"));

        let notifications = server
            .get("/api/user/notifications")
            .authorization_bearer(token)
            .await
            .json::<Value>();
        let listed = notifications["notifications"].as_array().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(
            listed[0]["message"],
            json!("You've exceeded your budget for Rent by 50.0%.")
        );
        assert_eq!(listed[0]["type"], json!("warning"));
        assert_eq!(listed[0]["is_read"], json!(false));
    }

    #[tokio::test]
    async fn generate_suppresses_recent_duplicates() {
        let (server, state) = test_server();
        let (_, token) = create_user_and_token(&state);
        seed_overspent_budget(&server, &token).await;

        server
            .post("/api/user/notifications/generate")
            .authorization_bearer(token.clone())
            .await
            .assert_status_ok();

        let response = server
            .post("/api/user/notifications/generate")
            .authorization_bearer(token.clone())
            .await;

        let body = response.json::<Value>();
        assert_eq!(body["count"], json!(0));
        assert_eq!(body["message"], json!("No new notifications to generate"));

        let notifications = server
            .get("/api/user/notifications")
            .authorization_bearer(token)
            .await
            .json::<Value>();
        assert_eq!(notifications["notifications"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn generate_with_no_activity_creates_nothing() {
        let (server, state) = test_server();
        let (_, token) = create_user_and_token(&state);

        let response = server
            .post("/api/user/notifications/generate")
            .authorization_bearer(token)
            .await;

        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["count"], json!(0));
    }

    #[tokio::test]
    async fn mark_read_and_unread_filter() {
        let (server, state) = test_server();
        let (_, token) = create_user_and_token(&state);
        seed_overspent_budget(&server, &token).await;

        server
            .post("/api/user/notifications/generate")
            .authorization_bearer(token.clone())
            .await
            .assert_status_ok();

        let notifications = server
            .get("/api/user/notifications")
            .authorization_bearer(token.clone())
            .await
            .json::<Value>();
        let id = notifications["notifications"][0]["id"].as_i64().unwrap();

        let response = server
            .put(&format!("/api/user/notifications/{id}/read"))
            .authorization_bearer(token.clone())
            .await;

        response.assert_status_ok();
        assert_eq!(
            response.json::<Value>()["message"],
            json!("Notification marked as read")
        );

        let unread = server
            .get("/api/user/notifications")
            .add_query_param("unreadOnly", "true")
            .authorization_bearer(token)
            .await
            .json::<Value>();
        assert!(unread["notifications"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn mark_read_rejects_other_users_notification() {
        let (server, state) = test_server();
        let (_, token) = create_user_and_token(&state);
        seed_overspent_budget(&server, &token).await;

        server
            .post("/api/user/notifications/generate")
            .authorization_bearer(token.clone())
            .await
            .assert_status_ok();

        let notifications = server
            .get("/api/user/notifications")
            .authorization_bearer(token)
            .await
            .json::<Value>();
        let id = notifications["notifications"][0]["id"].as_i64().unwrap();

        let (_, other_token) = create_second_user_and_token(&state);

        server
            .put(&format!("/api/user/notifications/{id}/read"))
            .authorization_bearer(other_token)
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn read_all_marks_everything_read() {
        let (server, state) = test_server();
        let (_, token) = create_user_and_token(&state);
        seed_overspent_budget(&server, &token).await;

        server
            .post("/api/user/notifications/generate")
            .authorization_bearer(token.clone())
            .await
            .assert_status_ok();

        let response = server
            .put("/api/user/notifications/read-all")
            .authorization_bearer(token.clone())
            .await;

        response.assert_status_ok();
        assert_eq!(
            response.json::<Value>()["message"],
            json!("All notifications marked as read")
        );

        let unread = server
            .get("/api/user/notifications")
            .add_query_param("unreadOnly", "true")
            .authorization_bearer(token)
            .await
            .json::<Value>();
        assert!(unread["notifications"].as_array().unwrap().is_empty());
    }
}
