//! Routes for creating, listing, updating and deleting transactions, plus
//! the aggregated analytics endpoint.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use serde_json::{Value, json};
use time::{Date, macros::format_description};

use crate::{
    Error,
    ai,
    analytics::{TOP_CATEGORY_COUNT, coerce_amount, summarize, top_categories},
    app_state::AppState,
    auth::Claims,
    frequency::Frequency,
    models::{DatabaseID, Transaction, TransactionType},
    pagination::{Pagination, resolve_page_request},
    response::{success, success_message},
    stores::{SortOrder, TransactionQuery, TransactionStore, sqlite::SQLiteTransactionStore},
};

/// The query parameters for the transaction list and analytics routes.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionListParams {
    /// The 1-based page number.
    pub page: Option<u64>,
    /// The number of transactions per page.
    pub page_size: Option<u64>,
    /// The day-count window token, e.g. `"7"`, `"30"` or `"all"`.
    pub frequency: Option<String>,
    /// Filter by transaction type. `"all"` and absence mean both types.
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// Translate the `type` query parameter into a store filter.
fn parse_type_filter(token: Option<&str>) -> Result<Option<TransactionType>, Error> {
    match token {
        None => Ok(None),
        Some(text) if text.eq_ignore_ascii_case("all") => Ok(None),
        Some(text) => TransactionType::parse(text).map(Some),
    }
}

/// List the authenticated user's transactions, most recent first.
pub async fn get_transactions(
    State(state): State<AppState>,
    claims: Claims,
    Query(params): Query<TransactionListParams>,
) -> Result<Json<Value>, Error> {
    let store = SQLiteTransactionStore::new(state.db_connection.clone());

    let mut query = TransactionQuery::for_user(claims.user_id());
    query.date_range = Frequency::parse(params.frequency.as_deref()).date_range();
    query.kind = parse_type_filter(params.kind.as_deref())?;

    let total = store.count(&query)?;
    let (page, page_size) =
        resolve_page_request(params.page, params.page_size, &state.pagination_config);
    let pagination = Pagination::new(total, page, page_size);

    query.sort_date = Some(SortOrder::Descending);
    query.limit = Some(page_size);
    query.offset = pagination.offset();

    let transactions = store.get_query(&query)?;

    Ok(success(json!({
        "transactions": transactions,
        "pagination": pagination,
    })))
}

/// Aggregate the authenticated user's transactions into the analytics
/// summary.
///
/// The window defaults to the last 365 days when no frequency is given,
/// matching what the dashboard charts show on first load.
pub async fn get_analytics(
    State(state): State<AppState>,
    claims: Claims,
    Query(params): Query<TransactionListParams>,
) -> Result<Json<Value>, Error> {
    let store = SQLiteTransactionStore::new(state.db_connection.clone());

    let frequency = Frequency::parse(Some(params.frequency.as_deref().unwrap_or("365")));

    let mut query = TransactionQuery::for_user(claims.user_id());
    query.date_range = frequency.date_range();
    query.kind = parse_type_filter(params.kind.as_deref())?;

    let transactions = store.get_query(&query)?;

    let summary = summarize(&transactions);
    let top = top_categories(&summary.categories, TOP_CATEGORY_COUNT);

    Ok(success(json!({ "data": {
        "totals": summary.totals,
        "categories": summary.categories,
        "topCategories": top,
    }})))
}

/// Read the `date` (or legacy `transaction_date`) field of a request body.
fn parse_date_field(request: &Value) -> Result<Option<Date>, Error> {
    let text = request
        .get("date")
        .or_else(|| request.get("transaction_date"))
        .and_then(Value::as_str);

    match text {
        None => Ok(None),
        Some(text) => Date::parse(text, format_description!("[year]-[month]-[day]"))
            .map(Some)
            .map_err(|_| Error::Validation(format!("\"{text}\" is not a valid date"))),
    }
}

/// Create a transaction for the authenticated user.
///
/// When the category is missing but a description is present, a category is
/// suggested from the description and reported back under `aiCategory`.
///
/// # Errors
/// This function will return a [Error::Validation] if the amount or type is
/// missing, the amount is negative, or no category can be determined.
pub async fn create_transaction(
    State(state): State<AppState>,
    claims: Claims,
    Json(request): Json<Value>,
) -> Result<Json<Value>, Error> {
    let (Some(amount_value), Some(type_text)) = (
        request.get("amount"),
        request.get("type").and_then(Value::as_str),
    ) else {
        return Err(Error::Validation("Amount and type are required".to_string()));
    };

    let amount = non_negative_amount(coerce_amount(amount_value))?;
    let kind = TransactionType::parse(type_text)?;

    let category = request
        .get("category")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .trim();
    let description = request
        .get("description")
        .and_then(Value::as_str)
        .unwrap_or_default();

    let (category, ai_category_used) = if category.is_empty() && !description.trim().is_empty() {
        (ai::categorize(description), true)
    } else {
        (category, false)
    };

    if category.is_empty() {
        return Err(Error::Validation(
            "Category is required. Provide a description for automatic categorization or enter one manually."
                .to_string(),
        ));
    }

    let mut builder = Transaction::build(amount, kind, claims.user_id())
        .category(category)
        .description(description);

    if let Some(date) = parse_date_field(&request)? {
        builder = builder.date(date)?;
    }

    let transaction = SQLiteTransactionStore::new(state.db_connection.clone()).create(builder)?;

    let mut payload = json!({ "data": transaction });
    if ai_category_used {
        payload["aiCategory"] = json!(category);
    }

    Ok(success(payload))
}

/// Reject negative amounts before they reach the store.
///
/// Signed amounts would double-count in the analytics totals, which treat the
/// transaction type as the sign.
fn non_negative_amount(amount: f64) -> Result<f64, Error> {
    if amount < 0.0 {
        return Err(Error::Validation(
            "Amount must not be negative".to_string(),
        ));
    }

    Ok(amount)
}

/// Fetch a transaction and check it belongs to the authenticated user.
fn get_owned_transaction(
    store: &SQLiteTransactionStore,
    claims: &Claims,
    id: DatabaseID,
) -> Result<Transaction, Error> {
    let transaction = store.get(id)?;

    if transaction.user_id != claims.user_id() {
        return Err(Error::Forbidden);
    }

    Ok(transaction)
}

/// Update the fields present in the request body on an existing transaction.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if the transaction does not exist,
/// - or [Error::Forbidden] if it belongs to another user.
pub async fn update_transaction(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<DatabaseID>,
    Json(request): Json<Value>,
) -> Result<Json<Value>, Error> {
    let mut store = SQLiteTransactionStore::new(state.db_connection.clone());
    let mut transaction = get_owned_transaction(&store, &claims, id)?;

    if let Some(amount) = request.get("amount") {
        transaction.amount = non_negative_amount(coerce_amount(amount))?;
    }
    if let Some(type_text) = request.get("type").and_then(Value::as_str) {
        transaction.kind = TransactionType::parse(type_text)?;
    }
    if let Some(category) = request.get("category").and_then(Value::as_str) {
        transaction.category = category.to_string();
    }
    if let Some(description) = request.get("description").and_then(Value::as_str) {
        transaction.description = description.to_string();
    }
    if let Some(date) = parse_date_field(&request)? {
        transaction.transaction_date = date;
    }

    store.update(&transaction)?;

    Ok(success(json!({ "data": transaction })))
}

/// Delete a transaction belonging to the authenticated user.
pub async fn delete_transaction(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<DatabaseID>,
) -> Result<Json<Value>, Error> {
    let mut store = SQLiteTransactionStore::new(state.db_connection.clone());
    get_owned_transaction(&store, &claims, id)?;

    store.delete(id)?;

    Ok(success_message("Expense deleted"))
}

#[cfg(test)]
mod transaction_route_tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    use crate::{
        models::{Transaction, TransactionType, User},
        routes::{
            endpoints::{TRANSACTION, format_endpoint},
            test_utils::{create_user_and_token, test_server},
        },
        stores::{TransactionStore, sqlite::SQLiteTransactionStore},
    };

    fn seed_transaction(
        state: &crate::app_state::AppState,
        user: &User,
        kind: TransactionType,
        category: &str,
        amount: f64,
    ) -> Transaction {
        SQLiteTransactionStore::new(state.db_connection.clone())
            .create(Transaction::build(amount, kind, user.id).category(category))
            .unwrap()
    }

    #[tokio::test]
    async fn list_returns_transactions_and_pagination() {
        let (server, state) = test_server();
        let (user, token) = create_user_and_token(&state);
        seed_transaction(&state, &user, TransactionType::Expense, "Food", 12.5);
        seed_transaction(&state, &user, TransactionType::Income, "Salary", 1000.0);

        let response = server
            .get("/api/user/transactions")
            .authorization_bearer(token)
            .await;

        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["transactions"].as_array().unwrap().len(), 2);
        assert_eq!(body["pagination"]["total"], json!(2));
        assert_eq!(body["pagination"]["page"], json!(1));
    }

    #[tokio::test]
    async fn list_filters_by_type() {
        let (server, state) = test_server();
        let (user, token) = create_user_and_token(&state);
        seed_transaction(&state, &user, TransactionType::Expense, "Food", 12.5);
        seed_transaction(&state, &user, TransactionType::Income, "Salary", 1000.0);

        let response = server
            .get("/api/user/transactions")
            .add_query_param("type", "income")
            .authorization_bearer(token)
            .await;

        let body = response.json::<Value>();
        let transactions = body["transactions"].as_array().unwrap();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0]["category"], json!("Salary"));
    }

    #[tokio::test]
    async fn list_does_not_leak_other_users_data() {
        let (server, state) = test_server();
        let (user, _) = create_user_and_token(&state);
        seed_transaction(&state, &user, TransactionType::Expense, "Food", 12.5);

        let other = crate::routes::test_utils::create_second_user_and_token(&state);

        let response = server
            .get("/api/user/transactions")
            .authorization_bearer(other.1)
            .await;

        assert!(
            response.json::<Value>()["transactions"]
                .as_array()
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn create_stores_transaction() {
        let (server, state) = test_server();
        let (_, token) = create_user_and_token(&state);

        let response = server
            .post("/api/user/transactions")
            .authorization_bearer(token)
            .json(&json!({
                "amount": 42.0,
                "type": "expense",
                "category": "Food",
                "description": "Groceries",
                "date": "2025-06-15",
            }))
            .await;

        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["data"]["category"], json!("Food"));
        assert_eq!(body["data"]["amount"], json!(42.0));
        assert_eq!(body["data"]["transaction_date"], json!("2025-06-15"));
        assert!(body.get("aiCategory").is_none());
    }

    #[tokio::test]
    async fn create_suggests_category_from_description() {
        let (server, state) = test_server();
        let (_, token) = create_user_and_token(&state);

        let response = server
            .post("/api/user/transactions")
            .authorization_bearer(token)
            .json(&json!({
                "amount": 18.0,
                "type": "expense",
                "description": "Uber ride to the airport",
            }))
            .await;

        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["aiCategory"], json!("Transportation"));
        assert_eq!(body["data"]["category"], json!("Transportation"));
    }

    #[tokio::test]
    async fn create_requires_amount_and_type() {
        let (server, state) = test_server();
        let (_, token) = create_user_and_token(&state);

        let response = server
            .post("/api/user/transactions")
            .authorization_bearer(token)
            .json(&json!({ "category": "Food" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<Value>()["message"],
            json!("Amount and type are required")
        );
    }

    #[tokio::test]
    async fn create_coerces_malformed_amount_to_zero() {
        let (server, state) = test_server();
        let (_, token) = create_user_and_token(&state);

        let response = server
            .post("/api/user/transactions")
            .authorization_bearer(token)
            .json(&json!({
                "amount": "not a number",
                "type": "expense",
                "category": "Food",
            }))
            .await;

        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["data"]["amount"], json!(0.0));
    }

    #[tokio::test]
    async fn create_rejects_negative_amount() {
        let (server, state) = test_server();
        let (user, token) = create_user_and_token(&state);
        seed_transaction(&state, &user, TransactionType::Expense, "Food", 100.0);

        let response = server
            .post("/api/user/transactions")
            .authorization_bearer(token.clone())
            .json(&json!({
                "amount": -50.0,
                "type": "expense",
                "category": "Food",
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<Value>()["message"],
            json!("Amount must not be negative")
        );

        // The rejected amount must not have reached the analytics totals.
        let analytics = server
            .get("/api/user/transactions/analytics")
            .authorization_bearer(token)
            .await
            .json::<Value>();
        assert_eq!(analytics["data"]["totals"]["totalExpense"], json!(100.0));
    }

    #[tokio::test]
    async fn update_rejects_negative_amount() {
        let (server, state) = test_server();
        let (user, token) = create_user_and_token(&state);
        let transaction = seed_transaction(&state, &user, TransactionType::Expense, "Food", 12.5);

        let response = server
            .put(&format!(
                "/api/user{}",
                format_endpoint(TRANSACTION, transaction.id)
            ))
            .authorization_bearer(token)
            .json(&json!({ "amount": -99.0 }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);

        let store = SQLiteTransactionStore::new(state.db_connection.clone());
        assert_eq!(store.get(transaction.id).unwrap().amount, 12.5);
    }

    #[tokio::test]
    async fn create_rejects_missing_category_without_description() {
        let (server, state) = test_server();
        let (_, token) = create_user_and_token(&state);

        let response = server
            .post("/api/user/transactions")
            .authorization_bearer(token)
            .json(&json!({ "amount": 10.0, "type": "expense" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn update_changes_only_given_fields() {
        let (server, state) = test_server();
        let (user, token) = create_user_and_token(&state);
        let transaction =
            seed_transaction(&state, &user, TransactionType::Expense, "Food", 12.5);

        let response = server
            .put(&format!(
                "/api/user{}",
                format_endpoint(TRANSACTION, transaction.id)
            ))
            .authorization_bearer(token)
            .json(&json!({ "amount": 99.0 }))
            .await;

        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["data"]["amount"], json!(99.0));
        assert_eq!(body["data"]["category"], json!("Food"));
    }

    #[tokio::test]
    async fn update_rejects_other_users_transaction() {
        let (server, state) = test_server();
        let (user, _) = create_user_and_token(&state);
        let transaction =
            seed_transaction(&state, &user, TransactionType::Expense, "Food", 12.5);
        let (_, other_token) = crate::routes::test_utils::create_second_user_and_token(&state);

        let response = server
            .put(&format!(
                "/api/user{}",
                format_endpoint(TRANSACTION, transaction.id)
            ))
            .authorization_bearer(other_token)
            .json(&json!({ "amount": 99.0 }))
            .await;

        response.assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn delete_removes_transaction() {
        let (server, state) = test_server();
        let (user, token) = create_user_and_token(&state);
        let transaction =
            seed_transaction(&state, &user, TransactionType::Expense, "Food", 12.5);

        let response = server
            .delete(&format!(
                "/api/user{}",
                format_endpoint(TRANSACTION, transaction.id)
            ))
            .authorization_bearer(token)
            .await;

        response.assert_status_ok();
        assert_eq!(
            response.json::<Value>()["message"],
            json!("Expense deleted")
        );

        let store = SQLiteTransactionStore::new(state.db_connection.clone());
        assert!(store.get(transaction.id).is_err());
    }

    #[tokio::test]
    async fn delete_of_unknown_transaction_is_not_found() {
        let (server, state) = test_server();
        let (_, token) = create_user_and_token(&state);

        server
            .delete("/api/user/transactions/999")
            .authorization_bearer(token)
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn analytics_summarizes_transactions() {
        let (server, state) = test_server();
        let (user, token) = create_user_and_token(&state);
        seed_transaction(&state, &user, TransactionType::Expense, "Food", 100.0);
        seed_transaction(&state, &user, TransactionType::Expense, "food", 50.0);
        seed_transaction(&state, &user, TransactionType::Income, "Salary", 1000.0);

        let response = server
            .get("/api/user/transactions/analytics")
            .authorization_bearer(token)
            .await;

        response.assert_status_ok();
        let body = response.json::<Value>();
        let data = &body["data"];
        assert_eq!(data["totals"]["totalIncome"], json!(1000.0));
        assert_eq!(data["totals"]["totalExpense"], json!(150.0));
        assert_eq!(data["totals"]["totalTransactions"], json!(3));

        let categories = data["categories"].as_array().unwrap();
        assert_eq!(categories.len(), 2);
        assert_eq!(categories[0]["category"], json!("Food"));
        assert_eq!(categories[0]["totalAmount"], json!(150.0));
        assert_eq!(categories[0]["count"], json!(2));
        assert_eq!(categories[0]["percentage"], json!(100.0));

        let top = data["topCategories"].as_array().unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(top[0]["category"], json!("Salary"));
        assert_eq!(top[1]["category"], json!("Food"));
    }

    #[tokio::test]
    async fn analytics_of_no_transactions_is_empty() {
        let (server, state) = test_server();
        let (_, token) = create_user_and_token(&state);

        let response = server
            .get("/api/user/transactions/analytics")
            .authorization_bearer(token)
            .await;

        response.assert_status_ok();
        let data = &response.json::<Value>()["data"];
        assert_eq!(data["totals"]["totalTransactions"], json!(0));
        assert!(data["categories"].as_array().unwrap().is_empty());
        assert!(data["topCategories"].as_array().unwrap().is_empty());
    }
}
