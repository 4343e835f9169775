//! Routes for managing per-category spending budgets.

use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::{Value, json};

use crate::{
    Error,
    analytics::budget_usage,
    app_state::AppState,
    auth::Claims,
    models::{Budget, DatabaseID},
    response::{success, success_message},
    stores::{
        BudgetStore, TransactionQuery, TransactionStore,
        sqlite::{SQLiteBudgetStore, SQLiteTransactionStore},
    },
};

/// List the authenticated user's budgets, ordered by category name.
///
/// Each budget is paired with its usage: the matching expense total, a
/// clamped percentage for the progress bar, and the near-limit flag.
pub async fn get_budgets(
    State(state): State<AppState>,
    claims: Claims,
) -> Result<Json<Value>, Error> {
    let budgets = SQLiteBudgetStore::new(state.db_connection.clone()).get_by_user(claims.user_id())?;
    let transactions = SQLiteTransactionStore::new(state.db_connection.clone())
        .get_query(&TransactionQuery::for_user(claims.user_id()))?;

    Ok(success(
        json!({ "budgets": budget_usage(&budgets, &transactions) }),
    ))
}

/// Read and validate the category/amount pair shared by the budget routes.
fn parse_budget_fields(request: &Value) -> Result<(&str, f64), Error> {
    let category = request
        .get("category")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|category| !category.is_empty());
    let amount = request.get("amount").and_then(Value::as_f64);

    match (category, amount) {
        (Some(category), Some(amount)) if amount > 0.0 => Ok((category, amount)),
        (Some(_), Some(_)) => Err(Error::Validation(
            "Amount must be greater than zero".to_string(),
        )),
        _ => Err(Error::Validation(
            "Category and amount are required".to_string(),
        )),
    }
}

/// Create a budget, or update the amount of the existing budget for the same
/// category.
///
/// Setting a budget is idempotent per category: repeating the request with a
/// new amount replaces the cap instead of creating a duplicate row.
pub async fn upsert_budget(
    State(state): State<AppState>,
    claims: Claims,
    Json(request): Json<Value>,
) -> Result<Json<Value>, Error> {
    let (category, amount) = parse_budget_fields(&request)?;

    let (budget, created) =
        SQLiteBudgetStore::new(state.db_connection.clone()).upsert(claims.user_id(), category, amount)?;

    Ok(success(json!({
        "data": budget,
        "message": if created { "Budget created" } else { "Budget updated" },
    })))
}

/// Fetch a budget and check it belongs to the authenticated user.
fn get_owned_budget(
    store: &SQLiteBudgetStore,
    claims: &Claims,
    id: DatabaseID,
) -> Result<Budget, Error> {
    let budget = store.get(id)?;

    if budget.user_id != claims.user_id() {
        return Err(Error::Forbidden);
    }

    Ok(budget)
}

/// Update an existing budget's category and/or amount by its ID.
pub async fn update_budget(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<DatabaseID>,
    Json(request): Json<Value>,
) -> Result<Json<Value>, Error> {
    let mut store = SQLiteBudgetStore::new(state.db_connection.clone());
    let mut budget = get_owned_budget(&store, &claims, id)?;

    if let Some(category) = request.get("category").and_then(Value::as_str) {
        let category = category.trim();
        if category.is_empty() {
            return Err(Error::Validation("Category must not be empty".to_string()));
        }
        budget.category = category.to_string();
    }
    if let Some(amount) = request.get("amount").and_then(Value::as_f64) {
        if amount <= 0.0 {
            return Err(Error::Validation(
                "Amount must be greater than zero".to_string(),
            ));
        }
        budget.amount = amount;
    }

    store.update(&budget)?;

    Ok(success(json!({ "data": budget })))
}

/// Delete a budget belonging to the authenticated user.
pub async fn delete_budget(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<DatabaseID>,
) -> Result<Json<Value>, Error> {
    let mut store = SQLiteBudgetStore::new(state.db_connection.clone());
    get_owned_budget(&store, &claims, id)?;

    store.delete(id)?;

    Ok(success_message("Budget removed"))
}
