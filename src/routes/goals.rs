//! Routes for managing savings goals.

use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::{Value, json};
use time::{Date, macros::format_description};

use crate::{
    Error,
    app_state::AppState,
    auth::Claims,
    models::{DatabaseID, Goal},
    response::{success, success_message},
    stores::{GoalStore, NewGoal, sqlite::SQLiteGoalStore},
};

fn parse_target_date(request: &Value) -> Result<Option<Date>, Error> {
    match request.get("target_date").and_then(Value::as_str) {
        None => Ok(None),
        Some(text) => Date::parse(text, format_description!("[year]-[month]-[day]"))
            .map(Some)
            .map_err(|_| Error::Validation(format!("\"{text}\" is not a valid date"))),
    }
}

/// List the authenticated user's goals, most recently created first.
pub async fn get_goals(State(state): State<AppState>, claims: Claims) -> Result<Json<Value>, Error> {
    let goals = SQLiteGoalStore::new(state.db_connection.clone()).get_by_user(claims.user_id())?;

    Ok(success(json!({ "goals": goals })))
}

/// Create a savings goal for the authenticated user.
///
/// # Errors
/// This function will return a [Error::Validation] if the title is missing,
/// the target amount is not a positive number, or the saved amount is
/// negative.
pub async fn create_goal(
    State(state): State<AppState>,
    claims: Claims,
    Json(request): Json<Value>,
) -> Result<Json<Value>, Error> {
    let title = request
        .get("title")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|title| !title.is_empty());
    let target_amount = request.get("target_amount").and_then(Value::as_f64);

    let (Some(title), Some(target_amount)) = (title, target_amount) else {
        return Err(Error::Validation(
            "Title and target amount are required".to_string(),
        ));
    };

    if target_amount <= 0.0 {
        return Err(Error::Validation(
            "Target amount must be greater than zero".to_string(),
        ));
    }

    let saved_amount = request
        .get("saved_amount")
        .and_then(Value::as_f64)
        .unwrap_or(0.0);
    if saved_amount < 0.0 {
        return Err(Error::Validation(
            "Saved amount must not be negative".to_string(),
        ));
    }

    let goal = SQLiteGoalStore::new(state.db_connection.clone()).create(NewGoal {
        user_id: claims.user_id(),
        title: title.to_string(),
        description: request
            .get("description")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        target_amount,
        saved_amount,
        target_date: parse_target_date(&request)?,
    })?;

    Ok(success(json!({ "data": goal })))
}

/// Fetch a goal and check it belongs to the authenticated user.
fn get_owned_goal(store: &SQLiteGoalStore, claims: &Claims, id: DatabaseID) -> Result<Goal, Error> {
    let goal = store.get(id)?;

    if goal.user_id != claims.user_id() {
        return Err(Error::Forbidden);
    }

    Ok(goal)
}

/// Update the fields present in the request body on an existing goal.
///
/// The goal's status is re-derived from its amounts, so an update that lifts
/// the saved amount past the target completes the goal automatically.
pub async fn update_goal(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<DatabaseID>,
    Json(request): Json<Value>,
) -> Result<Json<Value>, Error> {
    let mut store = SQLiteGoalStore::new(state.db_connection.clone());
    let mut goal = get_owned_goal(&store, &claims, id)?;

    if let Some(title) = request.get("title").and_then(Value::as_str) {
        let title = title.trim();
        if title.is_empty() {
            return Err(Error::Validation("Title must not be empty".to_string()));
        }
        goal.title = title.to_string();
    }
    if let Some(description) = request.get("description").and_then(Value::as_str) {
        goal.description = description.to_string();
    }
    if let Some(target_amount) = request.get("target_amount").and_then(Value::as_f64) {
        if target_amount <= 0.0 {
            return Err(Error::Validation(
                "Target amount must be greater than zero".to_string(),
            ));
        }
        goal.target_amount = target_amount;
    }
    if let Some(saved_amount) = request.get("saved_amount").and_then(Value::as_f64) {
        if saved_amount < 0.0 {
            return Err(Error::Validation(
                "Saved amount must not be negative".to_string(),
            ));
        }
        goal.saved_amount = saved_amount;
    }
    if let Some(target_date) = parse_target_date(&request)? {
        goal.target_date = Some(target_date);
    }

    store.update(&goal)?;
    let goal = store.get(id)?;

    Ok(success(json!({ "data": goal })))
}

/// Delete a goal belonging to the authenticated user.
pub async fn delete_goal(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<DatabaseID>,
) -> Result<Json<Value>, Error> {
    let mut store = SQLiteGoalStore::new(state.db_connection.clone());
    get_owned_goal(&store, &claims, id)?;

    store.delete(id)?;

    Ok(success_message("Goal removed"))
}
