//! Routes backed by the external AI service: free-form financial advice and
//! the need/want expense analysis.

use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{Error, ai::GeminiClient, app_state::AppState, auth::Claims, response::success};

/// The request body for the smart advisor route.
#[derive(Debug, Deserialize)]
pub struct SmartAdvisorRequest {
    /// The user's financial question.
    #[serde(default)]
    pub query: String,
}

/// The request body for the expense analysis route.
#[derive(Debug, Deserialize)]
pub struct AnalyzeExpenseRequest {
    /// The expense name or item.
    pub expense: Option<String>,
    /// The expense amount.
    pub amount: Option<f64>,
    /// Additional context about the expense.
    pub description: Option<String>,
}

fn gemini(state: &AppState) -> Result<&GeminiClient, Error> {
    state.gemini.as_ref().ok_or(Error::AiNotConfigured)
}

/// Ask the AI for personalized financial advice.
///
/// # Errors
/// This function will return a:
/// - [Error::Validation] if the query is empty,
/// - [Error::AiNotConfigured] if no API key is configured,
/// - or [Error::AiService] if the external request fails.
pub async fn smart_advisor(
    State(state): State<AppState>,
    _claims: Claims,
    Json(request): Json<SmartAdvisorRequest>,
) -> Result<Json<Value>, Error> {
    if request.query.trim().is_empty() {
        return Err(Error::Validation("Query is required".to_string()));
    }

    let advice = gemini(&state)?.smart_advice(&request.query).await?;

    Ok(success(json!({ "advice": advice })))
}

/// Ask the AI whether an expense is a need or a want.
///
/// # Errors
/// This function will return a:
/// - [Error::Validation] if the expense or amount is missing,
/// - [Error::AiNotConfigured] if no API key is configured,
/// - or [Error::AiService] if the external request fails.
pub async fn analyze_expense(
    State(state): State<AppState>,
    _claims: Claims,
    Json(request): Json<AnalyzeExpenseRequest>,
) -> Result<Json<Value>, Error> {
    let (Some(expense), Some(amount)) = (request.expense.as_deref(), request.amount) else {
        return Err(Error::Validation(
            "Expense and amount are required".to_string(),
        ));
    };

    let analysis = gemini(&state)?
        .analyze_expense(expense, amount, request.description.as_deref())
        .await?;

    Ok(success(json!(analysis)))
}

#[cfg(test)]
mod ai_route_tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    use crate::routes::test_utils::{create_user_and_token, test_server};

    // The test state has no Gemini client configured, so the handlers can
    // only be exercised up to the point where they would call the API.

    #[tokio::test]
    async fn smart_advisor_requires_a_query() {
        let (server, state) = test_server();
        let (_, token) = create_user_and_token(&state);

        let response = server
            .post("/api/user/ai/smart-advisor")
            .authorization_bearer(token)
            .json(&json!({ "query": "  " }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<Value>()["message"],
            json!("Query is required")
        );
    }

    #[tokio::test]
    async fn smart_advisor_reports_missing_configuration() {
        let (server, state) = test_server();
        let (_, token) = create_user_and_token(&state);

        let response = server
            .post("/api/user/ai/smart-advisor")
            .authorization_bearer(token)
            .json(&json!({ "query": "How do I start an emergency fund?" }))
            .await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.json::<Value>()["message"],
            json!("the AI service is not configured")
        );
    }

    #[tokio::test]
    async fn analyze_expense_requires_expense_and_amount() {
        let (server, state) = test_server();
        let (_, token) = create_user_and_token(&state);

        let response = server
            .post("/api/user/ai/analyze-expense")
            .authorization_bearer(token)
            .json(&json!({ "expense": "Concert tickets" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<Value>()["message"],
            json!("Expense and amount are required")
        );
    }

    #[tokio::test]
    async fn ai_routes_require_a_token() {
        let (server, _) = test_server();

        server
            .post("/api/user/ai/smart-advisor")
            .json(&json!({ "query": "Help" }))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }
}
