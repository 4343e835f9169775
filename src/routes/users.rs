//! Routes for registering, logging in and fetching the user profile.

use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    Error,
    app_state::AppState,
    auth::{Claims, create_token},
    models::{PasswordHash, ValidatedPassword},
    response::success,
    stores::{UserStore, sqlite::SQLiteUserStore},
};

/// The request body for the registration route.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    /// The display name for the new user.
    pub name: String,
    /// The email address to log in with.
    pub email: String,
    /// The plain-text password, validated and hashed before storage.
    pub password: String,
}

/// The request body for the log-in route.
#[derive(Debug, Deserialize)]
pub struct LogInForm {
    /// The email address entered during sign-in.
    pub email: String,
    /// The password entered during sign-in.
    pub password: String,
}

/// Register a new user and return a signed token for them.
///
/// # Errors
/// This function will return a:
/// - [Error::Validation] if the name or email is missing or malformed,
/// - [Error::TooWeak] if the password is too easy to guess,
/// - or [Error::DuplicateEmail] if the email already belongs to a user.
pub async fn register(
    State(state): State<AppState>,
    Json(form): Json<RegisterForm>,
) -> Result<Json<Value>, Error> {
    let name = form.name.trim();
    let email = form.email.trim();

    if name.is_empty() || email.is_empty() {
        return Err(Error::Validation("Name and email are required".to_string()));
    }

    if !email.contains('@') {
        return Err(Error::Validation(
            "A valid email address is required".to_string(),
        ));
    }

    let password_hash = PasswordHash::new(
        ValidatedPassword::new(&form.password)?,
        PasswordHash::DEFAULT_COST,
    )?;

    let user =
        SQLiteUserStore::new(state.db_connection.clone()).create(name, email, password_hash)?;

    tracing::info!("registered user {}", user.id);

    let token = create_token(user.id, &state.encoding_key)?;

    Ok(success(json!({ "usertoken": token })))
}

/// Log in an existing user and return a signed token for them.
///
/// # Errors
/// This function will return a [Error::InvalidCredentials] if the email does
/// not belong to a user or the password does not match. The two cases are
/// deliberately indistinguishable to the client.
pub async fn log_in(
    State(state): State<AppState>,
    Json(form): Json<LogInForm>,
) -> Result<Json<Value>, Error> {
    let user = SQLiteUserStore::new(state.db_connection.clone())
        .get_by_email(form.email.trim())
        .map_err(|error| match error {
            Error::NotFound => Error::InvalidCredentials,
            other => other,
        })?;

    let password_is_correct = user
        .password_hash
        .verify(&form.password)
        .map_err(|error| Error::HashingError(error.to_string()))?;

    if !password_is_correct {
        return Err(Error::InvalidCredentials);
    }

    let token = create_token(user.id, &state.encoding_key)?;

    Ok(success(json!({ "usertoken": token })))
}

/// Fetch the profile of the authenticated user.
pub async fn get_profile(
    State(state): State<AppState>,
    claims: Claims,
) -> Result<Json<Value>, Error> {
    let user = SQLiteUserStore::new(state.db_connection.clone()).get(claims.user_id())?;

    Ok(success(json!({
        "userdata": {
            "id": user.id,
            "name": user.name,
            "email": user.email,
        }
    })))
}

#[cfg(test)]
mod user_route_tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    use crate::routes::test_utils::{TEST_PASSWORD, create_user_and_token, test_server};

    #[tokio::test]
    async fn register_returns_token() {
        let (server, _) = test_server();

        let response = server
            .post("/api/user/register")
            .json(&json!({
                "name": "Asha",
                "email": "asha@example.com",
                "password": TEST_PASSWORD,
            }))
            .await;

        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["success"], json!(true));
        assert!(body["usertoken"].is_string());
    }

    #[tokio::test]
    async fn register_rejects_weak_password() {
        let (server, _) = test_server();

        let response = server
            .post("/api/user/register")
            .json(&json!({
                "name": "Asha",
                "email": "asha@example.com",
                "password": "password",
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["success"], json!(false));
    }

    #[tokio::test]
    async fn register_rejects_duplicate_email() {
        let (server, state) = test_server();
        let (user, _) = create_user_and_token(&state);

        let response = server
            .post("/api/user/register")
            .json(&json!({
                "name": "Another",
                "email": user.email,
                "password": TEST_PASSWORD,
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<Value>()["message"],
            json!("the email address is already registered")
        );
    }

    #[tokio::test]
    async fn register_rejects_missing_name() {
        let (server, _) = test_server();

        let response = server
            .post("/api/user/register")
            .json(&json!({
                "name": "  ",
                "email": "asha@example.com",
                "password": TEST_PASSWORD,
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn log_in_returns_token_for_valid_credentials() {
        let (server, state) = test_server();
        let (user, _) = create_user_and_token(&state);

        let response = server
            .post("/api/user/login")
            .json(&json!({
                "email": user.email,
                "password": TEST_PASSWORD,
            }))
            .await;

        response.assert_status_ok();
        assert!(response.json::<Value>()["usertoken"].is_string());
    }

    #[tokio::test]
    async fn log_in_rejects_wrong_password() {
        let (server, state) = test_server();
        let (user, _) = create_user_and_token(&state);

        let response = server
            .post("/api/user/login")
            .json(&json!({
                "email": user.email,
                "password": "definitelyNotTheCorrectPassword",
            }))
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn log_in_rejects_unknown_email() {
        let (server, _) = test_server();

        let response = server
            .post("/api/user/login")
            .json(&json!({
                "email": "nobody@example.com",
                "password": TEST_PASSWORD,
            }))
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn profile_returns_user_data() {
        let (server, state) = test_server();
        let (user, token) = create_user_and_token(&state);

        let response = server
            .get("/api/user/profile")
            .authorization_bearer(token)
            .await;

        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["userdata"]["name"], json!(user.name));
        assert_eq!(body["userdata"]["email"], json!(user.email));
    }

    #[tokio::test]
    async fn profile_requires_a_token() {
        let (server, _) = test_server();

        server
            .get("/api/user/profile")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }
}
