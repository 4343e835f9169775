//! Defines the app level error type and its conversion to JSON envelope responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use time::Date;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The user provided an email/password combination that does not match a
    /// registered user.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// Clients get a general internal server error instead.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The email address used to register already belongs to a user.
    #[error("the email address is already registered")]
    DuplicateEmail,

    /// A string that is neither `income` nor `expense` was used as a
    /// transaction type.
    #[error("\"{0}\" is not a valid transaction type")]
    InvalidTransactionType(String),

    /// A date in the future was used to create a transaction.
    ///
    /// Transactions record events that have already happened, therefore
    /// future dates are not allowed.
    #[error("{0} is a date in the future, which is not allowed")]
    FutureDate(Date),

    /// A request was missing a required field or contained an invalid value.
    ///
    /// The message is shown to the client verbatim.
    #[error("{0}")]
    Validation(String),

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// The requested resource exists but belongs to another user.
    #[error("Unauthorized")]
    Forbidden,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// The AI endpoints were called without an API key configured.
    #[error("the AI service is not configured")]
    AiNotConfigured,

    /// The external AI service rejected or failed a request.
    #[error("the AI service request failed: {0}")]
    AiService(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.contains("email") =>
            {
                Error::DuplicateEmail
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Error::Forbidden => StatusCode::FORBIDDEN,
            Error::TooWeak(_)
            | Error::DuplicateEmail
            | Error::InvalidTransactionType(_)
            | Error::FutureDate(_)
            | Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::HashingError(_)
            | Error::SqlError(_)
            | Error::AiNotConfigured
            | Error::AiService(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        // Internal errors are logged on the server, the client only gets a
        // generic message.
        let message = match &self {
            Error::SqlError(_) | Error::HashingError(_) => {
                tracing::error!("An unexpected error occurred: {}", self);
                "An unexpected error occurred, please try again.".to_owned()
            }
            error => error.to_string(),
        };

        let body = Json(json!({
            "success": false,
            "message": message,
        }));

        (status_code, body).into_response()
    }
}
