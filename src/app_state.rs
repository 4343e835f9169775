//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use jsonwebtoken::{DecodingKey, EncodingKey};
use rusqlite::Connection;

use crate::{Error, ai::GeminiClient, db::initialize, pagination::PaginationConfig};

/// The state of the REST server.
#[derive(Clone)]
pub struct AppState {
    /// The key used for signing authentication tokens.
    pub encoding_key: EncodingKey,

    /// The key used for verifying authentication tokens.
    pub decoding_key: DecodingKey,

    /// The config that controls how to display pages of data.
    pub pagination_config: PaginationConfig,

    /// The client for the external AI service. `None` when no API key is
    /// configured, in which case the AI endpoints report an error.
    pub gemini: Option<GeminiClient>,

    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for
    /// the domain models. Tokens are signed with `token_secret`.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(
        db_connection: Connection,
        token_secret: &str,
        gemini: Option<GeminiClient>,
        pagination_config: PaginationConfig,
    ) -> Result<Self, Error> {
        initialize(&db_connection)?;

        let connection = Arc::new(Mutex::new(db_connection));

        Ok(Self {
            encoding_key: EncodingKey::from_secret(token_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(token_secret.as_bytes()),
            pagination_config,
            gemini,
            db_connection: connection,
        })
    }
}
