//! JSON Web Token based authentication.
//!
//! Sign-in handlers create a token with [create_token], protected route
//! handlers take a [Claims] argument which rejects requests without a valid
//! `Authorization: Bearer` header.

use axum::{
    RequestPartsExt,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, TokenData, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::{Error, app_state::AppState, models::UserID};

/// How long an authentication token stays valid after sign-in.
pub const TOKEN_DURATION: Duration = Duration::hours(24);

/// The contents of a JSON Web Token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// The expiry time of the token as a unix timestamp.
    pub exp: usize,
    /// The time the token was issued as a unix timestamp.
    pub iat: usize,
    /// The ID of the authenticated user.
    pub sub: i64,
}

impl Claims {
    /// The ID of the authenticated user.
    pub fn user_id(&self) -> UserID {
        UserID::new(self.sub)
    }
}

impl<S> FromRequestParts<S> for Claims
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| Error::InvalidCredentials)?;

        let state = AppState::from_ref(state);
        let token_data = decode_token(bearer.token(), &state.decoding_key)?;

        Ok(token_data.claims)
    }
}

/// Create a signed token for `user_id` that expires after [TOKEN_DURATION].
///
/// # Errors
/// This function will return a [Error::HashingError] if the token could not
/// be signed.
pub fn create_token(user_id: UserID, encoding_key: &EncodingKey) -> Result<String, Error> {
    let now = OffsetDateTime::now_utc();
    let claims = Claims {
        exp: (now + TOKEN_DURATION).unix_timestamp() as usize,
        iat: now.unix_timestamp() as usize,
        sub: user_id.as_i64(),
    };

    encode(&Header::default(), &claims, encoding_key)
        .map_err(|error| Error::HashingError(error.to_string()))
}

fn decode_token(token: &str, decoding_key: &DecodingKey) -> Result<TokenData<Claims>, Error> {
    decode(token, decoding_key, &Validation::default()).map_err(|_| Error::InvalidCredentials)
}
