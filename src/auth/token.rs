//! HS256 bearer tokens handed to clients on register/login.

use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::store::User;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token lifetime of {0:?} is out of range")]
    TtlOutOfRange(Duration),
    #[error(transparent)]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUser {
    pub username: String,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub user: TokenUser,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
}

/// Sign a token for `user` valid for `ttl`.
///
/// # Errors
///
/// Returns [`TokenError::TtlOutOfRange`] if the expiry does not fit a Unix
/// timestamp, or [`TokenError::Jwt`] if encoding fails.
pub fn issue_token(user: &User, secret: &[u8], ttl: Duration) -> Result<String, TokenError> {
    let now = Utc::now().timestamp();
    let exp = i64::try_from(ttl.as_secs())
        .ok()
        .and_then(|secs| now.checked_add(secs))
        .ok_or(TokenError::TtlOutOfRange(ttl))?;
    let claims = Claims {
        user: TokenUser {
            username: user.username.clone(),
            id: user.id.clone(),
        },
        iat: now,
        exp,
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret),
    )?)
}

/// Verify signature and expiry, returning the claims.
///
/// # Errors
///
/// Returns an error if the token is malformed, forged or expired.
pub fn decode_token(token: &str, secret: &[u8]) -> Result<Claims, TokenError> {
    let validation = Validation::new(Algorithm::HS256);
    let data = decode::<Claims>(token, &DecodingKey::from_secret(secret), &validation)?;
    Ok(data.claims)
}
