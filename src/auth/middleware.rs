use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use super::session::session_token;
use crate::store::{Session, SessionStore};

/// Session of the current client (if any).
/// Use this extractor when authentication is optional.
#[derive(Debug, Clone)]
pub struct MaybeSession(pub Option<Session>);

#[async_trait]
impl<S> FromRequestParts<S> for MaybeSession
where
    S: Send + Sync,
    Arc<SessionStore>: FromRef<S>,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let sessions = Arc::<SessionStore>::from_ref(state);

        let Some(token) = session_token(&parts.headers) else {
            return Ok(MaybeSession(None));
        };

        Ok(MaybeSession(sessions.lookup(token).ok()))
    }
}

/// Session of the current client (required).
/// Returns 401 Unauthorized if no valid session cookie was sent.
#[derive(Debug, Clone)]
pub struct RequireSession(pub Session);

#[async_trait]
impl<S> FromRequestParts<S> for RequireSession
where
    S: Send + Sync,
    Arc<SessionStore>: FromRef<S>,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let MaybeSession(session) = MaybeSession::from_request_parts(parts, state).await?;

        match session {
            Some(s) => Ok(RequireSession(s)),
            None => Err((
                StatusCode::UNAUTHORIZED,
                Json(json!({ "message": "unauthorized" })),
            )
                .into_response()),
        }
    }
}
