use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use super::error::ApiError;
use super::AppState;
use crate::auth::{
    expired_session_cookie, issue_token, session_cookie, session_token, RequireSession,
};
use crate::store::{User, UserError};

/// Register/login request body.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    username: String,
    password: String,
}

/// Drop whatever session the client is presenting; a fresh login supersedes it.
fn end_presented_session(state: &AppState, headers: &HeaderMap) {
    if let Some(token) = session_token(headers) {
        state.sessions.destroy(token);
    }
}

/// Issue a token, open a session and set its cookie.
fn start_session(state: &AppState, user: &User, status: StatusCode) -> Result<Response, ApiError> {
    let token = issue_token(
        user,
        state.config.token_secret.as_bytes(),
        state.config.token_ttl,
    )?;
    let session = state.sessions.create(&user.username, &user.id)?;
    let cookie = session_cookie(&session.id, state.config.session_ttl);

    Ok((
        status,
        [(header::SET_COOKIE, cookie)],
        Json(json!({ "token": token })),
    )
        .into_response())
}

fn already_exists(username: &str) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({
            "errors": [{
                "location": "body",
                "param": "username",
                "value": username,
                "msg": "already exists",
            }]
        })),
    )
        .into_response()
}

/// POST /api/register - Create an account and log it in.
pub async fn register(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(form): Json<LoginForm>,
) -> Result<Response, ApiError> {
    end_presented_session(&state, &headers);

    let LoginForm { username, password } = form;
    if username.is_empty() || password.is_empty() {
        return Err(ApiError::BadRequest("username and password are required"));
    }

    let name = username.clone();
    let user = tokio::task::spawn_blocking(move || User::new(&username, &password)).await??;

    let user = match state.users.add_user(user) {
        Ok(u) => u,
        Err(UserError::AlreadyExists) => {
            tracing::warn!(username = %name, "Registration rejected: username taken");
            return Ok(already_exists(&name));
        }
        Err(e) => return Err(e.into()),
    };

    let response = start_session(&state, &user, StatusCode::CREATED)?;
    tracing::info!(user_id = %user.id, username = %user.username, "User registered");
    Ok(response)
}

/// POST /api/login - Check credentials and open a session.
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(form): Json<LoginForm>,
) -> Result<Response, ApiError> {
    end_presented_session(&state, &headers);

    let LoginForm { username, password } = form;
    let users = Arc::clone(&state.users);
    let user = tokio::task::spawn_blocking(move || users.check_credentials(&username, &password))
        .await?
        .map_err(|e| {
            tracing::warn!("Login failed: {e}");
            e
        })?;

    let response = start_session(&state, &user, StatusCode::OK)?;
    tracing::info!(user_id = %user.id, username = %user.username, "User logged in");
    Ok(response)
}

/// POST /api/logout - Destroy the current session.
pub async fn logout(
    State(state): State<AppState>,
    RequireSession(session): RequireSession,
) -> Response {
    state.sessions.destroy(&session.id);
    tracing::info!(username = %session.username, "User logged out");

    (
        [(header::SET_COOKIE, expired_session_cookie())],
        Json(json!({ "message": "success" })),
    )
        .into_response()
}
