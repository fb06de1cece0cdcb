use std::time::Duration;

use axum::http::{header, HeaderMap};

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "session_id";

/// `Set-Cookie` value for a fresh session.
#[must_use]
pub fn session_cookie(token: &str, max_age: Duration) -> String {
    let max_age = max_age.as_secs();
    format!("{SESSION_COOKIE}={token}; HttpOnly; SameSite=Lax; Path=/; Max-Age={max_age}")
}

/// `Set-Cookie` value that expires the session cookie.
#[must_use]
pub fn expired_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0")
}

/// Pull the session token out of the request's `Cookie` header, if any.
#[must_use]
pub fn session_token(headers: &HeaderMap) -> Option<&str> {
    let prefix = format!("{SESSION_COOKIE}=");
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .find_map(|cookie| cookie.trim().strip_prefix(prefix.as_str()))
        .filter(|token| !token.is_empty())
}
