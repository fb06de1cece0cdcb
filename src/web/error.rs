//! Translation of store errors into HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::auth::TokenError;
use crate::ids::IdError;
use crate::store::{PostError, UserError};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Post(#[from] PostError),
    #[error(transparent)]
    User(#[from] UserError),
    #[error(transparent)]
    Id(#[from] IdError),
    #[error("token signing failed: {0}")]
    Token(#[from] TokenError),
    #[error("blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
    #[error("{0}")]
    BadRequest(&'static str),
    /// Empty or missing comment body.
    #[error("comment is required")]
    CommentRequired,
}

fn message(status: StatusCode, msg: &str) -> Response {
    (status, Json(json!({ "message": msg }))).into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Post(e) => {
                tracing::warn!("Post request rejected: {e}");
                match e {
                    PostError::InvalidCategory(_) => {
                        message(StatusCode::BAD_REQUEST, "wrong category")
                    }
                    PostError::PostNotFound => message(StatusCode::NOT_FOUND, "post not found"),
                    PostError::CommentNotFound => {
                        message(StatusCode::NOT_FOUND, "comment not found")
                    }
                    PostError::VoteNotFound => message(StatusCode::NOT_FOUND, "vote not found"),
                    PostError::AccessDenied => message(StatusCode::FORBIDDEN, "access denied"),
                    PostError::UserHasNoPosts(_) => {
                        message(StatusCode::NOT_FOUND, "user has no posts")
                    }
                }
            }
            Self::User(e) => match e {
                UserError::UserNotFound => message(StatusCode::UNAUTHORIZED, "user not found"),
                UserError::InvalidPassword => {
                    message(StatusCode::UNAUTHORIZED, "invalid password")
                }
                UserError::AlreadyExists => {
                    message(StatusCode::UNPROCESSABLE_ENTITY, "already exists")
                }
                UserError::PasswordHash(e) => {
                    tracing::error!("Password hashing failed: {e}");
                    message(StatusCode::INTERNAL_SERVER_ERROR, "internal error")
                }
                UserError::Id(e) => {
                    tracing::error!("Failed to generate user id: {e}");
                    message(StatusCode::INTERNAL_SERVER_ERROR, "internal error")
                }
            },
            Self::Id(e) => {
                tracing::error!("Failed to generate id: {e}");
                message(StatusCode::INTERNAL_SERVER_ERROR, "internal error")
            }
            Self::BadRequest(msg) => message(StatusCode::BAD_REQUEST, msg),
            Self::CommentRequired => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({
                    "errors": [{
                        "location": "body",
                        "param": "comment",
                        "msg": "is required",
                    }]
                })),
            )
                .into_response(),
            e @ (Self::Token(_) | Self::Join(_)) => {
                tracing::error!("{e}");
                message(StatusCode::INTERNAL_SERVER_ERROR, "internal error")
            }
        }
    }
}
