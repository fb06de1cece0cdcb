use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use super::auth;
use super::error::ApiError;
use super::AppState;
use crate::auth::RequireSession;
use crate::ids;
use crate::store::{Author, Comment, NewPost, Post, PostContent, VoteValue};

/// Create the router with all API routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/register", post(auth::register))
        .route("/api/login", post(auth::login))
        .route("/api/logout", post(auth::logout))
        .route("/api/posts", post(create_post))
        .route("/api/posts/", get(list_posts))
        .route("/api/posts/:category", get(list_category))
        .route(
            "/api/post/:id",
            get(view_post).post(add_comment).delete(delete_post),
        )
        .route("/api/post/:id/:action", get(vote).delete(delete_comment))
        .route("/api/user/:username", get(user_posts))
        .route("/healthz", get(health))
}

/// Listing order: fewest comments first, then oldest, then by id.
fn sort_for_listing(posts: &mut [Post]) {
    posts.sort_by(|a, b| {
        a.comments
            .len()
            .cmp(&b.comments.len())
            .then_with(|| a.created.cmp(&b.created))
            .then_with(|| a.id.cmp(&b.id))
    });
}

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    category: String,
    #[serde(rename = "type")]
    kind: String,
    title: String,
    #[serde(default)]
    text: String,
    #[serde(default)]
    url: String,
}

/// POST /api/posts
async fn create_post(
    State(state): State<AppState>,
    RequireSession(session): RequireSession,
    Json(req): Json<CreatePostRequest>,
) -> Result<Response, ApiError> {
    let content = match req.kind.as_str() {
        "text" => PostContent::Text { text: req.text },
        "link" => PostContent::Link { url: req.url },
        _ => return Err(ApiError::BadRequest("unknown post type")),
    };

    let new_post = NewPost {
        id: ids::record_id()?,
        title: req.title,
        category: req.category,
        content,
        author: Author {
            username: session.username,
            id: session.user_id,
        },
        created: Utc::now(),
    };

    let post = state.posts.publish(new_post)?;
    tracing::info!(post_id = %post.id, author = %post.author.username, "Post added");
    Ok((StatusCode::CREATED, Json(post)).into_response())
}

/// GET /api/posts/
async fn list_posts(State(state): State<AppState>) -> Json<Vec<Post>> {
    let mut posts = state.posts.list_all_posts();
    sort_for_listing(&mut posts);
    Json(posts)
}

/// GET /api/posts/:category
async fn list_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<Vec<Post>>, ApiError> {
    let mut posts = state.posts.list_posts_by_category(&category)?;
    sort_for_listing(&mut posts);
    Ok(Json(posts))
}

/// GET /api/post/:id - Fetch a post, counting the view.
async fn view_post(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> Result<Json<Post>, ApiError> {
    let post = state.posts.record_view(&post_id)?;
    Ok(Json(post))
}

#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    #[serde(default)]
    comment: String,
}

/// POST /api/post/:id
async fn add_comment(
    State(state): State<AppState>,
    RequireSession(session): RequireSession,
    Path(post_id): Path<String>,
    Json(req): Json<CommentRequest>,
) -> Result<Response, ApiError> {
    if req.comment.trim().is_empty() {
        return Err(ApiError::CommentRequired);
    }

    let comment = Comment {
        id: ids::record_id()?,
        body: req.comment,
        author: Author {
            username: session.username,
            id: session.user_id,
        },
        created: Utc::now(),
    };
    let comment_id = comment.id.clone();

    let post = state.posts.add_comment(&post_id, comment)?;
    tracing::info!(%post_id, %comment_id, "Comment added");
    Ok((StatusCode::CREATED, Json(post)).into_response())
}

/// DELETE /api/post/:id/:comment_id
async fn delete_comment(
    State(state): State<AppState>,
    RequireSession(session): RequireSession,
    Path((post_id, comment_id)): Path<(String, String)>,
) -> Result<Json<Post>, ApiError> {
    let post = state
        .posts
        .delete_comment(&post_id, &comment_id, &session.user_id)?;
    tracing::info!(%post_id, %comment_id, "Comment deleted");
    Ok(Json(post))
}

/// GET /api/post/:id/upvote, /downvote, /unvote
async fn vote(
    State(state): State<AppState>,
    RequireSession(session): RequireSession,
    Path((post_id, action)): Path<(String, String)>,
) -> Result<Json<Post>, ApiError> {
    let post = match action.as_str() {
        "upvote" => state
            .posts
            .apply_vote(&post_id, &session.user_id, VoteValue::Up)?,
        "downvote" => state
            .posts
            .apply_vote(&post_id, &session.user_id, VoteValue::Down)?,
        "unvote" => state.posts.clear_vote(&post_id, &session.user_id)?,
        _ => return Err(ApiError::BadRequest("unknown vote action")),
    };

    tracing::info!(%post_id, %action, user_id = %session.user_id, "Vote updated");
    Ok(Json(post))
}

/// DELETE /api/post/:id
async fn delete_post(
    State(state): State<AppState>,
    RequireSession(session): RequireSession,
    Path(post_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state
        .posts
        .delete_post(&post_id, &session.username, &session.user_id)?;
    tracing::info!(%post_id, "Post deleted");
    Ok(Json(json!({ "message": "success" })))
}

/// GET /api/user/:username
async fn user_posts(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<Vec<Post>>, ApiError> {
    Ok(Json(state.posts.list_posts_by_author(&username)?))
}

async fn health() -> impl IntoResponse {
    "ok"
}
