use crate::models::{PostDraft, ResolvedPost};
use crate::services::posts::{self, PostError};
use crate::services::store::SqliteStore;
use crate::web::error::{detail, AppResult};
use crate::web::extractors::CurrentUser;
use crate::web::state::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Deserialize;
use std::sync::Arc;

/// POST /api/v1/post
///
/// The author is always the session user; the body cannot name one.
pub async fn create_post(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Json(draft): Json<PostDraft>,
) -> Result<(StatusCode, Json<ResolvedPost>), PostError> {
    let store = SqliteStore::new(&state.db)?;
    let post = posts::create_post(draft, user.id, &store, &store)?;
    Ok((StatusCode::CREATED, Json(post)))
}

#[derive(Deserialize)]
pub struct PostListParams {
    pub author: Option<String>,
}

/// GET /api/v1/posts
pub async fn list_posts(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PostListParams>,
) -> AppResult<Json<serde_json::Value>> {
    let posts = posts::list_published_posts(&state.db, params.author.as_deref())?;
    Ok(Json(serde_json::json!({
        "data": posts,
        "meta": { "total": posts.len() },
    })))
}

/// GET /api/v1/posts/:slug
pub async fn get_post(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> AppResult<Response> {
    match posts::get_published_post(&state.db, &slug)? {
        Some(post) => Ok(Json(serde_json::json!({ "data": post })).into_response()),
        None => Ok(detail(StatusCode::NOT_FOUND, "Post not found")),
    }
}
