use crate::services::taxonomy;
use crate::web::error::AppResult;
use crate::web::state::AppState;
use axum::extract::State;
use axum::response::Json;
use std::sync::Arc;

/// GET /api/v1/categories
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<serde_json::Value>> {
    let categories = taxonomy::list_categories(&state.db)?;
    Ok(Json(serde_json::json!({ "data": categories })))
}

/// GET /api/v1/tags
pub async fn list_tags(State(state): State<Arc<AppState>>) -> AppResult<Json<serde_json::Value>> {
    let tags = taxonomy::list_tags(&state.db)?;
    Ok(Json(serde_json::json!({ "data": tags })))
}
