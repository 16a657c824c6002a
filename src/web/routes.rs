use super::handlers;
use super::state::AppState;
use axum::extract::State;
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;

async fn index(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": format!("Welcome to the {} API", state.config.site.title),
    }))
}

pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(index))
        .route("/api/v1/posts", get(handlers::posts::list_posts))
        .route("/api/v1/posts/:slug", get(handlers::posts::get_post))
        .route("/api/v1/categories", get(handlers::taxonomy::list_categories))
        .route("/api/v1/tags", get(handlers::taxonomy::list_tags))
}

pub fn account_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/v1/create-user", post(handlers::accounts::create_user))
        .route("/api/v1/login", post(handlers::accounts::login))
        .route("/api/v1/logout", post(handlers::accounts::logout))
}

pub fn authoring_routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/v1/post", post(handlers::posts::create_post))
}
