use crate::services::auth::AccountError;
use crate::services::posts::PostError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;

pub struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!("Application error: {:?}", self.0);
        internal_error()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

pub type AppResult<T> = Result<T, AppError>;

fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "detail": "Internal Server Error" })),
    )
        .into_response()
}

pub fn detail(status: StatusCode, msg: &str) -> Response {
    (status, Json(json!({ "detail": msg }))).into_response()
}

impl IntoResponse for PostError {
    fn into_response(self) -> Response {
        match &self {
            PostError::Internal(e) => {
                tracing::error!("Post creation failed: {:?}", e);
                internal_error()
            }
            PostError::AuthorNotFound(id) => {
                tracing::warn!("Session user {} no longer exists", id);
                detail(
                    StatusCode::NOT_FOUND,
                    "This user no longer exists in database.",
                )
            }
            PostError::SlugConflict(_) => detail(
                StatusCode::CONFLICT,
                "A post with this slug already exists. Please try again.",
            ),
            PostError::NotFound { missing, .. } => {
                let body = json!({
                    "detail": [{
                        "loc": ["body", self.field()],
                        "msg": self.to_string(),
                        "type": "value_error",
                        "missing": missing,
                    }]
                });
                (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
            }
            _ => {
                let body = json!({
                    "detail": [{
                        "loc": ["body", self.field()],
                        "msg": self.to_string(),
                        "type": "value_error",
                    }]
                });
                (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
            }
        }
    }
}

impl IntoResponse for AccountError {
    fn into_response(self) -> Response {
        match self {
            AccountError::Invalid(msg) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response()
            }
            AccountError::Taken => (
                StatusCode::CONFLICT,
                Json(json!({ "error": AccountError::Taken.to_string() })),
            )
                .into_response(),
            AccountError::Internal(e) => {
                tracing::error!("Account operation failed: {:?}", e);
                internal_error()
            }
        }
    }
}
