use crate::models::CreateUser;
use crate::services::auth::{self, AccountError};
use crate::web::error::{detail, AppResult};
use crate::web::extractors::SESSION_COOKIE;
use crate::web::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use time::Duration;

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// POST /api/v1/create-user
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateUser>,
) -> Result<Response, AccountError> {
    let username = present(&payload.username);
    let email = present(&payload.email);
    let password = payload.password.as_deref().filter(|p| !p.is_empty());

    let missing: Vec<&str> = [
        ("username", username.is_none()),
        ("email", email.is_none()),
        ("password", password.is_none()),
    ]
    .into_iter()
    .filter_map(|(field, absent)| absent.then_some(field))
    .collect();

    let (Some(username), Some(email), Some(password)) = (username, email, password) else {
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": format!("Missing mandatory fields: {}", missing.join(", ")) })),
        )
            .into_response());
    };

    let user_id = auth::create_user(
        &state.db,
        username,
        email,
        password,
        present(&payload.full_name),
    )?;
    tracing::info!("User '{}' created (id {})", username, user_id);

    Ok((
        StatusCode::CREATED,
        Json(json!({ "status": "User created successfully", "id": user_id })),
    )
        .into_response())
}

#[derive(Deserialize)]
pub struct LoginRequest {
    email: Option<String>,
    username: Option<String>,
    password: Option<String>,
}

/// POST /api/v1/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Response> {
    let identifier = present(&payload.email).or(present(&payload.username));
    let password = payload.password.as_deref().filter(|p| !p.is_empty());

    let (Some(identifier), Some(password)) = (identifier, password) else {
        return Ok(detail(
            StatusCode::BAD_REQUEST,
            "Email or username and password are required",
        ));
    };

    if !state.login_throttle.allows(identifier) {
        tracing::warn!("Too many failed sign-ins for '{}'", identifier);
        return Ok(detail(
            StatusCode::TOO_MANY_REQUESTS,
            "Too many failed attempts. Try again later.",
        ));
    }

    match auth::authenticate(&state.db, identifier, password)? {
        Some(user) => {
            state.login_throttle.clear(identifier);
            let token = auth::create_session(&state.db, user.id, state.session_days)?;
            let cookie = Cookie::build((SESSION_COOKIE, token))
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax)
                .secure(state.config.auth.secure_cookies)
                .max_age(Duration::days(state.session_days))
                .build();

            Ok((jar.add(cookie), Json(json!({ "detail": "Login successful" }))).into_response())
        }
        None => {
            state.login_throttle.record_failure(identifier);
            Ok(detail(
                StatusCode::UNAUTHORIZED,
                "The sign-in details are incorrect.",
            ))
        }
    }
}

/// POST /api/v1/logout
pub async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> AppResult<Response> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        auth::delete_session(&state.db, cookie.value())?;
    }

    let cookie = Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .max_age(Duration::ZERO)
        .build();

    Ok((jar.remove(cookie), Json(json!({ "detail": "Logged out" }))).into_response())
}
