//! # Session Handlers
//!
//! Thin wrappers over the configured [`crate::auth::UserDirectory`].

use axum::{extract::State, http::StatusCode, response::Json};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::models::Employee;
use crate::server::AppState;

/// The current session; `user` is null when nobody is signed in
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SessionResponse {
    pub user: Option<Employee>,
}

/// Who is signed in
#[utoipa::path(
    get,
    path = "/api/auth/session",
    responses(
        (status = 200, description = "Current session", body = SessionResponse),
        (status = 503, description = "Identity provider unavailable", body = ApiError)
    ),
    tag = "auth"
)]
pub async fn get_session(State(state): State<AppState>) -> Result<Json<SessionResponse>, ApiError> {
    let user = state.service.current_user().await?;
    Ok(Json(SessionResponse { user }))
}

/// Start a session
#[utoipa::path(
    post,
    path = "/api/auth/sign-in",
    responses(
        (status = 200, description = "Signed in", body = SessionResponse),
        (status = 503, description = "Identity provider unavailable", body = ApiError)
    ),
    tag = "auth"
)]
pub async fn sign_in(State(state): State<AppState>) -> Result<Json<SessionResponse>, ApiError> {
    let user = state.service.sign_in().await?;
    info!(user_id = user.as_ref().map(|u| u.id), "Signed in");
    Ok(Json(SessionResponse { user }))
}

/// End the session
#[utoipa::path(
    post,
    path = "/api/auth/sign-out",
    responses(
        (status = 204, description = "Signed out"),
        (status = 503, description = "Identity provider unavailable", body = ApiError)
    ),
    tag = "auth"
)]
pub async fn sign_out(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    state.service.sign_out().await?;
    Ok(StatusCode::NO_CONTENT)
}
