//! # Shift API Handlers

use axum::{
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
};
use tracing::info;

use crate::error::ApiError;
use crate::models::{NewShift, PublishOutcome, Shift};
use crate::server::AppState;

/// Create a shift
#[utoipa::path(
    post,
    path = "/api/shifts",
    request_body = NewShift,
    responses(
        (status = 201, description = "Shift created", body = Shift),
        (status = 400, description = "Invalid times or unknown employee", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tag = "schedule"
)]
pub async fn add_shift(
    State(state): State<AppState>,
    payload: Result<Json<NewShift>, JsonRejection>,
) -> Result<(StatusCode, Json<Shift>), ApiError> {
    let Json(request) = payload?;
    let shift = state.service.add_shift(request).await?;
    Ok((StatusCode::CREATED, Json(shift)))
}

/// Publish every draft shift
#[utoipa::path(
    post,
    path = "/api/shifts/publish",
    responses(
        (status = 200, description = "Drafts published", body = PublishOutcome),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tag = "schedule"
)]
pub async fn publish_shifts(
    State(state): State<AppState>,
) -> Result<Json<PublishOutcome>, ApiError> {
    let outcome = state.service.publish_shifts().await?;
    info!(updated_count = outcome.updated_count, "Shifts published");
    Ok(Json(outcome))
}
