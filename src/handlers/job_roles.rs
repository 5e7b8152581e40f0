//! # Job Role API Handlers

use axum::{
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
};
use tracing::debug;

use crate::error::ApiError;
use crate::models::{JobRole, JobRoleId, JobRolePatch, NewJobRole};
use crate::server::AppState;

/// Add a job role to the catalogue
#[utoipa::path(
    post,
    path = "/api/job-roles",
    request_body = NewJobRole,
    responses(
        (status = 201, description = "Job role created", body = JobRole),
        (status = 400, description = "Malformed request body", body = ApiError)
    ),
    tag = "company"
)]
pub async fn add_job_role(
    State(state): State<AppState>,
    payload: Result<Json<NewJobRole>, JsonRejection>,
) -> Result<(StatusCode, Json<JobRole>), ApiError> {
    let Json(request) = payload?;
    let role = state.service.add_job_role(request).await?;
    Ok((StatusCode::CREATED, Json(role)))
}

/// Rename a job role or move it to another department
#[utoipa::path(
    patch,
    path = "/api/job-roles/{id}",
    params(
        ("id" = i64, Path, description = "Job role identifier")
    ),
    request_body = JobRolePatch,
    responses(
        (status = 200, description = "Job role updated", body = JobRole),
        (status = 400, description = "Malformed request body", body = ApiError),
        (status = 404, description = "Job role not found", body = ApiError)
    ),
    tag = "company"
)]
pub async fn edit_job_role(
    State(state): State<AppState>,
    Path(id): Path<JobRoleId>,
    payload: Result<Json<JobRolePatch>, JsonRejection>,
) -> Result<Json<JobRole>, ApiError> {
    let Json(patch) = payload?;
    Ok(Json(state.service.edit_job_role(id, patch).await?))
}

/// Delete a job role
///
/// The role is also removed from every employee that held it.
#[utoipa::path(
    delete,
    path = "/api/job-roles/{id}",
    params(
        ("id" = i64, Path, description = "Job role identifier")
    ),
    responses(
        (status = 204, description = "Job role deleted"),
        (status = 404, description = "Job role not found", body = ApiError)
    ),
    tag = "company"
)]
pub async fn delete_job_role(
    State(state): State<AppState>,
    Path(id): Path<JobRoleId>,
) -> Result<StatusCode, ApiError> {
    state.service.delete_job_role(id).await?;
    debug!("Deleted job role {}", id);
    Ok(StatusCode::NO_CONTENT)
}
