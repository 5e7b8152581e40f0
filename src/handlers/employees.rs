//! # Employee API Handlers
//!
//! Manager-side staff edits. Self-service edits go through `/api/users/{id}`.

use axum::{
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
};

use crate::error::ApiError;
use crate::models::{Employee, EmployeeDraft, EmployeeId, EmployeePatch};
use crate::server::AppState;

/// Add an employee to the signed-in user's company
#[utoipa::path(
    post,
    path = "/api/employees",
    request_body = EmployeeDraft,
    responses(
        (status = 201, description = "Employee created", body = Employee),
        (status = 400, description = "Malformed body or unknown job role", body = ApiError),
        (status = 401, description = "No signed-in user", body = ApiError)
    ),
    tag = "company"
)]
pub async fn add_employee(
    State(state): State<AppState>,
    payload: Result<Json<EmployeeDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<Employee>), ApiError> {
    let Json(draft) = payload?;
    let employee = state.service.add_employee(draft).await?;
    Ok((StatusCode::CREATED, Json(employee)))
}

/// Edit any field of an employee except its id and avatar
#[utoipa::path(
    patch,
    path = "/api/employees/{id}",
    params(
        ("id" = i64, Path, description = "Employee identifier")
    ),
    request_body = EmployeePatch,
    responses(
        (status = 200, description = "Employee updated", body = Employee),
        (status = 400, description = "Malformed body or dangling reference", body = ApiError),
        (status = 404, description = "Employee not found", body = ApiError)
    ),
    tag = "company"
)]
pub async fn edit_employee(
    State(state): State<AppState>,
    Path(id): Path<EmployeeId>,
    payload: Result<Json<EmployeePatch>, JsonRejection>,
) -> Result<Json<Employee>, ApiError> {
    let Json(patch) = payload?;
    Ok(Json(state.service.edit_employee(id, patch).await?))
}
