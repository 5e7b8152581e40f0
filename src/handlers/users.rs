//! # User Profile Handlers

use axum::{
    extract::{Path, State, rejection::JsonRejection},
    response::Json,
};

use crate::error::ApiError;
use crate::models::{Employee, EmployeeId, ProfileUpdate};
use crate::server::AppState;
use crate::service::UserProfile;

/// A user's profile with their upcoming shifts
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(
        ("id" = i64, Path, description = "Employee identifier")
    ),
    responses(
        (status = 200, description = "Profile page data", body = UserProfile),
        (status = 404, description = "User not found", body = ApiError)
    ),
    tag = "users"
)]
pub async fn get_user_profile(
    State(state): State<AppState>,
    Path(id): Path<EmployeeId>,
) -> Result<Json<UserProfile>, ApiError> {
    Ok(Json(state.service.user_profile(id).await?))
}

/// Edit name, location or job roles on a profile
#[utoipa::path(
    patch,
    path = "/api/users/{id}",
    params(
        ("id" = i64, Path, description = "Employee identifier")
    ),
    request_body = ProfileUpdate,
    responses(
        (status = 200, description = "Profile updated", body = Employee),
        (status = 400, description = "Malformed body or unknown job role", body = ApiError),
        (status = 404, description = "User not found", body = ApiError)
    ),
    tag = "users"
)]
pub async fn update_user_profile(
    State(state): State<AppState>,
    Path(id): Path<EmployeeId>,
    payload: Result<Json<ProfileUpdate>, JsonRejection>,
) -> Result<Json<Employee>, ApiError> {
    let Json(update) = payload?;
    Ok(Json(state.service.update_user_profile(id, update).await?))
}
