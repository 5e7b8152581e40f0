//! # Company API Handlers
//!
//! The staff list with its role catalogue, and the company record itself.

use axum::{
    extract::{Path, State, rejection::JsonRejection},
    response::Json,
};

use crate::error::ApiError;
use crate::models::{Company, CompanyId, CompanyPatch};
use crate::server::AppState;
use crate::service::CompanyData;

/// Staff list and job role catalogue
#[utoipa::path(
    get,
    path = "/api/company",
    responses(
        (status = 200, description = "Company page data", body = CompanyData),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tag = "company"
)]
pub async fn get_company_data(
    State(state): State<AppState>,
) -> Result<Json<CompanyData>, ApiError> {
    Ok(Json(state.service.company_data().await?))
}

/// Fetch a company
#[utoipa::path(
    get,
    path = "/api/company/{id}",
    params(
        ("id" = i64, Path, description = "Company identifier")
    ),
    responses(
        (status = 200, description = "Company record", body = Company),
        (status = 404, description = "Company not found", body = ApiError)
    ),
    tag = "company"
)]
pub async fn get_company_info(
    State(state): State<AppState>,
    Path(id): Path<CompanyId>,
) -> Result<Json<Company>, ApiError> {
    Ok(Json(state.service.company_info(id).await?))
}

/// Rename a company
///
/// Only the owner of the company may update it.
#[utoipa::path(
    patch,
    path = "/api/company/{id}",
    params(
        ("id" = i64, Path, description = "Company identifier")
    ),
    request_body = CompanyPatch,
    responses(
        (status = 200, description = "Company updated", body = Company),
        (status = 400, description = "Malformed request body", body = ApiError),
        (status = 401, description = "No signed-in user", body = ApiError),
        (status = 403, description = "Signed-in user does not own the company", body = ApiError),
        (status = 404, description = "Company not found", body = ApiError)
    ),
    tag = "company"
)]
pub async fn update_company_info(
    State(state): State<AppState>,
    Path(id): Path<CompanyId>,
    payload: Result<Json<CompanyPatch>, JsonRejection>,
) -> Result<Json<Company>, ApiError> {
    let Json(patch) = payload?;
    Ok(Json(state.service.update_company_info(id, patch).await?))
}
