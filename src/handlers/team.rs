//! # Team Handler

use axum::{extract::State, response::Json};

use crate::error::ApiError;
use crate::server::AppState;
use crate::service::TeamMember;

/// Employees managed by the signed-in user
///
/// Owners see everyone else. Managers see the other employees at their own
/// location. Plain employees see nobody.
#[utoipa::path(
    get,
    path = "/api/team",
    responses(
        (status = 200, description = "Managed employees", body = Vec<TeamMember>),
        (status = 401, description = "No signed-in user", body = ApiError)
    ),
    tag = "users"
)]
pub async fn get_managed_team(
    State(state): State<AppState>,
) -> Result<Json<Vec<TeamMember>>, ApiError> {
    Ok(Json(state.service.managed_team().await?))
}
