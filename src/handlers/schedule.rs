//! # Schedule API Handlers

use axum::{
    extract::{Query, State},
    response::Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;
use utoipa::IntoParams;

use crate::error::{ApiError, validation_error};
use crate::schedule::ScheduleFilters;
use crate::server::AppState;
use crate::service::ScheduleData;

/// Query parameters for the weekly schedule. Omitted values mean "All".
#[derive(Debug, Default, Deserialize, Serialize, IntoParams)]
pub struct ScheduleQuery {
    /// Location display name, e.g. "Downtown"
    pub location: Option<String>,
    /// Department display name, e.g. "Front of House"
    pub department: Option<String>,
    /// Job role name, e.g. "Chef"
    pub role: Option<String>,
}

impl ScheduleQuery {
    fn filters(&self) -> Result<ScheduleFilters, ApiError> {
        ScheduleFilters::parse(
            self.location.as_deref(),
            self.department.as_deref(),
            self.role.as_deref(),
        )
        .map_err(|err| {
            validation_error(
                &format!("Invalid schedule filter: {err}"),
                json!({ "field": err.kind, "value": err.value }),
            )
        })
    }
}

/// Schedule for the week containing today
#[utoipa::path(
    get,
    path = "/api/schedule",
    params(ScheduleQuery),
    responses(
        (status = 200, description = "Weekly schedule view", body = ScheduleData),
        (status = 400, description = "Unknown location or department", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tag = "schedule"
)]
pub async fn get_schedule(
    State(state): State<AppState>,
    Query(query): Query<ScheduleQuery>,
) -> Result<Json<ScheduleData>, ApiError> {
    let filters = query.filters()?;
    let today = state.clock.today();
    debug!(%today, ?filters, "Building schedule");

    let data = state.service.schedule_data(today, &filters).await?;
    Ok(Json(data))
}
