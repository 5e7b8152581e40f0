//! # API Handlers
//!
//! This module contains all the HTTP endpoint handlers for the Shiftboard API.

use std::sync::Arc;

use axum::{extract::State, response::Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::AppConfig;
use crate::models::ServiceInfo;

pub mod auth;
pub mod billing;
pub mod company;
pub mod employees;
pub mod job_roles;
pub mod schedule;
pub mod shifts;
pub mod team;
pub mod users;

/// Liveness check payload
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "ok")]
    pub status: String,
    /// Active configuration profile
    #[schema(example = "local")]
    pub profile: String,
}

/// Root handler that returns basic service information
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service information", body = ServiceInfo)
    ),
    tag = "root"
)]
pub async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo::default())
}

/// Liveness check
#[utoipa::path(
    get,
    path = "/healthz",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    ),
    tag = "root"
)]
pub async fn healthz(State(config): State<Arc<AppConfig>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        profile: config.profile.clone(),
    })
}
