//! # Billing Handlers

use axum::{
    extract::{State, rejection::JsonRejection},
    response::Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::billing::{CheckoutSession, PortalSession};
use crate::error::ApiError;
use crate::server::AppState;

/// Request payload for starting a subscription checkout
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    /// Provider price identifier of the chosen plan
    #[schema(example = "price_team_monthly")]
    pub price_id: String,
}

/// Start a checkout session
#[utoipa::path(
    post,
    path = "/api/billing/checkout",
    request_body = CheckoutRequest,
    responses(
        (status = 200, description = "Checkout session started", body = CheckoutSession),
        (status = 400, description = "Missing or empty price id", body = ApiError),
        (status = 502, description = "Billing provider failure", body = ApiError)
    ),
    tag = "billing"
)]
pub async fn create_checkout_session(
    State(state): State<AppState>,
    payload: Result<Json<CheckoutRequest>, JsonRejection>,
) -> Result<Json<CheckoutSession>, ApiError> {
    let Json(request) = payload?;
    let session = state
        .billing
        .create_checkout_session(&request.price_id)
        .await?;
    Ok(Json(session))
}

/// Link to the customer portal
#[utoipa::path(
    post,
    path = "/api/billing/portal",
    responses(
        (status = 200, description = "Portal session", body = PortalSession),
        (status = 502, description = "Billing provider failure", body = ApiError)
    ),
    tag = "billing"
)]
pub async fn customer_portal(
    State(state): State<AppState>,
) -> Result<Json<PortalSession>, ApiError> {
    Ok(Json(state.billing.customer_portal().await?))
}
