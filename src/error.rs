//! # Error Handling
//!
//! This module provides the repository error type shared by every storage
//! backend and the unified HTTP error for the Shiftboard API, a problem+json
//! response carrying a trace ID for log correlation.

use axum::{
    extract::rejection::JsonRejection,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use utoipa::ToSchema;

use crate::auth::AuthError;
use crate::billing::BillingError;
use crate::service::ServiceError;
use crate::telemetry;

/// Errors raised by a [`crate::repositories::RecordRepository`]
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The record itself is malformed (e.g. a shift that ends before it starts)
    #[error("validation failed: {0}")]
    Validation(String),
    /// The record points at another record that does not exist
    #[error("{entity} {id} does not exist")]
    InvalidReference { entity: &'static str, id: i64 },
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl RepositoryError {
    pub fn validation_error(message: impl Into<String>) -> Self {
        RepositoryError::Validation(message.into())
    }

    pub fn invalid_reference(entity: &'static str, id: i64) -> Self {
        RepositoryError::InvalidReference { entity, id }
    }
}

/// Unified API error response structure
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ApiError {
    /// HTTP status code for the response
    #[serde(skip_serializing)]
    pub status: StatusCode,
    /// Error code for programmatic handling
    pub code: Box<str>,
    /// Human-readable error message
    pub message: Box<str>,
    /// Additional error details (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Box<serde_json::Value>>,
    /// Suggested retry delay in seconds (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after: Option<u64>,
    /// Correlation trace ID for debugging (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<Box<str>>,
}

impl ApiError {
    /// Create a new API error with the given status code and message
    pub fn new(status: StatusCode, code: &str, message: &str) -> Self {
        Self {
            status,
            code: code.into(),
            message: message.into(),
            details: None,
            retry_after: None,
            trace_id: Self::current_trace_id(),
        }
    }

    /// Create an error whose status and code come from `kind`
    pub fn of(kind: ErrorType, message: &str) -> Self {
        Self::new(kind.status_code(), kind.error_code(), message)
    }

    /// Add details to the error
    pub fn with_details<V: Into<serde_json::Value>>(mut self, details: V) -> Self {
        self.details = Some(Box::new(details.into()));
        self
    }

    /// Set retry after delay
    pub fn with_retry_after(mut self, seconds: u64) -> Self {
        self.retry_after = Some(seconds);
        self
    }

    /// Trace ID of the current request, or a short generated correlation ID
    /// when the error is raised outside a request scope.
    fn current_trace_id() -> Option<Box<str>> {
        telemetry::current_trace_id()
            .map(String::into_boxed_str)
            .or_else(|| {
                let short = &uuid::Uuid::new_v4().simple().to_string()[..8];
                Some(format!("corr-{short}").into_boxed_str())
            })
    }
}

/// Standard error types with predefined status codes
#[derive(Debug, Error)]
pub enum ErrorType {
    #[error("Bad Request")]
    BadRequest,
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Forbidden")]
    Forbidden,
    #[error("Not Found")]
    NotFound,
    #[error("Internal Server Error")]
    InternalServerError,
    #[error("Bad Gateway")]
    BadGateway,
}

impl ErrorType {
    /// Get the appropriate HTTP status code for this error type
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorType::BadRequest => StatusCode::BAD_REQUEST,
            ErrorType::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorType::Forbidden => StatusCode::FORBIDDEN,
            ErrorType::NotFound => StatusCode::NOT_FOUND,
            ErrorType::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorType::BadGateway => StatusCode::BAD_GATEWAY,
        }
    }

    /// Get the error code string for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            ErrorType::BadRequest => "VALIDATION_FAILED",
            ErrorType::Unauthorized => "UNAUTHORIZED",
            ErrorType::Forbidden => "FORBIDDEN",
            ErrorType::NotFound => "NOT_FOUND",
            ErrorType::InternalServerError => "INTERNAL_SERVER_ERROR",
            ErrorType::BadGateway => "BILLING_ERROR",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut headers = HeaderMap::new();
        headers.insert(
            "content-type",
            HeaderValue::from_static("application/problem+json"),
        );

        if let Some(retry_after) = self.retry_after
            && let Ok(header_value) = HeaderValue::from_str(&retry_after.to_string())
        {
            headers.insert("retry-after", header_value);
        }

        (self.status, headers, axum::Json(self)).into_response()
    }
}

// Error mappers for common sources

impl From<anyhow::Error> for ApiError {
    fn from(error: anyhow::Error) -> Self {
        tracing::error!("Internal error: {:?}", error);

        Self::of(ErrorType::InternalServerError, "An internal error occurred")
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let message = match rejection {
            JsonRejection::JsonDataError(err) => format!("Invalid JSON: {}", err),
            JsonRejection::JsonSyntaxError(err) => format!("JSON syntax error: {}", err),
            JsonRejection::MissingJsonContentType(_) => {
                "Missing 'Content-Type: application/json' header".to_string()
            }
            _ => "Invalid request body".to_string(),
        };

        Self::of(ErrorType::BadRequest, &message)
    }
}

impl From<RepositoryError> for ApiError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::Validation(message) => Self::of(ErrorType::BadRequest, &message),
            RepositoryError::InvalidReference { entity, id } => validation_error(
                &format!("Referenced {entity} does not exist"),
                json!({ "entity": entity, "id": id }),
            ),
            RepositoryError::Unexpected(inner) => inner.into(),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(error: AuthError) -> Self {
        tracing::error!(?error, "Identity provider failure");
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "AUTH_UNAVAILABLE",
            "Identity provider unavailable",
        )
        .with_retry_after(5)
    }
}

impl From<ServiceError> for ApiError {
    fn from(error: ServiceError) -> Self {
        match error {
            ServiceError::NotFound { entity, id } => {
                Self::of(ErrorType::NotFound, &format!("{entity} {id} not found"))
                    .with_details(json!({ "entity": entity, "id": id }))
            }
            ServiceError::Unauthenticated => unauthorized(Some("Not authenticated")),
            ServiceError::Forbidden(reason) => forbidden(Some(&reason)),
            ServiceError::Repository(inner) => inner.into(),
            ServiceError::Auth(inner) => inner.into(),
        }
    }
}

impl From<BillingError> for ApiError {
    fn from(error: BillingError) -> Self {
        match error {
            BillingError::InvalidPriceId(price_id) => validation_error(
                "Price id must not be empty",
                json!({ "priceId": price_id }),
            ),
            other => {
                tracing::error!(error = %other, "Billing provider failure");
                Self::of(ErrorType::BadGateway, "Billing provider request failed")
            }
        }
    }
}

/// Create an unauthorized error (401)
pub fn unauthorized(message: Option<&str>) -> ApiError {
    let msg = message.unwrap_or("Authentication required");
    ApiError::of(ErrorType::Unauthorized, msg)
}

/// Create a forbidden error (403)
pub fn forbidden(message: Option<&str>) -> ApiError {
    let msg = message.unwrap_or("Insufficient permissions");
    ApiError::of(ErrorType::Forbidden, msg)
}

/// Create a validation error with field details
pub fn validation_error(message: &str, field_errors: serde_json::Value) -> ApiError {
    ApiError::of(ErrorType::BadRequest, message).with_details(field_errors)
}
