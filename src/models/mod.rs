//! # Data Models
//!
//! This module contains the scheduling records shared by the store, the
//! schedule view-model builder and the HTTP API.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

pub mod company;
pub mod employee;
pub mod job_role;
pub mod shift;

pub use company::{Company, CompanyId, CompanyPatch, NewCompany};
pub use employee::{
    Employee, EmployeeDraft, EmployeeId, EmployeePatch, Location, NewEmployee, PermissionRole,
    ProfileUpdate,
};
pub use job_role::{Department, JobRole, JobRoleId, JobRolePatch, NewJobRole};
pub use shift::{NewShift, PublishOutcome, Shift, ShiftId, ShiftStatus};

/// Error returned when a display name does not match any enum variant
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseEnumError {
    pub fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Basic service information response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ServiceInfo {
    /// The name of the service
    pub service: String,
    /// The version of the service
    pub version: String,
}

impl Default for ServiceInfo {
    fn default() -> Self {
        Self {
            service: "shiftboard".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
