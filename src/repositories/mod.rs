//! # Repository Layer
//!
//! [`RecordRepository`] is the persistence capability the rest of the crate is
//! written against. The only implementation today is the process-local
//! [`InMemoryRepository`]; a database-backed adapter would implement the same
//! trait.
//!
//! Lookups by id return `Ok(None)` when nothing matches. Updates return the
//! merged record, or `Ok(None)` when the id matched nothing.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::error::RepositoryError;
use crate::models::{
    Company, CompanyId, CompanyPatch, Employee, EmployeeId, EmployeePatch, JobRole, JobRoleId,
    JobRolePatch, NewCompany, NewEmployee, NewJobRole, NewShift, PermissionRole, PublishOutcome,
    Shift, ShiftId,
};

pub mod memory;

pub use memory::{InMemoryRepository, Records};

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Default base for generated employee avatars
pub const DEFAULT_AVATAR_BASE_URL: &str = "https://i.pravatar.cc/150";

#[async_trait]
pub trait RecordRepository: Send + Sync {
    async fn list_companies(&self) -> RepositoryResult<Vec<Company>>;
    async fn get_company(&self, id: CompanyId) -> RepositoryResult<Option<Company>>;
    async fn create_company(&self, company: NewCompany) -> RepositoryResult<Company>;
    async fn update_company(
        &self,
        id: CompanyId,
        patch: CompanyPatch,
    ) -> RepositoryResult<Option<Company>>;

    async fn list_job_roles(&self) -> RepositoryResult<Vec<JobRole>>;
    async fn get_job_role(&self, id: JobRoleId) -> RepositoryResult<Option<JobRole>>;
    async fn create_job_role(&self, role: NewJobRole) -> RepositoryResult<JobRole>;
    async fn update_job_role(
        &self,
        id: JobRoleId,
        patch: JobRolePatch,
    ) -> RepositoryResult<Option<JobRole>>;
    /// Removes the role and unassigns it from every employee. Returns whether a
    /// role was removed.
    async fn delete_job_role(&self, id: JobRoleId) -> RepositoryResult<bool>;

    async fn list_employees(&self) -> RepositoryResult<Vec<Employee>>;
    async fn get_employee(&self, id: EmployeeId) -> RepositoryResult<Option<Employee>>;
    async fn list_managed_employees(
        &self,
        manager_id: EmployeeId,
        manager_role: PermissionRole,
    ) -> RepositoryResult<Vec<Employee>>;
    async fn create_employee(&self, employee: NewEmployee) -> RepositoryResult<Employee>;
    async fn update_employee(
        &self,
        id: EmployeeId,
        patch: EmployeePatch,
    ) -> RepositoryResult<Option<Employee>>;

    /// Shifts whose start time lies in `[start, end]`, in store order.
    async fn list_shifts_in_range(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> RepositoryResult<Vec<Shift>>;
    /// Upcoming shifts for one employee, earliest first.
    async fn list_shifts_for_employee(&self, employee_id: EmployeeId)
    -> RepositoryResult<Vec<Shift>>;
    async fn get_shift(&self, id: ShiftId) -> RepositoryResult<Option<Shift>>;
    async fn create_shift(&self, shift: NewShift) -> RepositoryResult<Shift>;
    /// Moves every draft shift to published in one step.
    async fn publish_all_drafts(&self) -> RepositoryResult<PublishOutcome>;

    fn backend_name(&self) -> &'static str;
}

/// Repository-wide settings
#[derive(Debug, Clone)]
pub struct RepositoryConfig {
    /// Reject writes that point at records which do not exist
    pub enforce_references: bool,
    pub latency: LatencyProfile,
    pub avatar_base_url: String,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            enforce_references: true,
            latency: LatencyProfile::disabled(),
            avatar_base_url: DEFAULT_AVATAR_BASE_URL.to_string(),
        }
    }
}

/// Repository operations, used to look up simulated latency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryOp {
    ListCompanies,
    GetCompany,
    CreateCompany,
    UpdateCompany,
    ListJobRoles,
    GetJobRole,
    CreateJobRole,
    UpdateJobRole,
    DeleteJobRole,
    ListEmployees,
    GetEmployee,
    ListManagedEmployees,
    CreateEmployee,
    UpdateEmployee,
    ListShiftsInRange,
    ListShiftsForEmployee,
    GetShift,
    CreateShift,
    PublishAllDrafts,
}

impl RepositoryOp {
    /// Round-trip time a networked database call of this kind would take.
    pub fn simulated_delay(self) -> Duration {
        let millis = match self {
            RepositoryOp::ListCompanies | RepositoryOp::GetCompany => 100,
            RepositoryOp::GetEmployee | RepositoryOp::GetJobRole | RepositoryOp::GetShift => 150,
            RepositoryOp::ListJobRoles | RepositoryOp::ListShiftsForEmployee => 200,
            RepositoryOp::CreateShift => 250,
            RepositoryOp::ListEmployees
            | RepositoryOp::ListManagedEmployees
            | RepositoryOp::CreateCompany
            | RepositoryOp::CreateJobRole
            | RepositoryOp::UpdateJobRole => 300,
            RepositoryOp::UpdateCompany => 350,
            RepositoryOp::ListShiftsInRange
            | RepositoryOp::CreateEmployee
            | RepositoryOp::UpdateEmployee
            | RepositoryOp::DeleteJobRole => 400,
            RepositoryOp::PublishAllDrafts => 500,
        };
        Duration::from_millis(millis)
    }
}

/// Whether repository calls sleep to imitate I/O
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatencyProfile {
    enabled: bool,
}

impl LatencyProfile {
    pub fn enabled() -> Self {
        Self { enabled: true }
    }

    pub fn disabled() -> Self {
        Self { enabled: false }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn delay_for(&self, op: RepositoryOp) -> Duration {
        if self.enabled {
            op.simulated_delay()
        } else {
            Duration::ZERO
        }
    }

    /// Sleeps for the operation's delay when enabled.
    pub async fn simulate(&self, op: RepositoryOp) {
        let delay = self.delay_for(op);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

/// Next integer id: one past the largest existing id, or 1 for an empty collection.
pub fn next_id(ids: impl IntoIterator<Item = i64>) -> i64 {
    ids.into_iter().fold(0, i64::max) + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_id_starts_at_one() {
        assert_eq!(next_id(Vec::new()), 1);
    }

    #[test]
    fn next_id_follows_the_largest_id_not_the_count() {
        assert_eq!(next_id([1, 7, 3]), 8);
    }

    #[test]
    fn disabled_latency_never_sleeps() {
        let profile = LatencyProfile::disabled();
        assert_eq!(profile.delay_for(RepositoryOp::PublishAllDrafts), Duration::ZERO);

        let profile = LatencyProfile::enabled();
        assert_eq!(
            profile.delay_for(RepositoryOp::PublishAllDrafts),
            Duration::from_millis(500)
        );
    }
}
