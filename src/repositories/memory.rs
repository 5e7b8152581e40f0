//! In-memory implementation of [`RecordRepository`].
//!
//! All four collections live in one [`Records`] value behind a single
//! `tokio::sync::RwLock`. Reads share the lock; every mutation, including the
//! cascading job role delete and the bulk publish, runs under one write guard,
//! so concurrent callers never observe a half-applied change.
//!
//! Nothing is durable: state is lost when the process exits.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use metrics::counter;
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::{RecordRepository, RepositoryConfig, RepositoryOp, RepositoryResult, next_id};
use crate::clock::{Clock, SystemClock};
use crate::error::RepositoryError;
use crate::models::{
    Company, CompanyId, CompanyPatch, Employee, EmployeeId, EmployeePatch, JobRole, JobRoleId,
    JobRolePatch, NewCompany, NewEmployee, NewJobRole, NewShift, PermissionRole, PublishOutcome,
    Shift, ShiftId, ShiftStatus,
};

/// The full record set, in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Records {
    pub companies: Vec<Company>,
    pub job_roles: Vec<JobRole>,
    pub employees: Vec<Employee>,
    pub shifts: Vec<Shift>,
}

impl Records {
    fn check_company(&self, company_id: CompanyId) -> RepositoryResult<()> {
        if self.companies.iter().any(|c| c.id == company_id) {
            Ok(())
        } else {
            Err(RepositoryError::invalid_reference("company", company_id))
        }
    }

    fn check_job_roles(&self, job_role_ids: &[JobRoleId]) -> RepositoryResult<()> {
        match job_role_ids
            .iter()
            .find(|id| !self.job_roles.iter().any(|r| r.id == **id))
        {
            Some(missing) => Err(RepositoryError::invalid_reference("job role", *missing)),
            None => Ok(()),
        }
    }

    fn check_employee(&self, employee_id: EmployeeId) -> RepositoryResult<()> {
        if self.employees.iter().any(|e| e.id == employee_id) {
            Ok(())
        } else {
            Err(RepositoryError::invalid_reference("employee", employee_id))
        }
    }
}

/// Process-local record store
pub struct InMemoryRepository {
    config: RepositoryConfig,
    clock: Arc<dyn Clock>,
    records: RwLock<Records>,
}

impl InMemoryRepository {
    /// Creates an empty repository on the system clock.
    pub fn new(config: RepositoryConfig) -> Self {
        Self::with_records(config, Arc::new(SystemClock), Records::default())
    }

    /// Creates a repository pre-populated with `records`. Seed data is taken
    /// as-is; reference checks only apply to later writes.
    pub fn with_records(config: RepositoryConfig, clock: Arc<dyn Clock>, records: Records) -> Self {
        debug!(
            companies = records.companies.len(),
            job_roles = records.job_roles.len(),
            employees = records.employees.len(),
            shifts = records.shifts.len(),
            latency = config.latency.is_enabled(),
            "In-memory repository initialized"
        );
        Self {
            config,
            clock,
            records: RwLock::new(records),
        }
    }

    /// Copy of every record, mainly for diagnostics and tests.
    pub async fn snapshot(&self) -> Records {
        self.records.read().await.clone()
    }

    fn avatar_for(&self, id: EmployeeId) -> String {
        format!("{}?u={}", self.config.avatar_base_url, id)
    }
}

#[async_trait]
impl RecordRepository for InMemoryRepository {
    async fn list_companies(&self) -> RepositoryResult<Vec<Company>> {
        self.config.latency.simulate(RepositoryOp::ListCompanies).await;
        Ok(self.records.read().await.companies.clone())
    }

    async fn get_company(&self, id: CompanyId) -> RepositoryResult<Option<Company>> {
        self.config.latency.simulate(RepositoryOp::GetCompany).await;
        let records = self.records.read().await;
        Ok(records.companies.iter().find(|c| c.id == id).cloned())
    }

    async fn create_company(&self, company: NewCompany) -> RepositoryResult<Company> {
        self.config.latency.simulate(RepositoryOp::CreateCompany).await;
        let mut records = self.records.write().await;
        let created = Company {
            id: next_id(records.companies.iter().map(|c| c.id)),
            name: company.name,
        };
        records.companies.push(created.clone());
        info!(company_id = created.id, "Company created");
        Ok(created)
    }

    async fn update_company(
        &self,
        id: CompanyId,
        patch: CompanyPatch,
    ) -> RepositoryResult<Option<Company>> {
        self.config.latency.simulate(RepositoryOp::UpdateCompany).await;
        let mut records = self.records.write().await;
        let Some(company) = records.companies.iter_mut().find(|c| c.id == id) else {
            debug!(company_id = id, "Company update matched no record");
            return Ok(None);
        };
        company.apply(patch);
        info!(company_id = id, "Company updated");
        Ok(Some(company.clone()))
    }

    async fn list_job_roles(&self) -> RepositoryResult<Vec<JobRole>> {
        self.config.latency.simulate(RepositoryOp::ListJobRoles).await;
        Ok(self.records.read().await.job_roles.clone())
    }

    async fn get_job_role(&self, id: JobRoleId) -> RepositoryResult<Option<JobRole>> {
        self.config.latency.simulate(RepositoryOp::GetJobRole).await;
        let records = self.records.read().await;
        Ok(records.job_roles.iter().find(|r| r.id == id).cloned())
    }

    async fn create_job_role(&self, role: NewJobRole) -> RepositoryResult<JobRole> {
        self.config.latency.simulate(RepositoryOp::CreateJobRole).await;
        let mut records = self.records.write().await;
        let created = JobRole {
            id: next_id(records.job_roles.iter().map(|r| r.id)),
            name: role.name,
            department: role.department,
        };
        records.job_roles.push(created.clone());
        info!(job_role_id = created.id, name = %created.name, "Job role created");
        Ok(created)
    }

    async fn update_job_role(
        &self,
        id: JobRoleId,
        patch: JobRolePatch,
    ) -> RepositoryResult<Option<JobRole>> {
        self.config.latency.simulate(RepositoryOp::UpdateJobRole).await;
        let mut records = self.records.write().await;
        let Some(role) = records.job_roles.iter_mut().find(|r| r.id == id) else {
            debug!(job_role_id = id, "Job role update matched no record");
            return Ok(None);
        };
        role.apply(patch);
        info!(job_role_id = id, "Job role updated");
        Ok(Some(role.clone()))
    }

    async fn delete_job_role(&self, id: JobRoleId) -> RepositoryResult<bool> {
        self.config.latency.simulate(RepositoryOp::DeleteJobRole).await;
        let mut records = self.records.write().await;

        let before = records.job_roles.len();
        records.job_roles.retain(|r| r.id != id);
        let removed = records.job_roles.len() < before;

        let mut unassigned = 0usize;
        for employee in records.employees.iter_mut() {
            let held = employee.job_role_ids.len();
            employee.job_role_ids.retain(|role_id| *role_id != id);
            unassigned += held - employee.job_role_ids.len();
        }

        info!(job_role_id = id, removed, unassigned, "Job role deleted");
        Ok(removed)
    }

    async fn list_employees(&self) -> RepositoryResult<Vec<Employee>> {
        self.config.latency.simulate(RepositoryOp::ListEmployees).await;
        Ok(self.records.read().await.employees.clone())
    }

    async fn get_employee(&self, id: EmployeeId) -> RepositoryResult<Option<Employee>> {
        self.config.latency.simulate(RepositoryOp::GetEmployee).await;
        let records = self.records.read().await;
        Ok(records.employees.iter().find(|e| e.id == id).cloned())
    }

    async fn list_managed_employees(
        &self,
        manager_id: EmployeeId,
        manager_role: PermissionRole,
    ) -> RepositoryResult<Vec<Employee>> {
        self.config
            .latency
            .simulate(RepositoryOp::ListManagedEmployees)
            .await;
        let records = self.records.read().await;

        let team = match manager_role {
            PermissionRole::Owner => records
                .employees
                .iter()
                .filter(|e| e.id != manager_id)
                .cloned()
                .collect(),
            PermissionRole::Manager => {
                let Some(manager) = records.employees.iter().find(|e| e.id == manager_id) else {
                    return Ok(Vec::new());
                };
                records
                    .employees
                    .iter()
                    .filter(|e| e.location == manager.location && e.id != manager_id)
                    .cloned()
                    .collect()
            }
            PermissionRole::Employee => Vec::new(),
        };

        Ok(team)
    }

    async fn create_employee(&self, employee: NewEmployee) -> RepositoryResult<Employee> {
        self.config.latency.simulate(RepositoryOp::CreateEmployee).await;
        let mut records = self.records.write().await;

        if self.config.enforce_references {
            records.check_company(employee.company_id)?;
            records.check_job_roles(&employee.job_role_ids)?;
        }

        let id = next_id(records.employees.iter().map(|e| e.id));
        let created = Employee {
            id,
            name: employee.name,
            permission_role: employee.permission_role,
            job_role_ids: employee.job_role_ids,
            location: employee.location,
            avatar: self.avatar_for(id),
            company_id: employee.company_id,
        };
        records.employees.push(created.clone());
        info!(employee_id = id, "Employee created");
        Ok(created)
    }

    async fn update_employee(
        &self,
        id: EmployeeId,
        patch: EmployeePatch,
    ) -> RepositoryResult<Option<Employee>> {
        self.config.latency.simulate(RepositoryOp::UpdateEmployee).await;
        let mut records = self.records.write().await;

        let Some(index) = records.employees.iter().position(|e| e.id == id) else {
            debug!(employee_id = id, "Employee update matched no record");
            return Ok(None);
        };

        if self.config.enforce_references {
            if let Some(company_id) = patch.company_id {
                records.check_company(company_id)?;
            }
            if let Some(job_role_ids) = patch.job_role_ids.as_deref() {
                records.check_job_roles(job_role_ids)?;
            }
        }

        let employee = &mut records.employees[index];
        employee.apply(patch);
        info!(employee_id = id, "Employee updated");
        Ok(Some(employee.clone()))
    }

    async fn list_shifts_in_range(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> RepositoryResult<Vec<Shift>> {
        self.config
            .latency
            .simulate(RepositoryOp::ListShiftsInRange)
            .await;
        let records = self.records.read().await;
        let shifts: Vec<Shift> = records
            .shifts
            .iter()
            .filter(|s| s.start_time >= start && s.start_time <= end)
            .cloned()
            .collect();
        debug!(%start, %end, count = shifts.len(), "Listed shifts in range");
        Ok(shifts)
    }

    async fn list_shifts_for_employee(
        &self,
        employee_id: EmployeeId,
    ) -> RepositoryResult<Vec<Shift>> {
        self.config
            .latency
            .simulate(RepositoryOp::ListShiftsForEmployee)
            .await;
        let now = self.clock.now();
        let records = self.records.read().await;
        let mut shifts: Vec<Shift> = records
            .shifts
            .iter()
            .filter(|s| s.employee_id == employee_id && s.start_time > now)
            .cloned()
            .collect();
        shifts.sort_by_key(|s| s.start_time);
        Ok(shifts)
    }

    async fn get_shift(&self, id: ShiftId) -> RepositoryResult<Option<Shift>> {
        self.config.latency.simulate(RepositoryOp::GetShift).await;
        let records = self.records.read().await;
        Ok(records.shifts.iter().find(|s| s.id == id).cloned())
    }

    async fn create_shift(&self, shift: NewShift) -> RepositoryResult<Shift> {
        self.config.latency.simulate(RepositoryOp::CreateShift).await;

        if shift.end_time <= shift.start_time {
            return Err(RepositoryError::validation_error(
                "Shift end time must be after its start time",
            ));
        }

        let mut records = self.records.write().await;
        if self.config.enforce_references {
            records.check_employee(shift.employee_id)?;
        }

        let created = Shift {
            id: next_id(records.shifts.iter().map(|s| s.id)),
            employee_id: shift.employee_id,
            start_time: shift.start_time,
            end_time: shift.end_time,
            status: ShiftStatus::Draft,
        };
        records.shifts.push(created.clone());
        info!(
            shift_id = created.id,
            employee_id = created.employee_id,
            status = %created.status,
            "Shift created"
        );
        Ok(created)
    }

    async fn publish_all_drafts(&self) -> RepositoryResult<PublishOutcome> {
        self.config
            .latency
            .simulate(RepositoryOp::PublishAllDrafts)
            .await;
        let mut records = self.records.write().await;
        let updated_count = records
            .shifts
            .iter_mut()
            .map(Shift::publish)
            .filter(|changed| *changed)
            .count();

        counter!("shifts_published_total").increment(updated_count as u64);
        info!(updated_count, "Published draft shifts");
        Ok(PublishOutcome { updated_count })
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
