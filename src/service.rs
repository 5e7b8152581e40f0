//! # Shiftboard Service
//!
//! The application API: every operation a schedule, company or profile screen
//! performs goes through [`ShiftboardService`]. It loads raw records from the
//! [`RecordRepository`], asks the [`UserDirectory`] who is signed in where that
//! matters, and shapes the results with the schedule view-model builder.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;

use crate::auth::{AuthError, UserDirectory};
use crate::error::RepositoryError;
use crate::models::{
    Company, CompanyId, CompanyPatch, Employee, EmployeeDraft, EmployeeId, EmployeePatch, JobRole,
    JobRoleId, JobRolePatch, NewJobRole, NewShift, PermissionRole, ProfileUpdate, PublishOutcome,
    Shift,
};
use crate::repositories::RecordRepository;
use crate::schedule::{
    FilterOptions, PublishReadiness, ScheduleFilters, ScheduleGrid, WeekWindow, filter_employees,
    job_role_names, team_role_label,
};

/// Errors surfaced by service operations
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },
    #[error("not authenticated")]
    Unauthenticated,
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl ServiceError {
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        ServiceError::NotFound { entity, id }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Everything the weekly schedule screen needs
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleData {
    /// Employees passing the requested filters
    pub employees: Vec<Employee>,
    /// Every shift starting inside the week
    pub shifts: Vec<Shift>,
    pub job_roles: Vec<JobRole>,
    /// Facets derived from the unfiltered records
    pub filter_options: FilterOptions,
    #[schema(value_type = String, example = "2025-01-06T00:00:00")]
    pub week_start: NaiveDateTime,
    #[schema(value_type = String, example = "2025-01-12T23:59:59.999")]
    pub week_end: NaiveDateTime,
    pub grid: ScheduleGrid,
    pub readiness: PublishReadiness,
}

/// An employee as listed on the company page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StaffEntry {
    #[serde(flatten)]
    pub employee: Employee,
    /// Comma-separated job role names, or "N/A"
    #[schema(example = "Barista, Cashier")]
    pub job_roles_label: String,
}

/// Company page data: the staff list and the role catalogue
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyData {
    pub employees: Vec<StaffEntry>,
    pub job_roles: Vec<JobRole>,
}

/// A profile page: the user, their upcoming shifts and the role catalogue
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub user: Employee,
    pub shifts: Vec<Shift>,
    pub all_job_roles: Vec<JobRole>,
}

/// A managed employee with the label the team view shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    #[serde(flatten)]
    pub employee: Employee,
    #[schema(example = "Chef")]
    pub role_label: String,
}

pub struct ShiftboardService {
    repository: Arc<dyn RecordRepository>,
    directory: Arc<dyn UserDirectory>,
}

impl ShiftboardService {
    pub fn new(repository: Arc<dyn RecordRepository>, directory: Arc<dyn UserDirectory>) -> Self {
        Self {
            repository,
            directory,
        }
    }

    /// Loads the week containing `today` and derives the schedule view.
    #[instrument(skip(self, filters), fields(backend = self.repository.backend_name()))]
    pub async fn schedule_data(
        &self,
        today: NaiveDate,
        filters: &ScheduleFilters,
    ) -> ServiceResult<ScheduleData> {
        let week = WeekWindow::containing(today);
        info!(
            week_start = %week.monday(),
            unfiltered = filters.is_unfiltered(),
            "GET /api/schedule"
        );

        let (all_employees, job_roles, shifts) = tokio::try_join!(
            self.repository.list_employees(),
            self.repository.list_job_roles(),
            self.repository.list_shifts_in_range(week.start(), week.end()),
        )?;

        let filter_options = FilterOptions::derive(&all_employees, &job_roles);
        let employees = filter_employees(&all_employees, &job_roles, filters);
        let grid = ScheduleGrid::build(&week, &employees, &job_roles, &shifts);
        let readiness = PublishReadiness::of(&shifts);

        Ok(ScheduleData {
            employees,
            shifts,
            job_roles,
            filter_options,
            week_start: week.start(),
            week_end: week.end(),
            grid,
            readiness,
        })
    }

    #[instrument(skip(self))]
    pub async fn company_data(&self) -> ServiceResult<CompanyData> {
        info!("GET /api/company");
        let (employees, job_roles) = tokio::try_join!(
            self.repository.list_employees(),
            self.repository.list_job_roles(),
        )?;

        let employees = employees
            .into_iter()
            .map(|employee| StaffEntry {
                job_roles_label: job_role_names(&employee, &job_roles),
                employee,
            })
            .collect();

        Ok(CompanyData {
            employees,
            job_roles,
        })
    }

    #[instrument(skip(self))]
    pub async fn user_profile(&self, user_id: EmployeeId) -> ServiceResult<UserProfile> {
        info!("GET /api/users/{user_id}");
        let (user, shifts, all_job_roles) = tokio::try_join!(
            self.repository.get_employee(user_id),
            self.repository.list_shifts_for_employee(user_id),
            self.repository.list_job_roles(),
        )?;

        let user = user.ok_or_else(|| ServiceError::not_found("user", user_id))?;
        Ok(UserProfile {
            user,
            shifts,
            all_job_roles,
        })
    }

    #[instrument(skip(self, update))]
    pub async fn update_user_profile(
        &self,
        user_id: EmployeeId,
        update: ProfileUpdate,
    ) -> ServiceResult<Employee> {
        info!("PATCH /api/users/{user_id}");
        self.repository
            .update_employee(user_id, update.into())
            .await?
            .ok_or_else(|| ServiceError::not_found("user", user_id))
    }

    #[instrument(skip(self))]
    pub async fn company_info(&self, company_id: CompanyId) -> ServiceResult<Company> {
        info!("GET /api/company/{company_id}");
        self.repository
            .get_company(company_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("company", company_id))
    }

    /// Renames a company. Only that company's owner may do this.
    #[instrument(skip(self, patch))]
    pub async fn update_company_info(
        &self,
        company_id: CompanyId,
        patch: CompanyPatch,
    ) -> ServiceResult<Company> {
        info!("PATCH /api/company/{company_id}");
        let user = self.require_user().await?;
        if user.permission_role != PermissionRole::Owner || user.company_id != company_id {
            warn!(user_id = user.id, company_id, "Company update refused");
            return Err(ServiceError::Forbidden(
                "Only the company owner can update company details".to_string(),
            ));
        }

        self.repository
            .update_company(company_id, patch)
            .await?
            .ok_or_else(|| ServiceError::not_found("company", company_id))
    }

    /// Employees the signed-in user manages.
    #[instrument(skip(self))]
    pub async fn managed_team(&self) -> ServiceResult<Vec<TeamMember>> {
        info!("GET /api/team");
        let user = self.require_user().await?;
        let (team, job_roles) = tokio::try_join!(
            self.repository
                .list_managed_employees(user.id, user.permission_role),
            self.repository.list_job_roles(),
        )?;

        Ok(team
            .into_iter()
            .map(|employee| TeamMember {
                role_label: team_role_label(&employee, &job_roles).to_string(),
                employee,
            })
            .collect())
    }

    #[instrument(skip(self))]
    pub async fn publish_shifts(&self) -> ServiceResult<PublishOutcome> {
        info!("POST /api/shifts/publish");
        Ok(self.repository.publish_all_drafts().await?)
    }

    #[instrument(skip(self, shift), fields(employee_id = shift.employee_id))]
    pub async fn add_shift(&self, shift: NewShift) -> ServiceResult<Shift> {
        info!("POST /api/shifts");
        Ok(self.repository.create_shift(shift).await?)
    }

    #[instrument(skip(self, role))]
    pub async fn add_job_role(&self, role: NewJobRole) -> ServiceResult<JobRole> {
        info!("POST /api/job-roles");
        Ok(self.repository.create_job_role(role).await?)
    }

    #[instrument(skip(self, patch))]
    pub async fn edit_job_role(
        &self,
        role_id: JobRoleId,
        patch: JobRolePatch,
    ) -> ServiceResult<JobRole> {
        info!("PATCH /api/job-roles/{role_id}");
        self.repository
            .update_job_role(role_id, patch)
            .await?
            .ok_or_else(|| ServiceError::not_found("job role", role_id))
    }

    /// Deletes a job role and unassigns it from every employee.
    #[instrument(skip(self))]
    pub async fn delete_job_role(&self, role_id: JobRoleId) -> ServiceResult<()> {
        info!("DELETE /api/job-roles/{role_id}");
        if self.repository.delete_job_role(role_id).await? {
            Ok(())
        } else {
            Err(ServiceError::not_found("job role", role_id))
        }
    }

    /// Adds an employee to the signed-in user's company.
    #[instrument(skip(self, draft))]
    pub async fn add_employee(&self, draft: EmployeeDraft) -> ServiceResult<Employee> {
        info!("POST /api/employees");
        let user = self.require_user().await?;
        Ok(self
            .repository
            .create_employee(draft.into_new_employee(user.company_id))
            .await?)
    }

    #[instrument(skip(self, patch))]
    pub async fn edit_employee(
        &self,
        employee_id: EmployeeId,
        patch: EmployeePatch,
    ) -> ServiceResult<Employee> {
        info!("PATCH /api/employees/{employee_id}");
        self.repository
            .update_employee(employee_id, patch)
            .await?
            .ok_or_else(|| ServiceError::not_found("employee", employee_id))
    }

    pub async fn current_user(&self) -> ServiceResult<Option<Employee>> {
        Ok(self.directory.current_user().await?)
    }

    pub async fn sign_in(&self) -> ServiceResult<Option<Employee>> {
        Ok(self.directory.sign_in().await?)
    }

    pub async fn sign_out(&self) -> ServiceResult<()> {
        Ok(self.directory.sign_out().await?)
    }

    async fn require_user(&self) -> ServiceResult<Employee> {
        self.directory
            .current_user()
            .await?
            .ok_or(ServiceError::Unauthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::MockUserDirectory;
    use crate::clock::FixedClock;
    use crate::models::{Department, Location, ShiftStatus};
    use crate::repositories::{InMemoryRepository, RepositoryConfig};
    use crate::schedule::Facet;
    use crate::seeds::demo_records;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 8).unwrap()
    }

    fn service_for(user_id: EmployeeId) -> ShiftboardService {
        let clock = Arc::new(FixedClock(today().and_hms_opt(8, 0, 0).unwrap()));
        let repository: Arc<dyn RecordRepository> = Arc::new(InMemoryRepository::with_records(
            RepositoryConfig::default(),
            clock,
            demo_records(today()),
        ));
        let directory = Arc::new(MockUserDirectory::new(Arc::clone(&repository), user_id, None));
        ShiftboardService::new(repository, directory)
    }

    #[tokio::test]
    async fn schedule_data_for_the_demo_week() {
        let service = service_for(8);
        let data = service
            .schedule_data(today(), &ScheduleFilters::default())
            .await
            .unwrap();

        assert_eq!(data.employees.len(), 8);
        assert_eq!(data.shifts.len(), 20);
        assert_eq!(data.grid.rows.len(), 8);
        assert_eq!(data.readiness.draft_count, 5);
        assert_eq!(data.filter_options.locations, vec!["All", "Downtown", "Uptown", "Corporate"]);
        assert_eq!(data.week_start.date(), NaiveDate::from_ymd_opt(2025, 1, 6).unwrap());
    }

    #[tokio::test]
    async fn schedule_filters_narrow_employees_but_not_facets() {
        let service = service_for(8);
        let filters = ScheduleFilters {
            location: Facet::Only(Location::Downtown),
            ..Default::default()
        };
        let data = service.schedule_data(today(), &filters).await.unwrap();

        let ids: Vec<_> = data.employees.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(data.grid.rows.len(), 3);
        assert_eq!(data.filter_options.locations.len(), 4);
    }

    #[tokio::test]
    async fn schedule_for_a_week_without_shifts_is_empty() {
        let service = service_for(8);
        let next_month = NaiveDate::from_ymd_opt(2025, 2, 12).unwrap();
        let data = service
            .schedule_data(next_month, &ScheduleFilters::default())
            .await
            .unwrap();

        assert!(data.shifts.is_empty());
        assert!(!data.readiness.can_publish);
        assert!(data.grid.rows.iter().all(|row| row.cells.iter().all(Option::is_none)));
    }

    #[tokio::test]
    async fn publish_then_reload_shows_no_drafts() {
        let service = service_for(8);
        let outcome = service.publish_shifts().await.unwrap();
        assert_eq!(outcome.updated_count, 5);

        let data = service
            .schedule_data(today(), &ScheduleFilters::default())
            .await
            .unwrap();
        assert!(data.shifts.iter().all(|s| s.status == ShiftStatus::Published));
        assert_eq!(data.readiness.summary, "All shifts are published.");
    }

    #[tokio::test]
    async fn user_profile_lists_upcoming_shifts_only() {
        let service = service_for(8);
        let profile = service.user_profile(2).await.unwrap();

        assert_eq!(profile.user.name, "Bob Williams");
        // Monday's shift is in the past relative to Wednesday 08:00
        let ids: Vec<_> = profile.shifts.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![5, 6]);
        assert_eq!(profile.all_job_roles.len(), 5);
    }

    #[tokio::test]
    async fn unknown_user_profile_is_not_found() {
        let service = service_for(8);
        let err = service.user_profile(404).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { entity: "user", id: 404 }));
    }

    #[tokio::test]
    async fn profile_update_changes_only_profile_fields() {
        let service = service_for(8);
        let updated = service
            .update_user_profile(
                3,
                ProfileUpdate {
                    name: Some("Charles Brown".to_string()),
                    location: Some(Location::Uptown),
                    job_role_ids: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Charles Brown");
        assert_eq!(updated.location, Location::Uptown);
        assert_eq!(updated.permission_role, PermissionRole::Employee);
        assert_eq!(updated.job_role_ids, vec![3]);
    }

    #[tokio::test]
    async fn owner_sees_everyone_else_manager_sees_their_venue() {
        let owner_team = service_for(8).managed_team().await.unwrap();
        assert_eq!(owner_team.len(), 7);
        assert!(owner_team.iter().all(|m| m.employee.id != 8));

        let manager_team = service_for(1).managed_team().await.unwrap();
        let ids: Vec<_> = manager_team.iter().map(|m| m.employee.id).collect();
        assert_eq!(ids, vec![2, 3]);
        assert_eq!(manager_team[0].role_label, "Chef");

        let employee_team = service_for(2).managed_team().await.unwrap();
        assert!(employee_team.is_empty());
    }

    #[tokio::test]
    async fn managed_team_requires_a_session() {
        let service = service_for(8);
        service.sign_out().await.unwrap();
        let err = service.managed_team().await.unwrap_err();
        assert!(matches!(err, ServiceError::Unauthenticated));
    }

    #[tokio::test]
    async fn only_the_owner_can_rename_the_company() {
        let patch = CompanyPatch {
            name: Some("ShiftVibe Group".to_string()),
        };

        let err = service_for(1)
            .update_company_info(1, patch.clone())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));

        let owner = service_for(8);
        let company = owner.update_company_info(1, patch).await.unwrap();
        assert_eq!(company.name, "ShiftVibe Group");
        assert_eq!(owner.company_info(1).await.unwrap().name, "ShiftVibe Group");
    }

    #[tokio::test]
    async fn unknown_company_is_not_found() {
        let err = service_for(8).company_info(9).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { entity: "company", .. }));
    }

    #[tokio::test]
    async fn deleting_a_role_unassigns_it_everywhere() {
        let service = service_for(8);
        service.delete_job_role(4).await.unwrap();

        let data = service.company_data().await.unwrap();
        assert!(data.job_roles.iter().all(|r| r.id != 4));
        let diana = data.employees.iter().find(|e| e.employee.id == 4).unwrap();
        assert!(diana.employee.job_role_ids.is_empty());
        assert_eq!(diana.job_roles_label, "N/A");
        let ethan = data.employees.iter().find(|e| e.employee.id == 5).unwrap();
        assert_eq!(ethan.employee.job_role_ids, vec![5]);

        let err = service.delete_job_role(4).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { entity: "job role", id: 4 }));
    }

    #[tokio::test]
    async fn job_role_crud() {
        let service = service_for(8);
        let created = service
            .add_job_role(NewJobRole {
                name: "Host".to_string(),
                department: Department::FrontOfHouse,
            })
            .await
            .unwrap();
        assert_eq!(created.id, 6);

        let edited = service
            .edit_job_role(
                created.id,
                JobRolePatch {
                    name: Some("Head Host".to_string()),
                    department: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(edited.name, "Head Host");
        assert_eq!(edited.department, Department::FrontOfHouse);

        let err = service
            .edit_job_role(99, JobRolePatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { .. }));
    }

    #[tokio::test]
    async fn new_employees_join_the_current_users_company() {
        let service = service_for(1);
        let created = service
            .add_employee(EmployeeDraft {
                name: "Ivy Chen".to_string(),
                permission_role: PermissionRole::Employee,
                job_role_ids: vec![5],
                location: Location::Downtown,
            })
            .await
            .unwrap();

        assert_eq!(created.id, 9);
        assert_eq!(created.company_id, 1);
        assert_eq!(created.avatar, "https://i.pravatar.cc/150?u=9");

        let err = service
            .edit_employee(99, EmployeePatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { entity: "employee", .. }));
    }

    #[tokio::test]
    async fn add_shift_shows_up_as_a_draft() {
        let service = service_for(8);
        let start = today().and_hms_opt(6, 0, 0).unwrap();
        let shift = service
            .add_shift(NewShift {
                employee_id: 6,
                start_time: start,
                end_time: start + chrono::Duration::hours(4),
            })
            .await
            .unwrap();
        assert_eq!(shift.id, 21);

        let data = service
            .schedule_data(today(), &ScheduleFilters::default())
            .await
            .unwrap();
        assert_eq!(data.readiness.draft_count, 6);
    }
}
