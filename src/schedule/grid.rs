//! Weekly grid placement and role labels.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::week::WeekWindow;
use crate::models::{Employee, EmployeeId, JobRole, Shift};

/// Label used when an employee has no job roles
pub const NO_ROLE: &str = "No Role";
/// Label used when an employee's primary role id no longer resolves
pub const UNKNOWN_ROLE: &str = "Unknown Role";

/// Name of the employee's primary (first) job role.
pub fn primary_role_label<'a>(employee: &Employee, job_roles: &'a [JobRole]) -> &'a str {
    match employee.primary_job_role_id() {
        None => NO_ROLE,
        Some(id) => job_roles
            .iter()
            .find(|role| role.id == id)
            .map_or(UNKNOWN_ROLE, |role| role.name.as_str()),
    }
}

/// Same as [`primary_role_label`], except an employee without job roles is
/// labelled with their permission role.
pub fn team_role_label<'a>(employee: &Employee, job_roles: &'a [JobRole]) -> &'a str {
    if employee.job_role_ids.is_empty() {
        employee.permission_role.as_str()
    } else {
        primary_role_label(employee, job_roles)
    }
}

/// Comma-separated names of every resolvable job role, or "N/A".
pub fn job_role_names(employee: &Employee, job_roles: &[JobRole]) -> String {
    let names: Vec<&str> = employee
        .job_role_ids
        .iter()
        .filter_map(|id| job_roles.iter().find(|role| role.id == *id))
        .map(|role| role.name.as_str())
        .collect();

    if names.is_empty() {
        "N/A".to_string()
    } else {
        names.join(", ")
    }
}

/// One employee's week
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRow {
    pub employee_id: EmployeeId,
    pub name: String,
    pub avatar: String,
    pub role_label: String,
    /// Seven cells, Monday first; a cell holds at most one shift
    pub cells: Vec<Option<Shift>>,
}

/// Employees by days, ready to render
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleGrid {
    #[schema(value_type = Vec<String>)]
    pub days: Vec<NaiveDate>,
    pub rows: Vec<ScheduleRow>,
}

impl ScheduleGrid {
    /// Places each employee's shifts on the week's days. When several shifts
    /// start on the same date, the first one in `shifts` wins.
    pub fn build(
        week: &WeekWindow,
        employees: &[Employee],
        job_roles: &[JobRole],
        shifts: &[Shift],
    ) -> Self {
        let days = week.days();
        let rows = employees
            .iter()
            .map(|employee| ScheduleRow {
                employee_id: employee.id,
                name: employee.name.clone(),
                avatar: employee.avatar.clone(),
                role_label: primary_role_label(employee, job_roles).to_string(),
                cells: days
                    .iter()
                    .map(|day| {
                        shifts
                            .iter()
                            .find(|s| s.employee_id == employee.id && s.start_date() == *day)
                            .cloned()
                    })
                    .collect(),
            })
            .collect();

        Self { days, rows }
    }

    #[cfg(test)]
    pub fn row(&self, employee_id: EmployeeId) -> Option<&ScheduleRow> {
        self.rows.iter().find(|row| row.employee_id == employee_id)
    }
}
