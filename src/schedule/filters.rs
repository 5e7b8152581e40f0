//! Schedule filters and the facet lists offered to the user.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Department, Employee, JobRole, Location, ParseEnumError};

/// Sentinel value meaning "do not filter on this dimension"
pub const ALL: &str = "All";

/// A single filter dimension: either everything or one specific value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Facet<T> {
    #[default]
    All,
    Only(T),
}

impl<T> Facet<T> {
    pub fn is_all(&self) -> bool {
        matches!(self, Facet::All)
    }

    /// True when the facet is `All` or `pred` accepts the selected value.
    pub fn admits(&self, pred: impl FnOnce(&T) -> bool) -> bool {
        match self {
            Facet::All => true,
            Facet::Only(value) => pred(value),
        }
    }
}

impl<T: FromStr> FromStr for Facet<T> {
    type Err = T::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == ALL {
            Ok(Facet::All)
        } else {
            s.parse().map(Facet::Only)
        }
    }
}

impl<T: fmt::Display> fmt::Display for Facet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Facet::All => f.write_str(ALL),
            Facet::Only(value) => value.fmt(f),
        }
    }
}

/// The three schedule filters, combined with AND
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleFilters {
    pub location: Facet<Location>,
    pub department: Facet<Department>,
    /// Job role name
    pub role: Facet<String>,
}

impl ScheduleFilters {
    /// Builds filters from raw query values; a missing value means `All`.
    pub fn parse(
        location: Option<&str>,
        department: Option<&str>,
        role: Option<&str>,
    ) -> Result<Self, ParseEnumError> {
        Ok(Self {
            location: location
                .map(str::parse::<Facet<Location>>)
                .transpose()?
                .unwrap_or_default(),
            department: department
                .map(str::parse::<Facet<Department>>)
                .transpose()?
                .unwrap_or_default(),
            role: match role {
                None | Some(ALL) => Facet::All,
                Some(name) => Facet::Only(name.to_string()),
            },
        })
    }

    pub fn is_unfiltered(&self) -> bool {
        self.location.is_all() && self.department.is_all() && self.role.is_all()
    }

    /// Whether a single employee passes every filter.
    pub fn matches(&self, employee: &Employee, job_roles: &[JobRole]) -> bool {
        let resolved = || {
            employee
                .job_role_ids
                .iter()
                .filter_map(|id| job_roles.iter().find(|role| role.id == *id))
        };

        self.location.admits(|location| employee.location == *location)
            && self
                .department
                .admits(|department| resolved().any(|role| role.department == *department))
            && self.role.admits(|name| resolved().any(|role| role.name == *name))
    }
}

/// Employees passing `filters`, in their original order.
pub fn filter_employees(
    employees: &[Employee],
    job_roles: &[JobRole],
    filters: &ScheduleFilters,
) -> Vec<Employee> {
    employees
        .iter()
        .filter(|employee| filters.matches(employee, job_roles))
        .cloned()
        .collect()
}

/// Selectable values for each filter, each list led by "All"
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FilterOptions {
    pub locations: Vec<String>,
    pub departments: Vec<String>,
    pub roles: Vec<String>,
}

impl FilterOptions {
    /// Locations come from the employees; departments and role names from the
    /// job roles. Values are de-duplicated in first-seen order.
    pub fn derive(employees: &[Employee], job_roles: &[JobRole]) -> Self {
        Self {
            locations: with_all(employees.iter().map(|e| e.location.as_str())),
            departments: with_all(job_roles.iter().map(|r| r.department.as_str())),
            roles: with_all(job_roles.iter().map(|r| r.name.as_str())),
        }
    }
}

fn with_all<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut out = vec![ALL.to_string()];
    for value in values {
        if !out[1..].iter().any(|seen| seen == value) {
            out.push(value.to_string());
        }
    }
    out
}
