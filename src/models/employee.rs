//! Employee model
//!
//! Employees carry two independent notions of "role": the permission role
//! (what they may administer) and an ordered list of job roles (what they do
//! on shift). The first job role id is the primary one.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::ParseEnumError;
use super::company::CompanyId;
use super::job_role::JobRoleId;

/// Identifier of an employee record
pub type EmployeeId = i64;

/// Administrative permission level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum PermissionRole {
    Owner,
    Manager,
    Employee,
}

impl PermissionRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionRole::Owner => "Owner",
            PermissionRole::Manager => "Manager",
            PermissionRole::Employee => "Employee",
        }
    }
}

impl fmt::Display for PermissionRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PermissionRole {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Owner" => Ok(PermissionRole::Owner),
            "Manager" => Ok(PermissionRole::Manager),
            "Employee" => Ok(PermissionRole::Employee),
            other => Err(ParseEnumError::new("permission role", other)),
        }
    }
}

/// Venue an employee works at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Location {
    Downtown,
    Uptown,
    Corporate,
}

impl Location {
    pub fn as_str(&self) -> &'static str {
        match self {
            Location::Downtown => "Downtown",
            Location::Uptown => "Uptown",
            Location::Corporate => "Corporate",
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Location {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Downtown" => Ok(Location::Downtown),
            "Uptown" => Ok(Location::Uptown),
            "Corporate" => Ok(Location::Corporate),
            other => Err(ParseEnumError::new("location", other)),
        }
    }
}

/// Employee record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    #[schema(example = 2)]
    pub id: EmployeeId,
    #[schema(example = "Bob Williams")]
    pub name: String,
    pub permission_role: PermissionRole,
    /// Ordered job role ids; the first entry is the primary role
    pub job_role_ids: Vec<JobRoleId>,
    pub location: Location,
    /// Avatar image URI
    #[schema(example = "https://i.pravatar.cc/150?u=2")]
    pub avatar: String,
    pub company_id: CompanyId,
}

/// Payload for creating an employee. The id and avatar are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewEmployee {
    pub name: String,
    pub permission_role: PermissionRole,
    #[serde(default)]
    pub job_role_ids: Vec<JobRoleId>,
    pub location: Location,
    pub company_id: CompanyId,
}

/// Employee form data as submitted by a manager; the company comes from the
/// signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeDraft {
    pub name: String,
    pub permission_role: PermissionRole,
    #[serde(default)]
    pub job_role_ids: Vec<JobRoleId>,
    pub location: Location,
}

impl EmployeeDraft {
    pub fn into_new_employee(self, company_id: CompanyId) -> NewEmployee {
        NewEmployee {
            name: self.name,
            permission_role: self.permission_role,
            job_role_ids: self.job_role_ids,
            location: self.location,
            company_id,
        }
    }
}

/// Partial update for an employee; the id and avatar cannot be changed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permission_role: Option<PermissionRole>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_role_ids: Option<Vec<JobRoleId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_id: Option<CompanyId>,
}

/// Self-service profile edit: only name, location and job roles
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_role_ids: Option<Vec<JobRoleId>>,
}

impl From<ProfileUpdate> for EmployeePatch {
    fn from(update: ProfileUpdate) -> Self {
        EmployeePatch {
            name: update.name,
            location: update.location,
            job_role_ids: update.job_role_ids,
            ..Default::default()
        }
    }
}

impl Employee {
    /// Shallow-merge the provided fields into this record.
    pub fn apply(&mut self, patch: EmployeePatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(permission_role) = patch.permission_role {
            self.permission_role = permission_role;
        }
        if let Some(job_role_ids) = patch.job_role_ids {
            self.job_role_ids = job_role_ids;
        }
        if let Some(location) = patch.location {
            self.location = location;
        }
        if let Some(company_id) = patch.company_id {
            self.company_id = company_id;
        }
    }

    /// The first job role id, if any.
    pub fn primary_job_role_id(&self) -> Option<JobRoleId> {
        self.job_role_ids.first().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn employee() -> Employee {
        Employee {
            id: 5,
            name: "Ethan Davis".to_string(),
            permission_role: PermissionRole::Employee,
            job_role_ids: vec![5, 4],
            location: Location::Uptown,
            avatar: "https://i.pravatar.cc/150?u=5".to_string(),
            company_id: 1,
        }
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let value = serde_json::to_value(employee()).unwrap();
        assert_eq!(value["permissionRole"], "Employee");
        assert_eq!(value["jobRoleIds"], serde_json::json!([5, 4]));
        assert_eq!(value["companyId"], 1);
        assert_eq!(value["location"], "Uptown");
    }

    #[test]
    fn profile_update_cannot_escalate_permissions() {
        let patch: EmployeePatch = ProfileUpdate {
            name: Some("Ethan D.".to_string()),
            location: None,
            job_role_ids: Some(vec![4]),
        }
        .into();

        assert!(patch.permission_role.is_none());
        assert!(patch.company_id.is_none());

        let mut record = employee();
        record.apply(patch);
        assert_eq!(record.name, "Ethan D.");
        assert_eq!(record.job_role_ids, vec![4]);
        assert_eq!(record.permission_role, PermissionRole::Employee);
        assert_eq!(record.location, Location::Uptown);
    }

    #[test]
    fn primary_job_role_is_first_entry() {
        assert_eq!(employee().primary_job_role_id(), Some(5));

        let mut without_roles = employee();
        without_roles.job_role_ids.clear();
        assert_eq!(without_roles.primary_job_role_id(), None);
    }

    #[test]
    fn enums_parse_from_display_names() {
        assert_eq!("Manager".parse::<PermissionRole>().unwrap(), PermissionRole::Manager);
        assert_eq!("Corporate".parse::<Location>().unwrap(), Location::Corporate);
        assert!("Midtown".parse::<Location>().is_err());
    }
}
