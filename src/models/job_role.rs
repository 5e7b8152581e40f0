//! Job role model
//!
//! Job roles are what an employee does on shift (Chef, Server, ...). Each one
//! belongs to a single department.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::ParseEnumError;

/// Identifier of a job role record
pub type JobRoleId = i64;

/// Department a job role belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Department {
    #[serde(rename = "Front of House")]
    FrontOfHouse,
    #[serde(rename = "Back of House")]
    BackOfHouse,
    Bar,
    Management,
}

impl Department {
    pub const ALL: [Department; 4] = [
        Department::FrontOfHouse,
        Department::BackOfHouse,
        Department::Bar,
        Department::Management,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Department::FrontOfHouse => "Front of House",
            Department::BackOfHouse => "Back of House",
            Department::Bar => "Bar",
            Department::Management => "Management",
        }
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Department {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Department::ALL
            .into_iter()
            .find(|department| department.as_str() == s)
            .ok_or_else(|| ParseEnumError::new("department", s))
    }
}

/// Job role record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobRole {
    #[schema(example = 2)]
    pub id: JobRoleId,
    #[schema(example = "Chef")]
    pub name: String,
    pub department: Department,
}

/// Payload for creating a job role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewJobRole {
    pub name: String,
    pub department: Department,
}

/// Partial update for a job role
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobRolePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<Department>,
}

impl JobRole {
    /// Shallow-merge the provided fields into this record.
    pub fn apply(&mut self, patch: JobRolePatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(department) = patch.department {
            self.department = department;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn department_uses_display_names_on_the_wire() {
        let json = serde_json::to_string(&Department::FrontOfHouse).unwrap();
        assert_eq!(json, "\"Front of House\"");

        let parsed: Department = serde_json::from_str("\"Back of House\"").unwrap();
        assert_eq!(parsed, Department::BackOfHouse);
    }

    #[test]
    fn department_from_str_rejects_unknown_values() {
        assert_eq!("Bar".parse::<Department>().unwrap(), Department::Bar);
        let err = "Kitchen".parse::<Department>().unwrap_err();
        assert!(err.to_string().contains("Kitchen"));
    }

    #[test]
    fn patch_only_touches_provided_fields() {
        let mut role = JobRole {
            id: 3,
            name: "Server".to_string(),
            department: Department::FrontOfHouse,
        };
        role.apply(JobRolePatch {
            name: Some("Head Server".to_string()),
            department: None,
        });

        assert_eq!(role.name, "Head Server");
        assert_eq!(role.department, Department::FrontOfHouse);
    }
}
