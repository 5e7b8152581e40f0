//! Company model
//!
//! A company owns employees through `Employee::company_id`.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Identifier of a company record
pub type CompanyId = i64;

/// Company record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    /// Unique, immutable identifier
    #[schema(example = 1)]
    pub id: CompanyId,
    /// Display name
    #[schema(example = "ShiftVibe Eateries Inc.")]
    pub name: String,
}

/// Payload for creating a company
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewCompany {
    pub name: String,
}

/// Partial update for a company; absent fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Company {
    /// Shallow-merge the provided fields into this record.
    pub fn apply(&mut self, patch: CompanyPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
    }
}
