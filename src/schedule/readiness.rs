//! Draft counting for the publish action.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Shift;

/// Number of shifts still in draft.
pub fn draft_count(shifts: &[Shift]) -> usize {
    shifts.iter().filter(|shift| shift.is_draft()).count()
}

/// Whether there is anything to publish, with a short human summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublishReadiness {
    pub draft_count: usize,
    pub can_publish: bool,
    #[schema(example = "3 draft shifts need publishing.")]
    pub summary: String,
}

impl PublishReadiness {
    pub fn of(shifts: &[Shift]) -> Self {
        let draft_count = draft_count(shifts);
        let summary = if draft_count > 0 {
            let plural = if draft_count > 1 { "s" } else { "" };
            format!("{draft_count} draft shift{plural} need publishing.")
        } else {
            "All shifts are published.".to_string()
        };

        Self {
            draft_count,
            can_publish: draft_count > 0,
            summary,
        }
    }
}
