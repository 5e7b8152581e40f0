//! Shift model
//!
//! Shift times are venue-local wall clock times. A shift starts as a draft and
//! becomes visible to the employee once it is published; there is no way back.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::employee::EmployeeId;

/// Identifier of a shift record
pub type ShiftId = i64;

/// Publication state of a shift
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ShiftStatus {
    #[default]
    Draft,
    Published,
}

impl ShiftStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShiftStatus::Draft => "draft",
            ShiftStatus::Published => "published",
        }
    }
}

impl fmt::Display for ShiftStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shift record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Shift {
    #[schema(example = 5)]
    pub id: ShiftId,
    pub employee_id: EmployeeId,
    #[schema(value_type = String, example = "2025-01-08T12:00:00")]
    pub start_time: NaiveDateTime,
    #[schema(value_type = String, example = "2025-01-08T20:00:00")]
    pub end_time: NaiveDateTime,
    pub status: ShiftStatus,
}

impl Shift {
    pub fn is_draft(&self) -> bool {
        self.status == ShiftStatus::Draft
    }

    /// Calendar date the shift starts on.
    pub fn start_date(&self) -> NaiveDate {
        self.start_time.date()
    }

    /// Moves a draft to published. Returns whether the status changed.
    pub fn publish(&mut self) -> bool {
        if self.is_draft() {
            self.status = ShiftStatus::Published;
            true
        } else {
            false
        }
    }
}

/// Payload for creating a shift. New shifts always start as drafts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewShift {
    pub employee_id: EmployeeId,
    #[schema(value_type = String, example = "2025-01-08T12:00:00")]
    pub start_time: NaiveDateTime,
    #[schema(value_type = String, example = "2025-01-08T20:00:00")]
    pub end_time: NaiveDateTime,
}

/// Result of a bulk publish
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublishOutcome {
    /// Number of shifts that moved from draft to published
    pub updated_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn publish_is_one_way() {
        let mut shift = Shift {
            id: 1,
            employee_id: 2,
            start_time: at(6, 9),
            end_time: at(6, 17),
            status: ShiftStatus::Draft,
        };

        assert!(shift.publish());
        assert_eq!(shift.status, ShiftStatus::Published);
        assert!(!shift.publish());
        assert_eq!(shift.status, ShiftStatus::Published);
    }

    #[test]
    fn new_shift_defaults_to_draft() {
        let payload = serde_json::json!({
            "employeeId": 2,
            "startTime": "2025-01-06T09:00:00",
            "endTime": "2025-01-06T17:00:00"
        });
        let shift: NewShift = serde_json::from_value(payload).unwrap();
        assert_eq!(shift.status, ShiftStatus::Draft);
        assert_eq!(shift.start_time, at(6, 9));
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&ShiftStatus::Published).unwrap(), "\"published\"");
    }
}
