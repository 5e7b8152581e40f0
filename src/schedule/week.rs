//! Monday-anchored week window used by the schedule grid and range queries.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};

/// The seven calendar days from Monday to Sunday that contain a given date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekWindow {
    monday: NaiveDate,
}

impl WeekWindow {
    /// Window for the week containing `today`. Sundays belong to the week that
    /// started six days earlier.
    pub fn containing(today: NaiveDate) -> Self {
        let offset = i64::from(today.weekday().num_days_from_monday());
        Self {
            monday: today - Duration::days(offset),
        }
    }

    pub fn monday(&self) -> NaiveDate {
        self.monday
    }

    /// Monday through Sunday, strictly increasing.
    pub fn days(&self) -> Vec<NaiveDate> {
        (0..7).map(|i| self.monday + Duration::days(i)).collect()
    }

    /// Monday at 00:00:00.
    pub fn start(&self) -> NaiveDateTime {
        self.monday.and_time(NaiveTime::MIN)
    }

    /// Sunday at 23:59:59.999, the last instant a range query should include.
    pub fn end(&self) -> NaiveDateTime {
        self.start() + Duration::days(7) - Duration::milliseconds(1)
    }

    #[cfg(test)]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.monday && date < self.monday + Duration::days(7)
    }
}
