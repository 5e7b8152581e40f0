//! # Schedule View Model
//!
//! Pure functions that turn raw records into what a schedule screen shows:
//! the current week, filtered employees, filter facets, the employee-by-day
//! grid, role labels and the draft counter. Nothing here performs I/O.

pub mod filters;
pub mod grid;
pub mod readiness;
pub mod week;

pub use filters::{ALL, Facet, FilterOptions, ScheduleFilters, filter_employees};
pub use grid::{
    NO_ROLE, ScheduleGrid, ScheduleRow, UNKNOWN_ROLE, job_role_names, primary_role_label,
    team_role_label,
};
pub use readiness::{PublishReadiness, draft_count};
pub use week::WeekWindow;
