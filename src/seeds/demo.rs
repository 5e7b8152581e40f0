//! Demo company seeding
//!
//! One restaurant group with five job roles, eight employees across two venues
//! plus head office, and twenty shifts spread over the current week.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::models::{
    Company, Department, Employee, JobRole, Location, PermissionRole, Shift, ShiftStatus,
};
use crate::repositories::{DEFAULT_AVATAR_BASE_URL, Records};
use crate::schedule::WeekWindow;

/// (employee, days after Monday, start hour, end hour, status)
const DEMO_SHIFTS: [(i64, i64, i64, i64, ShiftStatus); 20] = [
    (1, 0, 9, 17, ShiftStatus::Published),
    (1, 1, 9, 17, ShiftStatus::Published),
    (1, 2, 9, 17, ShiftStatus::Published),
    (2, 0, 10, 18, ShiftStatus::Published),
    (2, 2, 12, 20, ShiftStatus::Draft),
    (2, 4, 14, 22, ShiftStatus::Published),
    (3, 1, 11, 19, ShiftStatus::Published),
    (3, 3, 11, 19, ShiftStatus::Draft),
    (3, 5, 17, 23, ShiftStatus::Published),
    (4, 0, 8, 16, ShiftStatus::Draft),
    (4, 2, 8, 16, ShiftStatus::Published),
    (4, 4, 8, 16, ShiftStatus::Published),
    (5, 1, 7, 15, ShiftStatus::Published),
    (5, 3, 7, 15, ShiftStatus::Published),
    (5, 5, 9, 17, ShiftStatus::Draft),
    (6, 2, 16, 22, ShiftStatus::Published),
    (6, 4, 16, 22, ShiftStatus::Published),
    (7, 1, 15, 23, ShiftStatus::Draft),
    (7, 5, 15, 23, ShiftStatus::Published),
    (7, 6, 15, 23, ShiftStatus::Published),
];

/// Builds the demo record set with shifts anchored to the week containing `today`.
///
/// # Arguments
///
/// * `today` - Any date in the week the demo shifts should fall in
///
/// # Returns
///
/// A complete, internally consistent [`Records`] value
pub fn demo_records(today: NaiveDate) -> Records {
    let monday = WeekWindow::containing(today).monday().and_time(NaiveTime::MIN);

    let companies = vec![Company {
        id: 1,
        name: "ShiftVibe Eateries Inc.".to_string(),
    }];

    let job_roles = vec![
        job_role(1, "Manager", Department::Management),
        job_role(2, "Chef", Department::BackOfHouse),
        job_role(3, "Server", Department::FrontOfHouse),
        job_role(4, "Cashier", Department::FrontOfHouse),
        job_role(5, "Barista", Department::Bar),
    ];

    let employees = vec![
        employee(1, "Alice Johnson", PermissionRole::Manager, &[1, 3], Location::Downtown),
        employee(2, "Bob Williams", PermissionRole::Employee, &[2], Location::Downtown),
        employee(3, "Charlie Brown", PermissionRole::Employee, &[3], Location::Downtown),
        employee(4, "Diana Miller", PermissionRole::Employee, &[4], Location::Uptown),
        employee(5, "Ethan Davis", PermissionRole::Employee, &[5, 4], Location::Uptown),
        employee(6, "Fiona Garcia", PermissionRole::Employee, &[3], Location::Uptown),
        employee(7, "George Rodriguez", PermissionRole::Employee, &[2], Location::Uptown),
        employee(8, "Heidi Owner", PermissionRole::Owner, &[1], Location::Corporate),
    ];

    let shifts: Vec<Shift> = DEMO_SHIFTS
        .iter()
        .zip(1..)
        .map(|(&(employee_id, day, start, end, status), id)| Shift {
            id,
            employee_id,
            start_time: at(monday, day, start),
            end_time: at(monday, day, end),
            status,
        })
        .collect();

    log::info!(
        "Seeded demo data: {} employees, {} job roles, {} shifts for week of {}",
        employees.len(),
        job_roles.len(),
        shifts.len(),
        monday.date()
    );

    Records {
        companies,
        job_roles,
        employees,
        shifts,
    }
}

fn at(monday: NaiveDateTime, day: i64, hour: i64) -> NaiveDateTime {
    monday + Duration::days(day) + Duration::hours(hour)
}

fn job_role(id: i64, name: &str, department: Department) -> JobRole {
    JobRole {
        id,
        name: name.to_string(),
        department,
    }
}

fn employee(
    id: i64,
    name: &str,
    permission_role: PermissionRole,
    job_role_ids: &[i64],
    location: Location,
) -> Employee {
    Employee {
        id,
        name: name.to_string(),
        permission_role,
        job_role_ids: job_role_ids.to_vec(),
        location,
        avatar: format!("{DEFAULT_AVATAR_BASE_URL}?u={id}"),
        company_id: 1,
    }
}
