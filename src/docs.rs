use crate::api::attendance::{AttendanceQuery, MarkAttendance};
use crate::api::employee::CreateEmployee;
use crate::error::{ErrorResponse, MessageResponse};
use crate::model::attendance::{Attendance, AttendanceStatus};
use crate::model::dashboard::DashboardStats;
use crate::model::employee::{Employee, EmployeeWithStats};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HRMS Lite API",
        version = "1.0.0",
        description = r#"
## HRMS Lite

A lightweight Human Resource Management record-keeper.

### Features
- **Employees**: create, list (with attendance totals), view and delete.
  Deleting an employee removes all of their attendance.
- **Attendance**: mark one status per employee per day, list with
  date-range and status filters, delete single records.
- **Dashboard**: headcount, record totals, today's presence and the
  list of departments.

### Conventions
- Dates are `YYYY-MM-DD`, timestamps RFC 3339.
- Status is exactly `Present` or `Absent`.
- Errors are returned as `{"detail": "..."}`.
"#,
    ),
    paths(
        crate::api::health::index,
        crate::api::health::health,

        crate::api::employee::create_employee,
        crate::api::employee::list_employees,
        crate::api::employee::get_employee,
        crate::api::employee::delete_employee,

        crate::api::attendance::mark_attendance,
        crate::api::attendance::list_attendance,
        crate::api::attendance::delete_attendance,

        crate::api::dashboard::get_dashboard
    ),
    components(
        schemas(
            CreateEmployee,
            Employee,
            EmployeeWithStats,
            MarkAttendance,
            AttendanceQuery,
            Attendance,
            AttendanceStatus,
            DashboardStats,
            ErrorResponse,
            MessageResponse
        )
    ),
    tags(
        (name = "Health", description = "Liveness probes"),
        (name = "Employees", description = "Employee management APIs"),
        (name = "Attendance", description = "Attendance management APIs"),
        (name = "Dashboard", description = "Aggregate statistics"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();

        for expected in [
            "/",
            "/health",
            "/employees/",
            "/employees/{employee_id}",
            "/attendance/",
            "/attendance/{employee_id}",
            "/attendance/{attendance_id}",
            "/dashboard/",
        ] {
            assert!(paths.contains(&expected), "missing {expected}, have {paths:?}");
        }
    }

    #[test]
    fn serializes_to_json() {
        let json = ApiDoc::openapi().to_json().unwrap();
        assert!(json.contains("HRMS Lite API"));
        assert!(json.contains("EmployeeWithStats"));
    }
}
