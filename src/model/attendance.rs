use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

/// Daily attendance status. Persisted and serialized as the literal
/// `"Present"` / `"Absent"`.
#[derive(
    Debug,
    Copy,
    Clone,
    Eq,
    PartialEq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    sqlx::Type,
    ToSchema,
)]
pub enum AttendanceStatus {
    Present,
    Absent,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": "0b6f7f0e-4a3e-4e4b-9a51-5d1f0d2d6c11",
        "employee_id": "EMP-001",
        "date": "2024-01-01",
        "status": "Present",
        "created_at": "2024-01-01T09:00:00Z"
    })
)]
pub struct Attendance {
    pub id: String,

    pub employee_id: String,

    #[schema(example = "2024-01-01", value_type = String, format = "date")]
    pub date: NaiveDate,

    pub status: AttendanceStatus,

    #[schema(example = "2024-01-01T09:00:00Z", value_type = String, format = "date-time")]
    pub created_at: DateTime<Utc>,
}

/// Validated input for marking attendance.
#[derive(Debug, Clone)]
pub struct NewAttendance {
    pub employee_id: String,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}

/// Optional filters for listing one employee's attendance, combined with AND.
#[derive(Debug, Clone, Default)]
pub struct AttendanceFilter {
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub status: Option<AttendanceStatus>,
}
