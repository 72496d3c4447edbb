use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
#[schema(
    example = json!({
        "total_employees": 12,
        "total_attendance_records": 240,
        "present_today": 10,
        "absent_today": 1,
        "departments": ["Engineering", "HR"]
    })
)]
pub struct DashboardStats {
    pub total_employees: i64,
    pub total_attendance_records: i64,
    pub present_today: i64,
    pub absent_today: i64,
    pub departments: Vec<String>,
}
