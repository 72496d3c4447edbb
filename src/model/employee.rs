use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "employee_id": "EMP-001",
        "full_name": "John Doe",
        "email": "john.doe@company.com",
        "department": "Engineering",
        "created_at": "2024-01-01T00:00:00Z"
    })
)]
pub struct Employee {
    #[schema(example = "EMP-001")]
    pub employee_id: String,

    #[schema(example = "John Doe")]
    pub full_name: String,

    #[schema(example = "john.doe@company.com")]
    pub email: String,

    #[schema(example = "Engineering")]
    pub department: String,

    #[schema(
        example = "2024-01-01T00:00:00Z",
        value_type = String,
        format = "date-time"
    )]
    pub created_at: DateTime<Utc>,
}

/// An employee together with counts derived from its attendance rows.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct EmployeeWithStats {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub employee: Employee,

    #[schema(example = 18)]
    pub total_present: i64,

    #[schema(example = 2)]
    pub total_absent: i64,

    #[schema(example = 20)]
    pub total_records: i64,
}

/// Validated, normalized input for creating an employee.
#[derive(Debug, Clone)]
pub struct NewEmployee {
    pub employee_id: String,
    pub full_name: String,
    pub email: String,
    pub department: String,
}
