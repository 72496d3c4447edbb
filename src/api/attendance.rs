use crate::{
    error::{ApiError, MessageResponse},
    model::attendance::{AttendanceFilter, NewAttendance},
    service::attendance,
    utils::validation,
};
use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, Serialize, ToSchema)]
pub struct MarkAttendance {
    #[schema(example = "EMP-001")]
    pub employee_id: String,
    #[schema(example = "2024-01-01", format = "date")]
    pub date: String,
    #[schema(example = "Present")]
    /// `Present` or `Absent`
    pub status: String,
}

impl MarkAttendance {
    pub fn validate(self) -> Result<NewAttendance, ApiError> {
        Ok(NewAttendance {
            employee_id: validation::required("employee_id", &self.employee_id)?,
            date: validation::date(&self.date)?,
            status: validation::status(&self.status)?,
        })
    }
}

#[derive(Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct AttendanceQuery {
    #[schema(example = "2024-01-01")]
    /// Earliest date to include (YYYY-MM-DD)
    pub from_date: Option<String>,
    #[schema(example = "2024-01-31")]
    /// Latest date to include (YYYY-MM-DD)
    pub to_date: Option<String>,
    #[schema(example = "Present")]
    /// Only records with this status
    pub status: Option<String>,
}

impl AttendanceQuery {
    pub fn validate(&self) -> Result<AttendanceFilter, ApiError> {
        Ok(AttendanceFilter {
            from_date: validation::optional_date(self.from_date.as_deref())?,
            to_date: validation::optional_date(self.to_date.as_deref())?,
            status: validation::optional_status(self.status.as_deref())?,
        })
    }
}

/// Mark attendance for one employee and day
#[utoipa::path(
    post,
    path = "/attendance/",
    request_body = MarkAttendance,
    responses(
        (status = 201, description = "Attendance recorded", body = Attendance),
        (status = 400, description = "Validation error or already recorded", body = ErrorResponse, example = json!({
            "detail": "attendance already recorded for this date"
        })),
        (status = 404, description = "Employee not found", body = ErrorResponse)
    ),
    tag = "Attendance"
)]
pub async fn mark_attendance(
    pool: web::Data<SqlitePool>,
    payload: web::Json<MarkAttendance>,
) -> Result<impl Responder, ApiError> {
    let new = payload.into_inner().validate()?;
    let record = attendance::mark(pool.get_ref(), new).await?;

    Ok(HttpResponse::Created().json(record))
}

/// List one employee's attendance
#[utoipa::path(
    get,
    path = "/attendance/{employee_id}",
    params(
        ("employee_id", Path, description = "Employee ID"),
        AttendanceQuery
    ),
    responses(
        (status = 200, description = "Matching records, latest first", body = [Attendance]),
        (status = 400, description = "Invalid filter", body = ErrorResponse),
        (status = 404, description = "Employee not found", body = ErrorResponse)
    ),
    tag = "Attendance"
)]
pub async fn list_attendance(
    pool: web::Data<SqlitePool>,
    path: web::Path<String>,
    query: web::Query<AttendanceQuery>,
) -> Result<impl Responder, ApiError> {
    let employee_id = path.into_inner();
    let filter = query.validate()?;
    let records = attendance::list_for_employee(pool.get_ref(), &employee_id, &filter).await?;

    Ok(HttpResponse::Ok().json(records))
}

/// Delete a single attendance record
#[utoipa::path(
    delete,
    path = "/attendance/{attendance_id}",
    params(
        ("attendance_id", Path, description = "Attendance record ID")
    ),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse, example = json!({
            "message": "Attendance record deleted successfully."
        })),
        (status = 404, description = "Attendance record not found", body = ErrorResponse)
    ),
    tag = "Attendance"
)]
pub async fn delete_attendance(
    pool: web::Data<SqlitePool>,
    path: web::Path<String>,
) -> Result<impl Responder, ApiError> {
    let attendance_id = path.into_inner();
    attendance::delete(pool.get_ref(), &attendance_id).await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Attendance record deleted successfully.")))
}
