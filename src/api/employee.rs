use crate::{
    error::{ApiError, MessageResponse},
    model::employee::NewEmployee,
    service::employee,
    utils::validation,
};
use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use utoipa::ToSchema;

#[derive(Deserialize, Serialize, ToSchema)]
pub struct CreateEmployee {
    #[schema(example = "EMP-001", value_type = String)]
    pub employee_id: String,
    #[schema(example = "John Doe", value_type = String)]
    pub full_name: String,
    #[schema(example = "john@email.com", format = "email", value_type = String)]
    pub email: String,
    #[schema(example = "Engineering", value_type = String)]
    pub department: String,
}

impl CreateEmployee {
    pub fn validate(self) -> Result<NewEmployee, ApiError> {
        Ok(NewEmployee {
            employee_id: validation::required("employee_id", &self.employee_id)?,
            full_name: validation::required("full_name", &self.full_name)?,
            email: validation::email(&self.email)?,
            department: validation::required("department", &self.department)?,
        })
    }
}

/// Create Employee
#[utoipa::path(
    post,
    path = "/employees/",
    request_body = CreateEmployee,
    responses(
        (status = 201, description = "Employee created", body = Employee),
        (status = 400, description = "Validation error or duplicate id/email", body = ErrorResponse, example = json!({
            "detail": "duplicate email"
        }))
    ),
    tag = "Employees"
)]
pub async fn create_employee(
    pool: web::Data<SqlitePool>,
    payload: web::Json<CreateEmployee>,
) -> Result<impl Responder, ApiError> {
    let new = payload.into_inner().validate()?;
    let created = employee::create(pool.get_ref(), new).await?;

    Ok(HttpResponse::Created().json(created))
}

/// List employees with attendance totals
#[utoipa::path(
    get,
    path = "/employees/",
    responses(
        (status = 200, description = "All employees, newest first", body = [EmployeeWithStats])
    ),
    tag = "Employees"
)]
pub async fn list_employees(pool: web::Data<SqlitePool>) -> Result<impl Responder, ApiError> {
    let employees = employee::list(pool.get_ref()).await?;
    Ok(HttpResponse::Ok().json(employees))
}

/// Get Employee by ID
#[utoipa::path(
    get,
    path = "/employees/{employee_id}",
    params(
        ("employee_id", Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Employee found", body = EmployeeWithStats),
        (status = 404, description = "Employee not found", body = ErrorResponse, example = json!({
            "detail": "employee not found"
        }))
    ),
    tag = "Employees"
)]
pub async fn get_employee(
    pool: web::Data<SqlitePool>,
    path: web::Path<String>,
) -> Result<impl Responder, ApiError> {
    let employee_id = path.into_inner();
    let found = employee::get_by_id(pool.get_ref(), &employee_id).await?;

    Ok(HttpResponse::Ok().json(found))
}

/// Delete Employee and all of their attendance
#[utoipa::path(
    delete,
    path = "/employees/{employee_id}",
    params(
        ("employee_id", Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Successfully deleted", body = MessageResponse, example = json!({
            "message": "Employee 'EMP-001' and all associated records deleted successfully."
        })),
        (status = 404, description = "Employee not found", body = ErrorResponse)
    ),
    tag = "Employees"
)]
pub async fn delete_employee(
    pool: web::Data<SqlitePool>,
    path: web::Path<String>,
) -> Result<impl Responder, ApiError> {
    let employee_id = path.into_inner();
    employee::delete(pool.get_ref(), &employee_id).await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new(format!(
        "Employee '{}' and all associated records deleted successfully.",
        employee_id
    ))))
}
