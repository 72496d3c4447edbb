use crate::{error::ApiError, service::dashboard};
use actix_web::{HttpResponse, Responder, web};
use sqlx::SqlitePool;

/// Aggregate counts for the landing page
#[utoipa::path(
    get,
    path = "/dashboard/",
    responses(
        (status = 200, description = "Current totals", body = DashboardStats)
    ),
    tag = "Dashboard"
)]
pub async fn get_dashboard(pool: web::Data<SqlitePool>) -> Result<impl Responder, ApiError> {
    let stats = dashboard::stats(pool.get_ref()).await?;
    Ok(HttpResponse::Ok().json(stats))
}
