use actix_web::{HttpResponse, Responder, get};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Service is up")),
    tag = "Health"
)]
#[get("/")]
pub async fn index() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "message": "HRMS Lite API is running"
    }))
}

#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Liveness probe")),
    tag = "Health"
)]
#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({ "status": "healthy" }))
}
