use crate::{
    api::{attendance, dashboard, employee, health},
    error::{json_error_handler, path_error_handler, query_error_handler, route_not_found},
};
use actix_cors::Cors;
use actix_governor::{
    GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::web;

/// Per-peer quota shared by every worker's `Governor`; `None` if it cannot be built.
pub fn build_limiter(requests_per_min: u32) -> Option<GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware>> {
    let per_ms = if requests_per_min == 0 {
        1
    } else {
        (60_000 / requests_per_min as u64).max(1)
    };
    GovernorConfigBuilder::default()
        .milliseconds_per_request(per_ms)
        .burst_size(requests_per_min.max(1))
        .key_extractor(PeerIpKeyExtractor)
        .finish()
}

/// Cross-origin policy for browser clients. `*` admits any origin.
pub fn build_cors(origins: &[String]) -> Cors {
    let cors = Cors::default()
        .allow_any_method()
        .allow_any_header()
        .max_age(3600);

    if origins.iter().any(|o| o == "*") {
        cors.allow_any_origin()
    } else {
        origins.iter().fold(cors, |cors, origin| cors.allowed_origin(origin))
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .default_service(web::route().to(route_not_found));

    cfg.service(health::index).service(health::health);

    cfg.service(
        web::scope("/employees")
            // /employees
            .service(
                web::resource("")
                    .route(web::post().to(employee::create_employee))
                    .route(web::get().to(employee::list_employees)),
            )
            // /employees/{employee_id}
            .service(
                web::resource("/{employee_id}")
                    .route(web::get().to(employee::get_employee))
                    .route(web::delete().to(employee::delete_employee)),
            ),
    )
    .service(
        web::scope("/attendance")
            // /attendance
            .service(web::resource("").route(web::post().to(attendance::mark_attendance)))
            // GET takes an employee id, DELETE an attendance id
            .service(
                web::resource("/{id}")
                    .route(web::get().to(attendance::list_attendance))
                    .route(web::delete().to(attendance::delete_attendance)),
            ),
    )
    .service(
        web::scope("/dashboard")
            .service(web::resource("").route(web::get().to(dashboard::get_dashboard))),
    );
}
