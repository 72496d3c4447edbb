use actix_governor::Governor;
use anyhow::bail;
use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use anyhow::Context;
use dotenvy::dotenv;

mod api;
mod config;
mod db;
mod docs;
mod error;
mod model;
mod routes;
mod service;
mod utils;

use config::Config;
use db::init_db;

use crate::docs::ApiDoc;
use tracing::info;
use tracing_appender::rolling;
use utoipa::OpenApi; // ← needed for ApiDoc::openapi()
use utoipa_redoc::{Redoc, Servable};
use utoipa_swagger_ui::SwaggerUi;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(config.log_level)
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!(addr = %config.server_addr, "Server starting...");

    let pool = init_db(
        &config.database_url,
        config.db_max_connections,
        config.db_busy_timeout,
    )
    .await?;

    if config.cors_origins.is_empty() {
        bail!("CORS_ORIGINS lists no origins");
    }
    let cors_origins = config.cors_origins.clone();

    let governor_conf = routes::build_limiter(config.rate_per_min)
        .context("RATE_PER_MIN does not yield a valid rate limit")?;
    let server_addr = config.server_addr.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(Governor::new(&governor_conf))
            .wrap(NormalizePath::trim())
            .wrap(routes::build_cors(&cors_origins))
            .service(
                SwaggerUi::new("/docs/{_:.*}") // ← wildcard {_:.*} to match JS/CSS files
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .service(Redoc::with_url("/redoc", ApiDoc::openapi()))
            .app_data(Data::new(pool.clone()))
            .configure(routes::configure)
    })
    .bind(&server_addr)
    .with_context(|| format!("Failed to bind {}", server_addr))?
    .run()
    .await?;

    info!("Server stopped");
    Ok(())
}
