//! # Quill API Server
//!
//! The main entry point for the Actix-web HTTP server.

use std::path::Path;

use actix_web::{App, HttpServer, web};
use quill_infra::storage::COVER_PREFIX;
use tracing_actix_web::TracingLogger;

mod config;
mod handlers;
mod middleware;
mod observability;
mod state;
mod telemetry;

use config::AppConfig;
use observability::RequestIdMiddleware;
use state::AppState;
use telemetry::TelemetryConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    telemetry::init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();

    tracing::info!(
        "Starting Quill API Server on {}:{}",
        config.host,
        config.port
    );

    let state = AppState::new(&config).await;

    // The static file service needs the directory to exist when it is mounted.
    std::fs::create_dir_all(Path::new(&config.cover_dir).join(COVER_PREFIX))?;

    let cover_dir = config.cover_dir.clone();
    let cors_origins = config.cors_origins.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::cors::cors(&cors_origins))
            .wrap(RequestIdMiddleware)
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()))
            .configure(handlers::configure_routes)
            .service(handlers::cover_files(&cover_dir))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
