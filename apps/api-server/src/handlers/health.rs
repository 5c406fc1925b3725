//! Liveness endpoints.

use actix_web::HttpResponse;
use serde::Serialize;

use quill_shared::dto::PingResponse;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub timestamp: String,
}

/// Health check endpoint - returns server status.
///
/// GET /api/health
pub async fn health_check() -> HttpResponse {
    let response = HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().to_rfc3339(),
    };

    HttpResponse::Ok().json(response)
}

/// GET /api/ping
pub async fn ping() -> HttpResponse {
    HttpResponse::Ok().json(PingResponse { pong: true })
}
