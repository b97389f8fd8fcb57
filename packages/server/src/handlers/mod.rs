//! HTTP handler functions for the air map API.

pub mod auth;
pub mod files;
pub mod s3;

use actix_web::HttpResponse;
use air_map_server_models::ApiHealth;

/// `GET /health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        success: true,
        message: "Server is running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
