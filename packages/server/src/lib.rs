#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the air map application.
//!
//! Serves the REST API: user registration and authentication under
//! `/api/auth`, the zip-code aggregation endpoints under `/api/files`, and
//! the S3 county-feed endpoints under `/api/s3`. Account state lives in a
//! `SQLite` database opened at startup; the pollutant CSV sources are read
//! per request (local flat file for the zip flow, the latest bucket object
//! for the county flow).

mod auth;
mod handlers;
mod validate;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpResponse, HttpServer, middleware, web};
use air_map_ai::providers::{GeminiProvider, TextProvider};
use air_map_s3::PollutantBucket;
use air_map_server_models::ApiError;
use switchy_database::Database;

/// Default location of the zip-code pollutant CSV.
const DEFAULT_ZIP_CSV_PATH: &str = "data/aqi_zipcodes_usa.csv";

/// Shared application state.
pub struct AppState {
    /// Accounts database (users, tags, tokens, request history).
    pub db: Arc<dyn Database>,
    /// Pollutant data bucket, when S3 credentials are configured.
    pub bucket: Option<Arc<PollutantBucket>>,
    /// LLM provider for recommendations, when an API key is configured.
    pub ai: Option<Arc<dyn TextProvider>>,
    /// Secret for access token signing.
    pub token_secret: String,
    /// Secret for refresh token signing.
    pub refresh_secret: String,
    /// Path to the zip-code pollutant CSV.
    pub zip_csv_path: PathBuf,
}

/// Starts the air map API server.
///
/// Opens the accounts database, builds the S3 and Gemini clients when
/// their configuration is present (endpoints that need a missing
/// collaborator fail per-request instead of at startup), and starts the
/// Actix-Web HTTP server.
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind or
/// encounters a runtime error.
///
/// # Panics
///
/// Panics if the accounts database cannot be opened.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    log::info!("Opening accounts database...");
    let db_path = std::env::var("DATABASE_PATH")
        .unwrap_or_else(|_| air_map_auth::DEFAULT_DB_PATH.to_string());
    let db = air_map_auth::open_db(Path::new(&db_path))
        .await
        .expect("Failed to open accounts database");

    let bucket = match PollutantBucket::from_env() {
        Ok(bucket) => Some(Arc::new(bucket)),
        Err(e) => {
            log::warn!("S3 disabled: {e}");
            None
        }
    };

    let ai: Option<Arc<dyn TextProvider>> = match std::env::var("GEMINI_API_KEY") {
        Ok(key) if !key.is_empty() => Some(Arc::new(GeminiProvider::new(key))),
        _ => {
            log::warn!("GEMINI_API_KEY not set, recommendations degrade to a notice");
            None
        }
    };

    let token_secret = secret_from_env("TOKEN_SECRET", "dev-token-secret");
    let refresh_secret = secret_from_env("REFRESH_TOKEN_SECRET", "dev-refresh-secret");

    let zip_csv_path =
        PathBuf::from(std::env::var("AQI_CSV_PATH").unwrap_or_else(|_| DEFAULT_ZIP_CSV_PATH.to_string()));

    let state = web::Data::new(AppState {
        db: Arc::from(db),
        bucket,
        ai,
        token_secret,
        refresh_secret,
        zip_csv_path,
    });

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = match std::env::var("FRONTEND_URL") {
            Ok(origin) if !origin.is_empty() => Cors::default()
                .allowed_origin(&origin)
                .allow_any_header()
                .allow_any_method()
                .supports_credentials(),
            _ => Cors::permissive(),
        };

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .route("/health", web::get().to(handlers::health))
            .service(
                web::scope("/api")
                    .service(
                        web::scope("/auth")
                            .route("/register", web::post().to(handlers::auth::register))
                            .route("/login", web::post().to(handlers::auth::login))
                            .route("/refresh", web::post().to(handlers::auth::refresh))
                            .route("/logout", web::post().to(handlers::auth::logout))
                            .route("/profile", web::get().to(handlers::auth::profile))
                            .route("/tags", web::get().to(handlers::auth::all_tags))
                            .route("/tags/by-type", web::get().to(handlers::auth::tags_by_type))
                            .route("/tags/by-list", web::post().to(handlers::auth::tags_by_list))
                            .route("/tags/{id}", web::get().to(handlers::auth::tag_by_id))
                            .route("/requests", web::post().to(handlers::auth::create_request)),
                    )
                    .service(
                        web::scope("/files")
                            .route("/map-data", web::get().to(handlers::files::map_data))
                            .route("/zip/{zip}", web::get().to(handlers::files::by_zip)),
                    )
                    .service(
                        web::scope("/s3")
                            .route("/files", web::get().to(handlers::s3::list_files))
                            .route("/files/latest", web::get().to(handlers::s3::latest_file))
                            .route(
                                "/files/latest-by-state",
                                web::get().to(handlers::s3::latest_by_state),
                            ),
                    ),
            )
            .default_service(web::route().to(route_not_found))
    })
    .bind((bind_addr, port))?
    .run()
    .await
}

/// Catch-all 404 in the API's envelope shape.
async fn route_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiError::new("Route not found"))
}

/// Reads a signing secret from the environment, warning when the
/// development fallback is used.
fn secret_from_env(name: &str, fallback: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| {
        log::warn!("{name} not set, using development secret");
        fallback.to_string()
    })
}
