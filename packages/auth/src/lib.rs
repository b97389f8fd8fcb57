#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! User accounts, tags, signed tokens, and request history.
//!
//! Persistent state lives in a `SQLite` database (`data/air_map.db` by
//! default) reached through `switchy_database`, so every query function
//! takes a `&dyn Database` and the HTTP layer injects the shared handle.
//! Tokens are HMAC-SHA256 signed payloads with an embedded expiry: access
//! tokens are short-lived and carried as bearer headers, refresh tokens
//! are long-lived, stored server-side, and rotated on every refresh.

pub mod password;
pub mod requests;
pub mod tags;
pub mod token;
pub mod users;

use std::path::Path;

use switchy_database::Database;
use switchy_database_connection::init_sqlite_rusqlite;
use thiserror::Error;

/// Default path for the accounts database.
pub const DEFAULT_DB_PATH: &str = "data/air_map.db";

/// Errors from account and token operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// A database query or command failed.
    #[error("Database error: {0}")]
    Database(String),

    /// Registration attempted with an email that already exists.
    #[error("User already exists")]
    UserExists,

    /// Email/password pair didn't match a user.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// No user with the requested UUID.
    #[error("User not found")]
    UserNotFound,

    /// A token failed signature or shape validation.
    #[error("Invalid token")]
    InvalidToken,

    /// A token was valid but past its expiry.
    #[error("Token expired")]
    ExpiredToken,

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Opens (or creates) the accounts `SQLite` database, ensures the schema
/// exists, and seeds the default tag taxonomy on first run.
///
/// # Errors
///
/// Returns [`AuthError`] if the database cannot be opened or schema
/// creation fails.
pub async fn open_db(path: &Path) -> Result<Box<dyn Database>, AuthError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db = init_sqlite_rusqlite(Some(path)).map_err(|e| AuthError::Database(e.to_string()))?;

    ensure_schema(db.as_ref()).await?;
    tags::seed_default_tags(db.as_ref()).await?;

    Ok(db)
}

/// Creates all tables if they don't already exist.
async fn ensure_schema(db: &dyn Database) -> Result<(), AuthError> {
    db.exec_raw(
        "CREATE TABLE IF NOT EXISTS users (
            uuid          TEXT PRIMARY KEY,
            email         TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            name          TEXT NOT NULL,
            surname       TEXT NOT NULL,
            birthdate     TEXT NOT NULL,
            zip_code      TEXT NOT NULL,
            created_at    TEXT NOT NULL
        )",
    )
    .await
    .map_err(|e| AuthError::Database(e.to_string()))?;

    db.exec_raw(
        "CREATE TABLE IF NOT EXISTS tags (
            tag_id   INTEGER PRIMARY KEY AUTOINCREMENT,
            tag_name TEXT NOT NULL,
            tag_type TEXT NOT NULL
        )",
    )
    .await
    .map_err(|e| AuthError::Database(e.to_string()))?;

    db.exec_raw(
        "CREATE TABLE IF NOT EXISTS user_tags (
            user_uuid TEXT NOT NULL REFERENCES users(uuid) ON DELETE CASCADE,
            tag_id    INTEGER NOT NULL REFERENCES tags(tag_id),
            UNIQUE(user_uuid, tag_id)
        )",
    )
    .await
    .map_err(|e| AuthError::Database(e.to_string()))?;

    db.exec_raw(
        "CREATE TABLE IF NOT EXISTS refresh_tokens (
            uuid       TEXT PRIMARY KEY,
            user_uuid  TEXT NOT NULL REFERENCES users(uuid) ON DELETE CASCADE,
            token      TEXT NOT NULL UNIQUE,
            expires_at TEXT NOT NULL,
            is_revoked INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        )",
    )
    .await
    .map_err(|e| AuthError::Database(e.to_string()))?;

    db.exec_raw(
        "CREATE TABLE IF NOT EXISTS req_history (
            req_id       INTEGER PRIMARY KEY AUTOINCREMENT,
            user_uuid    TEXT NOT NULL REFERENCES users(uuid) ON DELETE CASCADE,
            input_params TEXT NOT NULL,
            out_params   TEXT NOT NULL,
            created_at   TEXT NOT NULL,
            rating       INTEGER
        )",
    )
    .await
    .map_err(|e| AuthError::Database(e.to_string()))?;

    db.exec_raw(
        "CREATE TABLE IF NOT EXISTS req_tags (
            req_id INTEGER NOT NULL REFERENCES req_history(req_id) ON DELETE CASCADE,
            tag_id INTEGER NOT NULL REFERENCES tags(tag_id),
            UNIQUE(req_id, tag_id)
        )",
    )
    .await
    .map_err(|e| AuthError::Database(e.to_string()))?;

    db.exec_raw(
        "CREATE INDEX IF NOT EXISTS idx_user_tags_user ON user_tags (user_uuid)",
    )
    .await
    .map_err(|e| AuthError::Database(e.to_string()))?;

    db.exec_raw(
        "CREATE INDEX IF NOT EXISTS idx_refresh_tokens_user ON refresh_tokens (user_uuid)",
    )
    .await
    .map_err(|e| AuthError::Database(e.to_string()))?;

    // Enable foreign key enforcement (SQLite has it off by default)
    db.exec_raw("PRAGMA foreign_keys = ON")
        .await
        .map_err(|e| AuthError::Database(e.to_string()))?;

    Ok(())
}
