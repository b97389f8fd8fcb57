#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Generative-AI recommendations with LLM provider abstraction.
//!
//! The recommendation endpoint asks an LLM for a structured environmental
//! health recommendation: the prompt carries the current pollutant figures
//! and the user's preference/risk tags, and instructs the model to answer
//! in strict JSON. Providers are swappable behind the [`providers::TextProvider`]
//! trait; Gemini is the one configured in production.

pub mod providers;
pub mod recommend;

use thiserror::Error;

/// Errors that can occur during AI operations.
#[derive(Debug, Error)]
pub enum AiError {
    /// HTTP request to the LLM provider failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Provider-specific error.
    #[error("Provider error: {message}")]
    Provider {
        /// Description of what went wrong.
        message: String,
    },
}
