//! Google Gemini provider implementation.

use serde::{Deserialize, Serialize};

use super::TextProvider;
use crate::AiError;

/// Default Gemini model.
const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Gemini API provider.
pub struct GeminiProvider {
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl GeminiProvider {
    /// Creates a new Gemini provider with the default model.
    #[must_use]
    pub fn new(api_key: String) -> Self {
        Self::with_model(api_key, DEFAULT_MODEL.to_string())
    }

    /// Creates a new Gemini provider for a specific model.
    #[must_use]
    pub fn with_model(api_key: String, model: String) -> Self {
        Self {
            api_key,
            model,
            client: reqwest::Client::new(),
        }
    }
}

#[derive(Serialize)]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
}

#[derive(Serialize)]
struct GeminiContent<'a> {
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<GeminiCandidate>>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiResponseContent>,
}

#[derive(Deserialize)]
struct GeminiResponseContent {
    parts: Option<Vec<GeminiResponsePart>>,
}

#[derive(Deserialize)]
struct GeminiResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct GeminiError {
    error: GeminiErrorDetail,
}

#[derive(Deserialize)]
struct GeminiErrorDetail {
    message: String,
}

#[async_trait::async_trait]
impl TextProvider for GeminiProvider {
    async fn generate(&self, prompt: &str) -> Result<String, AiError> {
        let request = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart { text: prompt }],
            }],
        };

        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent",
            self.model
        );

        let resp = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            let err: GeminiError = serde_json::from_str(&body).unwrap_or_else(|_| GeminiError {
                error: GeminiErrorDetail {
                    message: format!("HTTP {status}: {body}"),
                },
            });
            return Err(AiError::Provider {
                message: err.error.message,
            });
        }

        let response: GeminiResponse = serde_json::from_str(&body)?;

        let text: String = response
            .candidates
            .unwrap_or_default()
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .and_then(|content| content.parts)
            .map(|parts| {
                parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        Ok(text)
    }
}
