//! LLM provider abstraction.

mod gemini;

pub use gemini::GeminiProvider;

use crate::AiError;

/// A text-in, text-out generative model.
///
/// The recommendation flow needs nothing richer: it submits one prompt and
/// receives the model's text response.
#[async_trait::async_trait]
pub trait TextProvider: Send + Sync {
    /// Submits `prompt` and returns the model's text response.
    async fn generate(&self, prompt: &str) -> Result<String, AiError>;
}
