//! The generation seam shared by real and scripted clients.

use async_trait::async_trait;

/// One prompt addressed to one model. Built per call, never reused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub model: String,
}

/// Errors from a text-generation backend.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service returned a non-2xx status code.
    #[error("Generation API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The service answered but produced no candidate text.
    #[error("Generation API returned no text")]
    EmptyResponse,

    /// The backend could not serve the request for another reason.
    #[error("Generation backend unavailable: {0}")]
    Unavailable(String),
}

/// Something that turns a prompt into raw model text.
///
/// Implementations must be shareable across concurrent requests.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a completion for `prompt`, returning the model's raw text.
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}
