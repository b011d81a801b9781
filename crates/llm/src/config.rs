//! Generation service configuration.

use std::time::Duration;

/// Default Gemini model.
const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Default Gemini REST base URL.
const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com";

/// Default per-call timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the Gemini text-generation client.
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    /// API key sent in the `x-goog-api-key` header.
    pub api_key: String,
    /// Model identifier, e.g. `gemini-1.5-flash`.
    pub model: String,
    /// Base URL of the REST API (overridable for proxies).
    pub api_url: String,
    /// Upper bound on a single generation call.
    pub timeout: Duration,
}

impl GenerationConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `GEMINI_API_KEY` is unset or empty, which is how the
    /// rest of the system learns that the generation service is not
    /// configured.
    ///
    /// | Variable              | Required | Default                                      |
    /// |-----------------------|----------|----------------------------------------------|
    /// | `GEMINI_API_KEY`      | yes      | --                                           |
    /// | `GEMINI_MODEL`        | no       | `gemini-1.5-flash`                           |
    /// | `GEMINI_API_URL`      | no       | `https://generativelanguage.googleapis.com`  |
    /// | `GEMINI_TIMEOUT_SECS` | no       | `30`                                         |
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())?;

        Some(Self {
            api_key,
            model: std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            api_url: std::env::var("GEMINI_API_URL")
                .unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            timeout: Duration::from_secs(
                std::env::var("GEMINI_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
        })
    }

    /// Configuration with defaults for everything except the key.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}
