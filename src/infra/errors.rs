// src/infra/errors.rs — Error types for Oramind

use thiserror::Error;

#[derive(Error, Debug)]
pub enum OramindError {
    // Provider errors
    #[error("Provider '{provider}' has no API key configured")]
    Auth { provider: String },

    #[error("Rate limited by '{provider}': {message}")]
    RateLimited { provider: String, message: String },

    #[error("Provider '{provider}' error: {message}")]
    Provider { provider: String, message: String },

    #[error("Provider '{provider}' is unavailable: {reason}")]
    ProviderUnavailable { provider: String, reason: String },

    #[error("Unsupported provider '{0}'. Known providers: groq, gemini, ollama.")]
    UnsupportedProvider(String),

    // Orchestrator errors
    #[error("Malformed model response for {task}: {message}")]
    MalformedResponse { task: String, message: String },

    // Infra
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl OramindError {
    /// Whether the failure is backend throttling, so callers can message
    /// the user specifically about quota.
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, OramindError::RateLimited { .. })
    }
}
