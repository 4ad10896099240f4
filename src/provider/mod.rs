// src/provider/mod.rs — Text-generation provider layer

pub mod gemini;
pub mod groq;
pub mod ollama;

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::infra::config::EngineSettings;
use crate::infra::errors::OramindError;

/// Core trait that all generation backends implement.
///
/// `send` takes the fully composed prompt and returns the normalized text
/// output. Retry policy, if any, belongs to the orchestrators above.
#[async_trait]
pub trait TextProvider: Send + Sync {
    fn id(&self) -> &str;
    fn name(&self) -> &str;

    async fn send(&self, prompt: &str) -> Result<String, OramindError>;
}

/// Closed set of interchangeable backends, selected once at engine construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Hosted fast-inference API (Groq, OpenAI-compatible chat completions).
    Groq,
    /// Hosted multimodal API (Google Gemini).
    Gemini,
    /// Local model server (Ollama).
    Ollama,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Groq => "groq",
            ProviderKind::Gemini => "gemini",
            ProviderKind::Ollama => "ollama",
        }
    }
}

impl FromStr for ProviderKind {
    type Err = OramindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "groq" => Ok(ProviderKind::Groq),
            "gemini" => Ok(ProviderKind::Gemini),
            "ollama" => Ok(ProviderKind::Ollama),
            other => Err(OramindError::UnsupportedProvider(other.to_string())),
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build the adapter for the configured provider kind.
pub fn build_provider(
    kind: ProviderKind,
    settings: &EngineSettings,
) -> Arc<dyn TextProvider> {
    match kind {
        ProviderKind::Groq => Arc::new(groq::GroqProvider::new(settings.api_key_for("groq"))),
        ProviderKind::Gemini => {
            Arc::new(gemini::GeminiProvider::new(settings.api_key_for("gemini")))
        }
        ProviderKind::Ollama => Arc::new(ollama::OllamaProvider::new(
            settings.ollama_model.clone(),
            Some(settings.ollama_base_url.clone()),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parse() {
        assert_eq!("groq".parse::<ProviderKind>().unwrap(), ProviderKind::Groq);
        assert_eq!(
            "GEMINI".parse::<ProviderKind>().unwrap(),
            ProviderKind::Gemini
        );
        assert_eq!(
            "ollama".parse::<ProviderKind>().unwrap(),
            ProviderKind::Ollama
        );
    }

    #[test]
    fn test_kind_parse_unknown_never_defaults() {
        let err = "mistral".parse::<ProviderKind>().unwrap_err();
        assert!(matches!(err, OramindError::UnsupportedProvider(ref p) if p == "mistral"));
    }

    #[test]
    fn test_kind_roundtrip() {
        for kind in [ProviderKind::Groq, ProviderKind::Gemini, ProviderKind::Ollama] {
            assert_eq!(kind.as_str().parse::<ProviderKind>().unwrap(), kind);
        }
    }
}
