// src/provider/gemini.rs — Google Gemini multimodal provider

use std::time::Instant;

use async_trait::async_trait;

use super::TextProvider;
use crate::infra::errors::OramindError;

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const MODEL: &str = "gemini-2.5-flash";
const TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

/// Single plain-text `generateContent` call, no role splitting.
///
/// Without a credential the client stays uninitialized and every call fails
/// with `ProviderUnavailable`, mirroring how an absent client library behaves.
pub struct GeminiProvider {
    client: Option<GeminiClient>,
}

struct GeminiClient {
    api_key: String,
    http: reqwest::Client,
}

impl GeminiProvider {
    pub fn new(api_key: Option<String>) -> Self {
        let client = match api_key {
            Some(key) => Some(GeminiClient {
                api_key: key,
                http: reqwest::Client::new(),
            }),
            None => {
                tracing::warn!("Gemini API key missing; provider will be inert.");
                None
            }
        };
        Self { client }
    }
}

#[async_trait]
impl TextProvider for GeminiProvider {
    fn id(&self) -> &str {
        "gemini"
    }

    fn name(&self) -> &str {
        "Gemini"
    }

    async fn send(&self, prompt_text: &str) -> Result<String, OramindError> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| OramindError::ProviderUnavailable {
                provider: "gemini".into(),
                reason: "client not initialized (missing API key)".into(),
            })?;

        let url = format!(
            "{BASE_URL}/models/{MODEL}:generateContent?key={}",
            client.api_key
        );

        let body = serde_json::json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt_text }],
            }],
        });

        let start = Instant::now();
        let response = client
            .http
            .post(&url)
            .json(&body)
            .timeout(TIMEOUT)
            .send()
            .await
            .map_err(|e| OramindError::Provider {
                provider: "gemini".into(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                return Err(OramindError::RateLimited {
                    provider: "gemini".into(),
                    message: error_body,
                });
            }
            return Err(OramindError::Provider {
                provider: "gemini".into(),
                message: format!("HTTP {status}: {error_body}"),
            });
        }

        let resp: serde_json::Value =
            response.json().await.map_err(|e| OramindError::Provider {
                provider: "gemini".into(),
                message: format!("Failed to parse response: {e}"),
            })?;

        let content = resp["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .unwrap_or("")
            .trim()
            .to_string();

        tracing::info!(
            provider = "gemini",
            model = MODEL,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "generation completed"
        );

        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_send_without_key_is_unavailable() {
        let p = GeminiProvider::new(None);
        let err = p.send("hello").await.unwrap_err();
        assert!(matches!(
            err,
            OramindError::ProviderUnavailable { ref provider, .. } if provider == "gemini"
        ));
    }
}
