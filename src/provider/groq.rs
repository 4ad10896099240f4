// src/provider/groq.rs — Groq fast-inference provider (OpenAI-compatible)

use std::time::Instant;

use async_trait::async_trait;

use super::TextProvider;
use crate::engine::prompt;
use crate::infra::errors::OramindError;

const API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
const MODEL: &str = "llama-3.3-70b-versatile";
const TEMPERATURE: f32 = 0.3;
const TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

pub struct GroqProvider {
    api_key: Option<String>,
    client: reqwest::Client,
}

impl GroqProvider {
    /// A missing credential is reported once here; generation attempts still
    /// proceed and fail at call time.
    pub fn new(api_key: Option<String>) -> Self {
        if api_key.is_none() {
            tracing::warn!("Groq API key missing. Set GROQ_API_KEY or [engine].groq_api_key.");
        }
        Self {
            api_key,
            client: reqwest::Client::new(),
        }
    }

    /// Split the composed prompt into chat messages. A leading context
    /// preamble goes to the system role for better answer quality; the rest
    /// is the user turn.
    fn build_messages(prompt_text: &str) -> Vec<serde_json::Value> {
        match prompt::split_roles(prompt_text) {
            Some((system, user)) => vec![
                serde_json::json!({"role": "system", "content": system}),
                serde_json::json!({"role": "user", "content": user}),
            ],
            None => vec![serde_json::json!({"role": "user", "content": prompt_text})],
        }
    }
}

#[async_trait]
impl TextProvider for GroqProvider {
    fn id(&self) -> &str {
        "groq"
    }

    fn name(&self) -> &str {
        "Groq"
    }

    async fn send(&self, prompt_text: &str) -> Result<String, OramindError> {
        let api_key = self.api_key.as_ref().ok_or_else(|| OramindError::Auth {
            provider: "groq".into(),
        })?;

        let body = serde_json::json!({
            "model": MODEL,
            "messages": Self::build_messages(prompt_text),
            "temperature": TEMPERATURE,
        });

        let start = Instant::now();
        let response = self
            .client
            .post(API_URL)
            .header("Authorization", format!("Bearer {api_key}"))
            .json(&body)
            .timeout(TIMEOUT)
            .send()
            .await
            .map_err(|e| OramindError::Provider {
                provider: "groq".into(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                return Err(OramindError::RateLimited {
                    provider: "groq".into(),
                    message: error_body,
                });
            }
            return Err(OramindError::Provider {
                provider: "groq".into(),
                message: format!("HTTP {status}: {error_body}"),
            });
        }

        let resp: serde_json::Value =
            response.json().await.map_err(|e| OramindError::Provider {
                provider: "groq".into(),
                message: format!("Failed to parse response: {e}"),
            })?;

        let content = resp["choices"][0]["message"]["content"]
            .as_str()
            .unwrap_or("")
            .trim()
            .to_string();

        tracing::info!(
            provider = "groq",
            model = MODEL,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "generation completed"
        );

        Ok(content)
    }
}
