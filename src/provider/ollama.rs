// src/provider/ollama.rs — Ollama local model provider

use std::time::Instant;

use async_trait::async_trait;

use super::TextProvider;
use crate::infra::errors::OramindError;

const TEMPERATURE: f32 = 0.3;
const NUM_CTX: u32 = 4096;
const TIMEOUT: std::time::Duration = std::time::Duration::from_secs(60);

pub struct OllamaProvider {
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl OllamaProvider {
    pub fn new(model: String, base_url: Option<String>) -> Self {
        Self {
            model,
            base_url: base_url.unwrap_or_else(|| "http://localhost:11434".into()),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl TextProvider for OllamaProvider {
    fn id(&self) -> &str {
        "ollama"
    }

    fn name(&self) -> &str {
        "Ollama"
    }

    /// Transport failures come back as an inline human-readable string rather
    /// than an error, so offline batch jobs keep running without a local server.
    async fn send(&self, prompt_text: &str) -> Result<String, OramindError> {
        let body = serde_json::json!({
            "model": self.model,
            "prompt": prompt_text,
            "stream": false,
            "options": { "temperature": TEMPERATURE, "num_ctx": NUM_CTX },
        });

        let start = Instant::now();
        let response = match self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&body)
            .timeout(TIMEOUT)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(provider = "ollama", "transport failure: {e}");
                return Ok(format!(
                    "Ollama error: {e}. Check that 'ollama serve' is running."
                ));
            }
        };

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Ok(format!(
                "Ollama error: HTTP {status}: {error_body}. Check that 'ollama serve' is running."
            ));
        }

        let resp: serde_json::Value = match response.json().await {
            Ok(v) => v,
            Err(e) => {
                return Ok(format!(
                    "Ollama error: invalid response: {e}. Check that 'ollama serve' is running."
                ));
            }
        };

        let content = resp["response"].as_str().unwrap_or("").trim().to_string();

        tracing::info!(
            provider = "ollama",
            model = %self.model,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "generation completed"
        );

        Ok(content)
    }
}
