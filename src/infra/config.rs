// src/infra/config.rs — Configuration loading (TOML)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::infra::errors::OramindError;
use crate::infra::paths;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineSettings,

    #[serde(default)]
    pub data: DataSettings,

    #[serde(default)]
    pub api: ApiSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Active provider identifier: "groq", "gemini" or "ollama".
    pub provider: String,
    pub groq_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
    pub ollama_model: String,
    pub ollama_base_url: String,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            provider: "groq".into(),
            groq_api_key: None,
            gemini_api_key: None,
            ollama_model: "phi3:mini".into(),
            ollama_base_url: "http://localhost:11434".into(),
        }
    }
}

impl EngineSettings {
    /// Credential for the given provider, config value first, environment second.
    /// The original extraction tooling used both GROK_API_KEY and GROQ_API_KEY
    /// spellings, so both are honored.
    pub fn api_key_for(&self, provider: &str) -> Option<String> {
        match provider {
            "groq" => self
                .groq_api_key
                .clone()
                .or_else(|| std::env::var("GROQ_API_KEY").ok())
                .or_else(|| std::env::var("GROK_API_KEY").ok()),
            "gemini" => self
                .gemini_api_key
                .clone()
                .or_else(|| std::env::var("GEMINI_API_KEY").ok())
                .or_else(|| std::env::var("GOOGLE_API_KEY").ok()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataSettings {
    /// Directory holding extraction snapshots (users.csv, roles.csv, privs.csv),
    /// synthetic logs and audit caches. Defaults to the platform data dir.
    pub dir: Option<PathBuf>,
}

impl DataSettings {
    pub fn resolve(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(paths::data_dir)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    pub port: u16,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self { port: 8000 }
    }
}

impl Config {
    /// Load from the default location, falling back to defaults if absent.
    pub fn load() -> Result<Self, OramindError> {
        let path = paths::config_file();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, OramindError> {
        let raw = std::fs::read_to_string(path)?;
        toml::from_str(&raw).map_err(|e| OramindError::Config(format!("{}: {e}", path.display())))
    }
}
