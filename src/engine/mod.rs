// src/engine/mod.rs — LLM engine facade and process-wide registry

pub mod cache;
pub mod prompt;

use std::sync::{Arc, RwLock};

use crate::infra::config::EngineSettings;
use crate::infra::errors::OramindError;
use crate::provider::{build_provider, ProviderKind, TextProvider};

use cache::ResponseCache;

/// Facade over one configured provider plus its response cache.
///
/// Immutable once constructed; switching providers means constructing a new
/// Engine (with an empty cache) and installing it in the registry.
pub struct Engine {
    kind: ProviderKind,
    provider: Arc<dyn TextProvider>,
    cache: ResponseCache,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Construct from configuration. Fails with `UnsupportedProvider` when the
    /// identifier matches no known backend — never silently defaults.
    pub fn from_settings(settings: &EngineSettings) -> Result<Self, OramindError> {
        let kind: ProviderKind = settings.provider.parse()?;
        Ok(Self {
            kind,
            provider: build_provider(kind, settings),
            cache: ResponseCache::new(),
        })
    }

    /// Construct around an explicit adapter. Used by tests and anywhere a
    /// non-standard backend needs to be injected.
    pub fn with_provider(kind: ProviderKind, provider: Arc<dyn TextProvider>) -> Self {
        Self {
            kind,
            provider,
            cache: ResponseCache::new(),
        }
    }

    pub fn provider_kind(&self) -> ProviderKind {
        self.kind
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Compose, consult the cache, dispatch to the adapter.
    ///
    /// Identical full prompt text returns the stored text with no network
    /// call. Adapter errors propagate unchanged so orchestrators can apply
    /// their own fallback policy.
    pub async fn generate(
        &self,
        instruction: &str,
        context: Option<&str>,
        user_context: Option<&str>,
    ) -> Result<String, OramindError> {
        let full_prompt = prompt::compose(instruction, context, user_context);

        if let Some(hit) = self.cache.get(&full_prompt) {
            tracing::debug!(provider = %self.kind, "response cache hit");
            return Ok(hit);
        }

        let response = self.provider.send(&full_prompt).await?;
        self.cache.insert(full_prompt, response.clone());
        Ok(response)
    }
}

/// Single-owner registry for the live engine.
///
/// Replaces ambient global state: handlers hold the registry, orchestrator
/// invocations capture `current()` at call time. `install` is atomic and
/// last-writer-wins; in-flight calls complete against whichever engine they
/// captured.
pub struct EngineRegistry {
    current: RwLock<Arc<Engine>>,
}

impl EngineRegistry {
    pub fn new(engine: Engine) -> Self {
        Self {
            current: RwLock::new(Arc::new(engine)),
        }
    }

    pub fn current(&self) -> Arc<Engine> {
        self.current.read().expect("engine registry poisoned").clone()
    }

    pub fn install(&self, engine: Engine) -> Arc<Engine> {
        let engine = Arc::new(engine);
        *self.current.write().expect("engine registry poisoned") = engine.clone();
        tracing::info!(provider = %engine.provider_kind(), "engine installed");
        engine
    }
}
