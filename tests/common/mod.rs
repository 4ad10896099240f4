// tests/common/mod.rs — Shared mock provider for integration tests
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use oramind::infra::errors::OramindError;
use oramind::provider::TextProvider;

type Responder = Box<dyn Fn(&str) -> Result<String, OramindError> + Send + Sync>;

/// A provider that returns canned responses without making any network calls,
/// counting how often it is hit.
pub struct MockProvider {
    calls: AtomicUsize,
    respond: Responder,
}

impl MockProvider {
    /// Same reply for every prompt.
    pub fn replying(text: &str) -> Arc<Self> {
        let text = text.to_string();
        Self::with(move |_| Ok(text.clone()))
    }

    /// Custom prompt-dependent behavior.
    pub fn with(
        f: impl Fn(&str) -> Result<String, OramindError> + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            respond: Box::new(f),
        })
    }

    /// Every call fails with a throttling error.
    pub fn rate_limited() -> Arc<Self> {
        Self::with(|_| {
            Err(OramindError::RateLimited {
                provider: "mock".into(),
                message: "429".into(),
            })
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextProvider for MockProvider {
    fn id(&self) -> &str {
        "mock"
    }

    fn name(&self) -> &str {
        "Mock Provider"
    }

    async fn send(&self, prompt: &str) -> Result<String, OramindError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        (self.respond)(prompt)
    }
}
