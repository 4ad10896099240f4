// src/engine/cache.rs — Process-lifetime response memo

use std::collections::HashMap;
use std::sync::Mutex;

/// Memoizes generated text against the exact composed prompt.
///
/// No eviction, TTL or size bound — lifetime is bounded by the owning Engine
/// instance, which is replaced wholesale on provider swap. The lock covers
/// single lookups/inserts only and is never held across an await, so two
/// concurrent misses on the same prompt may both reach the provider.
#[derive(Default)]
pub struct ResponseCache {
    entries: Mutex<HashMap<String, String>>,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, prompt: &str) -> Option<String> {
        self.entries
            .lock()
            .expect("response cache poisoned")
            .get(prompt)
            .cloned()
    }

    pub fn insert(&self, prompt: String, response: String) {
        self.entries
            .lock()
            .expect("response cache poisoned")
            .insert(prompt, response);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().expect("response cache poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
