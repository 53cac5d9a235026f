//! Process-wide response cache.

use dashmap::DashMap;
use std::sync::Arc;

use crate::observability::metrics;

/// A thread-safe map from raw query term to a ready-to-serve body.
///
/// Cloning is cheap and every clone sees the same entries. There is no
/// expiry and no eviction: entries live until the last handle is dropped.
#[derive(Clone, Default)]
pub struct ResponseCache {
    inner: Arc<DashMap<String, String>>,
}

impl ResponseCache {
    /// Create a new empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the cached body for a term.
    pub fn lookup(&self, term: &str) -> Option<String> {
        self.inner.get(term).map(|r| r.value().clone())
    }

    /// Store a body for a term, replacing any previous entry.
    pub fn store(&self, term: &str, body: String) {
        self.inner.insert(term.to_string(), body);
        metrics::record_cache_size(self.inner.len());
    }

    /// Number of cached terms.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
