//! Capacity- and TTL-bounded key guard
//!
//! Enforces at-most-one concurrent background enrichment per cache key.
//! This is the only shared mutable state in the engine; capacity and expiry
//! are explicit so the set can never grow without bound.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use tracing::debug;

use crate::config::GuardConfig;

struct GuardInner {
    entries: HashMap<String, Instant>,
}

/// Keyed guard with a fixed max entry count and fixed expiry
pub struct TtlGuard {
    max_entries: usize,
    ttl: Duration,
    inner: Mutex<GuardInner>,
}

impl TtlGuard {
    pub fn new(config: &GuardConfig) -> Self {
        Self {
            max_entries: config.max_entries.max(1),
            ttl: config.ttl(),
            inner: Mutex::new(GuardInner {
                entries: HashMap::new(),
            }),
        }
    }

    /// Try to acquire the key
    ///
    /// Returns true if the caller now holds the key and should proceed,
    /// false if another holder acquired it within the TTL.
    pub async fn try_acquire(&self, key: &str) -> bool {
        let mut inner = self.inner.lock().await;
        let now = Instant::now();

        // Prune expired entries on access
        inner.entries.retain(|_, acquired| now.duration_since(*acquired) < self.ttl);

        if inner.entries.contains_key(key) {
            debug!(%key, "TtlGuard::try_acquire: key held, rejecting");
            return false;
        }

        // Evict the oldest entry at capacity
        if inner.entries.len() >= self.max_entries {
            if let Some(oldest) = inner
                .entries
                .iter()
                .min_by_key(|(_, acquired)| **acquired)
                .map(|(k, _)| k.clone())
            {
                debug!(key = %oldest, "TtlGuard::try_acquire: at capacity, evicting oldest");
                inner.entries.remove(&oldest);
            }
        }

        inner.entries.insert(key.to_string(), now);
        true
    }

    /// Release the key early (before its TTL elapses)
    pub async fn release(&self, key: &str) {
        let mut inner = self.inner.lock().await;
        inner.entries.remove(key);
    }

    /// Current tracked key count (after pruning)
    pub async fn len(&self) -> usize {
        let mut inner = self.inner.lock().await;
        let now = Instant::now();
        inner.entries.retain(|_, acquired| now.duration_since(*acquired) < self.ttl);
        inner.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
