//! Reloadable cache for normalized invocation payloads.
//!
//! Explicitly owned and explicitly refreshed: the cache is a plain object
//! passed by handle to whoever needs it, with no process-wide lifetime and
//! no implicit reloading. Entries expire after a TTL; `refresh` evicts a
//! method's entry so the next lookup misses and the owner re-invokes.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use serde_json::Value;

struct CacheEntry {
    data: Value,
    cached_at: Instant,
}

/// TTL-bounded cache of reply payloads keyed by method name.
pub struct ResponseCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl ResponseCache {
    /// Create a cache with a default TTL of five minutes.
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl: Duration::from_secs(300),
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Get a cached payload if present and unexpired.
    pub fn get(&self, method: &str) -> Option<Value> {
        let mut entries = self.entries.lock().unwrap();
        match entries.get(method) {
            Some(entry) if entry.cached_at.elapsed() < self.ttl => Some(entry.data.clone()),
            Some(_) => {
                entries.remove(method);
                None
            }
            None => None,
        }
    }

    pub fn store(&self, method: &str, data: Value) {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(
            method.to_string(),
            CacheEntry {
                data,
                cached_at: Instant::now(),
            },
        );
    }

    /// Evict one method's entry; the next `get` misses.
    pub fn refresh(&self, method: &str) {
        self.entries.lock().unwrap().remove(method);
    }

    pub fn clear(&self) {
        self.entries.lock().unwrap().clear();
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new()
    }
}
