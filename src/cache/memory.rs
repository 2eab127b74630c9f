//! Memory Cache Module
//!
//! Process-wide TTL cache mapping request fingerprints to timestamped
//! provider responses. Avoids repeated identical upstream calls within one
//! process lifetime.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::Mutex;
use tracing::debug;

use crate::cache::Clock;

// == Cache Entry ==
/// A stored payload with the time it was written.
///
/// Entries are overwritten wholesale on refresh, never partially mutated.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Write time in Unix epoch seconds
    pub timestamp: u64,
    /// The cached payload
    pub value: Value,
}

// == Memory Cache ==
/// Lock-protected fingerprint → payload mapping with TTL staleness checks.
///
/// The mutex guards only the map lookup or write; callers perform network
/// calls outside the lock. Stale entries are not proactively evicted, they
/// are ignored at read time and eventually overwritten.
pub struct MemoryCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    ttl_secs: u64,
    clock: Arc<dyn Clock>,
}

impl MemoryCache {
    /// Creates a new MemoryCache with the given TTL and clock.
    pub fn new(ttl_secs: u64, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl_secs,
            clock,
        }
    }

    /// Returns the cached payload for `key` if it is younger than the TTL.
    pub async fn get(&self, key: &str) -> Option<Value> {
        let now = self.clock.now_secs();
        let entries = self.entries.lock().await;
        match entries.get(key) {
            Some(entry) if now.saturating_sub(entry.timestamp) < self.ttl_secs => {
                debug!(key, "memory cache hit");
                Some(entry.value.clone())
            }
            _ => None,
        }
    }

    /// Stores `value` under `key`, unconditionally overwriting any previous
    /// entry and stamping the current clock time.
    pub async fn put(&self, key: &str, value: Value) {
        let entry = CacheEntry {
            timestamp: self.clock.now_secs(),
            value,
        };
        let mut entries = self.entries.lock().await;
        entries.insert(key.to_string(), entry);
    }

    /// Current number of entries, stale ones included.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    /// Returns true if the cache holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

/// Builds a deterministic fingerprint for a search request: the operation
/// name plus the lower-cased, sorted ingredient list and the result count.
pub fn search_fingerprint(ingredients: &[String], count: u32) -> String {
    let mut normalized: Vec<String> = ingredients.iter().map(|i| i.to_lowercase()).collect();
    normalized.sort();
    format!("findByIngredients:{}:{}", normalized.join(","), count)
}

/// Builds a deterministic fingerprint for an information request.
pub fn information_fingerprint(id: i64, include_nutrition: bool) -> String {
    format!("information:{id}:nutrition={include_nutrition}")
}
