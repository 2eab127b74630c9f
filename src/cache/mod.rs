//! Cache Module
//!
//! Two independent best-effort cache tiers:
//! - [`MemoryCache`]: process-wide TTL cache for raw provider responses
//! - [`FileCache`]: directory-backed TTL cache for enriched recommendation lists
//!
//! The tiers own their entries independently; there is no cross-invalidation
//! and no expiry beyond the TTL checks performed at read time.

mod file;
mod memory;

pub use file::FileCache;
pub use memory::{information_fingerprint, search_fingerprint, CacheEntry, MemoryCache};

use std::time::{SystemTime, UNIX_EPOCH};

// == Clock ==
/// Source of "now" in epoch seconds.
///
/// Injected into the memory cache so TTL behavior can be tested with a
/// controllable clock instead of sleeping.
pub trait Clock: Send + Sync {
    /// Current Unix timestamp in seconds.
    fn now_secs(&self) -> u64;
}

/// Clock backed by the system time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_secs(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}
