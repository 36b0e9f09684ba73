//! Metadata cache
//!
//! Entity definitions and enums change rarely, so they are kept for a fixed
//! time. Writes do not invalidate entries; a stale read until the TTL runs
//! out is accepted. Callers that know an entry changed can drop it.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use gsb_core::GsbResult;
use tracing::debug;

/// Default lifetime of cached entries
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    stored_at: Instant,
}

/// Concurrent TTL cache shared by cloned clients
#[derive(Debug, Clone)]
pub struct GsbCacheService<V> {
    entries: Arc<DashMap<String, CacheEntry<V>>>,
    ttl: Duration,
}

impl<V: Clone> Default for GsbCacheService<V> {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl<V: Clone> GsbCacheService<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Fresh value for a key; expired entries are evicted on read
    pub fn get(&self, key: &str) -> Option<V> {
        {
            let entry = self.entries.get(key)?;
            if entry.stored_at.elapsed() < self.ttl {
                return Some(entry.value.clone());
            }
        }

        self.entries.remove(key);
        debug!(key, "Cache entry expired");
        None
    }

    pub fn insert(&self, key: impl Into<String>, value: V) {
        self.entries.insert(
            key.into(),
            CacheEntry {
                value,
                stored_at: Instant::now(),
            },
        );
    }

    /// Cached value, or the loader's result stored under the key
    ///
    /// Failures are returned and not cached. Concurrent misses may each call
    /// the loader; the last result wins.
    pub async fn get_or_try_load<F, Fut>(&self, key: &str, load: F) -> GsbResult<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = GsbResult<V>>,
    {
        if let Some(value) = self.get(key) {
            debug!(key, "Cache hit");
            return Ok(value);
        }

        let value = load().await?;
        self.insert(key, value.clone());
        Ok(value)
    }

    /// Drop one entry, returning whether it was present
    pub fn invalidate(&self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Drop every expired entry, returning how many were removed
    pub fn purge_expired(&self) -> usize {
        let before = self.entries.len();
        let ttl = self.ttl;
        self.entries.retain(|_, entry| entry.stored_at.elapsed() < ttl);
        before - self.entries.len()
    }

    /// Number of stored entries, expired ones included
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
