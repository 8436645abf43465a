//! Cache backend trait and in-memory implementation.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use chrono::Utc;
use tenantry_core::{CacheError, CacheTtl, Timestamp};

use super::key::DomainCacheKey;

/// Cache backend for pluggable cache implementations.
///
/// Abstracts over local-process or shared caches (e.g. in-memory, Redis).
/// Implementations provide atomic per-key get/put/forget and must be safe
/// for concurrent use. Values are opaque serialized snapshots.
pub trait CacheBackend: Send + Sync {
    /// Get the cached value for a key, or `None` if absent or expired.
    fn get(&self, key: &DomainCacheKey) -> Result<Option<Vec<u8>>, CacheError>;

    /// Store a value under a key with the given TTL, replacing any
    /// previous value.
    fn put(&self, key: &DomainCacheKey, value: &[u8], ttl: CacheTtl) -> Result<(), CacheError>;

    /// Delete the entry for a key. Deleting an absent key succeeds.
    fn forget(&self, key: &DomainCacheKey) -> Result<(), CacheError>;
}

/// Statistics about cache usage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of cache hits.
    pub hits: u64,
    /// Number of cache misses.
    pub misses: u64,
    /// Number of entries currently in cache.
    pub entry_count: u64,
}

impl CacheStats {
    /// Calculate the hit rate (0.0 to 1.0).
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: Vec<u8>,
    /// `None` means cache-forever.
    expires_at: Option<Timestamp>,
}

impl CacheEntry {
    fn is_expired(&self, now: Timestamp) -> bool {
        matches!(self.expires_at, Some(at) if at <= now)
    }
}

/// In-memory cache backend with lazy expiry.
///
/// Expired entries are dropped on the next `get` that touches them; there
/// is no sweeper task. TTL expiry is a resource policy only - correctness
/// comes from explicit `forget` calls on entity mutation.
#[derive(Debug, Default)]
pub struct InMemoryCacheBackend {
    entries: RwLock<HashMap<String, CacheEntry>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl InMemoryCacheBackend {
    /// Create a new empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entries (expired entries may still be counted until
    /// they are touched).
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    /// Whether the backend holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a non-expired entry exists for the key, without touching
    /// the hit/miss counters.
    pub fn contains(&self, key: &DomainCacheKey) -> bool {
        self.entries
            .read()
            .map(|entries| {
                entries
                    .get(key.as_str())
                    .map(|entry| !entry.is_expired(Utc::now()))
                    .unwrap_or(false)
            })
            .unwrap_or(false)
    }

    /// Get cache statistics.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::SeqCst),
            misses: self.misses.load(Ordering::SeqCst),
            entry_count: self.len() as u64,
        }
    }
}

impl CacheBackend for InMemoryCacheBackend {
    fn get(&self, key: &DomainCacheKey) -> Result<Option<Vec<u8>>, CacheError> {
        let mut entries = self.entries.write().map_err(|_| CacheError::Unavailable {
            reason: "cache lock poisoned".to_string(),
        })?;

        let now = Utc::now();
        match entries.get(key.as_str()) {
            Some(entry) if entry.is_expired(now) => {
                entries.remove(key.as_str());
                self.misses.fetch_add(1, Ordering::SeqCst);
                Ok(None)
            }
            Some(entry) => {
                self.hits.fetch_add(1, Ordering::SeqCst);
                Ok(Some(entry.value.clone()))
            }
            None => {
                self.misses.fetch_add(1, Ordering::SeqCst);
                Ok(None)
            }
        }
    }

    fn put(&self, key: &DomainCacheKey, value: &[u8], ttl: CacheTtl) -> Result<(), CacheError> {
        let mut entries = self.entries.write().map_err(|_| CacheError::Unavailable {
            reason: "cache lock poisoned".to_string(),
        })?;
        entries.insert(
            key.as_str().to_string(),
            CacheEntry {
                value: value.to_vec(),
                expires_at: ttl.expires_at(Utc::now()),
            },
        );
        Ok(())
    }

    fn forget(&self, key: &DomainCacheKey) -> Result<(), CacheError> {
        let mut entries = self.entries.write().map_err(|_| CacheError::Unavailable {
            reason: "cache lock poisoned".to_string(),
        })?;
        entries.remove(key.as_str());
        Ok(())
    }
}
