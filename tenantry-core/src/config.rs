//! Resolver configuration and cache TTL policy.

use crate::entities::Timestamp;
use serde::{Deserialize, Serialize};

/// Time-to-live policy for cached tenant snapshots.
///
/// `Forever` is the sentinel meaning no expiry; invalidation is the sole
/// correctness mechanism regardless of the TTL value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CacheTtl {
    /// Never expires.
    Forever,
    /// Expires after the specified duration in milliseconds.
    Duration(i64),
}

impl CacheTtl {
    /// Compute the expiry instant for an entry cached at `from`.
    ///
    /// Returns `None` for `Forever`.
    pub fn expires_at(&self, from: Timestamp) -> Option<Timestamp> {
        match self {
            Self::Forever => None,
            Self::Duration(ms) => Some(from + chrono::Duration::milliseconds(*ms)),
        }
    }
}

/// Configuration for the cached tenant resolver.
///
/// An explicit field passed at construction, not shared mutable process
/// state; tests inject the value they need per case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Whether resolve consults and populates the cache.
    pub caching_enabled: bool,
    /// TTL for cached snapshots.
    pub ttl: CacheTtl,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            caching_enabled: false,
            ttl: CacheTtl::Forever,
        }
    }
}

impl ResolverConfig {
    /// Create a new resolver config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable caching.
    pub fn with_caching(mut self, enabled: bool) -> Self {
        self.caching_enabled = enabled;
        self
    }

    /// Set the snapshot TTL.
    pub fn with_ttl(mut self, ttl: CacheTtl) -> Self {
        self.ttl = ttl;
        self
    }
}
