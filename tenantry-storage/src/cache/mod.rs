//! Cache backend seam and key derivation.
//!
//! The backend is a plain key->bytes store with TTL/forever semantics and
//! explicit delete-by-key. Consistency is achieved entirely through the
//! invalidate-on-write discipline of the resolver layer, never through
//! locks or transactions here.

pub mod backend;
pub mod key;

pub use backend::{CacheBackend, CacheStats, InMemoryCacheBackend};
pub use key::DomainCacheKey;
