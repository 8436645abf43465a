//! Invalidation hooks for tenant and domain lifecycle events.
//!
//! Each hook translates one mutation into cache-key deletions. Hooks are
//! delete-only: a mutation never rewrites a cache entry, it removes the
//! entry so the next resolve repopulates from the store.
//!
//! Invalidation is keyed by the domain string, not the tenant's internal
//! id, because that is how the resolver indexes its entries. A tenant
//! mutation must fan out across all of the tenant's domains, since any of
//! them could currently serve a stale snapshot.

use std::sync::Arc;

use tenantry_core::{CacheError, Domain};
use tenantry_storage::{CacheBackend, DomainCacheKey};

/// Observers for the lifecycle of tenants and their domain records.
///
/// A failed delete is surfaced to the caller of the triggering mutation:
/// a successful mutation with a failed invalidation is the unsafe state
/// this layer refuses to produce silently.
pub struct InvalidationHooks<C: CacheBackend> {
    cache: Arc<C>,
}

impl<C: CacheBackend> InvalidationHooks<C> {
    /// Create hooks over a cache backend.
    pub fn new(cache: Arc<C>) -> Self {
        Self { cache }
    }

    /// Tenant attributes were updated: forget every domain the tenant
    /// currently owns.
    pub fn tenant_updated(&self, domains: &[Domain]) -> Result<(), CacheError> {
        self.forget_all(domains)
    }

    /// Tenant was deleted: forget every domain it owned, captured by the
    /// caller before the rows went away.
    pub fn tenant_deleted(&self, domains: &[Domain]) -> Result<(), CacheError> {
        self.forget_all(domains)
    }

    /// A domain record was created.
    ///
    /// Nothing can be cached under the brand-new key, so it is not
    /// touched. The tenant's pre-existing domains are forgotten because
    /// the tenant's key set changed and their snapshots may be stale.
    pub fn domain_created(&self, created: &Domain, siblings: &[Domain]) -> Result<(), CacheError> {
        for sibling in siblings {
            if sibling.domain_id != created.domain_id {
                self.forget(&sibling.domain)?;
            }
        }
        Ok(())
    }

    /// A domain record's string key changed: forget the old value. The
    /// new value has never been cached.
    pub fn domain_renamed(&self, old_domain: &str) -> Result<(), CacheError> {
        self.forget(old_domain)
    }

    /// A domain record was deleted: forget its key.
    pub fn domain_deleted(&self, domain: &Domain) -> Result<(), CacheError> {
        self.forget(&domain.domain)
    }

    fn forget(&self, domain: &str) -> Result<(), CacheError> {
        self.cache.forget(&DomainCacheKey::derive(domain))
    }

    fn forget_all(&self, domains: &[Domain]) -> Result<(), CacheError> {
        for record in domains {
            self.forget(&record.domain)?;
        }
        Ok(())
    }
}

impl<C: CacheBackend> Clone for InvalidationHooks<C> {
    fn clone(&self) -> Self {
        Self {
            cache: Arc::clone(&self.cache),
        }
    }
}
