//! Cached domain-to-tenant resolver.

use std::sync::Arc;

use tenantry_core::{ResolveError, ResolverConfig, Tenant};
use tenantry_storage::{CacheBackend, DomainCacheKey, TenantStore};

/// Resolves a domain string to its tenant, caching snapshots on miss.
///
/// Cache-aside: the resolver checks the cache, and on miss populates it
/// from the store. Negative results are never cached, so a not-yet-created
/// tenant cannot poison the cache and a later creation resolves
/// immediately without waiting for any expiry.
///
/// Cache failures on this path are soft: a failed read falls back to the
/// store and a failed write is logged and skipped. The resolve result is
/// never changed by the cache, only the number of store lookups.
///
/// Two concurrent misses for the same key may both query the store and
/// both write the cache; last write wins. Both writes carry a snapshot
/// that was current at its own store read, so the final cached value is
/// eventually consistent without single-flight deduplication.
pub struct CachedTenantResolver<S, C>
where
    S: TenantStore,
    C: CacheBackend,
{
    store: Arc<S>,
    cache: Arc<C>,
    config: ResolverConfig,
}

impl<S, C> CachedTenantResolver<S, C>
where
    S: TenantStore,
    C: CacheBackend,
{
    /// Create a new resolver.
    pub fn new(store: Arc<S>, cache: Arc<C>, config: ResolverConfig) -> Self {
        Self {
            store,
            cache,
            config,
        }
    }

    /// Create a resolver with the default configuration (caching off).
    pub fn with_defaults(store: Arc<S>, cache: Arc<C>) -> Self {
        Self::new(store, cache, ResolverConfig::default())
    }

    /// Get the resolver configuration.
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve a domain to its tenant.
    ///
    /// Fails with [`ResolveError::NotIdentified`] when no domain record
    /// matches; the failure is never cached.
    pub fn resolve(&self, domain: &str) -> Result<Tenant, ResolveError> {
        if !self.config.caching_enabled {
            return self.store.find_by_domain(domain).map_err(ResolveError::from);
        }

        let key = DomainCacheKey::derive(domain);

        match self.cache.get(&key) {
            Ok(Some(bytes)) => match serde_json::from_slice::<Tenant>(&bytes) {
                Ok(tenant) => {
                    tracing::debug!(%domain, "tenant resolved from cache");
                    return Ok(tenant);
                }
                Err(error) => {
                    tracing::warn!(%error, %domain, "cached snapshot undecodable, falling back to store");
                }
            },
            Ok(None) => {}
            Err(error) => {
                tracing::warn!(%error, %domain, "cache read failed, falling back to store");
            }
        }

        // Miss: one store query. NotFound propagates without a cache write.
        let tenant = self.store.find_by_domain(domain)?;

        match serde_json::to_vec(&tenant) {
            Ok(bytes) => {
                if let Err(error) = self.cache.put(&key, &bytes, self.config.ttl) {
                    tracing::warn!(%error, %domain, "cache write failed after store lookup");
                }
            }
            Err(error) => {
                tracing::warn!(%error, %domain, "snapshot serialization failed, result not cached");
            }
        }

        Ok(tenant)
    }
}

impl<S, C> Clone for CachedTenantResolver<S, C>
where
    S: TenantStore,
    C: CacheBackend,
{
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            cache: Arc::clone(&self.cache),
            config: self.config.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tenantry_core::{AttributeMap, CacheError, CacheTtl, Domain, StoreError};
    use tenantry_storage::{InMemoryCacheBackend, InMemoryTenantStore};

    /// Cache backend whose every operation fails, simulating an
    /// unavailable shared cache.
    struct DownCacheBackend;

    impl CacheBackend for DownCacheBackend {
        fn get(&self, _key: &DomainCacheKey) -> Result<Option<Vec<u8>>, CacheError> {
            Err(CacheError::Unavailable {
                reason: "down".to_string(),
            })
        }

        fn put(
            &self,
            _key: &DomainCacheKey,
            _value: &[u8],
            _ttl: CacheTtl,
        ) -> Result<(), CacheError> {
            Err(CacheError::Unavailable {
                reason: "down".to_string(),
            })
        }

        fn forget(&self, _key: &DomainCacheKey) -> Result<(), CacheError> {
            Err(CacheError::Unavailable {
                reason: "down".to_string(),
            })
        }
    }

    fn seeded_store(domain: &str) -> (Arc<InMemoryTenantStore>, Tenant) {
        let store = Arc::new(InMemoryTenantStore::new());
        let tenant = Tenant::new(AttributeMap::new());
        store.tenant_insert(&tenant).expect("insert tenant");
        store
            .domain_insert(&Domain::new(tenant.tenant_id, domain))
            .expect("insert domain");
        (store, tenant)
    }

    #[test]
    fn test_disabled_caching_never_touches_cache() {
        let (store, tenant) = seeded_store("acme");
        let cache = Arc::new(InMemoryCacheBackend::new());
        let resolver = CachedTenantResolver::with_defaults(Arc::clone(&store), Arc::clone(&cache));

        let resolved = resolver.resolve("acme").expect("resolve");
        assert_eq!(resolved.tenant_id, tenant.tenant_id);
        assert!(cache.is_empty());
        assert_eq!(cache.stats().misses, 0);
        assert_eq!(store.find_by_domain_count(), 1);
    }

    #[test]
    fn test_warm_hit_issues_zero_store_queries() {
        let (store, tenant) = seeded_store("acme");
        let cache = Arc::new(InMemoryCacheBackend::new());
        let resolver = CachedTenantResolver::new(
            Arc::clone(&store),
            Arc::clone(&cache),
            ResolverConfig::new().with_caching(true),
        );

        let first = resolver.resolve("acme").expect("cold resolve");
        store.reset_find_by_domain_count();

        let second = resolver.resolve("acme").expect("warm resolve");
        assert_eq!(store.find_by_domain_count(), 0);
        assert_eq!(first, second);
        assert_eq!(first.tenant_id, tenant.tenant_id);
    }

    #[test]
    fn test_not_found_is_never_cached() {
        let store = Arc::new(InMemoryTenantStore::new());
        let cache = Arc::new(InMemoryCacheBackend::new());
        let resolver = CachedTenantResolver::new(
            Arc::clone(&store),
            Arc::clone(&cache),
            ResolverConfig::new().with_caching(true),
        );

        let cold = resolver.resolve("ghost").expect_err("cold must fail");
        assert!(cold.is_not_found());
        assert!(cache.is_empty());

        // Warm repeat: still NotFound, still queries the store, still no
        // cache write.
        let warm = resolver.resolve("ghost").expect_err("warm must fail");
        assert!(warm.is_not_found());
        assert!(cache.is_empty());
        assert_eq!(store.find_by_domain_count(), 2);
    }

    #[test]
    fn test_late_creation_resolves_immediately() {
        let store = Arc::new(InMemoryTenantStore::new());
        let cache = Arc::new(InMemoryCacheBackend::new());
        let resolver = CachedTenantResolver::new(
            Arc::clone(&store),
            Arc::clone(&cache),
            ResolverConfig::new().with_caching(true),
        );

        assert!(resolver.resolve("acme").is_err());

        let tenant = Tenant::new(AttributeMap::new());
        store.tenant_insert(&tenant).expect("insert tenant");
        store
            .domain_insert(&Domain::new(tenant.tenant_id, "acme"))
            .expect("insert domain");

        // No negative entry to wait out.
        let resolved = resolver.resolve("acme").expect("resolve after creation");
        assert_eq!(resolved.tenant_id, tenant.tenant_id);
    }

    #[test]
    fn test_cache_failure_is_soft_on_resolve_path() {
        let (store, tenant) = seeded_store("acme");
        let resolver = CachedTenantResolver::new(
            Arc::clone(&store),
            Arc::new(DownCacheBackend),
            ResolverConfig::new().with_caching(true),
        );

        // Read and write both fail; the resolve result is unaffected.
        let resolved = resolver.resolve("acme").expect("resolve despite cache outage");
        assert_eq!(resolved.tenant_id, tenant.tenant_id);
        assert_eq!(store.find_by_domain_count(), 1);
    }

    #[test]
    fn test_undecodable_snapshot_falls_back_and_repairs() {
        let (store, tenant) = seeded_store("acme");
        let cache = Arc::new(InMemoryCacheBackend::new());
        let key = DomainCacheKey::derive("acme");
        cache
            .put(&key, b"not json", CacheTtl::Forever)
            .expect("seed garbage");

        let resolver = CachedTenantResolver::new(
            Arc::clone(&store),
            Arc::clone(&cache),
            ResolverConfig::new().with_caching(true),
        );

        let resolved = resolver.resolve("acme").expect("resolve");
        assert_eq!(resolved.tenant_id, tenant.tenant_id);
        assert_eq!(store.find_by_domain_count(), 1);

        // The garbage entry was overwritten by a good snapshot.
        let bytes = cache.get(&key).expect("get").expect("present");
        let snapshot: Tenant = serde_json::from_slice(&bytes).expect("decodable now");
        assert_eq!(snapshot.tenant_id, tenant.tenant_id);
    }

    #[test]
    fn test_expired_entry_refetches_from_store() {
        let (store, tenant) = seeded_store("acme");
        let cache = Arc::new(InMemoryCacheBackend::new());
        let resolver = CachedTenantResolver::new(
            Arc::clone(&store),
            Arc::clone(&cache),
            ResolverConfig::new()
                .with_caching(true)
                .with_ttl(CacheTtl::Duration(0)),
        );

        resolver.resolve("acme").expect("cold resolve");
        store.reset_find_by_domain_count();

        // Entry expired immediately; the next resolve goes to the store.
        let resolved = resolver.resolve("acme").expect("refetch");
        assert_eq!(resolved.tenant_id, tenant.tenant_id);
        assert_eq!(store.find_by_domain_count(), 1);
    }

    #[test]
    fn test_store_unavailability_propagates() {
        struct DownStore;

        impl TenantStore for DownStore {
            fn tenant_insert(&self, _: &Tenant) -> Result<(), StoreError> {
                unreachable!("not exercised")
            }
            fn tenant_get(&self, _: tenantry_core::TenantId) -> Result<Option<Tenant>, StoreError> {
                unreachable!("not exercised")
            }
            fn tenant_update(
                &self,
                _: tenantry_core::TenantId,
                _: tenantry_core::TenantUpdate,
            ) -> Result<Tenant, StoreError> {
                unreachable!("not exercised")
            }
            fn tenant_delete(&self, _: tenantry_core::TenantId) -> Result<(), StoreError> {
                unreachable!("not exercised")
            }
            fn domain_insert(&self, _: &Domain) -> Result<(), StoreError> {
                unreachable!("not exercised")
            }
            fn domain_get(
                &self,
                _: tenantry_core::DomainId,
            ) -> Result<Option<Domain>, StoreError> {
                unreachable!("not exercised")
            }
            fn domain_rename(
                &self,
                _: tenantry_core::DomainId,
                _: &str,
            ) -> Result<Domain, StoreError> {
                unreachable!("not exercised")
            }
            fn domain_delete(&self, _: tenantry_core::DomainId) -> Result<Domain, StoreError> {
                unreachable!("not exercised")
            }
            fn domains_for_tenant(
                &self,
                _: tenantry_core::TenantId,
            ) -> Result<Vec<Domain>, StoreError> {
                unreachable!("not exercised")
            }
            fn find_by_domain(&self, _: &str) -> Result<Tenant, StoreError> {
                Err(StoreError::Unavailable {
                    reason: "connection refused".to_string(),
                })
            }
        }

        let resolver = CachedTenantResolver::new(
            Arc::new(DownStore),
            Arc::new(InMemoryCacheBackend::new()),
            ResolverConfig::new().with_caching(true),
        );

        let err = resolver.resolve("acme").expect_err("must fail");
        assert!(!err.is_not_found());
        assert!(matches!(
            err,
            ResolveError::Store(StoreError::Unavailable { .. })
        ));
    }
}
