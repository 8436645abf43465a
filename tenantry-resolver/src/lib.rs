//! Tenantry Resolver - Cached Domain Resolution
//!
//! The cached resolution layer: lookup-or-populate on resolve, and
//! delete-only invalidation driven synchronously from entity mutations.
//!
//! # Design Philosophy
//!
//! The cache is a pure performance layer. Disabling it must not change
//! any resolve result, only the number of store lookups performed. No
//! entry may outlive the validity of the fact it encodes: every mutation
//! of a tenant or of its domain records deletes the affected entries
//! before the mutation is reported successful.
//!
//! # Example
//!
//! ```ignore
//! let store = Arc::new(InMemoryTenantStore::new());
//! let cache = Arc::new(InMemoryCacheBackend::new());
//! let repo = TenantRepository::new(Arc::clone(&store), Arc::clone(&cache));
//!
//! let tenant = repo.create_tenant(AttributeMap::new())?;
//! repo.create_domain(tenant.tenant_id, "acme")?;
//!
//! let resolver = CachedTenantResolver::new(
//!     store,
//!     cache,
//!     ResolverConfig::new().with_caching(true),
//! );
//! let resolved = resolver.resolve("acme")?;
//! ```

pub mod hooks;
pub mod repository;
pub mod resolver;

pub use hooks::InvalidationHooks;
pub use repository::TenantRepository;
pub use resolver::CachedTenantResolver;

// Re-export the seams and types callers wire together.
pub use tenantry_core::{
    AttributeMap, CacheError, CacheTtl, Domain, DomainId, ResolveError, ResolverConfig,
    StoreError, Tenant, TenantId, TenantUpdate, TenantryError, TenantryResult,
};
pub use tenantry_storage::{
    CacheBackend, DomainCacheKey, InMemoryCacheBackend, InMemoryTenantStore, TenantStore,
};
