//! Mutation orchestrator wiring lifecycle events to invalidation hooks.
//!
//! Every mutation runs its hook synchronously and only then reports
//! success, so a resolve issued after a successful mutation observes a
//! cache miss and reads fresh state from the store. There is no event
//! dispatch in between: the hook call sits directly in the mutation path.

use std::sync::Arc;

use tenantry_core::{
    AttributeMap, Domain, DomainId, StoreError, Tenant, TenantId, TenantUpdate, TenantryResult,
};
use tenantry_storage::{CacheBackend, TenantStore};

use crate::hooks::InvalidationHooks;

/// Performs tenant and domain mutations with invalidate-on-write.
///
/// If a hook fails, the mutation has already been applied to the store
/// but the error is surfaced to the caller; whether that is fatal is the
/// caller's policy decision.
pub struct TenantRepository<S, C>
where
    S: TenantStore,
    C: CacheBackend,
{
    store: Arc<S>,
    hooks: InvalidationHooks<C>,
}

impl<S, C> TenantRepository<S, C>
where
    S: TenantStore,
    C: CacheBackend,
{
    /// Create a repository over a store and the cache backend the
    /// resolver populates.
    pub fn new(store: Arc<S>, cache: Arc<C>) -> Self {
        Self {
            store,
            hooks: InvalidationHooks::new(cache),
        }
    }

    /// Create a new tenant. No invalidation: a tenant without domains has
    /// no cache entries.
    pub fn create_tenant(&self, attributes: AttributeMap) -> TenantryResult<Tenant> {
        let tenant = Tenant::new(attributes);
        self.store.tenant_insert(&tenant)?;
        Ok(tenant)
    }

    /// Update a tenant's attributes, invalidating every domain it owns.
    pub fn update_tenant(&self, id: TenantId, update: TenantUpdate) -> TenantryResult<Tenant> {
        let tenant = self.store.tenant_update(id, update)?;
        let domains = self.store.domains_for_tenant(id)?;
        self.hooks.tenant_updated(&domains)?;
        Ok(tenant)
    }

    /// Delete a tenant and its domain records, invalidating every domain
    /// it owned.
    pub fn delete_tenant(&self, id: TenantId) -> TenantryResult<()> {
        // Captured before the delete: afterwards the store no longer
        // knows which domains the tenant owned.
        let domains = self.store.domains_for_tenant(id)?;
        self.store.tenant_delete(id)?;
        self.hooks.tenant_deleted(&domains)?;
        Ok(())
    }

    /// Register a new domain for a tenant, invalidating its sibling
    /// domains.
    pub fn create_domain(&self, tenant_id: TenantId, domain: &str) -> TenantryResult<Domain> {
        let siblings = self.store.domains_for_tenant(tenant_id)?;
        let record = Domain::new(tenant_id, domain);
        self.store.domain_insert(&record)?;
        self.hooks.domain_created(&record, &siblings)?;
        Ok(record)
    }

    /// Change a domain record's string key, invalidating the old value.
    pub fn rename_domain(&self, id: DomainId, new_domain: &str) -> TenantryResult<Domain> {
        let old = self
            .store
            .domain_get(id)?
            .ok_or(StoreError::UnknownDomain { id })?;
        let renamed = self.store.domain_rename(id, new_domain)?;
        self.hooks.domain_renamed(&old.domain)?;
        Ok(renamed)
    }

    /// Delete a domain record, invalidating its key.
    pub fn delete_domain(&self, id: DomainId) -> TenantryResult<Domain> {
        let removed = self.store.domain_delete(id)?;
        self.hooks.domain_deleted(&removed)?;
        Ok(removed)
    }
}
