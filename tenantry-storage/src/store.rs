//! Store adapter trait and in-memory implementation.
//!
//! The trait is the seam an external storage layer implements. The
//! in-memory store doubles as the test fixture: it counts uncached
//! lookups so tests can prove whether the cache or the store served a
//! resolve call.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use tenantry_core::{Domain, DomainId, StoreError, Tenant, TenantId, TenantUpdate};

/// Store adapter for tenants and their domain records.
///
/// `find_by_domain` is the only operation the cached resolver consumes;
/// the mutation operations exist for the repository that drives
/// invalidation. Implementations must be safe for concurrent use.
pub trait TenantStore: Send + Sync {
    // === Tenant Operations ===

    /// Insert a new tenant.
    fn tenant_insert(&self, tenant: &Tenant) -> Result<(), StoreError>;

    /// Get a tenant by ID.
    fn tenant_get(&self, id: TenantId) -> Result<Option<Tenant>, StoreError>;

    /// Apply an attribute update and return the updated tenant.
    fn tenant_update(&self, id: TenantId, update: TenantUpdate) -> Result<Tenant, StoreError>;

    /// Delete a tenant and all of its domain records.
    fn tenant_delete(&self, id: TenantId) -> Result<(), StoreError>;

    // === Domain Operations ===

    /// Insert a new domain record. Fails with `AlreadyExists` if the
    /// domain string is already registered.
    fn domain_insert(&self, domain: &Domain) -> Result<(), StoreError>;

    /// Get a domain record by ID.
    fn domain_get(&self, id: DomainId) -> Result<Option<Domain>, StoreError>;

    /// Change a domain record's string key and return the updated record.
    fn domain_rename(&self, id: DomainId, new_domain: &str) -> Result<Domain, StoreError>;

    /// Delete a domain record and return it.
    fn domain_delete(&self, id: DomainId) -> Result<Domain, StoreError>;

    /// List a tenant's domain records in registration order.
    fn domains_for_tenant(&self, id: TenantId) -> Result<Vec<Domain>, StoreError>;

    // === Resolution ===

    /// Uncached lookup of the tenant owning a domain.
    fn find_by_domain(&self, domain: &str) -> Result<Tenant, StoreError>;
}

/// In-memory tenant store.
///
/// Domain records are kept in per-tenant registration order, so the first
/// registered domain has resolution precedence. Every `find_by_domain`
/// call increments a counter, the analogue of a database query log.
#[derive(Debug, Default)]
pub struct InMemoryTenantStore {
    tenants: RwLock<HashMap<TenantId, Tenant>>,
    domains: RwLock<HashMap<DomainId, Domain>>,
    /// Registration-ordered domain ids per tenant.
    tenant_domains: RwLock<HashMap<TenantId, Vec<DomainId>>>,
    /// Domain string -> record id index.
    by_domain: RwLock<HashMap<String, DomainId>>,
    lookups: AtomicU64,
}

impl InMemoryTenantStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of uncached `find_by_domain` lookups performed so far.
    pub fn find_by_domain_count(&self) -> u64 {
        self.lookups.load(Ordering::SeqCst)
    }

    /// Reset the lookup counter.
    pub fn reset_find_by_domain_count(&self) {
        self.lookups.store(0, Ordering::SeqCst);
    }

    /// Get count of stored tenants.
    pub fn tenant_count(&self) -> usize {
        self.tenants.read().map(|t| t.len()).unwrap_or(0)
    }

    /// Get count of stored domain records.
    pub fn domain_count(&self) -> usize {
        self.domains.read().map(|d| d.len()).unwrap_or(0)
    }

    /// First-registered domain of a tenant, if any.
    pub fn primary_domain(&self, id: TenantId) -> Result<Option<Domain>, StoreError> {
        let order = self
            .tenant_domains
            .read()
            .map_err(|_| StoreError::LockPoisoned)?;
        let domains = self.domains.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(order
            .get(&id)
            .and_then(|ids| ids.first())
            .and_then(|domain_id| domains.get(domain_id))
            .cloned())
    }

    /// Clear all stored data and the lookup counter.
    pub fn clear(&self) {
        if let Ok(mut tenants) = self.tenants.write() {
            tenants.clear();
        }
        if let Ok(mut domains) = self.domains.write() {
            domains.clear();
        }
        if let Ok(mut order) = self.tenant_domains.write() {
            order.clear();
        }
        if let Ok(mut index) = self.by_domain.write() {
            index.clear();
        }
        self.lookups.store(0, Ordering::SeqCst);
    }
}

impl TenantStore for InMemoryTenantStore {
    fn tenant_insert(&self, tenant: &Tenant) -> Result<(), StoreError> {
        let mut tenants = self.tenants.write().map_err(|_| StoreError::LockPoisoned)?;
        tenants.insert(tenant.tenant_id, tenant.clone());
        Ok(())
    }

    fn tenant_get(&self, id: TenantId) -> Result<Option<Tenant>, StoreError> {
        let tenants = self.tenants.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(tenants.get(&id).cloned())
    }

    fn tenant_update(&self, id: TenantId, update: TenantUpdate) -> Result<Tenant, StoreError> {
        let mut tenants = self.tenants.write().map_err(|_| StoreError::LockPoisoned)?;
        let tenant = tenants
            .get_mut(&id)
            .ok_or(StoreError::UnknownTenant { id })?;
        for (key, value) in update.attributes {
            tenant.attributes.insert(key, value);
        }
        tenant.updated_at = chrono::Utc::now();
        Ok(tenant.clone())
    }

    fn tenant_delete(&self, id: TenantId) -> Result<(), StoreError> {
        let mut tenants = self.tenants.write().map_err(|_| StoreError::LockPoisoned)?;
        tenants.remove(&id).ok_or(StoreError::UnknownTenant { id })?;
        drop(tenants);

        // Cascade: remove the tenant's domain records and index entries.
        let mut order = self
            .tenant_domains
            .write()
            .map_err(|_| StoreError::LockPoisoned)?;
        let removed_ids = order.remove(&id).unwrap_or_default();
        drop(order);

        // Lock order: index before domains, matching domain_rename.
        let mut index = self.by_domain.write().map_err(|_| StoreError::LockPoisoned)?;
        let mut domains = self.domains.write().map_err(|_| StoreError::LockPoisoned)?;
        for domain_id in removed_ids {
            if let Some(record) = domains.remove(&domain_id) {
                index.remove(&record.domain);
            }
        }
        Ok(())
    }

    fn domain_insert(&self, domain: &Domain) -> Result<(), StoreError> {
        let tenants = self.tenants.read().map_err(|_| StoreError::LockPoisoned)?;
        if !tenants.contains_key(&domain.tenant_id) {
            return Err(StoreError::UnknownTenant {
                id: domain.tenant_id,
            });
        }
        drop(tenants);

        let mut index = self.by_domain.write().map_err(|_| StoreError::LockPoisoned)?;
        if index.contains_key(&domain.domain) {
            return Err(StoreError::AlreadyExists {
                domain: domain.domain.clone(),
            });
        }
        index.insert(domain.domain.clone(), domain.domain_id);
        drop(index);

        let mut domains = self.domains.write().map_err(|_| StoreError::LockPoisoned)?;
        domains.insert(domain.domain_id, domain.clone());
        drop(domains);

        let mut order = self
            .tenant_domains
            .write()
            .map_err(|_| StoreError::LockPoisoned)?;
        order
            .entry(domain.tenant_id)
            .or_default()
            .push(domain.domain_id);
        Ok(())
    }

    fn domain_get(&self, id: DomainId) -> Result<Option<Domain>, StoreError> {
        let domains = self.domains.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(domains.get(&id).cloned())
    }

    fn domain_rename(&self, id: DomainId, new_domain: &str) -> Result<Domain, StoreError> {
        let mut index = self.by_domain.write().map_err(|_| StoreError::LockPoisoned)?;
        match index.get(new_domain) {
            Some(existing) if *existing != id => {
                return Err(StoreError::AlreadyExists {
                    domain: new_domain.to_string(),
                });
            }
            _ => {}
        }

        let mut domains = self.domains.write().map_err(|_| StoreError::LockPoisoned)?;
        let record = domains
            .get_mut(&id)
            .ok_or(StoreError::UnknownDomain { id })?;
        index.remove(&record.domain);
        record.domain = new_domain.to_string();
        index.insert(new_domain.to_string(), id);
        Ok(record.clone())
    }

    fn domain_delete(&self, id: DomainId) -> Result<Domain, StoreError> {
        let mut domains = self.domains.write().map_err(|_| StoreError::LockPoisoned)?;
        let record = domains.remove(&id).ok_or(StoreError::UnknownDomain { id })?;
        drop(domains);

        let mut index = self.by_domain.write().map_err(|_| StoreError::LockPoisoned)?;
        index.remove(&record.domain);
        drop(index);

        let mut order = self
            .tenant_domains
            .write()
            .map_err(|_| StoreError::LockPoisoned)?;
        if let Some(ids) = order.get_mut(&record.tenant_id) {
            ids.retain(|domain_id| *domain_id != id);
        }
        Ok(record)
    }

    fn domains_for_tenant(&self, id: TenantId) -> Result<Vec<Domain>, StoreError> {
        let order = self
            .tenant_domains
            .read()
            .map_err(|_| StoreError::LockPoisoned)?;
        let domains = self.domains.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(order
            .get(&id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|domain_id| domains.get(domain_id))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn find_by_domain(&self, domain: &str) -> Result<Tenant, StoreError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);

        let index = self.by_domain.read().map_err(|_| StoreError::LockPoisoned)?;
        let domain_id = index.get(domain).copied().ok_or_else(|| StoreError::NotFound {
            domain: domain.to_string(),
        })?;
        drop(index);

        let domains = self.domains.read().map_err(|_| StoreError::LockPoisoned)?;
        let tenant_id = domains
            .get(&domain_id)
            .map(|record| record.tenant_id)
            .ok_or_else(|| StoreError::NotFound {
                domain: domain.to_string(),
            })?;
        drop(domains);

        let tenants = self.tenants.read().map_err(|_| StoreError::LockPoisoned)?;
        tenants
            .get(&tenant_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                domain: domain.to_string(),
            })
    }
}
