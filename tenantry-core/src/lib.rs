//! Tenantry Core - Entity Types
//!
//! Pure data structures with no behavior. All other crates depend on this.
//! This crate contains ONLY data types - no business logic.

pub mod config;
pub mod entities;
pub mod error;

pub use config::{CacheTtl, ResolverConfig};
pub use entities::{
    new_domain_id, new_tenant_id, AttributeMap, Domain, DomainId, Tenant, TenantId, TenantUpdate,
    Timestamp,
};
pub use error::{CacheError, ResolveError, StoreError, TenantryError, TenantryResult};
