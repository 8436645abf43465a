//! Tenantry Storage - Store Adapter and Cache Backend Seams
//!
//! Defines the two leaf abstractions the cached resolver sits between:
//! the uncached tenant store and the generic key-value cache backend.
//! In-memory implementations of both are provided; a real deployment
//! substitutes its own.

pub mod cache;
pub mod store;

pub use cache::{CacheBackend, CacheStats, DomainCacheKey, InMemoryCacheBackend};
pub use store::{InMemoryTenantStore, TenantStore};
