//! Error types for tenantry operations

use crate::entities::{DomainId, TenantId};
use thiserror::Error;

/// Store adapter errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("No tenant found for domain {domain}")]
    NotFound { domain: String },

    #[error("Domain already registered: {domain}")]
    AlreadyExists { domain: String },

    #[error("Unknown tenant: {id}")]
    UnknownTenant { id: TenantId },

    #[error("Unknown domain record: {id}")]
    UnknownDomain { id: DomainId },

    #[error("Store unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("Store lock poisoned")]
    LockPoisoned,
}

/// Cache backend errors.
///
/// Soft on the resolve path (the resolver falls back to the store), hard
/// on the invalidation path (surfaced to the mutation caller).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CacheError {
    #[error("Cache backend unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("Snapshot serialization failed: {reason}")]
    Serialization { reason: String },
}

/// Resolution failures reported to callers of `resolve`.
///
/// Carries no cache-internal detail: a miss-then-not-found and a
/// never-cached not-found are indistinguishable to the caller.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Tenant could not be identified on domain {domain}")]
    NotIdentified { domain: String },

    #[error("Store error: {0}")]
    Store(StoreError),
}

impl ResolveError {
    /// Whether this failure means no domain record matched.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotIdentified { .. })
    }
}

impl From<StoreError> for ResolveError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { domain } => Self::NotIdentified { domain },
            other => Self::Store(other),
        }
    }
}

/// Master error type for all tenantry errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TenantryError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("Resolve error: {0}")]
    Resolve(#[from] ResolveError),
}

/// Result type alias for tenantry operations.
pub type TenantryResult<T> = Result<T, TenantryError>;

// =============================================================================
// TESTS
// =============================================================================
