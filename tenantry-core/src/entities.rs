//! Tenant and domain entity types.
//!
//! A `Tenant` is an opaque record: a stable identifier plus arbitrary
//! attributes. A `Domain` associates one external string key with exactly
//! one tenant; a tenant may own zero or more domains, and the
//! first-registered one has resolution precedence.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;

/// Arbitrary tenant attributes, stored as a JSON object.
pub type AttributeMap = serde_json::Map<String, serde_json::Value>;

/// Tenant identifier using UUIDv7 for timestamp-sortable IDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TenantId(Uuid);

impl TenantId {
    /// Wrap an existing UUID as a tenant ID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Get the underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Domain record identifier using UUIDv7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DomainId(Uuid);

impl DomainId {
    /// Wrap an existing UUID as a domain record ID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Get the underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for DomainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Generate a new UUIDv7 tenant ID (timestamp-sortable).
pub fn new_tenant_id() -> TenantId {
    TenantId(Uuid::now_v7())
}

/// Generate a new UUIDv7 domain record ID (timestamp-sortable).
pub fn new_domain_id() -> DomainId {
    DomainId(Uuid::now_v7())
}

/// A tenant record.
///
/// Attributes are deliberately schemaless: the resolution layer never
/// interprets them, it only snapshots them into the cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tenant {
    /// Stable internal identifier.
    pub tenant_id: TenantId,
    /// Arbitrary attributes owned by the backing storage.
    pub attributes: AttributeMap,
    /// Creation timestamp.
    pub created_at: Timestamp,
    /// Last update timestamp.
    pub updated_at: Timestamp,
}

impl Tenant {
    /// Create a new tenant with the given attributes.
    pub fn new(attributes: AttributeMap) -> Self {
        let now = Utc::now();
        Self {
            tenant_id: new_tenant_id(),
            attributes,
            created_at: now,
            updated_at: now,
        }
    }

    /// Get an attribute value by key.
    pub fn attr(&self, key: &str) -> Option<&serde_json::Value> {
        self.attributes.get(key)
    }
}

/// A domain record: one external string key owned by exactly one tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    /// Record identifier.
    pub domain_id: DomainId,
    /// The owning tenant.
    pub tenant_id: TenantId,
    /// The external string key (e.g. a domain name).
    pub domain: String,
    /// Creation timestamp. Insertion order determines resolution precedence.
    pub created_at: Timestamp,
}

impl Domain {
    /// Create a new domain record for a tenant.
    pub fn new(tenant_id: TenantId, domain: impl Into<String>) -> Self {
        Self {
            domain_id: new_domain_id(),
            tenant_id,
            domain: domain.into(),
            created_at: Utc::now(),
        }
    }
}

/// Update payload for tenants.
///
/// Present attribute keys are merged over the stored map; absent keys are
/// left untouched.
#[derive(Debug, Clone, Default)]
pub struct TenantUpdate {
    /// Attribute keys to set or overwrite.
    pub attributes: AttributeMap,
}

impl TenantUpdate {
    /// Create an empty update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a single attribute.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}
