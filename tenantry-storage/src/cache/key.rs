//! Cache key derivation for domain strings.
//!
//! The private field means a `DomainCacheKey` can ONLY be obtained through
//! `derive()`, so raw strings cannot leak into the cache namespace by
//! accident. Derivation is deterministic and side-effect free.

use std::fmt;

/// Namespace prefix for all domain resolution entries.
const KEY_PREFIX: &str = "tenantry:domain:";

/// A derived cache key for one domain string.
///
/// Prefix + raw domain. The prefix never appears in a valid domain, and
/// the raw key is carried verbatim, so derivation is injective across
/// distinct domains.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DomainCacheKey {
    key: String,
}

impl DomainCacheKey {
    /// Derive the cache key for a domain string.
    pub fn derive(domain: &str) -> Self {
        Self {
            key: format!("{KEY_PREFIX}{domain}"),
        }
    }

    /// The full namespaced key.
    pub fn as_str(&self) -> &str {
        &self.key
    }
}

impl fmt::Display for DomainCacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_is_prefixed() {
        let key = DomainCacheKey::derive("acme");
        assert_eq!(key.as_str(), "tenantry:domain:acme");
    }

    #[test]
    fn test_derive_is_deterministic() {
        assert_eq!(DomainCacheKey::derive("acme"), DomainCacheKey::derive("acme"));
    }

    #[test]
    fn test_distinct_domains_distinct_keys() {
        assert_ne!(DomainCacheKey::derive("acme"), DomainCacheKey::derive("bar"));
    }

    #[test]
    fn test_empty_domain_still_namespaced() {
        let key = DomainCacheKey::derive("");
        assert_eq!(key.as_str(), KEY_PREFIX);
    }
}
