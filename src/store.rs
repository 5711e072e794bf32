//! Normalized Membership Stores
//!
//! Case-insensitive exact-match sets backing the risk engine:
//! - `BlocklistStore` for flagged addresses
//! - `PhishingDomainStore` for known phishing hostnames
//!
//! Both are seeded once at startup from an external feed and mutated only
//! through explicit add/remove calls. Instances are constructed by the host
//! and passed into the engine by handle so tests can inject isolated copies.

use std::collections::HashSet;
use std::sync::RwLock;

/// Case-insensitive set of flagged addresses
///
/// Membership is exact-match on the lower-cased form; no wildcards.
pub struct BlocklistStore {
    entries: RwLock<HashSet<String>>,
}

impl BlocklistStore {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashSet::new()),
        }
    }

    /// Seed from an external feed at startup
    pub fn seeded(addresses: &[&str]) -> Self {
        let store = Self::new();
        store.add_all(addresses.iter().map(|a| a.to_string()));
        store
    }

    pub fn add(&self, address: &str) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(address.to_lowercase());
        }
    }

    pub fn add_all(&self, addresses: impl IntoIterator<Item = String>) {
        if let Ok(mut entries) = self.entries.write() {
            for address in addresses {
                entries.insert(address.to_lowercase());
            }
        }
    }

    pub fn remove(&self, address: &str) {
        if let Ok(mut entries) = self.entries.write() {
            entries.remove(&address.to_lowercase());
        }
    }

    pub fn contains(&self, address: &str) -> bool {
        self.entries
            .read()
            .map(|entries| entries.contains(&address.to_lowercase()))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for BlocklistStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Case-insensitive set of known phishing hostnames
///
/// Lookups are against exact lower-cased hostnames; subdomain and wildcard
/// matching is intentionally not performed here (the heuristics in the risk
/// engine cover lookalike domains).
pub struct PhishingDomainStore {
    entries: RwLock<HashSet<String>>,
}

impl PhishingDomainStore {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashSet::new()),
        }
    }

    pub fn seeded(domains: &[&str]) -> Self {
        let store = Self::new();
        store.add_all(domains.iter().map(|d| d.to_string()));
        store
    }

    pub fn add(&self, domain: &str) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(domain.to_lowercase());
        }
    }

    pub fn add_all(&self, domains: impl IntoIterator<Item = String>) {
        if let Ok(mut entries) = self.entries.write() {
            for domain in domains {
                entries.insert(domain.to_lowercase());
            }
        }
    }

    pub fn remove(&self, domain: &str) {
        if let Ok(mut entries) = self.entries.write() {
            entries.remove(&domain.to_lowercase());
        }
    }

    pub fn contains(&self, domain: &str) -> bool {
        self.entries
            .read()
            .map(|entries| entries.contains(&domain.to_lowercase()))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for PhishingDomainStore {
    fn default() -> Self {
        Self::new()
    }
}
