//! Alias expansion for local addresses.

use std::sync::Arc;

use tracing::debug;

use crate::config::ALIASES_DB;
use crate::identity::Identity;
use crate::matcher::DomainMatcher;
use crate::store::StoreLoader;

/// Resolves addresses against the aliases store
pub struct AliasResolver {
    identity: Arc<Identity>,
    domains: Arc<DomainMatcher>,
    stores: Arc<dyn StoreLoader>,
}

impl AliasResolver {
    /// Create a resolver sharing the identity and domain matcher
    pub fn new(
        identity: Arc<Identity>,
        domains: Arc<DomainMatcher>,
        stores: Arc<dyn StoreLoader>,
    ) -> Self {
        Self {
            identity,
            domains,
            stores,
        }
    }

    /// Qualify an address for alias lookup.
    ///
    /// Bare local parts get `@me`; addresses in a local domain have their
    /// domain replaced by `me`. Everything else is returned unchanged.
    pub fn qualify(&self, address: &str) -> String {
        match address.split_once('@') {
            Some((local, domain)) if self.domains.is_local(domain) => {
                format!("{}@{}", local, self.identity.me())
            }
            Some(_) => address.to_string(),
            None => format!("{}@{}", address, self.identity.me()),
        }
    }

    /// Expand an address to its alias destinations.
    ///
    /// Returns `None` when the address has no alias or the store is
    /// unavailable.
    pub fn get_alias(&self, address: &str) -> Option<Vec<String>> {
        let address = self.qualify(address);

        let store = match self.stores.open(ALIASES_DB) {
            Ok(store) => store,
            Err(e) => {
                debug!(error = %e, "aliases unavailable");
                return None;
            }
        };

        let value = store.get(&address)?;
        Some(value.trim().split('\n').map(str::to_string).collect())
    }
}
