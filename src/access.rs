//! SMTP access policy module.
//!
//! Access records are keyed by client address or address prefix and hold
//! comma-joined `FLAG` / `KEY=VALUE` tokens, e.g. `RELAYCLIENT,BLOCK=`.
//! The most specific key present in the store wins.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::SMTP_ACCESS_DB;
use crate::error::{PolicyError, Result};
use crate::matcher::{address_separator, AddressPrefixes};
use crate::store::StoreLoader;

/// Clients allowed to relay
pub const RELAY_CLIENT: &str = "RELAYCLIENT";
/// Block message, or empty to exempt the client from blocks
pub const BLOCK: &str = "BLOCK";

/// Raw value of a matched access record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessRecord(String);

impl AccessRecord {
    /// Wrap a raw record value
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Get the raw record value
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Value of a setting in this record.
    ///
    /// A bare `KEY` token yields `Some("")`; `KEY=VALUE` yields the text
    /// after `=`. The first matching token wins; other tokens are ignored.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.0.split(',').find_map(|token| {
            if token == key {
                Some("")
            } else {
                token.strip_prefix(key)?.strip_prefix('=')
            }
        })
    }
}

/// Resolves per-client policy from the access store
pub struct AccessPolicyResolver {
    stores: Arc<dyn StoreLoader>,
}

impl AccessPolicyResolver {
    /// Create a resolver reading the access store from `stores`
    pub fn new(stores: Arc<dyn StoreLoader>) -> Self {
        Self { stores }
    }

    /// Find the most specific record for a client address.
    ///
    /// Fails if the address has no `.` or `:` separator, or the access
    /// store cannot be opened.
    pub fn try_lookup_record(&self, ip: &str) -> Result<Option<AccessRecord>> {
        let sep =
            address_separator(ip).ok_or_else(|| PolicyError::InvalidAddress(ip.to_string()))?;
        let store = self.stores.open(SMTP_ACCESS_DB)?;

        let Some(key) = AddressPrefixes::new(ip, sep).find(|key| store.exists(key)) else {
            return Ok(None);
        };
        let record = store.get(key).map(AccessRecord::new);
        if let Some(record) = &record {
            debug!(ip, key, record = record.as_str(), "access record matched");
        }
        Ok(record)
    }

    /// Like [`AccessPolicyResolver::try_lookup_record`], logging failures
    /// and treating them as no match.
    pub fn lookup_record(&self, ip: &str) -> Option<AccessRecord> {
        match self.try_lookup_record(ip) {
            Ok(record) => record,
            Err(e) => {
                warn!(ip, error = %e, "access lookup failed");
                None
            }
        }
    }

    /// Value of `key` in the record matching `ip`.
    ///
    /// `None` if no record matched or the record lacks the key; `Some("")`
    /// if the key is present without a value.
    pub fn get_policy_value(&self, key: &str, ip: &str) -> Option<String> {
        self.lookup_record(ip)?.value(key).map(str::to_string)
    }

    /// Whether the client may relay. Any `RELAYCLIENT` setting allows it.
    pub fn is_relay_allowed(&self, ip: &str) -> bool {
        self.get_policy_value(RELAY_CLIENT, ip).is_some()
    }

    /// Whether the client is explicitly exempt from blocks (`BLOCK` with an empty value).
    pub fn is_block_whitelisted(&self, ip: &str) -> bool {
        self.get_policy_value(BLOCK, ip).as_deref() == Some("")
    }

    /// Raw `BLOCK` setting: `None`, `Some("")` (whitelisted) or a rejection message.
    pub fn block_reason(&self, ip: &str) -> Option<String> {
        self.get_policy_value(BLOCK, ip)
    }
}
