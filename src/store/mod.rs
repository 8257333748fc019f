//! Keyed store module.
//!
//! Exact-match string lookups over externally maintained databases.

pub mod file;
pub mod loader;

use std::collections::HashMap;
use std::sync::Arc;

pub use file::FileStore;
pub use loader::{FileStoreLoader, MemoryStoreLoader, NilStoreLoader, StoreLoader};

/// Read-only exact-match lookup by string key.
pub trait KeyStore: Send + Sync {
    /// Check if the key is present.
    fn exists(&self, key: &str) -> bool;

    /// Get the value stored under the key.
    fn get(&self, key: &str) -> Option<String>;
}

impl<S: KeyStore + ?Sized> KeyStore for Arc<S> {
    fn exists(&self, key: &str) -> bool {
        (**self).exists(key)
    }

    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an entry
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Builder form of [`MemoryStore::insert`].
    pub fn with_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MemoryStore {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl KeyStore for MemoryStore {
    fn exists(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }
}
