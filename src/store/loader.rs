use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::{FileStore, KeyStore, MemoryStore};
use crate::config::Config;
use crate::error::{PolicyError, Result};

/// Trait for opening named keyed stores
pub trait StoreLoader: Send + Sync {
    /// Open the store with the given file name (e.g. `aliases.dat`).
    fn open(&self, name: &str) -> Result<Box<dyn KeyStore>>;
}

/// File-based StoreLoader reading snapshots from a directory
#[derive(Debug, Clone)]
pub struct FileStoreLoader {
    dir: PathBuf,
}

impl FileStoreLoader {
    /// Create a loader for stores under `dir`
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Create a loader for the configuration directory
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.sysconf_dir())
    }
}

impl StoreLoader for FileStoreLoader {
    fn open(&self, name: &str) -> Result<Box<dyn KeyStore>> {
        let store = FileStore::open(self.dir.join(name))?;
        Ok(Box::new(store))
    }
}

/// Nil StoreLoader - every store is unavailable
pub struct NilStoreLoader;

impl StoreLoader for NilStoreLoader {
    fn open(&self, name: &str) -> Result<Box<dyn KeyStore>> {
        Err(PolicyError::store_unavailable(name, "no stores configured"))
    }
}

/// In-memory StoreLoader for testing
#[derive(Default)]
pub struct MemoryStoreLoader {
    stores: HashMap<String, Arc<MemoryStore>>,
}

impl MemoryStoreLoader {
    /// Create an empty loader; every store is unavailable until added
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a store under a file name
    pub fn add_store(&mut self, name: &str, store: MemoryStore) {
        self.stores.insert(name.to_string(), Arc::new(store));
    }

    /// Builder form of [`MemoryStoreLoader::add_store`]
    pub fn with_store(mut self, name: &str, store: MemoryStore) -> Self {
        self.add_store(name, store);
        self
    }
}

impl StoreLoader for MemoryStoreLoader {
    fn open(&self, name: &str) -> Result<Box<dyn KeyStore>> {
        let store = self
            .stores
            .get(name)
            .cloned()
            .ok_or_else(|| PolicyError::store_unavailable(name, "store not loaded"))?;
        Ok(Box::new(store))
    }
}
