use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::KeyStore;
use crate::error::{PolicyError, Result};

/// On-disk snapshot: a JSON object mapping keys to string values.
#[derive(Debug, Default, Deserialize)]
#[serde(transparent)]
struct Snapshot(HashMap<String, String>);

/// File-backed store, loaded once when opened.
#[derive(Debug, Default)]
pub struct FileStore {
    entries: HashMap<String, String>,
}

impl FileStore {
    /// Open and parse a store snapshot.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let name = path.display().to_string();
        let data = fs::read(path).map_err(|e| PolicyError::store_unavailable(&name, e))?;
        let Snapshot(entries) =
            serde_json::from_slice(&data).map_err(|e| PolicyError::store_unavailable(&name, e))?;
        Ok(Self { entries })
    }
}

impl KeyStore for FileStore {
    fn exists(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }
}
