//! Durable key-value storage for the list tools

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
};
use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::utils::lock_or_recover;

/// String values stored under a fixed namespace key per tool
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Store keeping one `<key>.json` file per key inside a directory
#[derive(Debug)]
pub struct JsonFileStore {
    data_dir: PathBuf,
}

impl JsonFileStore {
    /// Open a store in `data_dir`, creating the directory if needed
    pub fn new(data_dir: &Path) -> Result<Self> {
        fs::create_dir_all(data_dir)
            .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;

        Ok(Self {
            data_dir: data_dir.to_path_buf(),
        })
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(Some(content))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.key_path(key);
        // Write then rename so a crash never leaves a half-written list
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).with_context(|| format!("Failed to write {}", tmp.display()))?;
        fs::rename(&tmp, &path)
            .with_context(|| format!("Failed to replace {}", path.display()))?;
        debug!("Saved {} bytes to {}", value.len(), path.display());
        Ok(())
    }
}

/// In-memory store, lost on exit
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(lock_or_recover(&self.entries).get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        lock_or_recover(&self.entries).insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Load a JSON array of records stored under `key`. A missing key is an empty list.
pub fn load_records<R: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Result<Vec<R>> {
    match store.get(key)? {
        Some(raw) => serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse stored records for {}", key)),
        None => Ok(Vec::new()),
    }
}

/// Store `records` as a JSON array under `key`
pub fn save_records<R: Serialize>(store: &dyn KeyValueStore, key: &str, records: &[R]) -> Result<()> {
    let raw = serde_json::to_string(records)
        .with_context(|| format!("Failed to serialize records for {}", key))?;
    store.set(key, &raw)
}
