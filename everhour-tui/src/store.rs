//! Small key/value persistence for local state (weekly plan, recent projects,
//! workspace links). Values are JSON; every write replaces the whole value.

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::debug;

use crate::token_store::secure_write;

pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Value>>;
    fn set(&self, key: &str, value: Value) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

pub type SharedStore = Arc<dyn KeyValueStore>;

/// Read `key` as `T`; a missing key or a value of the wrong shape yields `None`.
pub fn load_typed<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Result<Option<T>> {
    let Some(value) = store.get(key)? else {
        return Ok(None);
    };
    match serde_json::from_value(value) {
        Ok(parsed) => Ok(Some(parsed)),
        Err(e) => {
            debug!(key, error = %e, "ignoring unreadable stored value");
            Ok(None)
        }
    }
}

pub fn save_typed<T: Serialize>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<()> {
    let value = serde_json::to_value(value).with_context(|| format!("Failed to encode {}", key))?;
    store.set(key, value)
}

/// JSON object on disk, rewritten on every `set`.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    cache: Mutex<Map<String, Value>>,
}

impl FileStore {
    pub fn open(path: &Path) -> Result<Self> {
        let cache = if path.exists() {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read state at {}", path.display()))?;
            if raw.trim().is_empty() {
                Map::new()
            } else {
                serde_json::from_str(&raw)
                    .with_context(|| format!("Failed to parse state at {}", path.display()))?
            }
        } else {
            Map::new()
        };

        Ok(Self {
            path: path.to_path_buf(),
            cache: Mutex::new(cache),
        })
    }

    fn flush(&self, map: &Map<String, Value>) -> Result<()> {
        let raw = serde_json::to_string_pretty(map)?;
        secure_write(&self.path, &raw)
            .with_context(|| format!("Failed to write state at {}", self.path.display()))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        let cache = self
            .cache
            .lock()
            .map_err(|_| anyhow::anyhow!("state store lock poisoned"))?;
        Ok(cache.get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> Result<()> {
        let mut cache = self
            .cache
            .lock()
            .map_err(|_| anyhow::anyhow!("state store lock poisoned"))?;
        cache.insert(key.to_string(), value);
        self.flush(&cache)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut cache = self
            .cache
            .lock()
            .map_err(|_| anyhow::anyhow!("state store lock poisoned"))?;
        if cache.remove(key).is_some() {
            self.flush(&cache)?;
        }
        Ok(())
    }
}

/// In-memory store for dev mode and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: Arc<Mutex<HashMap<String, Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        let values = self
            .values
            .lock()
            .map_err(|_| anyhow::anyhow!("memory store lock poisoned"))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> Result<()> {
        self.values
            .lock()
            .map_err(|_| anyhow::anyhow!("memory store lock poisoned"))?
            .insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.values
            .lock()
            .map_err(|_| anyhow::anyhow!("memory store lock poisoned"))?
            .remove(key);
        Ok(())
    }
}
