//! Key-value persistence for player state
//!
//! Backends:
//! - `MemoryStorage`: in-process map (tests, headless runs)
//! - `FileStorage`: one JSON file per key (native)
//! - `LocalStorage`: browser LocalStorage (wasm32)
//!
//! Callers go through `load_json`/`save_json`, which never fail: errors are
//! logged and the caller falls back to its defaults.

use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::StorageError;

#[cfg(not(target_arch = "wasm32"))]
mod file;
#[cfg(target_arch = "wasm32")]
mod local;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStorage;
#[cfg(target_arch = "wasm32")]
pub use local::LocalStorage;

/// Fallible string key-value store
pub trait Storage {
    /// Read the raw value for `key`; `Ok(None)` when absent
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write the raw value for `key`
    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-memory storage
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl Storage for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Storage that is never available (private browsing, missing window)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullStorage;

impl Storage for NullStorage {
    fn load(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Unavailable)
    }

    fn save(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable)
    }
}

fn try_load_json<T: DeserializeOwned>(
    storage: &dyn Storage,
    key: &str,
) -> Result<Option<T>, StorageError> {
    match storage.load(key)? {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}

/// Load and decode `key`; `None` when absent, unreadable or corrupt
pub fn load_json<T: DeserializeOwned>(storage: &dyn Storage, key: &str) -> Option<T> {
    match try_load_json(storage, key) {
        Ok(value) => value,
        Err(e) => {
            log::warn!("Failed to load {}: {}", key, e);
            None
        }
    }
}

/// Encode and store `value` under `key`; returns whether it was written
pub fn save_json<T: Serialize>(storage: &mut dyn Storage, key: &str, value: &T) -> bool {
    let result = serde_json::to_string(value)
        .map_err(StorageError::from)
        .and_then(|json| storage.save(key, &json));
    match result {
        Ok(()) => true,
        Err(e) => {
            log::warn!("Failed to save {}: {}", key, e);
            false
        }
    }
}
