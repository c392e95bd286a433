//! Key-value persistence
//!
//! Everything durable is a JSON string under a fixed key: one score list per
//! game plus the settings blob. On the web the store is LocalStorage; tests
//! and the headless runner use [`MemoryStore`].

use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage is not available")]
    Unavailable,
    #[error("write to `{key}` rejected: {reason}")]
    WriteRejected { key: String, reason: String },
    #[error("failed to encode value: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Opaque string store addressed by key
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// In-process store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
    /// Reject every write, to exercise failure paths
    read_only: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read_only() -> Self {
        Self {
            values: HashMap::new(),
            read_only: true,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        if self.read_only {
            return Err(StoreError::WriteRejected {
                key: key.to_string(),
                reason: "read-only store".to_string(),
            });
        }
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Browser LocalStorage
#[cfg(target_arch = "wasm32")]
pub struct LocalStore {
    storage: web_sys::Storage,
}

#[cfg(target_arch = "wasm32")]
impl LocalStore {
    pub fn open() -> Result<Self, StoreError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .map(|storage| Self { storage })
            .ok_or(StoreError::Unavailable)
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| StoreError::WriteRejected {
                key: key.to_string(),
                reason: format!("{:?}", e),
            })
    }
}

/// Decode the value under `key`. Missing or malformed data yields `None`.
pub fn load_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let json = store.get(key)?;
    match serde_json::from_str(&json) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("Ignoring malformed `{}`: {}", key, e);
            None
        }
    }
}

pub fn save_json<T: Serialize>(
    store: &mut dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let json = serde_json::to_string(value)?;
    store.set(key, &json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_round_trip() {
        let mut store = MemoryStore::new();
        save_json(&mut store, "numbers", &vec![1u32, 2, 3]).unwrap();
        assert_eq!(store.get("numbers").as_deref(), Some("[1,2,3]"));
        let back: Option<Vec<u32>> = load_json(&store, "numbers");
        assert_eq!(back, Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_missing_and_malformed_are_none() {
        let mut store = MemoryStore::new();
        assert_eq!(load_json::<Vec<u32>>(&store, "absent"), None);
        store.set("bad", "{not json").unwrap();
        assert_eq!(load_json::<Vec<u32>>(&store, "bad"), None);
    }

    #[test]
    fn test_read_only_rejects_writes() {
        let mut store = MemoryStore::read_only();
        let err = save_json(&mut store, "k", &1u8).unwrap_err();
        assert!(matches!(err, StoreError::WriteRejected { .. }));
        assert!(err.to_string().contains("`k`"));
        assert!(store.is_empty());
    }
}
