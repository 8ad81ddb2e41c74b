//! Key/value persistence
//!
//! Features:
//! - `KeyValueStore` trait over string keys and values
//! - `MemoryStore` for native runs and tests
//! - `LocalStore` backed by browser LocalStorage (wasm only)
//! - One-shot `funUnlocked` access flag between the home and game pages

use std::collections::HashMap;

use crate::consts::UNLOCK_FLAG_KEY;
use crate::error::StorageError;

/// Minimal string storage
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
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
    /// Fails in private mode or without a window
    pub fn open() -> Result<Self, StorageError> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(StorageError::Unavailable)?;
        Ok(Self { storage })
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage
            .get_item(key)
            .map_err(|_| StorageError::Unavailable)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage
            .set_item(key, value)
            .map_err(|_| StorageError::Write {
                key: key.to_string(),
            })
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.storage
            .remove_item(key)
            .map_err(|_| StorageError::Write {
                key: key.to_string(),
            })
    }
}

/// Set the unlock flag before navigating to the game page
pub fn grant_access(store: &mut dyn KeyValueStore) -> Result<(), StorageError> {
    store.set(UNLOCK_FLAG_KEY, "true")?;
    log::debug!("Unlock flag set");
    Ok(())
}

/// Read and clear the unlock flag. True only if it was set.
pub fn consume_access(store: &mut dyn KeyValueStore) -> Result<bool, StorageError> {
    let granted = store.get(UNLOCK_FLAG_KEY)?.as_deref() == Some("true");
    if granted {
        store.remove(UNLOCK_FLAG_KEY)?;
    }
    Ok(granted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_consumed_once() {
        let mut store = MemoryStore::new();
        assert!(!consume_access(&mut store).unwrap());
        grant_access(&mut store).unwrap();
        assert!(consume_access(&mut store).unwrap());
        assert!(!consume_access(&mut store).unwrap());
        assert_eq!(store.get(UNLOCK_FLAG_KEY).unwrap(), None);
    }

    #[test]
    fn test_other_flag_values_rejected() {
        let mut store = MemoryStore::new();
        store.set(UNLOCK_FLAG_KEY, "yes").unwrap();
        assert!(!consume_access(&mut store).unwrap());
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryStore::new();
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }
}
