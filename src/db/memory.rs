//! In-memory store, shared between clones.

use std::sync::Arc;

use dashmap::DashMap;

use super::{KeyValueStore, StoreError};

/// Concurrent in-memory key/value store.
///
/// Clones share the same entries, which lets two sessions observe each
/// other's writes the way two browser tabs share local storage.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: Arc<DashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).map(|v| v.value().clone()))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}
