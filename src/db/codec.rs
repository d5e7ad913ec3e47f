//! Typed JSON access on top of a [`KeyValueStore`].
//!
//! Reads never fail: a missing key, an unreadable store, or a value that no
//! longer parses all yield `None` (or the default). Corruption is logged.

use serde::{de::DeserializeOwned, Serialize};

use super::{KeyValueStore, StoreError};

/// Read and parse a JSON value.
pub fn read_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(key, error = %e, "Store read failed, using default");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key, error = %e, "Malformed persisted value, using default");
            None
        }
    }
}

/// Read and parse a JSON value, falling back to `T::default()`.
pub fn read_json_or_default<T: DeserializeOwned + Default>(
    store: &dyn KeyValueStore,
    key: &str,
) -> T {
    read_json(store, key).unwrap_or_default()
}

/// Serialize and write a JSON value.
pub fn write_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let raw = serde_json::to_string(value).map_err(|source| StoreError::Serialize {
        key: key.to_string(),
        source,
    })?;
    store.set(key, &raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;

    #[test]
    fn test_missing_key_reads_as_default() {
        let store = MemoryStore::new();
        let value: Vec<u32> = read_json_or_default(&store, "absent");
        assert!(value.is_empty());
    }

    #[test]
    fn test_malformed_value_reads_as_default() {
        let store = MemoryStore::new();
        store.set("numbers", "{not json").unwrap();

        let value: Vec<u32> = read_json_or_default(&store, "numbers");
        assert!(value.is_empty());

        // Wrong shape is treated the same as broken syntax
        store.set("numbers", r#"{"a": 1}"#).unwrap();
        assert_eq!(read_json::<Vec<u32>>(&store, "numbers"), None);
    }

    #[test]
    fn test_write_then_read() {
        let store = MemoryStore::new();
        write_json(&store, "numbers", &[3u32, 1, 2]).unwrap();

        let value: Vec<u32> = read_json_or_default(&store, "numbers");
        assert_eq!(value, vec![3, 1, 2]);
    }
}
