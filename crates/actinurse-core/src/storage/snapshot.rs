//! Whole-collection JSON snapshots on top of a [`KvStore`].

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::KvStore;
use crate::error::StorageError;

/// Load the JSON array stored under `key`. A missing key is an empty list.
pub fn load<T: DeserializeOwned>(kv: &dyn KvStore, key: &str) -> Result<Vec<T>, StorageError> {
    match kv.get(key)? {
        None => Ok(Vec::new()),
        Some(json) if json.trim().is_empty() => Ok(Vec::new()),
        Some(json) => serde_json::from_str(&json).map_err(|source| StorageError::Snapshot {
            key: key.to_string(),
            source,
        }),
    }
}

/// Overwrite `key` with the JSON array of `items`.
pub fn save<T: Serialize>(kv: &dyn KvStore, key: &str, items: &[T]) -> Result<(), StorageError> {
    let json = serde_json::to_string(items).map_err(|source| StorageError::Snapshot {
        key: key.to_string(),
        source,
    })?;
    kv.set(key, &json)
}
