mod config;
pub mod database;
pub mod snapshot;

pub use config::{Config, HousekeepingConfig, NotificationsConfig, SweepConfig};
pub use database::Database;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::error::StorageError;

/// Key of the reminder snapshot blob.
pub const REMINDERS_KEY: &str = "reminders";
/// Key of the notification snapshot blob.
pub const NOTIFICATIONS_KEY: &str = "notifications";

/// Returns `~/.config/actinurse[-dev]/` based on ACTINURSE_ENV.
///
/// Set ACTINURSE_ENV=dev to use the development data directory, or
/// ACTINURSE_HOME to point somewhere else entirely.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let dir = match std::env::var_os("ACTINURSE_HOME") {
        Some(home) => PathBuf::from(home),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("ACTINURSE_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("actinurse-dev")
            } else {
                base_dir.join("actinurse")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| StorageError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}

/// Durable key-value storage holding whole serialized snapshots.
///
/// Writes overwrite the previous value; there is no merge.
pub trait KvStore: Send {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Process-local store, used by tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryKv {
    values: Mutex<HashMap<String, String>>,
    fail_writes: Mutex<bool>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following `set` fail, as a full disk would.
    pub fn fail_writes(&self, fail: bool) {
        *self.fail_writes.lock().unwrap_or_else(|e| e.into_inner()) = fail;
    }
}

impl KvStore for MemoryKv {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self
            .values
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if *self.fail_writes.lock().unwrap_or_else(|e| e.into_inner()) {
            return Err(StorageError::Unavailable(format!("write to '{key}' refused")));
        }
        self.values
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

impl<T: KvStore + Sync> KvStore for std::sync::Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_kv_roundtrip_and_failure() {
        let kv = MemoryKv::new();
        assert_eq!(kv.get("reminders").unwrap(), None);
        kv.set("reminders", "[]").unwrap();
        assert_eq!(kv.get("reminders").unwrap().as_deref(), Some("[]"));

        kv.fail_writes(true);
        assert!(kv.set("reminders", "[1]").is_err());
        assert_eq!(kv.get("reminders").unwrap().as_deref(), Some("[]"));
    }
}
