//! Persistence boundary for progress data
//!
//! Progress is a handful of JSON documents under fixed keys. Reads that fail
//! or return malformed data count as "nothing stored"; a fresh player simply
//! gets defaults.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{Result, anyhow};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

/// Key of the lifetime statistics record
pub const STATS_KEY: &str = "memgrid-stats";
/// Key of the unlocked achievement id list
pub const ACHIEVEMENTS_KEY: &str = "memgrid-achievements";
/// Key of the daily challenge list
pub const CHALLENGES_KEY: &str = "memgrid-daily-challenges";

/// Durable string key/value storage.
///
/// Implementations serialize access internally; a write replaces the whole
/// value (last writer wins).
pub trait KvStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// Non-durable store for tests and guest sessions
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| anyhow!("Memory store lock poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| anyhow!("Memory store lock poisoned"))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| anyhow!("Memory store lock poisoned"))?;
        entries.remove(key);
        Ok(())
    }
}

/// Read and decode a JSON document, or `None` if absent, unreadable or malformed.
pub fn load_json<T: DeserializeOwned>(store: &dyn KvStore, key: &str) -> Option<T> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            warn!("Failed to read '{}', using defaults: {:#}", key, e);
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Discarding malformed data under '{}': {}", key, e);
            None
        }
    }
}

/// Encode and write a JSON document. Failures are logged, not returned.
pub fn save_json<T: Serialize + ?Sized>(store: &dyn KvStore, key: &str, value: &T) -> bool {
    let encoded = match serde_json::to_string(value) {
        Ok(encoded) => encoded,
        Err(e) => {
            warn!("Failed to encode '{}': {}", key, e);
            return false;
        }
    };

    match store.set(key, &encoded) {
        Ok(()) => true,
        Err(e) => {
            warn!("Failed to write '{}': {:#}", key, e);
            false
        }
    }
}
