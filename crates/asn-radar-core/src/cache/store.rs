//! Freshness-gated cache and settings store.
//!
//! `CacheStore` is the boundary where storage errors stop propagating: the
//! `try_*` methods return the backend's `Result`, everything else logs the
//! failure and degrades to "absent" or a no-op, so a broken database behaves
//! like an always-missing cache.

use super::memory::MemoryStore;
use super::sqlite::SqliteStore;
use super::traits::{CacheEntry, KvBackend, CACHE_NAMESPACE, SETTINGS_NAMESPACE};
use crate::error::{AsnRadarError, Result};
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Current time in epoch milliseconds.
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Cache and settings access over a shared [`KvBackend`].
#[derive(Clone)]
pub struct CacheStore {
    backend: Arc<dyn KvBackend>,
}

impl CacheStore {
    pub fn new(backend: Arc<dyn KvBackend>) -> Self {
        Self { backend }
    }

    /// Open a durable store backed by SQLite at `db_path`.
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(Arc::new(SqliteStore::open(db_path)?)))
    }

    /// A non-persistent store, mainly for tests.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    // Cache namespace

    /// Read the stored wrapper for `key` verbatim, keeping storage errors.
    pub fn try_get_raw(&self, key: &str) -> Result<Option<Value>> {
        self.backend.get(CACHE_NAMESPACE, key)
    }

    /// Read the stored wrapper for `key` verbatim.
    pub fn get_raw(&self, key: &str) -> Option<Value> {
        match self.try_get_raw(key) {
            Ok(value) => value,
            Err(e) => {
                warn!("Cache read failed for {}: {}", key, e);
                None
            }
        }
    }

    /// Store `value` for `key` verbatim, bypassing the timestamp wrapper.
    pub fn set_raw(&self, key: &str, value: &Value) {
        if let Err(e) = self.backend.set(CACHE_NAMESPACE, key, value) {
            warn!("Cache write failed for {}: {}", key, e);
        }
    }

    /// Read and decode the wrapper for `key`, whatever its age.
    ///
    /// Entries that are not a `{data, fetchedAt}` object, or whose `data`
    /// doesn't decode as `T`, are treated as absent.
    pub fn get_entry<T: DeserializeOwned>(&self, key: &str) -> Option<CacheEntry<T>> {
        let raw = self.get_raw(key)?;
        match serde_json::from_value(raw) {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!("Ignoring malformed cache entry {}: {}", key, e);
                None
            }
        }
    }

    /// Return the cached data for `key` if it is no older than `max_age`.
    pub fn get_fresh<T: DeserializeOwned>(&self, key: &str, max_age: Duration) -> Option<T> {
        let entry = self.get_entry::<T>(key)?;
        if entry.is_fresh(max_age.as_millis() as u64, now_ms()) {
            Some(entry.data)
        } else {
            None
        }
    }

    /// Overwrite the entry for `key` with `{data, fetchedAt: now}`.
    pub fn set_with_timestamp<T: Serialize>(&self, key: &str, data: &T) {
        let entry = CacheEntry {
            data,
            fetched_at: now_ms(),
        };
        match serde_json::to_value(&entry) {
            Ok(value) => self.set_raw(key, &value),
            Err(e) => warn!("Failed to encode cache entry {}: {}", key, e),
        }
    }

    /// All keys currently held in the cache namespace, fresh or stale.
    pub fn cached_keys(&self) -> Vec<String> {
        self.backend.keys(CACHE_NAMESPACE).unwrap_or_else(|e| {
            warn!("Cache key listing failed: {}", e);
            Vec::new()
        })
    }

    /// Drop every cached lookup. Settings are untouched.
    pub fn clear_cache(&self) -> usize {
        self.backend
            .clear_namespace(CACHE_NAMESPACE)
            .unwrap_or_else(|e| {
                warn!("Cache clear failed: {}", e);
                0
            })
    }

    // Settings namespace

    /// Read a setting, keeping storage errors.
    pub fn try_get_setting(&self, key: &str) -> Result<Option<Value>> {
        self.backend.get(SETTINGS_NAMESPACE, key)
    }

    /// Read a setting, falling back to `default` when it is absent,
    /// undecodable or unreadable.
    pub fn get_setting<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match self.try_get_setting(key) {
            Ok(Some(value)) => serde_json::from_value(value).unwrap_or_else(|e| {
                debug!("Setting {} has unexpected shape: {}", key, e);
                default
            }),
            Ok(None) => default,
            Err(e) => {
                warn!("Settings read failed for {}: {}", key, e);
                default
            }
        }
    }

    /// Persist a setting.
    pub fn set_setting<T: Serialize>(&self, key: &str, value: &T) {
        let result = serde_json::to_value(value)
            .map_err(AsnRadarError::from)
            .and_then(|value| self.backend.set(SETTINGS_NAMESPACE, key, &value));
        if let Err(e) = result {
            warn!("Settings write failed for {}: {}", key, e);
        }
    }
}
