//! Storage backend trait and cache entry type.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Namespace holding user configuration. Never subject to TTL logic.
pub const SETTINGS_NAMESPACE: &str = "settings";
/// Namespace holding timestamped lookup results.
pub const CACHE_NAMESPACE: &str = "cache";

/// Persistent key-value storage with namespace isolation.
///
/// Values are JSON documents. All operations are synchronous to match
/// rusqlite's API; every write is a full overwrite of one key.
pub trait KvBackend: Send + Sync {
    /// Get the stored value for a key, or `None` if the key is absent.
    fn get(&self, namespace: &str, key: &str) -> Result<Option<Value>>;

    /// Store a value, overwriting any existing value for the key.
    fn set(&self, namespace: &str, key: &str, value: &Value) -> Result<()>;

    /// Remove a key. Returns whether anything was deleted.
    fn remove(&self, namespace: &str, key: &str) -> Result<bool>;

    /// List all keys in a namespace, sorted.
    fn keys(&self, namespace: &str) -> Result<Vec<String>>;

    /// Remove every key in a namespace. Returns the number removed.
    fn clear_namespace(&self, namespace: &str) -> Result<usize>;
}

/// Wrapper persisted for each cached lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry<T> {
    pub data: T,
    /// Epoch milliseconds when `data` was fetched.
    pub fetched_at: i64,
}

impl<T> CacheEntry<T> {
    /// Age of the entry at `now_ms`, clamped at zero for clock skew.
    pub fn age_ms(&self, now_ms: i64) -> u64 {
        now_ms.saturating_sub(self.fetched_at).max(0) as u64
    }

    /// Fresh when younger than or exactly `max_age_ms`. A zero window is
    /// never fresh.
    pub fn is_fresh(&self, max_age_ms: u64, now_ms: i64) -> bool {
        max_age_ms > 0 && self.age_ms(now_ms) <= max_age_ms
    }
}
