//! Process-local store, used by tests and ephemeral sessions.

use super::traits::KvBackend;
use crate::error::{AsnRadarError, Result};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

type Namespaces = BTreeMap<String, BTreeMap<String, Value>>;

/// In-memory [`KvBackend`]. Contents are lost when dropped.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<Namespaces>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Namespaces>> {
        self.entries
            .lock()
            .map_err(|e| AsnRadarError::Other(format!("Memory store poisoned: {}", e)))
    }
}

impl KvBackend for MemoryStore {
    fn get(&self, namespace: &str, key: &str) -> Result<Option<Value>> {
        Ok(self
            .lock()?
            .get(namespace)
            .and_then(|ns| ns.get(key))
            .cloned())
    }

    fn set(&self, namespace: &str, key: &str, value: &Value) -> Result<()> {
        self.lock()?
            .entry(namespace.to_string())
            .or_default()
            .insert(key.to_string(), value.clone());
        Ok(())
    }

    fn remove(&self, namespace: &str, key: &str) -> Result<bool> {
        Ok(self
            .lock()?
            .get_mut(namespace)
            .map(|ns| ns.remove(key).is_some())
            .unwrap_or(false))
    }

    fn keys(&self, namespace: &str) -> Result<Vec<String>> {
        Ok(self
            .lock()?
            .get(namespace)
            .map(|ns| ns.keys().cloned().collect())
            .unwrap_or_default())
    }

    fn clear_namespace(&self, namespace: &str) -> Result<usize> {
        Ok(self
            .lock()?
            .remove(namespace)
            .map(|ns| ns.len())
            .unwrap_or(0))
    }
}
