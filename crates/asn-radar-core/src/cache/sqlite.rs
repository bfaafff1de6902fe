//! SQLite-based key-value store.

use super::traits::KvBackend;
use crate::error::{AsnRadarError, Result};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

/// SQLite-based storage backend.
///
/// Provides namespace-isolated storage in a single database file.
/// Thread-safe via internal mutex on the connection.
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open (or create) a store at the specified database path.
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        let db_path = db_path.as_ref();

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| AsnRadarError::Io {
                message: format!("Failed to create store directory: {}", e),
                path: Some(parent.to_path_buf()),
                source: Some(e),
            })?;
        }

        let conn = Connection::open(db_path).map_err(|e| AsnRadarError::Database {
            message: format!("Failed to open store database: {}", e),
            source: Some(e),
        })?;

        // WAL keeps readers unblocked while a lookup writes its result
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")
            .map_err(|e| AsnRadarError::Database {
                message: format!("Failed to set pragmas: {}", e),
                source: Some(e),
            })?;

        Self::from_connection(conn)
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| AsnRadarError::Database {
            message: format!("Failed to open in-memory database: {}", e),
            source: Some(e),
        })?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| AsnRadarError::Database {
            message: format!("Failed to lock database: {}", e),
            source: None,
        })
    }

    fn init_schema(&self) -> Result<()> {
        let conn = self.lock()?;

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS kv_entries (
                namespace TEXT NOT NULL,
                key TEXT NOT NULL,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                PRIMARY KEY (namespace, key)
            );
            "#,
        )
        .map_err(|e| AsnRadarError::Database {
            message: format!("Failed to initialize store schema: {}", e),
            source: Some(e),
        })?;

        Ok(())
    }
}

impl KvBackend for SqliteStore {
    fn get(&self, namespace: &str, key: &str) -> Result<Option<Value>> {
        let conn = self.lock()?;

        let raw: Option<String> = conn
            .query_row(
                "SELECT value FROM kv_entries WHERE namespace = ?1 AND key = ?2",
                params![namespace, key],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| AsnRadarError::Database {
                message: format!("Failed to query entry: {}", e),
                source: Some(e),
            })?;

        match raw {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }

    fn set(&self, namespace: &str, key: &str, value: &Value) -> Result<()> {
        let conn = self.lock()?;
        let text = serde_json::to_string(value)?;
        let now = Utc::now().to_rfc3339();

        conn.execute(
            r#"
            INSERT OR REPLACE INTO kv_entries (namespace, key, value, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![namespace, key, text, now],
        )
        .map_err(|e| AsnRadarError::Database {
            message: format!("Failed to set entry: {}", e),
            source: Some(e),
        })?;

        Ok(())
    }

    fn remove(&self, namespace: &str, key: &str) -> Result<bool> {
        let conn = self.lock()?;

        let deleted = conn
            .execute(
                "DELETE FROM kv_entries WHERE namespace = ?1 AND key = ?2",
                params![namespace, key],
            )
            .map_err(|e| AsnRadarError::Database {
                message: format!("Failed to remove entry: {}", e),
                source: Some(e),
            })?;

        Ok(deleted > 0)
    }

    fn keys(&self, namespace: &str) -> Result<Vec<String>> {
        let conn = self.lock()?;

        let mut stmt = conn
            .prepare("SELECT key FROM kv_entries WHERE namespace = ?1 ORDER BY key")
            .map_err(|e| AsnRadarError::Database {
                message: format!("Failed to prepare key listing: {}", e),
                source: Some(e),
            })?;

        let keys = stmt
            .query_map(params![namespace], |row| row.get(0))
            .map_err(|e| AsnRadarError::Database {
                message: format!("Failed to list keys: {}", e),
                source: Some(e),
            })?
            .filter_map(|r| r.ok())
            .collect();

        Ok(keys)
    }

    fn clear_namespace(&self, namespace: &str) -> Result<usize> {
        let conn = self.lock()?;

        let deleted = conn
            .execute(
                "DELETE FROM kv_entries WHERE namespace = ?1",
                params![namespace],
            )
            .map_err(|e| AsnRadarError::Database {
                message: format!("Failed to clear namespace: {}", e),
                source: Some(e),
            })?;

        debug!("Cleared {} entries from namespace '{}'", deleted, namespace);

        Ok(deleted)
    }
}
