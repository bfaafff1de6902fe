//! Persistent key-value storage for ASN Radar.
//!
//! A single backend holds two namespaces:
//! - `settings`: user configuration, never expired
//! - `cache`: timestamped lookup results, gated by freshness on read
//!
//! There is no eviction. Stale entries stay on disk until the next lookup
//! for the same ASN overwrites them.

mod memory;
mod sqlite;
mod store;
mod traits;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use store::{now_ms, CacheStore};
pub use traits::{CacheEntry, KvBackend, CACHE_NAMESPACE, SETTINGS_NAMESPACE};
