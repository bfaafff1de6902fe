//! ASN Radar Core - Headless library for ASN human/bot traffic-share lookups.
//!
//! This crate answers "what share of this network's traffic is human?" for an
//! Autonomous System Number. It races several upstream strategies against the
//! Radar API, normalizes whatever they return, and caches the outcome in a
//! SQLite-backed store. It can be used programmatically without any HTTP/RPC
//! layer; see the `asn-radar-rpc` crate for the JSON-RPC server.
//!
//! # Example
//!
//! ```rust,ignore
//! use asn_radar_core::{AsnLookupService, SettingsUpdate};
//!
//! #[tokio::main]
//! async fn main() -> asn_radar_core::Result<()> {
//!     let service = AsnLookupService::open("/path/to/data")?;
//!     service.update_settings(SettingsUpdate {
//!         radar_token: Some("my-token".into()),
//!         ..Default::default()
//!     });
//!
//!     let result = service.lookup("AS13335").await;
//!     println!("human: {:?}, bot: {:?}", result.human_pct, result.bot_pct);
//!
//!     Ok(())
//! }
//! ```

pub mod asn;
pub mod cache;
pub mod config;
pub mod error;
pub mod lookup;
pub mod models;
pub mod network;
pub mod radar;
pub mod settings;

// Re-export commonly used types
pub use asn::{standardize_display_asn, NormalizedAsn};
pub use cache::{now_ms, CacheEntry, CacheStore, KvBackend, MemoryStore, SqliteStore};
pub use config::{NetworkConfig, PathsConfig, RadarConfig};
pub use error::{AsnRadarError, Result};
pub use lookup::AsnLookupService;
pub use models::{AsnStatsResponse, BotHumanSplit, LookupResult};
pub use network::HttpClient;
pub use radar::{normalize, Estimate, LookupStrategy, RadarClient, StrategyContext};
pub use settings::{Settings, SettingsUpdate};
