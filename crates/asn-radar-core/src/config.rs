//! Centralized configuration for ASN Radar.
//!
//! Compile-time defaults for the upstream API, cache lifetimes and on-disk
//! layout. Runtime settings live in the store; see [`crate::settings`].

use std::time::Duration;

/// Upstream API and lookup policy defaults.
pub struct RadarConfig;

impl RadarConfig {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.cloudflare.com/client/v4/radar";
    pub const DEFAULT_TTL_DAYS: f64 = 7.0;
    pub const DAY_MS: u64 = 24 * 60 * 60 * 1000;
    /// Negative results never outlive this window, whatever `ttlDays` says.
    pub const NEGATIVE_TTL: Duration = Duration::from_secs(60 * 60);
    pub const RANKING_LIMIT: u32 = 1000;
    pub const CACHE_KEY_PREFIX: &'static str = "asn:";

    pub const NO_TOKEN_MESSAGE: &'static str = "Cloudflare Radar token not configured. Please set your API token in extension options to view bot/human traffic data.";
    pub const ALL_FAILED_MESSAGE: &'static str = "Unable to retrieve ASN-specific data from Cloudflare Radar API. The ASN may not be tracked or the endpoints may not be available.";
}

/// Network-related configuration.
pub struct NetworkConfig;

impl NetworkConfig {
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(8);
    pub const USER_AGENT: &'static str = "asn-radar/0.3";
}

/// Shared directory and file names.
pub struct PathsConfig;

impl PathsConfig {
    pub const APP_DIR_NAME: &'static str = "asn-radar";
    pub const DATABASE_FILENAME: &'static str = "asn-radar.sqlite";
}
