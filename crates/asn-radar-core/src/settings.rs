//! User settings persisted in the store's settings namespace.
//!
//! Settings are re-read on every lookup so edits apply without a restart.

use crate::cache::CacheStore;
use crate::config::RadarConfig;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::info;

/// Storage keys for each setting.
pub struct SettingsKeys;

impl SettingsKeys {
    pub const RADAR_TOKEN: &'static str = "radarToken";
    pub const RADAR_BASE_URL: &'static str = "radarBaseUrl";
    pub const TTL_DAYS: &'static str = "ttlDays";
}

/// Effective runtime settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Opaque bearer credential. Empty means "not configured".
    pub radar_token: String,
    pub radar_base_url: String,
    pub ttl_days: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            radar_token: String::new(),
            radar_base_url: RadarConfig::DEFAULT_BASE_URL.to_string(),
            ttl_days: RadarConfig::DEFAULT_TTL_DAYS,
        }
    }
}

/// A partial settings change, as sent by the options page.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    pub radar_token: Option<String>,
    pub radar_base_url: Option<String>,
    /// Number or numeric string.
    pub ttl_days: Option<Value>,
}

impl Settings {
    /// Load settings from the store, applying defaults.
    pub fn load(store: &CacheStore) -> Self {
        let defaults = Self::default();
        let radar_token: String = store.get_setting(SettingsKeys::RADAR_TOKEN, String::new());
        let radar_base_url: String =
            store.get_setting(SettingsKeys::RADAR_BASE_URL, defaults.radar_base_url.clone());
        let ttl_days = store
            .get_setting::<Option<Value>>(SettingsKeys::TTL_DAYS, None)
            .and_then(|v| coerce_days(&v))
            .unwrap_or(defaults.ttl_days);

        Self {
            radar_token,
            radar_base_url,
            ttl_days,
        }
        .normalized()
    }

    /// Persist all three settings after normalizing them.
    pub fn save(&self, store: &CacheStore) -> Self {
        let settings = self.clone().normalized();
        store.set_setting(SettingsKeys::RADAR_TOKEN, &settings.radar_token);
        store.set_setting(SettingsKeys::RADAR_BASE_URL, &settings.radar_base_url);
        store.set_setting(SettingsKeys::TTL_DAYS, &settings.ttl_days);
        info!(
            "Saved settings (token configured: {}, base URL: {}, TTL: {} days)",
            settings.has_token(),
            settings.radar_base_url,
            settings.ttl_days
        );
        settings
    }

    /// Merge a partial update over these settings.
    pub fn apply(mut self, update: SettingsUpdate) -> Self {
        if let Some(token) = update.radar_token {
            self.radar_token = token;
        }
        if let Some(base_url) = update.radar_base_url {
            self.radar_base_url = base_url;
        }
        if let Some(days) = update.ttl_days {
            self.ttl_days = coerce_days(&days).unwrap_or(RadarConfig::DEFAULT_TTL_DAYS);
        }
        self.normalized()
    }

    /// Trim the token, default an empty base URL, and floor the TTL.
    pub fn normalized(mut self) -> Self {
        self.radar_token = self.radar_token.trim().to_string();
        let base_url = self.radar_base_url.trim();
        self.radar_base_url = if base_url.is_empty() {
            RadarConfig::DEFAULT_BASE_URL.to_string()
        } else {
            base_url.to_string()
        };
        if !self.ttl_days.is_finite() || self.ttl_days <= 0.0 {
            self.ttl_days = RadarConfig::DEFAULT_TTL_DAYS;
        }
        self
    }

    pub fn has_token(&self) -> bool {
        !self.radar_token.is_empty()
    }

    /// Cache lifetime for positive results.
    pub fn ttl(&self) -> Duration {
        Duration::from_millis(ttl_ms_from_days(self.ttl_days))
    }
}

/// `floor(days * 86_400_000)`, falling back to the default for invalid input.
pub fn ttl_ms_from_days(days: f64) -> u64 {
    let days = if days.is_finite() && days > 0.0 {
        days
    } else {
        RadarConfig::DEFAULT_TTL_DAYS
    };
    (days * RadarConfig::DAY_MS as f64).floor() as u64
}

fn coerce_days(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
