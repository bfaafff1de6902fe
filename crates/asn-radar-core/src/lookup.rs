//! ASN lookup orchestration.
//!
//! Canonicalize, consult the cache, fetch on a miss, and persist whatever came
//! back. Failures are cached too, under a shorter freshness window, so a
//! misconfigured or unknown ASN does not hammer the upstream API.

use crate::asn::NormalizedAsn;
use crate::cache::{now_ms, CacheStore};
use crate::config::{PathsConfig, RadarConfig};
use crate::models::LookupResult;
use crate::radar::RadarClient;
use crate::settings::{Settings, SettingsUpdate};
use crate::Result;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// Entry point for human/bot share lookups.
pub struct AsnLookupService {
    cache: CacheStore,
    radar: RadarClient,
    negative_ttl: Duration,
}

impl AsnLookupService {
    pub fn new(cache: CacheStore, radar: RadarClient) -> Self {
        Self {
            cache,
            radar,
            negative_ttl: RadarConfig::NEGATIVE_TTL,
        }
    }

    /// Override how long failed lookups stay cached. Always capped by the
    /// configured TTL.
    pub fn with_negative_ttl(mut self, negative_ttl: Duration) -> Self {
        self.negative_ttl = negative_ttl;
        self
    }

    /// Open the SQLite store under `data_dir` with the default upstream client.
    pub fn open(data_dir: impl AsRef<Path>) -> Result<Self> {
        let db_path = data_dir.as_ref().join(PathsConfig::DATABASE_FILENAME);
        let cache = CacheStore::open(&db_path)?;
        info!("Opened lookup store at {}", db_path.display());
        Ok(Self::new(cache, RadarClient::new()?))
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    pub fn settings(&self) -> Settings {
        Settings::load(&self.cache)
    }

    /// Merge `update` over the stored settings and persist the result.
    pub fn update_settings(&self, update: SettingsUpdate) -> Settings {
        self.settings().apply(update).save(&self.cache)
    }

    /// Look up the human/bot share for `raw` (`AS13335`, `as13335`, `13335`...).
    ///
    /// Never fails. A fresh cached result is returned as-is; otherwise the
    /// upstream strategies are raced and the outcome, positive or negative,
    /// overwrites the cache entry.
    pub async fn lookup(&self, raw: &str) -> LookupResult {
        let asn = NormalizedAsn::parse(raw);
        let key = asn.cache_key();
        let settings = self.settings();

        if let Some(cached) = self.cached(&key, &settings) {
            debug!("Cache hit for {}", key);
            return cached;
        }

        debug!("Cache miss for {}, querying upstream", key);
        let result = self.radar.fetch_breakdown(&asn, &settings).await;
        self.cache.set_with_timestamp(&key, &result);
        if result.is_negative() {
            debug!("Cached negative result for {}", key);
        }
        result
    }

    fn cached(&self, key: &str, settings: &Settings) -> Option<LookupResult> {
        let entry = self.cache.get_entry::<LookupResult>(key)?;
        let max_age = self.max_age(&entry.data, settings);
        entry
            .is_fresh(max_age.as_millis() as u64, now_ms())
            .then_some(entry.data)
    }

    fn max_age(&self, result: &LookupResult, settings: &Settings) -> Duration {
        let ttl = settings.ttl();
        if result.is_negative() {
            ttl.min(self.negative_ttl)
        } else {
            ttl
        }
    }
}
