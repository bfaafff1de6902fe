//! Lookup strategy trait.
//!
//! Each strategy is one upstream endpoint plus the logic that turns its
//! payload into an [`Estimate`]. Strategies are side-effect-free reads, so
//! racing them and ignoring the losers is safe.

use crate::asn::NormalizedAsn;
use crate::models::BotHumanSplit;
use crate::network::HttpClient;
use crate::Result;
use async_trait::async_trait;
use serde_json::Value;

/// A usable figure from one strategy.
#[derive(Debug, Clone, PartialEq)]
pub struct Estimate {
    pub split: BotHumanSplit,
    /// How the figure was approximated, when it is not a direct measurement.
    pub note: Option<String>,
}

impl Estimate {
    pub fn measured(split: BotHumanSplit) -> Self {
        Self { split, note: None }
    }

    pub fn approximated(split: BotHumanSplit, note: impl Into<String>) -> Self {
        Self {
            split,
            note: Some(note.into()),
        }
    }
}

/// Per-lookup request context shared by all strategies.
#[derive(Clone)]
pub struct StrategyContext {
    http: HttpClient,
    base_url: String,
    token: String,
}

impl StrategyContext {
    pub fn new(http: HttpClient, base_url: &str, token: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }

    /// Join `path` (which starts with `/`) onto the base URL.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Authenticated GET of `path`, decoded as JSON.
    pub async fn get_json(&self, path: &str, source_name: &str) -> Result<Value> {
        self.http
            .get_json_authorized(&self.url(path), &self.token, source_name)
            .await
    }
}

/// One upstream lookup approach.
#[async_trait]
pub trait LookupStrategy: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Fetch an estimate for `asn`. Any failure is an `Err`.
    async fn fetch(&self, asn: &NormalizedAsn, ctx: &StrategyContext) -> Result<Estimate>;
}
