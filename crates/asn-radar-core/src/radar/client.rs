//! Radar API client: races all strategies and keeps the first success.

use super::strategies::{EntityStrategy, SpeedRankingStrategy, TrafficTableStrategy};
use super::strategy::{Estimate, LookupStrategy, StrategyContext};
use crate::asn::NormalizedAsn;
use crate::config::RadarConfig;
use crate::models::LookupResult;
use crate::network::HttpClient;
use crate::settings::Settings;
use crate::{AsnRadarError, Result};
use futures::stream::{FuturesUnordered, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Client for the upstream network-intelligence API.
///
/// Strategies run concurrently on every lookup. Outcomes are drained in the
/// order they settle and the first success wins; there is no retry and no
/// tie-break beyond settlement order.
pub struct RadarClient {
    http: HttpClient,
    strategies: Vec<Arc<dyn LookupStrategy>>,
    strategy_timeout: Duration,
}

impl RadarClient {
    /// Create a client with the default HTTP client and strategy set.
    pub fn new() -> Result<Self> {
        Ok(Self::with_http(HttpClient::new()?))
    }

    /// Create a client with the default strategy set over `http`.
    pub fn with_http(http: HttpClient) -> Self {
        Self::with_strategies(http, Self::default_strategies())
    }

    /// Create a client running exactly `strategies`.
    pub fn with_strategies(http: HttpClient, strategies: Vec<Arc<dyn LookupStrategy>>) -> Self {
        let strategy_timeout = http.timeout();
        Self {
            http,
            strategies,
            strategy_timeout,
        }
    }

    /// Bound on how long any single strategy may take before it counts as failed.
    pub fn strategy_timeout(mut self, timeout: Duration) -> Self {
        self.strategy_timeout = timeout;
        self
    }

    pub fn default_strategies() -> Vec<Arc<dyn LookupStrategy>> {
        vec![
            Arc::new(SpeedRankingStrategy),
            Arc::new(TrafficTableStrategy),
            Arc::new(EntityStrategy),
        ]
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Look up the human/bot split for `asn`.
    ///
    /// Never fails: a missing token or an exhausted strategy set becomes a
    /// negative [`LookupResult`] with an explanatory message.
    pub async fn fetch_breakdown(&self, asn: &NormalizedAsn, settings: &Settings) -> LookupResult {
        let ctx = match self.context(settings) {
            Ok(ctx) => ctx,
            Err(e) => {
                debug!("Skipping upstream lookup for {}: {}", asn, e.code());
                return LookupResult::failure(RadarConfig::NO_TOKEN_MESSAGE);
            }
        };

        match self.race(asn, &ctx).await {
            Some((name, estimate)) => {
                debug!("Lookup for {} answered by {}", asn, name);
                LookupResult::estimate(estimate.split, estimate.note)
            }
            None => {
                warn!("All upstream strategies failed for {}", asn);
                LookupResult::failure(RadarConfig::ALL_FAILED_MESSAGE)
            }
        }
    }

    fn context(&self, settings: &Settings) -> Result<StrategyContext> {
        if !settings.has_token() {
            return Err(AsnRadarError::NoToken);
        }
        Ok(StrategyContext::new(
            self.http.clone(),
            &settings.radar_base_url,
            &settings.radar_token,
        ))
    }

    async fn race(
        &self,
        asn: &NormalizedAsn,
        ctx: &StrategyContext,
    ) -> Option<(&'static str, Estimate)> {
        let timeout = self.strategy_timeout;
        let mut pending: FuturesUnordered<_> = self
            .strategies
            .iter()
            .map(|strategy| async move {
                let outcome = match tokio::time::timeout(timeout, strategy.fetch(asn, ctx)).await {
                    Ok(outcome) => outcome,
                    Err(_) => Err(AsnRadarError::Timeout(timeout)),
                };
                (strategy.name(), outcome)
            })
            .collect();

        let mut winner = None;
        while let Some((name, outcome)) = pending.next().await {
            match outcome {
                Ok(estimate) if winner.is_none() => winner = Some((name, estimate)),
                Ok(_) => debug!("Strategy {} settled after the winner", name),
                Err(e) => debug!("Strategy {} failed for {}: {} ({})", name, asn, e, e.code()),
            }
        }
        winner
    }
}
