//! Lookup result types.
//!
//! Field names serialize in camelCase because the browser side reads them
//! verbatim (`humanPct`, `botPct`, `fetchedAt`).

use serde::{Deserialize, Serialize};

/// A human/bot traffic split on a 0-100 scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BotHumanSplit {
    pub human_pct: f64,
    pub bot_pct: f64,
}

impl BotHumanSplit {
    pub fn new(human_pct: f64, bot_pct: f64) -> Self {
        Self { human_pct, bot_pct }
    }

    /// Build a split from a human share, deriving the bot share as the complement.
    pub fn from_human(human_pct: f64) -> Self {
        Self {
            human_pct,
            bot_pct: 100.0 - human_pct,
        }
    }
}

/// Outcome of one ASN lookup, as cached and as returned to callers.
///
/// When both percentages are present the lookup produced an estimate and
/// `error` (if any) is an informational note about how it was derived.
/// When they are absent this is a negative result and `error` explains why.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupResult {
    pub human_pct: Option<f64>,
    pub bot_pct: Option<f64>,
    pub error: Option<String>,
}

impl LookupResult {
    /// A successful estimate, optionally annotated.
    pub fn estimate(split: BotHumanSplit, note: Option<String>) -> Self {
        Self {
            human_pct: Some(split.human_pct),
            bot_pct: Some(split.bot_pct),
            error: note,
        }
    }

    /// A negative result carrying only a message.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            human_pct: None,
            bot_pct: None,
            error: Some(message.into()),
        }
    }

    /// True when the lookup produced no percentages.
    pub fn is_negative(&self) -> bool {
        self.split().is_none()
    }

    pub fn split(&self) -> Option<BotHumanSplit> {
        match (self.human_pct, self.bot_pct) {
            (Some(human), Some(bot)) => Some(BotHumanSplit::new(human, bot)),
            _ => None,
        }
    }
}

/// Wire response for a `radar_asn_stats` request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AsnStatsResponse {
    pub human_pct: Option<f64>,
    pub bot_pct: Option<f64>,
    /// Response time in epoch milliseconds.
    pub fetched_at: i64,
    pub error: Option<String>,
}

impl AsnStatsResponse {
    pub fn from_result(result: LookupResult, fetched_at: i64) -> Self {
        Self {
            human_pct: result.human_pct,
            bot_pct: result.bot_pct,
            fetched_at,
            error: result.error,
        }
    }
}
