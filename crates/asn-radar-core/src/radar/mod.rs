//! Upstream lookups against the Radar API.
//!
//! - [`normalize`]: heuristic human/bot extraction from unknown payloads
//! - [`LookupStrategy`] and the concrete strategies in [`strategies`]
//! - [`RadarClient`]: concurrent race over the strategy set

mod client;
pub mod normalize;
pub mod strategies;
mod strategy;

pub use client::RadarClient;
pub use normalize::{clamp_pct, normalize};
pub use strategies::{EntityStrategy, SpeedRankingStrategy, TrafficTableStrategy};
pub use strategy::{Estimate, LookupStrategy, StrategyContext};
