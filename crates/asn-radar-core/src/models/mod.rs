//! Data models shared by the lookup pipeline and the RPC layer.

mod lookup;

pub use lookup::{AsnStatsResponse, BotHumanSplit, LookupResult};
