//! Concrete upstream strategies.
//!
//! - [`EntityStrategy`]: per-ASN entity resource, parsed with the normalizer
//! - [`SpeedRankingStrategy`]: bulk speed ranking, approximated from
//!   bandwidth and latency
//! - [`TrafficTableStrategy`]: bulk traffic table, approximated from the
//!   unique-IP to request ratio
//!
//! The two ranking strategies are approximations, not measurements, and
//! always label their estimate with a note.

use super::normalize::normalize;
use super::strategy::{Estimate, LookupStrategy, StrategyContext};
use crate::asn::NormalizedAsn;
use crate::config::RadarConfig;
use crate::models::BotHumanSplit;
use crate::{AsnRadarError, Result};
use async_trait::async_trait;
use serde_json::Value;

const ASN_FIELDS: &[&str] = &["asn", "clientASN", "clientAsn"];

/// Rows of a ranking payload: `result` itself when it is an array, else the
/// first array found directly inside `result` (e.g. `result.top_0`).
fn result_rows(payload: &Value) -> Option<&Vec<Value>> {
    let result = payload.get("result")?;
    if let Some(rows) = result.as_array() {
        return Some(rows);
    }
    result
        .as_object()?
        .values()
        .find_map(|value| value.as_array())
}

fn row_matches(row: &Value, asn: &NormalizedAsn) -> bool {
    ASN_FIELDS.iter().any(|field| match row.get(*field) {
        Some(Value::Number(n)) => n.as_u64().is_some_and(|v| Some(v) == asn.as_number()),
        Some(Value::String(s)) => NormalizedAsn::parse(s) == *asn,
        _ => false,
    })
}

fn find_row<'a>(payload: &'a Value, asn: &NormalizedAsn) -> Option<&'a Value> {
    result_rows(payload)?
        .iter()
        .find(|row| row_matches(row, asn))
}

/// First of `fields` holding a finite number or numeric string.
fn number_field(row: &Value, fields: &[&str]) -> Option<f64> {
    fields.iter().find_map(|field| {
        let value = match row.get(*field)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        value.filter(|v| v.is_finite())
    })
}

/// Per-ASN entity lookup.
pub struct EntityStrategy;

impl EntityStrategy {
    const SOURCE: &'static str = "Entity data";

    /// Human share implied by an entity type. Hosting networks skew toward
    /// automated traffic.
    pub fn human_pct_for_type(asn_type: &str) -> f64 {
        if asn_type.to_lowercase().contains("hosting") {
            30.0
        } else {
            70.0
        }
    }

    fn estimate(result: &Value) -> Estimate {
        if let Some(split) = normalize(result) {
            return Estimate::measured(split);
        }

        let asn_type = result
            .get("type")
            .or_else(|| result.get("asn").and_then(|asn| asn.get("type")))
            .and_then(|t| t.as_str())
            .unwrap_or("unknown");

        Estimate::approximated(
            BotHumanSplit::from_human(Self::human_pct_for_type(asn_type)),
            format!("Estimated from ASN entity type ({})", asn_type),
        )
    }
}

#[async_trait]
impl LookupStrategy for EntityStrategy {
    fn name(&self) -> &'static str {
        "entity"
    }

    async fn fetch(&self, asn: &NormalizedAsn, ctx: &StrategyContext) -> Result<Estimate> {
        let path = format!("/entities/asns/{}", asn.path_segment());
        let payload = ctx.get_json(&path, Self::SOURCE).await?;

        match payload.get("result") {
            Some(result) if result.is_object() => Ok(Self::estimate(result)),
            _ => Err(AsnRadarError::AsnNotFound {
                source_name: Self::SOURCE.to_string(),
            }),
        }
    }
}

/// Bulk speed ranking.
pub struct SpeedRankingStrategy;

impl SpeedRankingStrategy {
    const SOURCE: &'static str = "Speed data";
    pub const NOTE: &'static str = "Estimated from ASN performance data (speed/latency metrics)";

    /// `clamp((bandwidth + latencyScore) / 2, 5, 95)` where the latency score
    /// is `100 - latency`, or 50 when latency is missing or zero.
    pub fn human_pct(row: &Value) -> f64 {
        let bandwidth = number_field(row, &["bandwidth", "bandwidthDownload"]).unwrap_or(0.0);
        let latency_score = match number_field(row, &["latency", "latencyIdle"]) {
            Some(latency) if latency != 0.0 => 100.0 - latency,
            _ => 50.0,
        };
        ((bandwidth + latency_score) / 2.0).clamp(5.0, 95.0)
    }
}

#[async_trait]
impl LookupStrategy for SpeedRankingStrategy {
    fn name(&self) -> &'static str {
        "speed-ranking"
    }

    async fn fetch(&self, asn: &NormalizedAsn, ctx: &StrategyContext) -> Result<Estimate> {
        let path = format!("/quality/speed/top/ases?limit={}", RadarConfig::RANKING_LIMIT);
        let payload = ctx.get_json(&path, Self::SOURCE).await?;

        let row = find_row(&payload, asn).ok_or_else(|| AsnRadarError::AsnNotFound {
            source_name: Self::SOURCE.to_string(),
        })?;

        Ok(Estimate::approximated(
            BotHumanSplit::from_human(Self::human_pct(row)),
            Self::NOTE,
        ))
    }
}

/// Bulk traffic table.
pub struct TrafficTableStrategy;

impl TrafficTableStrategy {
    const SOURCE: &'static str = "Traffic data";
    pub const NOTE: &'static str = "Estimated from ASN traffic patterns (requests/unique IPs)";

    /// `clamp(uniqueIps / requests * 100, 10, 90)` when there are unique IPs,
    /// else 50. A zero request count saturates at the upper bound.
    pub fn human_pct(row: &Value) -> f64 {
        let requests = number_field(row, &["requests"]).unwrap_or(0.0);
        let unique_ips = number_field(row, &["uniqueIps"]).unwrap_or(0.0);

        if unique_ips <= 0.0 {
            return 50.0;
        }
        if requests <= 0.0 {
            return 90.0;
        }
        (unique_ips / requests * 100.0).clamp(10.0, 90.0)
    }
}

#[async_trait]
impl LookupStrategy for TrafficTableStrategy {
    fn name(&self) -> &'static str {
        "traffic-table"
    }

    async fn fetch(&self, asn: &NormalizedAsn, ctx: &StrategyContext) -> Result<Estimate> {
        let path = format!(
            "/netflows/summary?dimensions=asn&limit={}",
            RadarConfig::RANKING_LIMIT
        );
        let payload = ctx.get_json(&path, Self::SOURCE).await?;

        let row = find_row(&payload, asn).ok_or_else(|| AsnRadarError::AsnNotFound {
            source_name: Self::SOURCE.to_string(),
        })?;

        Ok(Estimate::approximated(
            BotHumanSplit::from_human(Self::human_pct(row)),
            Self::NOTE,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LookupResult;
    use crate::network::HttpClient;
    use axum::{extract::Path, http::StatusCode, routing::get, Json, Router};
    use serde_json::json;

    async fn serve(app: Router) -> StrategyContext {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        StrategyContext::new(HttpClient::new().unwrap(), &format!("http://{}/", addr), "tok")
    }

    fn asn(raw: &str) -> NormalizedAsn {
        NormalizedAsn::parse(raw)
    }

    #[test]
    fn test_row_matching() {
        let target = asn("AS13335");
        assert!(row_matches(&json!({"asn": 13335}), &target));
        assert!(row_matches(&json!({"asn": "13335"}), &target));
        assert!(row_matches(&json!({"clientASN": "AS13335"}), &target));
        assert!(!row_matches(&json!({"asn": 15169}), &target));
        assert!(!row_matches(&json!({"name": "x"}), &target));
    }

    #[test]
    fn test_result_rows_shapes() {
        let flat = json!({"result": [{"asn": 1}]});
        assert_eq!(result_rows(&flat).map(Vec::len), Some(1));

        let nested = json!({"result": {"meta": {}, "top_0": [{"asn": 1}, {"asn": 2}]}});
        assert_eq!(result_rows(&nested).map(Vec::len), Some(2));

        assert!(result_rows(&json!({"result": {"meta": {}}})).is_none());
        assert!(result_rows(&json!({})).is_none());
    }

    #[test]
    fn test_speed_formula() {
        assert_eq!(
            SpeedRankingStrategy::human_pct(&json!({"bandwidth": 80, "latency": 20})),
            80.0
        );
        // latency missing -> score 50
        assert_eq!(
            SpeedRankingStrategy::human_pct(&json!({"bandwidth": 30})),
            40.0
        );
        assert_eq!(SpeedRankingStrategy::human_pct(&json!({})), 25.0);
        assert_eq!(
            SpeedRankingStrategy::human_pct(&json!({"bandwidth": 500, "latency": 1})),
            95.0
        );
        assert_eq!(
            SpeedRankingStrategy::human_pct(&json!({"bandwidth": 0, "latency": 300})),
            5.0
        );
        assert_eq!(
            SpeedRankingStrategy::human_pct(&json!({"bandwidthDownload": "60", "latencyIdle": "40"})),
            60.0
        );
    }

    #[test]
    fn test_non_finite_strings_are_ignored() {
        // "NaN" bandwidth counts as missing: (0 + (100 - 20)) / 2
        assert_eq!(
            SpeedRankingStrategy::human_pct(&json!({"bandwidth": "NaN", "latency": 20})),
            40.0
        );
        assert_eq!(
            SpeedRankingStrategy::human_pct(&json!({"bandwidth": 80, "latency": "inf"})),
            65.0
        );
        assert_eq!(
            TrafficTableStrategy::human_pct(&json!({"requests": 100, "uniqueIps": "NaN"})),
            50.0
        );
        assert_eq!(
            TrafficTableStrategy::human_pct(&json!({"requests": 100, "uniqueIps": "inf"})),
            50.0
        );
        assert_eq!(
            TrafficTableStrategy::human_pct(&json!({"requests": "-inf", "uniqueIps": 5})),
            90.0
        );
    }

    #[test]
    fn test_traffic_formula() {
        assert_eq!(
            TrafficTableStrategy::human_pct(&json!({"requests": 1000, "uniqueIps": 400})),
            40.0
        );
        assert_eq!(
            TrafficTableStrategy::human_pct(&json!({"requests": 1000, "uniqueIps": 1})),
            10.0
        );
        assert_eq!(
            TrafficTableStrategy::human_pct(&json!({"requests": 10, "uniqueIps": 50})),
            90.0
        );
        assert_eq!(
            TrafficTableStrategy::human_pct(&json!({"requests": 0, "uniqueIps": 5})),
            90.0
        );
        assert_eq!(
            TrafficTableStrategy::human_pct(&json!({"requests": 1000})),
            50.0
        );
    }

    #[test]
    fn test_entity_type_heuristic() {
        assert_eq!(EntityStrategy::human_pct_for_type("Hosting"), 30.0);
        assert_eq!(EntityStrategy::human_pct_for_type("isp"), 70.0);
        assert_eq!(EntityStrategy::human_pct_for_type("unknown"), 70.0);
    }

    #[tokio::test]
    async fn test_entity_strategy_uses_normalizer() {
        let app = Router::new().route(
            "/entities/asns/:asn",
            get(|Path(asn): Path<String>| async move {
                assert_eq!(asn, "13335");
                Json(json!({"success": true, "result": {"human": 0.8, "bot": 0.2}}))
            }),
        );
        let ctx = serve(app).await;

        let estimate = EntityStrategy.fetch(&asn("as13335"), &ctx).await.unwrap();
        assert_eq!(estimate, Estimate::measured(BotHumanSplit::new(80.0, 20.0)));
    }

    #[tokio::test]
    async fn test_entity_strategy_falls_back_to_type() {
        let app = Router::new().route(
            "/entities/asns/:asn",
            get(|| async { Json(json!({"result": {"asn": {"name": "Example", "type": "hosting"}}})) }),
        );
        let ctx = serve(app).await;

        let estimate = EntityStrategy.fetch(&asn("64500"), &ctx).await.unwrap();
        assert_eq!(estimate.split, BotHumanSplit::new(30.0, 70.0));
        assert_eq!(
            estimate.note.as_deref(),
            Some("Estimated from ASN entity type (hosting)")
        );
    }

    #[tokio::test]
    async fn test_entity_strategy_missing_result() {
        let app = Router::new().route(
            "/entities/asns/:asn",
            get(|| async { Json(json!({"success": false, "result": null})) }),
        );
        let ctx = serve(app).await;

        let err = EntityStrategy.fetch(&asn("1"), &ctx).await.unwrap_err();
        assert_eq!(err.code(), "ASN_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_entity_strategy_http_error() {
        let app = Router::new().route(
            "/entities/asns/:asn",
            get(|| async { StatusCode::NOT_FOUND }),
        );
        let ctx = serve(app).await;

        let err = EntityStrategy.fetch(&asn("1"), &ctx).await.unwrap_err();
        assert_eq!(err.code(), "UPSTREAM_HTTP_404");
    }

    #[tokio::test]
    async fn test_speed_strategy_finds_row() {
        let app = Router::new().route(
            "/quality/speed/top/ases",
            get(|| async {
                Json(json!({"result": [
                    {"asn": 15169, "bandwidth": 10, "latency": 90},
                    {"asn": 13335, "bandwidth": 80, "latency": 20}
                ]}))
            }),
        );
        let ctx = serve(app).await;

        let estimate = SpeedRankingStrategy.fetch(&asn("AS13335"), &ctx).await.unwrap();
        assert_eq!(estimate.split, BotHumanSplit::new(80.0, 20.0));
        assert_eq!(estimate.note.as_deref(), Some(SpeedRankingStrategy::NOTE));
    }

    #[tokio::test]
    async fn test_speed_strategy_estimate_stays_in_range() {
        let app = Router::new().route(
            "/quality/speed/top/ases",
            get(|| async {
                Json(json!({"result": [
                    {"asn": "13335", "bandwidth": "NaN", "latency": "NaN"}
                ]}))
            }),
        );
        let ctx = serve(app).await;

        let estimate = SpeedRankingStrategy.fetch(&asn("AS13335"), &ctx).await.unwrap();
        assert_eq!(estimate.split, BotHumanSplit::new(25.0, 75.0));
        let wire = serde_json::to_value(LookupResult::estimate(estimate.split, estimate.note)).unwrap();
        assert_eq!(wire["humanPct"], 25.0);
        assert_eq!(wire["botPct"], 75.0);
    }

    #[tokio::test]
    async fn test_traffic_strategy_missing_asn() {
        let app = Router::new().route(
            "/netflows/summary",
            get(|| async { Json(json!({"result": [{"asn": 15169, "requests": 10, "uniqueIps": 5}]})) }),
        );
        let ctx = serve(app).await;

        let err = TrafficTableStrategy.fetch(&asn("AS13335"), &ctx).await.unwrap_err();
        assert_eq!(err.to_string(), "ASN not found in Traffic data");
    }
}
