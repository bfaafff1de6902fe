//! Best-effort human/bot split extraction from an unknown JSON payload.
//!
//! The upstream schema is undocumented and shifts between endpoints, so this
//! looks for any numeric field whose name mentions "human" or "bot" rather
//! than validating a shape. Matches at a shallower level win over nested
//! ones, and within a level the first key in document order wins.

use crate::models::BotHumanSplit;
use serde_json::Value;

#[derive(Debug, Default, Clone, Copy)]
struct Found {
    human: Option<f64>,
    bot: Option<f64>,
}

impl Found {
    fn complete(&self) -> bool {
        self.human.is_some() && self.bot.is_some()
    }

    fn fill_from(&mut self, other: Found) {
        if self.human.is_none() {
            self.human = other.human;
        }
        if self.bot.is_none() {
            self.bot = other.bot;
        }
    }
}

/// Interpret a raw value as a percentage.
///
/// Values at or below 1 are fractions and get scaled by 100. The result is
/// clamped to `[0, 100]`.
pub fn clamp_pct(raw: f64) -> f64 {
    let pct = if raw <= 1.0 { raw * 100.0 } else { raw };
    pct.clamp(0.0, 100.0)
}

/// Locate a human/bot split anywhere in `payload`.
///
/// When only one side is present the other is derived as its complement.
/// Returns `None` if neither side is found.
pub fn normalize(payload: &Value) -> Option<BotHumanSplit> {
    let found = search(payload);
    match (found.human, found.bot) {
        (Some(human), Some(bot)) => Some(BotHumanSplit::new(human, bot)),
        (Some(human), None) => Some(BotHumanSplit::new(human, 100.0 - human)),
        (None, Some(bot)) => Some(BotHumanSplit::new(100.0 - bot, bot)),
        (None, None) => None,
    }
}

fn search(value: &Value) -> Found {
    let mut found = Found::default();

    match value {
        Value::Object(map) => {
            for (key, v) in map {
                let Some(n) = v.as_f64() else { continue };
                let key = key.to_lowercase();
                if found.human.is_none() && key.contains("human") {
                    found.human = Some(clamp_pct(n));
                }
                if found.bot.is_none() && key.contains("bot") {
                    found.bot = Some(clamp_pct(n));
                }
            }
            for v in map.values() {
                if found.complete() {
                    break;
                }
                if v.is_object() || v.is_array() {
                    found.fill_from(search(v));
                }
            }
        }
        Value::Array(items) => {
            for v in items {
                if found.complete() {
                    break;
                }
                found.fill_from(search(v));
            }
        }
        _ => {}
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn split(human: f64, bot: f64) -> Option<BotHumanSplit> {
        Some(BotHumanSplit::new(human, bot))
    }

    #[test]
    fn test_fraction_and_percentage_agree() {
        let expected = split(80.0, 20.0);
        assert_eq!(normalize(&json!({"human": 0.8, "bot": 0.2})), expected);
        assert_eq!(
            normalize(&json!({"humanPercentage": 80, "botPercentage": 20})),
            expected
        );
    }

    #[test]
    fn test_complement_from_human_only() {
        assert_eq!(normalize(&json!({"human": 0.75})), split(75.0, 25.0));
    }

    #[test]
    fn test_complement_from_bot_only() {
        assert_eq!(normalize(&json!({"bot": 30})), split(70.0, 30.0));
    }

    #[test]
    fn test_clamping() {
        assert_eq!(
            normalize(&json!({"human": 150, "bot": -10})),
            split(100.0, 0.0)
        );
    }

    #[test]
    fn test_key_match_is_case_insensitive() {
        assert_eq!(
            normalize(&json!({"HUMAN_share": 60, "isBot": 40})),
            split(60.0, 40.0)
        );
    }

    #[test]
    fn test_radar_summary_shape() {
        let payload = json!({
            "success": true,
            "result": {
                "meta": {"dateRange": [{"startTime": "2024-01-01T00:00:00Z"}]},
                "summary_0": {"bot": "24.5", "human": 75.5}
            }
        });
        // string-typed values are ignored, so bot is derived
        assert_eq!(normalize(&payload), split(75.5, 24.5));
    }

    #[test]
    fn test_nested_values() {
        let payload = json!({"result": {"summary_0": {"human": 0.6, "bot": 0.4}}});
        assert_eq!(normalize(&payload), split(60.0, 40.0));
    }

    #[test]
    fn test_shallow_match_beats_nested() {
        let payload = json!({
            "detail": {"human": 10, "bot": 90},
            "human": 70
        });
        assert_eq!(normalize(&payload), split(70.0, 90.0));
    }

    #[test]
    fn test_first_key_wins_at_same_level() {
        let payload = json!({"humanShare": 55, "humanRaw": 99, "bot": 45});
        assert_eq!(normalize(&payload), split(55.0, 45.0));
    }

    #[test]
    fn test_nested_categories_merge_across_branches() {
        let payload = json!({
            "a": {"human": 65},
            "b": {"bot": 35}
        });
        assert_eq!(normalize(&payload), split(65.0, 35.0));
    }

    #[test]
    fn test_arrays_are_searched() {
        let payload = json!({"result": [{"name": "x"}, {"bot_pct": 0.1}]});
        assert_eq!(normalize(&payload), split(90.0, 10.0));
    }

    #[test]
    fn test_boundary_value_one_is_a_fraction() {
        assert_eq!(normalize(&json!({"human": 1})), split(100.0, 0.0));
    }

    #[test]
    fn test_nothing_found() {
        assert_eq!(normalize(&json!({"invalid": "data"})), None);
        assert_eq!(normalize(&json!({})), None);
        assert_eq!(normalize(&json!(null)), None);
        assert_eq!(normalize(&json!(42)), None);
    }
}
