//! ASN canonicalization.
//!
//! Any input is accepted: the canonical form only strips an optional `AS`
//! prefix and surrounding whitespace, then upper-cases. Nothing is validated
//! before it reaches an upstream URL, so a malformed token simply fails every
//! strategy with "not found".

use crate::config::RadarConfig;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// An ASN in canonical form (`13335` for `AS13335`, `as13335`, ` 13335 `).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedAsn(String);

impl NormalizedAsn {
    pub fn parse(raw: &str) -> Self {
        let upper = raw.trim().to_uppercase();
        let digits = upper.strip_prefix("AS").unwrap_or(&upper);
        Self(digits.to_string())
    }

    /// Canonical token, used as the upstream path segment.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric value, when the canonical token is all digits.
    pub fn as_number(&self) -> Option<u64> {
        self.0.parse().ok()
    }

    /// Key under which lookups for this ASN are cached.
    pub fn cache_key(&self) -> String {
        format!("{}{}", RadarConfig::CACHE_KEY_PREFIX, self.0)
    }

    /// Path segment, percent-encoded.
    pub fn path_segment(&self) -> String {
        urlencoding::encode(&self.0).into_owned()
    }
}

impl fmt::Display for NormalizedAsn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AS{}", self.0)
    }
}

static DISPLAY_ASN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^AS?\d{1,10}$").expect("ASN display regex must compile"));

/// Recognize text that looks like an ASN and return its `AS<digits>` form.
///
/// Used by the page layer to decide whether hovered text is worth a lookup.
pub fn standardize_display_asn(text: &str) -> Option<String> {
    let upper = text.trim().to_uppercase();
    if !DISPLAY_ASN_RE.is_match(&upper) {
        return None;
    }
    let digits = upper.trim_start_matches(|c| c == 'A' || c == 'S');
    Some(format!("AS{}", digits))
}
