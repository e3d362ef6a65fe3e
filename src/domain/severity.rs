use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Usage strictly above this is `High`.
pub const HIGH_THRESHOLD: f64 = 80.0;
/// Usage at or above this (and at most `HIGH_THRESHOLD`) is `Medium`.
pub const MEDIUM_THRESHOLD: f64 = 50.0;

/// Load tier of a sector, derived from its PRB usage percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityTier {
    High,
    Medium,
    Low,
    /// The usage value was missing or not a number.
    Unknown,
}

impl SeverityTier {
    pub fn from_usage(prb_usage: f64) -> Self {
        if prb_usage.is_nan() {
            SeverityTier::Unknown
        } else if prb_usage > HIGH_THRESHOLD {
            SeverityTier::High
        } else if prb_usage >= MEDIUM_THRESHOLD {
            SeverityTier::Medium
        } else {
            SeverityTier::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SeverityTier::High => "high",
            SeverityTier::Medium => "medium",
            SeverityTier::Low => "low",
            SeverityTier::Unknown => "unknown",
        }
    }
}

impl fmt::Display for SeverityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coerce a raw cell to a number. Strings are trimmed before parsing.
pub fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Classify a raw PRB usage cell. Never fails: anything that is not a number
/// is `Unknown`.
pub fn classify(prb_usage: Option<&Value>) -> SeverityTier {
    prb_usage
        .and_then(coerce_number)
        .map(SeverityTier::from_usage)
        .unwrap_or(SeverityTier::Unknown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_threshold_boundaries() {
        assert_eq!(classify(Some(&json!(80))), SeverityTier::Medium);
        assert_eq!(classify(Some(&json!(80.0001))), SeverityTier::High);
        assert_eq!(classify(Some(&json!(50))), SeverityTier::Medium);
        assert_eq!(classify(Some(&json!(49.9999))), SeverityTier::Low);
    }

    #[test]
    fn test_non_numeric_is_unknown() {
        assert_eq!(classify(Some(&json!("abc"))), SeverityTier::Unknown);
        assert_eq!(classify(Some(&json!("N/A"))), SeverityTier::Unknown);
        assert_eq!(classify(Some(&Value::Null)), SeverityTier::Unknown);
        assert_eq!(classify(Some(&json!(true))), SeverityTier::Unknown);
        assert_eq!(classify(Some(&json!("NaN"))), SeverityTier::Unknown);
        assert_eq!(classify(None), SeverityTier::Unknown);
    }

    #[test]
    fn test_typical_usage_values() {
        assert_eq!(classify(Some(&json!(85))), SeverityTier::High);
        assert_eq!(classify(Some(&json!(65))), SeverityTier::Medium);
        assert_eq!(classify(Some(&json!(10))), SeverityTier::Low);
        assert_eq!(classify(Some(&json!("92.5"))), SeverityTier::High);
        assert_eq!(classify(Some(&json!(" 50 "))), SeverityTier::Medium);
        assert_eq!(classify(Some(&json!(-3))), SeverityTier::Low);
    }

    #[test]
    fn test_tier_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&SeverityTier::High).unwrap(), "\"high\"");
        assert_eq!(SeverityTier::Unknown.to_string(), "unknown");
    }
}
