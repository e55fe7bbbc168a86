//! Map-platform review snapshots as seen by the dashboard.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::freshness::is_fresh;

/// Review counts per star level.
///
/// Only the levels present in the stored payload are populated; missing levels
/// stay `None` rather than being filled with zero. Keys other than the five
/// star levels make the payload undecodable, so a decoded value always
/// re-encodes to the object it came from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RatingsDistribution {
    #[serde(default, alias = "1", skip_serializing_if = "Option::is_none")]
    pub one: Option<u32>,
    #[serde(default, alias = "2", skip_serializing_if = "Option::is_none")]
    pub two: Option<u32>,
    #[serde(default, alias = "3", skip_serializing_if = "Option::is_none")]
    pub three: Option<u32>,
    #[serde(default, alias = "4", skip_serializing_if = "Option::is_none")]
    pub four: Option<u32>,
    #[serde(default, alias = "5", skip_serializing_if = "Option::is_none")]
    pub five: Option<u32>,
}

impl RatingsDistribution {
    /// Decode a distribution from a JSON column value.
    ///
    /// Accepts either a JSON object or a string holding a JSON object; the
    /// ingestion side has written both shapes over time.
    ///
    /// # Errors
    ///
    /// Returns [`serde_json::Error`] when the value is neither shape or holds
    /// counts that are not non-negative integers.
    pub fn from_json(value: &Value) -> Result<Self, serde_json::Error> {
        match value {
            Value::String(encoded) => serde_json::from_str(encoded),
            other => Self::deserialize(other),
        }
    }

    /// Sum of all populated star levels.
    #[must_use]
    pub fn total(&self) -> u64 {
        [self.one, self.two, self.three, self.four, self.five]
            .into_iter()
            .flatten()
            .map(u64::from)
            .sum()
    }
}

/// The authoritative (latest) snapshot for one business.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub place_id: String,
    pub captured_at: DateTime<Utc>,
    /// Whether the business has claimed its map-platform profile.
    pub has_profile: bool,
    pub rating: Option<Decimal>,
    pub review_count: i32,
    pub reviews_last_30d: i32,
    pub negative_review_count: i32,
    /// Fraction of reviews that are negative, in `[0, 1]`.
    pub negative_share: Option<Decimal>,
    /// 0–100.
    pub visual_trust: Option<i16>,
    pub ui_variant: Option<String>,
    pub distribution: Option<RatingsDistribution>,
}

/// How a renderer should treat the snapshot it was handed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Staleness {
    Fresh,
    /// Show the data with a "may be outdated" treatment.
    Stale,
    /// Nothing to show; render the empty state.
    Missing,
}

/// Result of a latest-snapshot lookup paired with its freshness at read time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatestSnapshot {
    pub row: Option<Snapshot>,
    pub is_fresh: bool,
}

impl LatestSnapshot {
    #[must_use]
    pub fn missing() -> Self {
        Self {
            row: None,
            is_fresh: false,
        }
    }

    /// Pair a snapshot with its freshness evaluated at `now`.
    #[must_use]
    pub fn evaluated(row: Snapshot, now: DateTime<Utc>) -> Self {
        let is_fresh = is_fresh(row.captured_at, now);
        Self {
            row: Some(row),
            is_fresh,
        }
    }

    #[must_use]
    pub fn staleness(&self) -> Staleness {
        match (&self.row, self.is_fresh) {
            (None, _) => Staleness::Missing,
            (Some(_), true) => Staleness::Fresh,
            (Some(_), false) => Staleness::Stale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use serde_json::json;

    fn sample_snapshot(captured_at: DateTime<Utc>) -> Snapshot {
        Snapshot {
            place_id: "ChIJ-test".to_string(),
            captured_at,
            has_profile: true,
            rating: Some(Decimal::new(46, 1)),
            review_count: 120,
            reviews_last_30d: 4,
            negative_review_count: 6,
            negative_share: Some(Decimal::new(5, 2)),
            visual_trust: Some(72),
            ui_variant: Some("b".to_string()),
            distribution: None,
        }
    }

    #[test]
    fn distribution_decodes_partial_object_exactly() {
        let raw = json!({"five": 10, "four": 2});
        let dist = RatingsDistribution::from_json(&raw).expect("decode");
        assert_eq!(
            dist,
            RatingsDistribution {
                five: Some(10),
                four: Some(2),
                ..RatingsDistribution::default()
            }
        );
        assert_eq!(serde_json::to_value(&dist).expect("encode"), raw);
    }

    #[test]
    fn distribution_decodes_string_encoded_object() {
        let raw = Value::String(r#"{"one":1,"five":3}"#.to_string());
        let dist = RatingsDistribution::from_json(&raw).expect("decode");
        assert_eq!(dist.one, Some(1));
        assert_eq!(dist.five, Some(3));
        assert_eq!(dist.total(), 4);
    }

    #[test]
    fn distribution_accepts_numeric_star_keys() {
        let dist = RatingsDistribution::from_json(&json!({"5": 7, "1": 2})).expect("decode");
        assert_eq!(dist.five, Some(7));
        assert_eq!(dist.one, Some(2));
    }

    #[test]
    fn distribution_rejects_malformed_values() {
        assert!(RatingsDistribution::from_json(&json!("not json")).is_err());
        assert!(RatingsDistribution::from_json(&json!([1, 2, 3])).is_err());
        assert!(RatingsDistribution::from_json(&json!({"five": -1})).is_err());
        assert!(RatingsDistribution::from_json(&json!({"five": "many"})).is_err());
    }

    #[test]
    fn distribution_rejects_unknown_keys() {
        let raw = json!({"five": 10, "four": 2, "total": 12});
        assert!(RatingsDistribution::from_json(&raw).is_err());
        assert!(RatingsDistribution::from_json(&json!(r#"{"six": 1}"#)).is_err());
    }

    #[test]
    fn missing_snapshot_is_never_fresh() {
        let latest = LatestSnapshot::missing();
        assert!(latest.row.is_none());
        assert!(!latest.is_fresh);
        assert_eq!(latest.staleness(), Staleness::Missing);
    }

    #[test]
    fn evaluated_snapshot_reports_staleness() {
        let now = Utc.with_ymd_and_hms(2026, 5, 1, 9, 30, 0).unwrap();

        let fresh = LatestSnapshot::evaluated(sample_snapshot(now - Duration::hours(2)), now);
        assert!(fresh.is_fresh);
        assert_eq!(fresh.staleness(), Staleness::Fresh);

        let stale = LatestSnapshot::evaluated(sample_snapshot(now - Duration::hours(30)), now);
        assert!(!stale.is_fresh);
        assert_eq!(stale.staleness(), Staleness::Stale);
    }
}
