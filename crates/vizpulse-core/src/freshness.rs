//! Snapshot freshness policy.

use chrono::{DateTime, Duration, Utc};

/// Maximum snapshot age, in minutes, still considered current.
pub const FRESHNESS_WINDOW_MINUTES: i64 = 1440;

/// Returns `true` when `captured_at` is no older than the freshness window at `now`.
///
/// The boundary is inclusive: a snapshot exactly 1440 minutes old is fresh.
/// Capture times in the future (clock skew on the ingestion side) count as fresh.
#[must_use]
pub fn is_fresh(captured_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now.signed_duration_since(captured_at) <= Duration::minutes(FRESHNESS_WINDOW_MINUTES)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, 12, 0, 0).unwrap()
    }

    #[test]
    fn just_captured_is_fresh() {
        assert!(is_fresh(now(), now()));
    }

    #[test]
    fn exactly_at_window_is_fresh() {
        let captured = now() - Duration::minutes(FRESHNESS_WINDOW_MINUTES);
        assert!(is_fresh(captured, now()));
    }

    #[test]
    fn one_second_past_window_is_stale() {
        let captured = now() - Duration::minutes(FRESHNESS_WINDOW_MINUTES) - Duration::seconds(1);
        assert!(!is_fresh(captured, now()));
    }

    #[test]
    fn several_days_old_is_stale() {
        assert!(!is_fresh(now() - Duration::days(3), now()));
    }

    #[test]
    fn future_capture_is_fresh() {
        assert!(is_fresh(now() + Duration::minutes(5), now()));
    }

    #[test]
    fn window_is_one_day() {
        assert_eq!(Duration::minutes(FRESHNESS_WINDOW_MINUTES), Duration::hours(24));
    }
}
