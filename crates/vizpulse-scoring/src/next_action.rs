//! Review-driven next-action recommendation.

use vizpulse_core::Snapshot;

use crate::types::NextAction;

/// Fewer new reviews than this in 30 days always asks for velocity first.
pub const REVIEW_VELOCITY_MIN: i32 = 5;
/// Lifetime review count below which volume becomes the focus.
pub const REVIEW_VOLUME_MIN: i32 = 50;

/// Pick the recommendation for a business.
///
/// An unclaimed profile short-circuits to [`NextAction::ClaimProfile`]. Velocity
/// wins over volume, and is also the fallback once both thresholds are met.
#[must_use]
pub fn next_action(has_profile: bool, reviews_last_30d: i32, review_count: i32) -> NextAction {
    if !has_profile {
        return NextAction::ClaimProfile;
    }
    if reviews_last_30d < REVIEW_VELOCITY_MIN {
        NextAction::BoostReviewVelocity
    } else if review_count < REVIEW_VOLUME_MIN {
        NextAction::GrowReviewVolume
    } else {
        NextAction::BoostReviewVelocity
    }
}

impl NextAction {
    /// Recommendation for an optional snapshot; no snapshot means no verified presence.
    #[must_use]
    pub fn for_snapshot(snapshot: Option<&Snapshot>) -> Self {
        snapshot.map_or(NextAction::ClaimProfile, |s| {
            next_action(s.has_profile, s.reviews_last_30d, s.review_count)
        })
    }

    #[must_use]
    pub fn headline(self) -> &'static str {
        match self {
            NextAction::ClaimProfile => "Claim your profile",
            NextAction::BoostReviewVelocity => "Ask this week's customers for a review",
            NextAction::GrowReviewVolume => "Build up your total review count",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn missing_presence_short_circuits() {
        assert_eq!(next_action(false, 0, 0), NextAction::ClaimProfile);
        assert_eq!(next_action(false, 40, 900), NextAction::ClaimProfile);
    }

    #[test]
    fn low_velocity_wins_over_low_volume() {
        assert_eq!(next_action(true, 4, 10), NextAction::BoostReviewVelocity);
        assert_eq!(next_action(true, 0, 500), NextAction::BoostReviewVelocity);
    }

    #[test]
    fn volume_message_when_velocity_is_healthy() {
        assert_eq!(next_action(true, 5, 49), NextAction::GrowReviewVolume);
    }

    #[test]
    fn defaults_to_velocity_when_both_healthy() {
        assert_eq!(next_action(true, 5, 50), NextAction::BoostReviewVelocity);
        assert_eq!(next_action(true, 30, 1_000), NextAction::BoostReviewVelocity);
    }

    #[test]
    fn no_snapshot_means_claim() {
        assert_eq!(NextAction::for_snapshot(None), NextAction::ClaimProfile);
    }

    #[test]
    fn snapshot_fields_drive_recommendation() {
        let snapshot = Snapshot {
            place_id: "ChIJ-abc".to_string(),
            captured_at: Utc::now(),
            has_profile: true,
            rating: None,
            review_count: 12,
            reviews_last_30d: 8,
            negative_review_count: 0,
            negative_share: None,
            visual_trust: None,
            ui_variant: None,
            distribution: None,
        };
        assert_eq!(
            NextAction::for_snapshot(Some(&snapshot)),
            NextAction::GrowReviewVolume
        );
        assert_eq!(
            NextAction::ClaimProfile.headline(),
            "Claim your profile"
        );
    }
}
