//! Reduce per-channel social metrics to a single aggregate.

use vizpulse_core::SocialChannel;

use crate::types::SocialAggregate;

/// Aggregate enabled channels.
///
/// Followers and posts are summed (saturating at `u64::MAX`), engagement
/// is the mean across enabled channels and the streak is the maximum.
/// Disabled channels are ignored entirely; an empty or all-disabled input
/// yields all zeros.
///
/// The engagement mean sums rates in sorted order so the result is
/// bit-identical for any input ordering.
#[must_use]
pub fn aggregate_social(channels: &[SocialChannel]) -> SocialAggregate {
    let enabled: Vec<&SocialChannel> = channels.iter().filter(|c| c.enabled).collect();
    if enabled.is_empty() {
        return SocialAggregate::default();
    }

    let mut rates: Vec<f64> = enabled.iter().map(|c| c.engagement_rate).collect();
    rates.sort_by(f64::total_cmp);
    #[allow(clippy::cast_precision_loss)]
    let engagement_rate = rates.iter().sum::<f64>() / rates.len() as f64;

    SocialAggregate {
        total_followers: enabled
            .iter()
            .map(|c| c.followers)
            .fold(0, u64::saturating_add),
        engagement_rate,
        posts_7d: enabled
            .iter()
            .map(|c| u64::from(c.posts_7d))
            .fold(0, u64::saturating_add),
        streak_weeks: enabled.iter().map(|c| c.streak_weeks).max().unwrap_or(0),
    }
}
