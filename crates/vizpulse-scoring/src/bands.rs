//! Fixed-threshold band classification for social metrics.

use crate::types::{Band, BandSet, SocialAggregate};

/// Below this follower count the band is `Low`.
pub const FOLLOWERS_OK_MIN: u64 = 1_000;
/// Above this follower count the band is `Good`.
pub const FOLLOWERS_OK_MAX: u64 = 5_000;
pub const ENGAGEMENT_OK_MIN: f64 = 0.7;
pub const ENGAGEMENT_OK_MAX: f64 = 1.5;
/// Up to and including this many weekly posts the band is `Low`.
pub const POSTS_LOW_MAX: u64 = 1;
pub const POSTS_OK_MAX: u64 = 3;
pub const STREAK_OK_MAX: u32 = 2;

/// Classify every aggregate metric independently.
#[must_use]
pub fn score_social(aggregate: &SocialAggregate) -> BandSet {
    BandSet {
        followers: followers_band(aggregate.total_followers),
        engagement: engagement_band(aggregate.engagement_rate),
        posts: posts_band(aggregate.posts_7d),
        streak: streak_band(aggregate.streak_weeks),
    }
}

#[must_use]
pub fn followers_band(total: u64) -> Band {
    if total < FOLLOWERS_OK_MIN {
        Band::Low
    } else if total <= FOLLOWERS_OK_MAX {
        Band::Ok
    } else {
        Band::Good
    }
}

/// NaN never clears a threshold and lands in `Low`.
#[must_use]
pub fn engagement_band(rate: f64) -> Band {
    if rate.is_nan() || rate < ENGAGEMENT_OK_MIN {
        Band::Low
    } else if rate <= ENGAGEMENT_OK_MAX {
        Band::Ok
    } else {
        Band::Good
    }
}

#[must_use]
pub fn posts_band(posts_7d: u64) -> Band {
    if posts_7d <= POSTS_LOW_MAX {
        Band::Low
    } else if posts_7d <= POSTS_OK_MAX {
        Band::Ok
    } else {
        Band::Good
    }
}

#[must_use]
pub fn streak_band(weeks: u32) -> Band {
    match weeks {
        0 => Band::Low,
        w if w <= STREAK_OK_MAX => Band::Ok,
        _ => Band::Good,
    }
}
