//! Dashboard phrases for social bands.
//!
//! Each metric maps to its own fixed `[low, ok, good]` triple; phrases never
//! depend on another metric's band.

use crate::types::{Band, BandSet, PhraseSet};

const FOLLOWERS: [&str; 3] = ["below local median", "growing base", "strong presence"];
const ENGAGEMENT: [&str; 3] = [
    "audience isn't reacting",
    "steady engagement",
    "audience is engaged",
];
const POSTS: [&str; 3] = [
    "no posting cadence",
    "posting occasionally",
    "consistent cadence",
];
const STREAK: [&str; 3] = ["streak broken", "streak building", "streak on fire"];

fn pick(table: &[&'static str; 3], band: Band) -> &'static str {
    match band {
        Band::Low => table[0],
        Band::Ok => table[1],
        Band::Good => table[2],
    }
}

#[must_use]
pub fn social_microcopy(bands: &BandSet) -> PhraseSet {
    PhraseSet {
        followers: pick(&FOLLOWERS, bands.followers),
        engagement: pick(&ENGAGEMENT, bands.engagement),
        posts: pick(&POSTS, bands.posts),
        streak: pick(&STREAK, bands.streak),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{aggregate_social, score_social};
    use vizpulse_core::SocialChannel;

    fn uniform(band: Band) -> BandSet {
        BandSet {
            followers: band,
            engagement: band,
            posts: band,
            streak: band,
        }
    }

    #[test]
    fn all_low_phrases() {
        let phrases = social_microcopy(&uniform(Band::Low));
        assert_eq!(
            phrases,
            PhraseSet {
                followers: "below local median",
                engagement: "audience isn't reacting",
                posts: "no posting cadence",
                streak: "streak broken",
            }
        );
    }

    #[test]
    fn followers_phrases_per_band() {
        for (band, expected) in [
            (Band::Low, "below local median"),
            (Band::Ok, "growing base"),
            (Band::Good, "strong presence"),
        ] {
            assert_eq!(social_microcopy(&uniform(band)).followers, expected);
        }
    }

    #[test]
    fn phrases_do_not_interact() {
        let phrases = social_microcopy(&BandSet {
            followers: Band::Good,
            engagement: Band::Low,
            posts: Band::Ok,
            streak: Band::Good,
        });
        assert_eq!(phrases.followers, "strong presence");
        assert_eq!(phrases.engagement, "audience isn't reacting");
        assert_eq!(phrases.posts, "posting occasionally");
        assert_eq!(phrases.streak, "streak on fire");
    }

    #[test]
    fn all_disabled_channels_end_in_low_microcopy() {
        let channels = [
            SocialChannel {
                network: "facebook".to_string(),
                enabled: false,
                followers: 8_000,
                engagement_rate: 2.4,
                posts_7d: 6,
                streak_weeks: 5,
            },
            SocialChannel {
                network: "instagram".to_string(),
                enabled: false,
                followers: 300,
                engagement_rate: 0.4,
                posts_7d: 1,
                streak_weeks: 0,
            },
        ];
        let bands = score_social(&aggregate_social(&channels));
        assert_eq!(bands, uniform(Band::Low));

        let phrases = social_microcopy(&bands);
        assert_eq!(
            [phrases.followers, phrases.engagement, phrases.posts, phrases.streak],
            [
                "below local median",
                "audience isn't reacting",
                "no posting cadence",
                "streak broken"
            ]
        );
    }

    #[test]
    fn single_strong_channel_scores_all_good() {
        let channels = [
            SocialChannel {
                network: "tiktok".to_string(),
                enabled: false,
                followers: 0,
                engagement_rate: 0.0,
                posts_7d: 0,
                streak_weeks: 0,
            },
            SocialChannel {
                network: "instagram".to_string(),
                enabled: true,
                followers: 6_000,
                engagement_rate: 2.0,
                posts_7d: 5,
                streak_weeks: 4,
            },
        ];
        let bands = score_social(&aggregate_social(&channels));
        assert_eq!(bands, uniform(Band::Good));
    }
}
