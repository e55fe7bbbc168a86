use serde::Serialize;

/// Social metrics summed/averaged across enabled channels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SocialAggregate {
    pub total_followers: u64,
    /// Mean engagement rate across enabled channels. 0.0 if none enabled.
    pub engagement_rate: f64,
    pub posts_7d: u64,
    /// Longest streak among enabled channels. 0 if none enabled.
    pub streak_weeks: u32,
}

/// Ordered severity classification for a single metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Band {
    Low,
    Ok,
    Good,
}

impl Band {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Band::Low => "low",
            Band::Ok => "ok",
            Band::Good => "good",
        }
    }
}

impl std::fmt::Display for Band {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BandSet {
    pub followers: Band,
    pub engagement: Band,
    pub posts: Band,
    pub streak: Band,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PhraseSet {
    pub followers: &'static str,
    pub engagement: &'static str,
    pub posts: &'static str,
    pub streak: &'static str,
}

/// The single recommendation surfaced next to a review snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NextAction {
    /// No verified map-platform presence; everything else is moot.
    ClaimProfile,
    BoostReviewVelocity,
    GrowReviewVolume,
}
