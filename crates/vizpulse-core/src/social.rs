use serde::{Deserialize, Serialize};

/// Metrics for one social network linked to a business.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialChannel {
    /// Network name, e.g. `instagram`.
    #[serde(default)]
    pub network: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub followers: u64,
    /// Engagement rate in percentage points (`1.2` means 1.2%).
    #[serde(default)]
    pub engagement_rate: f64,
    #[serde(default)]
    pub posts_7d: u32,
    /// Consecutive weeks with at least one post.
    #[serde(default)]
    pub streak_weeks: u32,
}
