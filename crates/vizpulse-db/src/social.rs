//! Database reads for the `social_channels` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use vizpulse_core::SocialChannel;

use crate::DbError;

/// A row from the `social_channels` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SocialChannelRow {
    pub id: i64,
    pub place_id: String,
    pub network: String,
    pub enabled: bool,
    pub followers: i64,
    pub engagement_rate: f64,
    pub posts_7d: i32,
    pub streak_weeks: i32,
    pub updated_at: DateTime<Utc>,
}

impl From<SocialChannelRow> for SocialChannel {
    /// Negative counters written by a misbehaving integration are clamped to zero.
    fn from(row: SocialChannelRow) -> Self {
        SocialChannel {
            network: row.network,
            enabled: row.enabled,
            followers: u64::try_from(row.followers).unwrap_or(0),
            engagement_rate: row.engagement_rate,
            posts_7d: u32::try_from(row.posts_7d).unwrap_or(0),
            streak_weeks: u32::try_from(row.streak_weeks).unwrap_or(0),
        }
    }
}

/// Returns every channel linked to a business, enabled or not, ordered by network.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_social_channels(
    pool: &PgPool,
    place_id: &str,
) -> Result<Vec<SocialChannel>, DbError> {
    let rows = sqlx::query_as::<_, SocialChannelRow>(
        "SELECT id, place_id, network, enabled, followers, engagement_rate, \
                posts_7d, streak_weeks, updated_at \
         FROM social_channels \
         WHERE place_id = $1 \
         ORDER BY network",
    )
    .bind(place_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(SocialChannel::from).collect())
}
