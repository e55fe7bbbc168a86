//! Latest-snapshot lookup over the `snapshot_scores` projection with a
//! `raw_snapshots` fallback for the ratings distribution.

use std::future::Future;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value;
use sqlx::PgPool;
use vizpulse_core::{LatestSnapshot, RatingsDistribution, Snapshot};

use crate::DbError;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `snapshot_scores` view.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SnapshotScoreRow {
    pub id: i64,
    pub place_id: String,
    pub captured_at: DateTime<Utc>,
    pub has_profile: bool,
    pub rating: Option<Decimal>,
    pub review_count: i32,
    pub reviews_last_30d: i32,
    pub negative_review_count: i32,
    pub negative_share: Option<Decimal>,
    pub visual_trust: Option<i16>,
    pub ui_variant: Option<String>,
    /// Undecoded; may be missing, JSON `null`, or malformed.
    pub reviews_distribution: Option<Value>,
}

impl SnapshotScoreRow {
    fn into_snapshot(self, distribution: Option<RatingsDistribution>) -> Snapshot {
        Snapshot {
            place_id: self.place_id,
            captured_at: self.captured_at,
            has_profile: self.has_profile,
            rating: self.rating,
            review_count: self.review_count,
            reviews_last_30d: self.reviews_last_30d,
            negative_review_count: self.negative_review_count,
            negative_share: self.negative_share,
            visual_trust: self.visual_trust,
            ui_variant: self.ui_variant,
            distribution,
        }
    }
}

// ---------------------------------------------------------------------------
// Source seam
// ---------------------------------------------------------------------------

/// The two reads the snapshot adapter needs from storage.
///
/// Implemented for [`PgPool`]; tests substitute an in-memory source.
pub trait SnapshotSource {
    /// Latest projection row for the business, `Ok(None)` when there is none.
    fn latest_score_row(
        &self,
        place_id: &str,
    ) -> impl Future<Output = Result<Option<SnapshotScoreRow>, DbError>> + Send;

    /// `raw_payload` of the latest raw snapshot, `Ok(None)` when there is none.
    fn latest_raw_payload(
        &self,
        place_id: &str,
    ) -> impl Future<Output = Result<Option<Value>, DbError>> + Send;
}

impl SnapshotSource for PgPool {
    async fn latest_score_row(&self, place_id: &str) -> Result<Option<SnapshotScoreRow>, DbError> {
        get_latest_snapshot_score(self, place_id).await
    }

    async fn latest_raw_payload(&self, place_id: &str) -> Result<Option<Value>, DbError> {
        get_latest_raw_payload(self, place_id).await
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Returns the most recent `snapshot_scores` row for a business, if any.
///
/// Ordered by `captured_at DESC, id DESC` so that the first row is always the
/// latest, even when multiple snapshots share the same timestamp.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_latest_snapshot_score(
    pool: &PgPool,
    place_id: &str,
) -> Result<Option<SnapshotScoreRow>, DbError> {
    let row = sqlx::query_as::<_, SnapshotScoreRow>(
        "SELECT id, place_id, captured_at, has_profile, rating, review_count, \
                reviews_last_30d, negative_review_count, negative_share, visual_trust, \
                ui_variant, reviews_distribution \
         FROM snapshot_scores \
         WHERE place_id = $1 \
         ORDER BY captured_at DESC, id DESC \
         LIMIT 1",
    )
    .bind(place_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Returns the `raw_payload` of the most recent `raw_snapshots` row, if any.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_latest_raw_payload(
    pool: &PgPool,
    place_id: &str,
) -> Result<Option<Value>, DbError> {
    let payload = sqlx::query_scalar::<_, Value>(
        "SELECT raw_payload FROM raw_snapshots \
         WHERE place_id = $1 \
         ORDER BY captured_at DESC, id DESC \
         LIMIT 1",
    )
    .bind(place_id)
    .fetch_optional(pool)
    .await?;

    Ok(payload)
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Fetch the latest snapshot for a business and evaluate its freshness at `now`.
///
/// The projection is read first. Only when its ratings distribution is missing
/// or undecodable is the latest raw snapshot read to recover it from
/// `raw_payload.reviews_distribution`. Distribution problems never fail the
/// fetch; the snapshot is returned with `distribution: None` instead.
///
/// No projection row yields [`LatestSnapshot::missing`].
///
/// # Errors
///
/// Returns any projection query error other than not-found, unmodified.
pub async fn fetch_latest_snapshot<S>(
    source: &S,
    place_id: &str,
    now: DateTime<Utc>,
) -> Result<LatestSnapshot, DbError>
where
    S: SnapshotSource + Sync,
{
    let mut row = match source.latest_score_row(place_id).await {
        Ok(Some(row)) => row,
        Ok(None) | Err(DbError::NotFound) => {
            tracing::debug!(place_id, "no snapshot for business");
            return Ok(LatestSnapshot::missing());
        }
        Err(e) => return Err(e),
    };

    let projected = row
        .reviews_distribution
        .take()
        .and_then(|value| decode_distribution(&value, place_id, "snapshot_scores"));

    let distribution = match projected {
        Some(distribution) => Some(distribution),
        None => recover_distribution(source, place_id).await,
    };

    Ok(LatestSnapshot::evaluated(row.into_snapshot(distribution), now))
}

async fn recover_distribution<S>(source: &S, place_id: &str) -> Option<RatingsDistribution>
where
    S: SnapshotSource + Sync,
{
    let payload = match source.latest_raw_payload(place_id).await {
        Ok(Some(payload)) => payload,
        Ok(None) | Err(DbError::NotFound) => return None,
        Err(e) => {
            tracing::warn!(
                place_id,
                error = %e,
                "raw snapshot lookup failed; continuing without distribution"
            );
            return None;
        }
    };

    payload
        .get("reviews_distribution")
        .and_then(|value| decode_distribution(value, place_id, "raw_snapshots"))
}

fn decode_distribution(
    value: &Value,
    place_id: &str,
    origin: &'static str,
) -> Option<RatingsDistribution> {
    if value.is_null() {
        return None;
    }
    match RatingsDistribution::from_json(value) {
        Ok(distribution) => Some(distribution),
        Err(e) => {
            tracing::warn!(place_id, origin, error = %e, "malformed reviews distribution");
            None
        }
    }
}
