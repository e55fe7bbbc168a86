//! `snapshot` command: latest review snapshot plus next action.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use vizpulse_core::{LatestSnapshot, RatingsDistribution, Staleness};
use vizpulse_scoring::NextAction;

/// Print the latest snapshot for the resolved business.
///
/// # Errors
///
/// Returns an error if resolving the business or reading its snapshot fails.
pub(crate) async fn run_snapshot(
    pool: &sqlx::PgPool,
    place_id: Option<&str>,
) -> anyhow::Result<()> {
    let Some(place_id) = vizpulse_db::resolve_entity_id(pool, place_id).await? else {
        println!("no businesses found; nothing to show");
        return Ok(());
    };

    let now = Utc::now();
    let latest = vizpulse_db::fetch_latest_snapshot(pool, &place_id, now).await?;
    print!("{}", render_snapshot(&place_id, &latest, now));
    Ok(())
}

pub(crate) fn render_snapshot(place_id: &str, latest: &LatestSnapshot, now: DateTime<Utc>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "business      {place_id}");

    match &latest.row {
        None => {
            let _ = writeln!(out, "snapshot      none captured yet");
        }
        Some(snap) => {
            let age_minutes = now.signed_duration_since(snap.captured_at).num_minutes();
            let marker = match latest.staleness() {
                Staleness::Stale => " (may be outdated)",
                Staleness::Fresh | Staleness::Missing => "",
            };
            let _ = writeln!(
                out,
                "captured      {} ({age_minutes} min ago){marker}",
                snap.captured_at.format("%Y-%m-%d %H:%M")
            );
            let _ = writeln!(
                out,
                "rating        {}",
                snap.rating.map_or_else(|| "-".to_string(), |r| r.to_string())
            );
            let _ = writeln!(
                out,
                "reviews       {} total, {} in last 30d, {} negative",
                snap.review_count, snap.reviews_last_30d, snap.negative_review_count
            );
            if let Some(dist) = &snap.distribution {
                let _ = writeln!(out, "distribution  {}", render_distribution(dist));
            }
        }
    }

    let action = NextAction::for_snapshot(latest.row.as_ref());
    let _ = writeln!(out, "next action   {}", action.headline());
    out
}

fn render_distribution(dist: &RatingsDistribution) -> String {
    [
        ("5", dist.five),
        ("4", dist.four),
        ("3", dist.three),
        ("2", dist.two),
        ("1", dist.one),
    ]
    .iter()
    .filter_map(|(stars, count)| count.map(|c| format!("{stars}*:{c}")))
    .collect::<Vec<_>>()
    .join(" ")
}
