//! `social` command: aggregate, band and describe a business's social channels.

use std::fmt::Write as _;

use vizpulse_core::SocialChannel;
use vizpulse_scoring::{aggregate_social, score_social, social_microcopy};

/// # Errors
///
/// Returns an error if resolving the business or listing its channels fails.
pub(crate) async fn run_social(pool: &sqlx::PgPool, place_id: Option<&str>) -> anyhow::Result<()> {
    let Some(place_id) = vizpulse_db::resolve_entity_id(pool, place_id).await? else {
        println!("no businesses found; nothing to score");
        return Ok(());
    };

    let channels = vizpulse_db::list_social_channels(pool, &place_id).await?;
    if channels.iter().all(|c| !c.enabled) {
        tracing::info!(place_id = %place_id, "no enabled social channels");
    }
    print!("{}", render_social(&place_id, &channels));
    Ok(())
}

pub(crate) fn render_social(place_id: &str, channels: &[SocialChannel]) -> String {
    let aggregate = aggregate_social(channels);
    let bands = score_social(&aggregate);
    let phrases = social_microcopy(&bands);

    let enabled: Vec<&str> = channels
        .iter()
        .filter(|c| c.enabled)
        .map(|c| c.network.as_str())
        .collect();

    let mut out = String::new();
    let _ = writeln!(out, "business  {place_id}");
    let _ = writeln!(
        out,
        "channels  {}",
        if enabled.is_empty() {
            "none enabled".to_string()
        } else {
            enabled.join(", ")
        }
    );
    let _ = writeln!(out, "{:<12}{:<10}{:<8}SUMMARY", "METRIC", "VALUE", "BAND");
    let rows = [
        ("followers", aggregate.total_followers.to_string(), bands.followers, phrases.followers),
        (
            "engagement",
            format!("{:.2}%", aggregate.engagement_rate),
            bands.engagement,
            phrases.engagement,
        ),
        ("posts/7d", aggregate.posts_7d.to_string(), bands.posts, phrases.posts),
        ("streak", format!("{}w", aggregate.streak_weeks), bands.streak, phrases.streak),
    ];
    for (metric, value, band, phrase) in rows {
        let _ = writeln!(out, "{metric:<12}{value:<10}{:<8}{phrase}", band.as_str());
    }
    out
}
