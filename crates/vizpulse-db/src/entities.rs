//! Resolve which business the dashboard should display.

use sqlx::PgPool;

use crate::DbError;

/// Returns the explicit place id when one was supplied and is not blank.
///
/// The id is returned exactly as given; ownership checks happen downstream.
#[must_use]
pub fn explicit_place_id(explicit: Option<&str>) -> Option<&str> {
    explicit.filter(|id| !id.trim().is_empty())
}

/// Returns the place id of the most recently updated business, or `None` if
/// no businesses exist.
///
/// Ties on `updated_at` are broken by `place_id` so the answer is stable.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_most_recently_updated_place_id(pool: &PgPool) -> Result<Option<String>, DbError> {
    let place_id = sqlx::query_scalar::<_, String>(
        "SELECT place_id FROM businesses \
         ORDER BY updated_at DESC, place_id ASC \
         LIMIT 1",
    )
    .fetch_optional(pool)
    .await?;

    Ok(place_id)
}

/// Resolve the business to display.
///
/// A non-blank `explicit` id is trusted as-is. Otherwise falls back to the
/// most recently updated business. `Ok(None)` means there is nothing to show
/// and callers should render the empty state.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the fallback query fails.
pub async fn resolve_entity_id(
    pool: &PgPool,
    explicit: Option<&str>,
) -> Result<Option<String>, DbError> {
    if let Some(place_id) = explicit_place_id(explicit) {
        return Ok(Some(place_id.to_string()));
    }

    let resolved = get_most_recently_updated_place_id(pool).await?;
    match &resolved {
        Some(place_id) => tracing::debug!(place_id = %place_id, "resolved most recent business"),
        None => tracing::debug!("no businesses available to resolve"),
    }
    Ok(resolved)
}
