use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::Utc;
use serde::Serialize;
use vizpulse_core::{LatestSnapshot, Snapshot, Staleness};
use vizpulse_scoring::NextAction;

use crate::middleware::RequestId;

use super::{map_db_error, resolve_place, ApiError, ApiResponse, AppState, PlaceQuery};

#[derive(Debug, Serialize)]
pub(super) struct NextActionItem {
    pub action: NextAction,
    pub headline: &'static str,
}

#[derive(Debug, Serialize)]
pub(super) struct SnapshotItem {
    pub place_id: String,
    pub snapshot: Option<Snapshot>,
    pub is_fresh: bool,
    pub staleness: Staleness,
    pub next_action: NextActionItem,
}

impl SnapshotItem {
    fn new(place_id: String, latest: LatestSnapshot) -> Self {
        let staleness = latest.staleness();
        let action = NextAction::for_snapshot(latest.row.as_ref());
        Self {
            place_id,
            snapshot: latest.row,
            is_fresh: latest.is_fresh,
            staleness,
            next_action: NextActionItem {
                action,
                headline: action.headline(),
            },
        }
    }
}

/// `data` is `null` when there is no business to show at all.
pub(super) async fn get_latest_snapshot(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<PlaceQuery>,
) -> Result<Json<ApiResponse<Option<SnapshotItem>>>, ApiError> {
    let Some(place_id) = resolve_place(&state, &req_id, &query).await? else {
        return Ok(Json(ApiResponse::new(None, req_id.0)));
    };

    let latest = vizpulse_db::fetch_latest_snapshot(&state.pool, &place_id, Utc::now())
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    if latest.staleness() == Staleness::Stale {
        tracing::debug!(place_id = %place_id, "serving stale snapshot");
    }

    Ok(Json(ApiResponse::new(
        Some(SnapshotItem::new(place_id, latest)),
        req_id.0,
    )))
}
