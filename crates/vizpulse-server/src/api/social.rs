use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use vizpulse_core::SocialChannel;
use vizpulse_scoring::{
    aggregate_social, score_social, social_microcopy, BandSet, PhraseSet, SocialAggregate,
};

use crate::middleware::RequestId;

use super::{map_db_error, resolve_place, ApiError, ApiResponse, AppState, PlaceQuery};

#[derive(Debug, Serialize)]
pub(super) struct SocialScoreItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place_id: Option<String>,
    pub channels: usize,
    pub enabled_channels: usize,
    pub aggregate: SocialAggregate,
    pub bands: BandSet,
    pub microcopy: PhraseSet,
}

impl SocialScoreItem {
    fn score(place_id: Option<String>, channels: &[SocialChannel]) -> Self {
        let aggregate = aggregate_social(channels);
        let bands = score_social(&aggregate);
        Self {
            place_id,
            channels: channels.len(),
            enabled_channels: channels.iter().filter(|c| c.enabled).count(),
            aggregate,
            bands,
            microcopy: social_microcopy(&bands),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct ScoreRequest {
    #[serde(default)]
    pub channels: Vec<SocialChannel>,
}

/// Score the channels stored for a business.
pub(super) async fn get_social_scores(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<PlaceQuery>,
) -> Result<Json<ApiResponse<Option<SocialScoreItem>>>, ApiError> {
    let Some(place_id) = resolve_place(&state, &req_id, &query).await? else {
        return Ok(Json(ApiResponse::new(None, req_id.0)));
    };

    let channels = vizpulse_db::list_social_channels(&state.pool, &place_id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse::new(
        Some(SocialScoreItem::score(Some(place_id), &channels)),
        req_id.0,
    )))
}

/// Score caller-supplied channels, e.g. fixtures from an integration not yet stored.
pub(super) async fn score_social_channels(
    Extension(req_id): Extension<RequestId>,
    Json(request): Json<ScoreRequest>,
) -> Json<ApiResponse<SocialScoreItem>> {
    Json(ApiResponse::new(
        SocialScoreItem::score(None, &request.channels),
        req_id.0,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_channel_list_scores_low() {
        let item = SocialScoreItem::score(None, &[]);
        let json = serde_json::to_value(&item).expect("serialize");
        assert!(json.get("place_id").is_none());
        assert_eq!(json["channels"], 0);
        assert_eq!(json["bands"]["posts"], "low");
        assert_eq!(json["microcopy"]["posts"], "no posting cadence");
    }

    #[test]
    fn huge_follower_counts_score_good() {
        let request: ScoreRequest = serde_json::from_str(
            r#"{"channels":[
                {"network":"instagram","enabled":true,"followers":18446744073709551615},
                {"network":"tiktok","enabled":true,"followers":2}
            ]}"#,
        )
        .expect("parse");
        let item = SocialScoreItem::score(None, &request.channels);
        assert_eq!(item.aggregate.total_followers, u64::MAX);
        assert_eq!(item.microcopy.followers, "strong presence");
    }

    #[test]
    fn score_request_defaults_missing_fields() {
        let request: ScoreRequest = serde_json::from_str(
            r#"{"channels":[{"network":"instagram","enabled":true,"followers":1000}]}"#,
        )
        .expect("parse");
        let item = SocialScoreItem::score(None, &request.channels);
        assert_eq!(item.enabled_channels, 1);
        assert_eq!(item.aggregate.total_followers, 1_000);
        assert_eq!(item.microcopy.followers, "growing base");
        assert_eq!(item.microcopy.streak, "streak broken");
    }
}
