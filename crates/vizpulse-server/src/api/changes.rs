//! Server-sent invalidation events for the dashboard.
//!
//! Each connection owns one change subscription. Events carry no snapshot
//! data; clients refetch `/api/v1/snapshot` when they see `invalidate`.

use std::convert::Infallible;

use axum::{
    extract::{Query, State},
    response::sse::{Event, KeepAlive, Sse},
    Extension,
};
use futures::{future, stream, Stream, StreamExt};
use tokio::sync::mpsc;
use vizpulse_db::Subscription;

use crate::middleware::RequestId;

use super::{resolve_place, ApiError, AppState, PlaceQuery};

pub(super) async fn stream_snapshot_changes(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<PlaceQuery>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    let place_id = resolve_place(&state, &req_id, &query)
        .await?
        .ok_or_else(|| ApiError::new(req_id.0.clone(), "not_found", "no business to watch"))?;

    // Capacity 1: bursts of changes collapse into a single pending invalidation.
    let (tx, rx) = mpsc::channel::<()>(1);
    let subscription = vizpulse_db::subscribe_to_changes(&state.pool, &place_id, move || {
        let _ = tx.try_send(());
    })
    .await;

    tracing::info!(
        place_id = %place_id,
        live = subscription.is_active(),
        "change stream client connected"
    );

    Ok(Sse::new(invalidation_stream(place_id, subscription, rx)).keep_alive(KeepAlive::default()))
}

/// `ready` first (`live` or `manual`), then one `invalidate` per pending change.
///
/// The stream owns the subscription, so a disconnecting client disposes it.
/// An inert subscription drops its sender immediately and the stream ends
/// after `ready: manual`.
fn invalidation_stream(
    place_id: String,
    subscription: Subscription,
    rx: mpsc::Receiver<()>,
) -> impl Stream<Item = Result<Event, Infallible>> {
    let mode = if subscription.is_active() { "live" } else { "manual" };
    let ready = stream::once(future::ready(Ok(Event::default().event("ready").data(mode))));

    let invalidations = stream::unfold(
        (subscription, rx, place_id),
        |(subscription, mut rx, place_id)| async move {
            rx.recv().await?;
            let event = Event::default().event("invalidate").data(place_id.as_str());
            Some((Ok(event), (subscription, rx, place_id)))
        },
    );

    ready.chain(invalidations)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn emits_ready_then_one_event_per_invalidation() {
        let (tx, rx) = mpsc::channel(1);
        tx.send(()).await.expect("send");
        drop(tx);

        let events: Vec<_> = invalidation_stream("ChIJ-1".to_string(), Subscription::inert(), rx)
            .collect()
            .await;
        assert_eq!(events.len(), 2);
    }

    #[tokio::test]
    async fn closed_channel_ends_after_ready() {
        let (tx, rx) = mpsc::channel::<()>(1);
        drop(tx);

        let events: Vec<_> = invalidation_stream("ChIJ-1".to_string(), Subscription::inert(), rx)
            .collect()
            .await;
        assert_eq!(events.len(), 1);
    }
}
