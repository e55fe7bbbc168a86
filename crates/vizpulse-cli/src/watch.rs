//! `watch` command: invalidate-then-refetch loop over snapshot changes.
//!
//! Change notices carry no data. Each one only marks the printed snapshot as
//! out of date; the loop then reads the latest row again through the same
//! path as `snapshot`.

use std::time::Duration;

use chrono::Utc;
use tokio::sync::mpsc;
use vizpulse_db::SubscriptionSlot;

use crate::snapshot::render_snapshot;

/// Why the loop woke up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Wake {
    Changed,
    /// The live subscription stopped delivering; resubscribe or fall back to polling.
    Ended,
    Poll,
    Shutdown,
}

/// # Errors
///
/// Returns an error if resolving the business or reading a snapshot fails.
pub(crate) async fn run_watch(
    pool: &sqlx::PgPool,
    explicit_place_id: Option<&str>,
    poll_every: Duration,
) -> anyhow::Result<()> {
    // Each subscription owns the only sender of its receiver, so the receiver
    // closes when the subscription's task ends. Starts closed.
    let (_, mut rx) = mpsc::channel::<()>(1);
    let mut slot = SubscriptionSlot::new();

    loop {
        match vizpulse_db::resolve_entity_id(pool, explicit_place_id).await? {
            Some(place_id) => {
                let now = Utc::now();
                let latest = vizpulse_db::fetch_latest_snapshot(pool, &place_id, now).await?;
                print!("{}", render_snapshot(&place_id, &latest, now));
                println!();

                let (tx, next_rx) = mpsc::channel::<()>(1);
                let switched = slot
                    .switch_to(&place_id, |id| async move {
                        vizpulse_db::subscribe_to_changes(pool, &id, move || {
                            let _ = tx.try_send(());
                        })
                        .await
                    })
                    .await;
                if switched {
                    rx = next_rx;
                    if slot.is_active() {
                        tracing::info!(place_id = %place_id, "watching for snapshot changes");
                    } else {
                        tracing::warn!(
                            place_id = %place_id,
                            poll_secs = poll_every.as_secs(),
                            "live updates unavailable; polling instead"
                        );
                    }
                }
            }
            None => {
                slot.clear();
                println!("no businesses found; waiting");
            }
        }

        match next_wake(&mut rx, slot.is_active(), poll_every).await {
            Wake::Changed => tracing::debug!("snapshot invalidated; refetching"),
            Wake::Ended => tracing::warn!("change subscription ended; refetching"),
            Wake::Poll => {}
            Wake::Shutdown => break,
        }
    }

    slot.clear();
    Ok(())
}

/// Wait for Ctrl-C plus either a change notice or the end of the live
/// subscription (when `live`), or the poll interval (when not).
async fn next_wake(rx: &mut mpsc::Receiver<()>, live: bool, poll_every: Duration) -> Wake {
    tokio::select! {
        _ = tokio::signal::ctrl_c() => Wake::Shutdown,
        notice = rx.recv(), if live => match notice {
            Some(()) => Wake::Changed,
            None => Wake::Ended,
        },
        () = tokio::time::sleep(poll_every), if !live => Wake::Poll,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn pending_change_wakes_live_loop() {
        let (tx, mut rx) = mpsc::channel(1);
        tx.try_send(()).expect("send");
        let wake = next_wake(&mut rx, true, Duration::from_secs(3600)).await;
        assert_eq!(wake, Wake::Changed);
    }

    #[tokio::test]
    async fn listener_ending_wakes_live_loop() {
        let (notices_tx, notices) = futures::channel::mpsc::unbounded();
        let (tx, mut rx) = mpsc::channel::<()>(1);
        let subscription = vizpulse_db::subscribe_with_stream(notices, "ChIJ-1", move || {
            let _ = tx.try_send(());
        });
        assert!(subscription.is_active());

        drop(notices_tx);
        let wake = tokio::time::timeout(
            Duration::from_secs(2),
            next_wake(&mut rx, true, Duration::from_secs(3600)),
        )
        .await
        .expect("loop wakes when the subscription ends");
        assert_eq!(wake, Wake::Ended);
        assert!(!subscription.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn closed_receiver_is_ignored_while_polling() {
        let (_, mut rx) = mpsc::channel::<()>(1);
        let wake = next_wake(&mut rx, false, Duration::from_secs(60)).await;
        assert_eq!(wake, Wake::Poll);
    }

    #[tokio::test(start_paused = true)]
    async fn polls_without_live_subscription() {
        let (_tx, mut rx) = mpsc::channel::<()>(1);
        let wake = next_wake(&mut rx, false, Duration::from_secs(60)).await;
        assert_eq!(wake, Wake::Poll);
    }

    #[tokio::test]
    async fn burst_of_changes_collapses_to_one_wake() {
        let (tx, mut rx) = mpsc::channel(1);
        tx.try_send(()).expect("first send");
        assert!(tx.try_send(()).is_err());
        assert_eq!(
            next_wake(&mut rx, true, Duration::from_secs(60)).await,
            Wake::Changed
        );
        assert!(rx.try_recv().is_err());
    }
}
