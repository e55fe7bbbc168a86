//! Live invalidation for raw snapshot changes.
//!
//! A trigger on `raw_snapshots` publishes a small JSON notice on a Postgres
//! `NOTIFY` channel for every insert, update and delete. Subscribers get a
//! payload-less callback and are expected to re-run the snapshot fetch; the
//! notice contents are only used to scope events to one business.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::{future, Stream, StreamExt};
use serde::Deserialize;
use sqlx::postgres::PgListener;
use sqlx::PgPool;
use tokio::task::JoinHandle;

pub const RAW_SNAPSHOTS_TABLE: &str = "raw_snapshots";

/// Channel the `raw_snapshots_notify` trigger publishes on. Fixed in the
/// initial migration.
pub const CHANGE_CHANNEL: &str = "snapshot_changes";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeOp {
    Insert,
    Update,
    Delete,
    #[serde(other)]
    Other,
}

/// Notice published by the `raw_snapshots_notify` trigger.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChangeNotice {
    pub table: String,
    pub op: ChangeOp,
    #[serde(default)]
    pub place_id: Option<String>,
}

impl ChangeNotice {
    /// Decode a `NOTIFY` payload. Undecodable payloads are dropped.
    #[must_use]
    pub fn parse(payload: &str) -> Option<Self> {
        match serde_json::from_str(payload) {
            Ok(notice) => Some(notice),
            Err(e) => {
                tracing::debug!(error = %e, payload, "ignoring undecodable change notice");
                None
            }
        }
    }

    /// Whether this notice is a raw snapshot change for `place_id`.
    #[must_use]
    pub fn concerns(&self, place_id: &str) -> bool {
        self.table == RAW_SNAPSHOTS_TABLE && self.place_id.as_deref() == Some(place_id)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Handle to a live change subscription.
///
/// [`Subscription::dispose`] is idempotent. Once it returns, the callback is
/// not running and will never run again. Dropping the handle disposes it.
///
/// The callback must not call `dispose` on its own subscription.
#[derive(Debug)]
pub struct Subscription {
    active: Arc<Mutex<bool>>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl Subscription {
    /// A subscription that never fires. Returned when the change stream could
    /// not be established.
    #[must_use]
    pub fn inert() -> Self {
        Self {
            active: Arc::new(Mutex::new(false)),
            task: Mutex::new(None),
        }
    }

    /// `false` once disposed, or once the underlying stream has ended.
    #[must_use]
    pub fn is_active(&self) -> bool {
        *lock(&self.active)
    }

    pub fn dispose(&self) {
        // Waits for an in-flight callback to finish before flipping the flag.
        *lock(&self.active) = false;
        if let Some(task) = lock(&self.task).take() {
            task.abort();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Drive `on_change` from an arbitrary stream of notices, scoped to `place_id`.
///
/// Must be called from within a tokio runtime.
pub fn subscribe_with_stream<St, F>(notices: St, place_id: &str, on_change: F) -> Subscription
where
    St: Stream<Item = ChangeNotice> + Send + 'static,
    F: Fn() + Send + 'static,
{
    let active = Arc::new(Mutex::new(true));
    let task_active = Arc::clone(&active);
    let place_id = place_id.to_string();

    let task = tokio::spawn(async move {
        let mut notices = std::pin::pin!(notices);
        while let Some(notice) = notices.next().await {
            if !notice.concerns(&place_id) {
                continue;
            }
            {
                let live = lock(&task_active);
                if !*live {
                    break;
                }
                tracing::debug!(place_id = %place_id, op = ?notice.op, "snapshot changed");
                on_change();
            }
        }
        *lock(&task_active) = false;
        tracing::debug!(place_id = %place_id, "change subscription ended");
    });

    Subscription {
        active,
        task: Mutex::new(Some(task)),
    }
}

/// Subscribe to raw snapshot changes for one business over Postgres `LISTEN`.
///
/// Never fails: if the listener cannot connect or `LISTEN` is rejected, the
/// error is logged and an [`inert`](Subscription::inert) subscription is
/// returned so callers fall back to manual refresh. A listener error after
/// startup ends the subscription the same way.
pub async fn subscribe_to_changes<F>(
    pool: &PgPool,
    place_id: &str,
    on_change: F,
) -> Subscription
where
    F: Fn() + Send + 'static,
{
    let mut listener = match PgListener::connect_with(pool).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::warn!(place_id, error = %e, "could not open change listener");
            return Subscription::inert();
        }
    };
    if let Err(e) = listener.listen(CHANGE_CHANNEL).await {
        tracing::warn!(place_id, channel = CHANGE_CHANNEL, error = %e, "LISTEN failed");
        return Subscription::inert();
    }

    let notices = listener
        .into_stream()
        .take_while(|item| {
            if let Err(e) = item {
                tracing::warn!(error = %e, "change listener failed; closing subscription");
            }
            future::ready(item.is_ok())
        })
        .filter_map(|item| {
            future::ready(
                item.ok()
                    .and_then(|notification| ChangeNotice::parse(notification.payload())),
            )
        });

    subscribe_with_stream(notices, place_id, on_change)
}

/// Holds at most one subscription for a caller, keyed by business.
///
/// Switching to another business disposes the previous subscription before
/// the new one is opened, so a stale business can never fire the callback.
#[derive(Debug, Default)]
pub struct SubscriptionSlot {
    current: Option<(String, Subscription)>,
}

impl SubscriptionSlot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn place_id(&self) -> Option<&str> {
        self.current.as_ref().map(|(place_id, _)| place_id.as_str())
    }

    /// `true` while the held subscription is still delivering notices.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.current
            .as_ref()
            .is_some_and(|(_, subscription)| subscription.is_active())
    }

    pub fn clear(&mut self) {
        if let Some((_, subscription)) = self.current.take() {
            subscription.dispose();
        }
    }

    /// Point the slot at `place_id`.
    ///
    /// Keeps an active subscription for the same business untouched and
    /// returns `false`. Otherwise disposes the current one, awaits `subscribe`
    /// and returns `true`.
    pub async fn switch_to<F, Fut>(&mut self, place_id: &str, subscribe: F) -> bool
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = Subscription>,
    {
        if let Some((current, subscription)) = &self.current {
            if current == place_id && subscription.is_active() {
                return false;
            }
        }
        self.clear();
        let subscription = subscribe(place_id.to_string()).await;
        self.current = Some((place_id.to_string(), subscription));
        true
    }
}
