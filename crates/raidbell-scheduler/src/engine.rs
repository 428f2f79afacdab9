use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, FixedOffset, NaiveDate};
use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

use raidbell_core::Clock;
use raidbell_store::{Event, EventStore};

use crate::error::Result;
use crate::matcher::{self, TickStamp};
use crate::notify::{MessageHandle, Notifier};

/// Read/update seam between the engine and the event table.
///
/// The engine only ever scans everything and stamps the fired marker, so
/// the seam stays this narrow; tests inject failing doubles through it.
pub trait EventSource: Send + Sync + 'static {
    /// Every stored event, in scan order.
    fn list_all(&self) -> raidbell_store::Result<Vec<Event>>;

    /// Record that `id` was delivered on `on`.
    fn mark_fired(&self, id: i64, on: NaiveDate) -> raidbell_store::Result<()>;
}

impl EventSource for EventStore {
    fn list_all(&self) -> raidbell_store::Result<Vec<Event>> {
        self.list_events()
    }

    fn mark_fired(&self, id: i64, on: NaiveDate) -> raidbell_store::Result<()> {
        EventStore::mark_fired(self, id, on)
    }
}

impl<S: EventSource> EventSource for Arc<S> {
    fn list_all(&self) -> raidbell_store::Result<Vec<Event>> {
        (**self).list_all()
    }

    fn mark_fired(&self, id: i64, on: NaiveDate) -> raidbell_store::Result<()> {
        (**self).mark_fired(id, on)
    }
}

/// Long-lived scheduling loop: scan, match, notify, schedule cleanup.
///
/// All collaborators are injected — no process-wide singletons. The engine
/// owns every cleanup task it spawns in a `JoinSet`, so shutdown and tests
/// can drain them deterministically.
pub struct ReminderEngine<S: EventSource, N: Notifier> {
    store: S,
    notifier: Arc<N>,
    clock: Clock,
    /// Pause between the end of one pass and the start of the next.
    tick: Duration,
    /// How long a delivered reminder stays before cleanup deletes it.
    retention: Duration,
    cleanup: JoinSet<()>,
}

impl<S: EventSource, N: Notifier> ReminderEngine<S, N> {
    pub fn new(
        store: S,
        notifier: Arc<N>,
        clock: Clock,
        tick: Duration,
        retention: Duration,
    ) -> Self {
        Self {
            store,
            notifier,
            clock,
            tick,
            retention,
            cleanup: JoinSet::new(),
        }
    }

    /// Main loop. Evaluates a pass, then sleeps `tick` — a slow pass
    /// stretches the period, it never compresses it. Runs until `shutdown`
    /// broadcasts `true`.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        info!(tick_secs = self.tick.as_secs(), "reminder engine started");
        loop {
            let now = self.clock.now();
            self.tick_at(now).await;
            self.reap_cleanup();

            tokio::select! {
                _ = tokio::time::sleep(self.tick) => {}
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        info!("reminder engine shutting down");
        self.cleanup.shutdown().await;
    }

    /// One full evaluation pass against an explicit clock reading.
    ///
    /// A store read failure aborts only this pass; the caller's sleep is
    /// the fixed retry backoff. A failure on one event never stops its
    /// siblings.
    pub async fn tick_at(&mut self, now: DateTime<FixedOffset>) {
        let stamp = TickStamp::from_datetime(&now);
        let events = match self.store.list_all() {
            Ok(events) => events,
            Err(e) => {
                error!("event scan failed, retrying next tick: {e}");
                return;
            }
        };

        for event in &events {
            if let Err(e) = self.process_event(event, &stamp).await {
                error!(event_id = event.id, "event processing failed: {e}");
            }
        }
    }

    async fn process_event(&mut self, event: &Event, stamp: &TickStamp) -> Result<()> {
        if !matcher::is_due(event, stamp) {
            return Ok(());
        }
        // At-most-once per occurrence: a restart inside the match minute
        // must not re-send.
        if event.last_fired_on == Some(stamp.date) {
            return Ok(());
        }

        let text = matcher::format_reminder(event);
        let handle = self.notifier.send(&text).await?;

        // The reminder is already out; a failed stamp is logged, not fatal.
        if let Err(e) = self.store.mark_fired(event.id, stamp.date) {
            warn!(event_id = event.id, "failed to stamp fired marker: {e}");
        }

        self.schedule_cleanup(handle);
        info!(event_id = event.id, kind = %event.kind, "reminder sent");
        Ok(())
    }

    /// Spawn a fire-and-forget deletion of `handle` after the retention
    /// window. Failures are logged and dropped, never retried.
    fn schedule_cleanup(&mut self, handle: MessageHandle) {
        let notifier = Arc::clone(&self.notifier);
        let delay = self.retention;
        self.cleanup.spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(e) = notifier.delete(handle).await {
                warn!(message_id = handle.id, "reminder cleanup failed: {e}");
            }
        });
    }

    /// Drop bookkeeping for cleanup tasks that already finished.
    fn reap_cleanup(&mut self) {
        while self.cleanup.try_join_next().is_some() {}
    }

    /// Await every outstanding cleanup task. Shutdown and test helper.
    pub async fn drain_cleanup(&mut self) {
        while self.cleanup.join_next().await.is_some() {}
    }

    /// Number of cleanup tasks still pending.
    pub fn pending_cleanups(&self) -> usize {
        self.cleanup.len()
    }
}
