use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::error::PollError;
use crate::feed::Feed;
use crate::models::{ActionId, ActionRecord};
use crate::render::render_card;
use crate::source::UpdateSource;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(5000);

/// Cursor owned by a single poller instance.
#[derive(Debug, Default)]
struct PollState {
    cursor: Option<ActionId>,
}

/// Snapshot of what the poller has been doing, published after every poll.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PollStatus {
    pub polls: u64,
    pub failures: u64,
    pub skipped: u64,
    pub cursor: Option<ActionId>,
    pub last_error: Option<String>,
    pub last_success: Option<DateTime<Utc>>,
}

#[derive(Debug)]
pub enum PollOutcome {
    /// Cards were rendered and the cursor moved to `cursor`.
    Updated { rendered: usize, cursor: ActionId },
    /// The server had nothing new.
    Idle,
    /// Another poll was still in flight.
    Skipped,
    Failed(PollError),
}

/// Fetches new action records on a fixed period and prepends them to a feed.
pub struct UpdatePoller {
    source: Arc<dyn UpdateSource>,
    feed: Arc<dyn Feed>,
    interval: Duration,
    state: Mutex<PollState>,
    status: watch::Sender<PollStatus>,
}

impl UpdatePoller {
    pub fn new(source: Arc<dyn UpdateSource>, feed: Arc<dyn Feed>, interval: Duration) -> Self {
        let (status, _) = watch::channel(PollStatus::default());
        Self {
            source,
            feed,
            interval,
            state: Mutex::new(PollState::default()),
            status,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn cursor(&self) -> Option<ActionId> {
        self.status.borrow().cursor
    }

    pub fn status(&self) -> PollStatus {
        self.status.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<PollStatus> {
        self.status.subscribe()
    }

    /// Run one fetch-and-render cycle. Never panics on server or network
    /// trouble; failures come back as `PollOutcome::Failed`.
    pub async fn poll(&self) -> PollOutcome {
        let Ok(mut state) = self.state.try_lock() else {
            tracing::debug!("Previous poll still in flight, skipping");
            self.status.send_modify(|s| s.skipped += 1);
            return PollOutcome::Skipped;
        };

        let outcome = match self.source.fetch_since(state.cursor).await {
            Ok(records) => self.apply(&mut state, &records),
            Err(e) => {
                tracing::error!("Error polling for updates: {e}");
                PollOutcome::Failed(e)
            }
        };

        let cursor = state.cursor;
        self.status.send_modify(|s| {
            s.polls += 1;
            s.cursor = cursor;
            match &outcome {
                PollOutcome::Failed(e) => {
                    s.failures += 1;
                    s.last_error = Some(e.to_string());
                }
                _ => s.last_success = Some(Utc::now()),
            }
        });

        outcome
    }

    fn apply(&self, state: &mut PollState, records: &[ActionRecord]) -> PollOutcome {
        let Some(last) = records.last() else {
            return PollOutcome::Idle;
        };

        for record in records {
            self.feed.prepend(render_card(record));
        }

        if let Some(previous) = state.cursor {
            if last.id < previous {
                tracing::warn!(
                    "Cursor moving backwards ({previous} -> {}); server returned an older tail record",
                    last.id
                );
            }
        }
        state.cursor = Some(last.id);

        tracing::debug!("Rendered {} new action(s), cursor now {}", records.len(), last.id);

        PollOutcome::Updated {
            rendered: records.len(),
            cursor: last.id,
        }
    }

    /// Poll every `interval` until shutdown is signaled or the sender is dropped.
    /// The first poll happens one full interval after start. Shutdown also
    /// interrupts a poll that is waiting on the server.
    pub async fn run(self: Arc<Self>, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        tracing::info!("Update poller started (every {:?})", self.interval);

        loop {
            if *shutdown.borrow() {
                break;
            }

            tokio::select! {
                _ = ticker.tick() => {
                    // An in-flight request is dropped on shutdown, releasing the guard.
                    tokio::select! {
                        _ = self.poll() => {}
                        _ = shutdown.changed() => break,
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        tracing::info!("Update poller stopped");
    }
}

/// Start polling into `feed`. Without a feed container nothing is scheduled
/// and `None` is returned.
pub fn initialize(
    feed: Option<Arc<dyn Feed>>,
    source: Arc<dyn UpdateSource>,
    interval: Duration,
    shutdown: watch::Receiver<bool>,
) -> Option<(Arc<UpdatePoller>, JoinHandle<()>)> {
    let Some(feed) = feed else {
        tracing::debug!("No feed container, update poller not started");
        return None;
    };

    let poller = Arc::new(UpdatePoller::new(source, feed, interval));
    let handle = tokio::spawn(poller.clone().run(shutdown));
    Some((poller, handle))
}
