//! Cancellable timers that post actions back to the UI loop.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, instrument, trace};

use crate::session::SessionId;

/// Work a timer asks the controller to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduledAction {
    /// Advance the snake one step.
    SnakeTick {
        /// Session the tick belongs to.
        session_id: SessionId,
    },
    /// Hide the pending memory pair.
    HideCards {
        /// Session the hide belongs to.
        session_id: SessionId,
    },
}

impl ScheduledAction {
    /// Session the action is tagged with.
    pub fn session_id(&self) -> &str {
        match self {
            Self::SnakeTick { session_id } | Self::HideCards { session_id } => session_id,
        }
    }
}

/// Handle to a spawned timer task. Aborts the task when cancelled or dropped.
#[derive(Debug, Default)]
pub struct ScheduledTask {
    handle: Option<JoinHandle<()>>,
}

impl ScheduledTask {
    /// Sends `action` once after `delay`.
    #[instrument(skip(tx))]
    pub fn after(
        delay: Duration,
        tx: UnboundedSender<ScheduledAction>,
        action: ScheduledAction,
    ) -> Self {
        let handle = tokio::spawn(async move {
            time::sleep(delay).await;
            trace!(?action, "Timer fired");
            let _ = tx.send(action);
        });
        Self {
            handle: Some(handle),
        }
    }

    /// Sends `action` every `period`, first after one full period.
    ///
    /// `pending` is set when a tick is sent and must be cleared by whoever
    /// handles it. Ticks that come due while it is set are dropped, so at
    /// most one tick is ever queued or in flight. Stops on its own once the
    /// receiver is gone.
    #[instrument(skip(tx, pending))]
    pub fn every(
        period: Duration,
        tx: UnboundedSender<ScheduledAction>,
        action: ScheduledAction,
        pending: Arc<AtomicBool>,
    ) -> Self {
        let handle = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                if pending.swap(true, Ordering::AcqRel) {
                    trace!(?action, "Previous tick still pending, skipping");
                    continue;
                }
                if tx.send(action.clone()).is_err() {
                    debug!("Receiver dropped, stopping ticker");
                    break;
                }
            }
        });
        Self {
            handle: Some(handle),
        }
    }

    /// Aborts the task. Returns false if it was already cancelled.
    pub fn cancel(&mut self) -> bool {
        match self.handle.take() {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    /// True until cancelled or finished.
    pub fn is_active(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for ScheduledTask {
    fn drop(&mut self) {
        self.cancel();
    }
}
