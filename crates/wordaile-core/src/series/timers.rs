//! Cancellable round timers.
//!
//! Each timer is a spawned task that sleeps once and then posts a
//! [`SchedulerEvent`] tagged with the round epoch it was armed for. Ending a
//! round aborts the tasks and bumps the epoch, so an event that slipped into
//! the channel before the abort is recognized as stale and dropped.

use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

/// Identifies one armed round; never reused
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RoundEpoch(u64);

impl RoundEpoch {
    pub(crate) fn first() -> Self {
        Self(1)
    }

    pub(crate) fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// Timer callbacks delivered to the controller
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchedulerEvent {
    /// Time to poll participants for guesses
    GuessCycle(RoundEpoch),
    /// The round ran out of time
    RoundExpired(RoundEpoch),
}

impl SchedulerEvent {
    pub fn epoch(&self) -> RoundEpoch {
        match self {
            SchedulerEvent::GuessCycle(epoch) | SchedulerEvent::RoundExpired(epoch) => *epoch,
        }
    }
}

/// A single-shot timer task. Dropping the handle aborts the task.
#[derive(Debug)]
pub(crate) struct TimerHandle(Option<JoinHandle<()>>);

impl TimerHandle {
    pub(crate) fn spawn(
        delay: Duration,
        event: SchedulerEvent,
        events: UnboundedSender<SchedulerEvent>,
    ) -> Self {
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Receiver gone means the controller shut down
            let _ = events.send(event);
        });
        Self(Some(task))
    }

    /// Abort the task and wait until it has actually stopped
    pub(crate) async fn cancel(mut self) {
        if let Some(task) = self.0.take() {
            task.abort();
            let _ = task.await;
        }
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        if let Some(task) = self.0.take() {
            task.abort();
        }
    }
}
