//! Rate limiting and retry scheduling state.

use std::time::Duration;
use tokio::time::Instant;

use species_indexer_shared::FetchTask;

/// Enforces a minimum interval between the starts of consecutive requests.
///
/// The interval is measured start-to-start, so time spent waiting on a
/// response counts toward it.
#[derive(Debug)]
pub struct RateGate {
    min_interval: Duration,
    last_start: Option<Instant>,
}

impl RateGate {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_start: None,
        }
    }

    /// The earliest instant at or after `now` at which a request may start.
    pub fn next_slot(&self, now: Instant) -> Instant {
        match self.last_start {
            Some(last) => (last + self.min_interval).max(now),
            None => now,
        }
    }

    /// Wait until a request may start no earlier than `not_before`, then
    /// record the start. Returns the recorded start instant.
    pub async fn acquire(&mut self, not_before: Instant) -> Instant {
        let slot = self.next_slot(Instant::now()).max(not_before);
        tokio::time::sleep_until(slot).await;

        let started = Instant::now();
        self.last_start = Some(started);
        started
    }

    pub fn last_start(&self) -> Option<Instant> {
        self.last_start
    }
}

/// One in-flight fetch: the task, the zero-based attempt about to be made,
/// and the earliest instant it may start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestState {
    pub task: FetchTask,
    pub attempt: u32,
    pub not_before: Instant,
}

impl RequestState {
    pub fn new(task: FetchTask, not_before: Instant) -> Self {
        Self {
            task,
            attempt: 0,
            not_before,
        }
    }

    /// The state for the next attempt, which may not start before `not_before`.
    pub fn retry(self, not_before: Instant) -> Self {
        Self {
            attempt: self.attempt + 1,
            not_before,
            ..self
        }
    }
}
