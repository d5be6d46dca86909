//! Poller parameters for the fetch-and-dispatch loop.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default period between fetch ticks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Shortest accepted poll period; a zero interval is raised to this.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Default number of messages requested per fetch.
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Controls the event poller's fetch-and-dispatch loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollerParams {
    /// Period of the poll timer.
    pub interval: Duration,
    /// Maximum messages fetched per tick.
    pub batch_size: usize,
}

impl Default for PollerParams {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl PollerParams {
    /// Set the poll period. Values below [`MIN_POLL_INTERVAL`] are raised to it.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval.max(MIN_POLL_INTERVAL);
        self
    }

    /// Poll period as used by the timer, never zero.
    pub fn effective_interval(&self) -> Duration {
        self.interval.max(MIN_POLL_INTERVAL)
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }
}
