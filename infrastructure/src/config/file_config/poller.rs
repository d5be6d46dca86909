//! Poll loop settings (`[poller]` section)

use mirai_application::PollerParams;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw poller configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePollerConfig {
    /// Milliseconds between fetch ticks
    pub interval_ms: u64,
    /// Maximum messages fetched per tick
    pub batch_size: usize,
}

impl Default for FilePollerConfig {
    fn default() -> Self {
        let params = PollerParams::default();
        Self {
            interval_ms: params.interval.as_millis() as u64,
            batch_size: params.batch_size,
        }
    }
}

impl FilePollerConfig {
    pub fn to_poller_params(&self) -> PollerParams {
        PollerParams::default()
            .with_interval(Duration::from_millis(self.interval_ms))
            .with_batch_size(self.batch_size)
    }
}
