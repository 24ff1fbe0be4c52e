//! Engine configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Per-worker batch sizing bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Smallest batch a worker submits
    pub min_batch: usize,
    /// Largest batch a worker submits
    pub max_batch: usize,
    /// Batch size used when a worker has no rate assigned
    pub fallback_batch_size: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            min_batch: 1,
            max_batch: 1000,
            fallback_batch_size: 100,
        }
    }
}

/// Timing knobs shared by every run of one engine.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchConfig {
    pub batch: BatchConfig,
    /// Reporter window length
    pub report_interval: Duration,
    /// Pause after a failed submit
    pub error_backoff: Duration,
    /// Pause between batches for a worker with a zero rate share
    pub idle_pause: Duration,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            batch: BatchConfig::default(),
            report_interval: Duration::from_secs(1),
            error_backoff: Duration::from_millis(100),
            idle_pause: Duration::from_millis(10),
        }
    }
}

/// Parameters of a single `DispatchEngine::run` call.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSettings {
    /// Global target rate in messages per second
    pub target_rate: u64,
    /// Run length; `None` runs until the shutdown token is cancelled
    pub duration: Option<Duration>,
    /// Upper bound on the number of workers
    pub max_workers: usize,
}

impl RunSettings {
    pub fn new(target_rate: u64, duration: Option<Duration>) -> Self {
        Self {
            target_rate,
            duration,
            max_workers: 50,
        }
    }

    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers;
        self
    }
}
