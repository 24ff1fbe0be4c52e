//! Shared throughput counters.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::time::Instant;

/// Counters updated concurrently by every worker.
///
/// `total_sent` only ever grows. `window_sent` grows alongside it and is
/// swapped back to zero by the reporter once per window. All updates are
/// single atomic operations, so concurrent callers never lose increments.
#[derive(Debug)]
pub struct StatsAggregator {
    total_sent: AtomicU64,
    window_sent: AtomicU64,
    failed_submits: AtomicU64,
    dropped: AtomicU64,
    start_time: Instant,
}

/// Result of one reporter tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowSnapshot {
    pub window_count: u64,
    pub total_count: u64,
    pub elapsed: Duration,
}

impl WindowSnapshot {
    /// Running average since the aggregator was created.
    pub fn average_rate(&self) -> f64 {
        per_second(self.total_count, self.elapsed)
    }
}

/// Point-in-time read of every counter, without reset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatsSnapshot {
    pub total_sent: u64,
    pub failed_submits: u64,
    pub dropped: u64,
    pub elapsed: Duration,
}

impl StatsSnapshot {
    pub fn average_rate(&self) -> f64 {
        per_second(self.total_sent, self.elapsed)
    }
}

impl Default for StatsAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl StatsAggregator {
    /// Create an aggregator whose clock starts now.
    pub fn new() -> Self {
        Self {
            total_sent: AtomicU64::new(0),
            window_sent: AtomicU64::new(0),
            failed_submits: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Record `n` accepted messages.
    pub fn add_sent(&self, n: u64) {
        self.total_sent.fetch_add(n, Ordering::Relaxed);
        self.window_sent.fetch_add(n, Ordering::Relaxed);
    }

    /// Record a submit call that returned an error.
    pub fn add_failed_submit(&self) {
        self.failed_submits.fetch_add(1, Ordering::Relaxed);
    }

    /// Record messages the sink did not accept.
    pub fn add_dropped(&self, n: u64) {
        self.dropped.fetch_add(n, Ordering::Relaxed);
    }

    /// Read and zero the window counter.
    pub fn snapshot_and_reset_window(&self) -> WindowSnapshot {
        let window_count = self.window_sent.swap(0, Ordering::Relaxed);
        WindowSnapshot {
            window_count,
            total_count: self.total_sent.load(Ordering::Relaxed),
            elapsed: self.start_time.elapsed(),
        }
    }

    /// Read every counter without resetting anything.
    pub fn final_summary(&self) -> StatsSnapshot {
        StatsSnapshot {
            total_sent: self.total_sent.load(Ordering::Relaxed),
            failed_submits: self.failed_submits.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
            elapsed: self.start_time.elapsed(),
        }
    }

    pub fn total_sent(&self) -> u64 {
        self.total_sent.load(Ordering::Relaxed)
    }
}

/// Messages per second, zero when no time has passed.
pub(crate) fn per_second(count: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 {
        count as f64 / secs
    } else {
        0.0
    }
}
