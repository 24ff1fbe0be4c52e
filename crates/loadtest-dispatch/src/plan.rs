//! Rate partitioning and per-worker batch planning.

use crate::config::BatchConfig;
use std::time::Duration;

/// Target rate each worker is expected to sustain.
pub const RATE_PER_WORKER: u64 = 1000;

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Number of workers for a global rate: one per `RATE_PER_WORKER` msg/s,
/// at least one and at most `cap`.
pub fn worker_count(rate: u64, cap: usize) -> usize {
    let wanted = usize::try_from(rate / RATE_PER_WORKER).unwrap_or(usize::MAX);
    wanted.clamp(1, cap.max(1))
}

/// Split `rate` into `workers` shares.
///
/// The integer-division remainder is handed out one message per second to
/// the first workers, so the shares always sum to `rate`.
pub fn split_rate(rate: u64, workers: usize) -> Vec<u64> {
    if workers == 0 {
        return Vec::new();
    }
    let n = workers as u64;
    let base = rate / n;
    let remainder = rate % n;

    (0..n)
        .map(|i| if i < remainder { base + 1 } else { base })
        .collect()
}

/// Batch size and send cadence for one worker, fixed at worker start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchPlan {
    pub rate_share: u64,
    pub batch_size: usize,
    pub interval: Duration,
}

impl BatchPlan {
    /// Derive the plan for a worker assigned `rate_share` msg/s.
    ///
    /// A zero share falls back to `fallback_batch_size` and `idle_pause`.
    pub fn for_rate(rate_share: u64, batch: &BatchConfig, idle_pause: Duration) -> Self {
        let target = if rate_share > 0 {
            usize::try_from(rate_share / 10).unwrap_or(usize::MAX)
        } else {
            batch.fallback_batch_size
        };
        let batch_size = target.clamp(batch.min_batch, batch.max_batch.max(batch.min_batch));

        let interval = if rate_share > 0 {
            let nanos = batch_size as u128 * NANOS_PER_SEC / rate_share as u128;
            Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
        } else {
            idle_pause
        };

        Self {
            rate_share,
            batch_size,
            interval,
        }
    }
}
