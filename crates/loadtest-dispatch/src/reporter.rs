//! Periodic throughput reporting.

use crate::stats::{per_second, StatsAggregator};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Log one line per window until cancelled; returns the number of windows
/// reported.
///
/// The line carries the window rate, the running average and the total.
pub async fn run_reporter(
    stats: Arc<StatsAggregator>,
    interval: Duration,
    shutdown: CancellationToken,
) -> u64 {
    let period = interval.max(Duration::from_millis(1));
    let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut windows = 0;

    loop {
        tokio::select! {
            biased;
            _ = shutdown.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let window = stats.snapshot_and_reset_window();
        windows += 1;
        info!(
            "[{:.0}s] Rate: {:.0} msg/s | Avg: {:.0} msg/s | Total: {}",
            window.elapsed.as_secs_f64(),
            per_second(window.window_count, period),
            window.average_rate(),
            window.total_count
        );
    }

    windows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_reports_once_per_window() {
        let stats = Arc::new(StatsAggregator::new());
        let shutdown = CancellationToken::new();
        let handle = tokio::spawn(run_reporter(
            Arc::clone(&stats),
            Duration::from_secs(1),
            shutdown.clone(),
        ));

        stats.add_sent(100);
        tokio::time::sleep(Duration::from_millis(3500)).await;
        shutdown.cancel();

        assert_eq!(handle.await.unwrap(), 3);
        // The first window consumed the count
        assert_eq!(stats.snapshot_and_reset_window().window_count, 0);
        assert_eq!(stats.total_sent(), 100);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stops_promptly_on_cancel() {
        let stats = Arc::new(StatsAggregator::new());
        let shutdown = CancellationToken::new();
        let handle = tokio::spawn(run_reporter(stats, Duration::from_secs(60), shutdown.clone()));

        let start = tokio::time::Instant::now();
        shutdown.cancel();
        assert_eq!(handle.await.unwrap(), 0);
        assert!(start.elapsed() < Duration::from_secs(1));
    }
}
