//! Rate-paced worker: generate a batch, submit it, wait for the next tick.

use crate::plan::BatchPlan;
use crate::stats::StatsAggregator;
use loadtest_generator::MessageGenerator;
use loadtest_sink::Sink;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// What one worker did over its lifetime.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WorkerReport {
    pub worker_id: usize,
    pub rate_share: u64,
    pub batch_size: usize,
    pub messages_sent: u64,
    pub batches: u64,
    pub failed_submits: u64,
    pub dropped: u64,
}

/// One of the engine's concurrent senders.
///
/// Pacing is deadline-based: batches start on a fixed-period ticker, so time
/// spent generating and submitting does not stretch the period. A tick missed
/// because of a slow sink fires late and the schedule shifts from there.
pub struct RateWorker {
    id: usize,
    sink: Arc<dyn Sink>,
    generator: Arc<MessageGenerator>,
    plan: BatchPlan,
    stats: Arc<StatsAggregator>,
    shutdown: CancellationToken,
    error_backoff: Duration,
}

impl RateWorker {
    pub fn new(
        id: usize,
        sink: Arc<dyn Sink>,
        generator: Arc<MessageGenerator>,
        plan: BatchPlan,
        stats: Arc<StatsAggregator>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            id,
            sink,
            generator,
            plan,
            stats,
            shutdown,
            error_backoff: Duration::from_millis(100),
        }
    }

    /// Pause applied after a failed submit.
    pub fn with_error_backoff(mut self, backoff: Duration) -> Self {
        self.error_backoff = backoff;
        self
    }

    pub fn plan(&self) -> &BatchPlan {
        &self.plan
    }

    /// Run until the shutdown token is cancelled.
    ///
    /// Every wait (tick, submit, backoff) races the token, so a cancelled
    /// worker exits without finishing the batch in flight.
    pub async fn run(self) -> WorkerReport {
        let mut report = WorkerReport {
            worker_id: self.id,
            rate_share: self.plan.rate_share,
            batch_size: self.plan.batch_size,
            ..Default::default()
        };

        info!(
            worker = self.id,
            rate = self.plan.rate_share,
            batch_size = self.plan.batch_size,
            "Worker started, sending every {:?}",
            self.plan.interval
        );

        let period = self.plan.interval.max(Duration::from_nanos(1));
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => break,
                _ = ticker.tick() => {}
            }

            let batch: Vec<Vec<u8>> = (0..self.plan.batch_size)
                .map(|_| self.generator.generate())
                .collect();

            let result = tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => break,
                result = self.sink.submit(&batch) => result,
            };
            report.batches += 1;

            match result {
                Ok(accepted) => {
                    let accepted = accepted.min(batch.len());
                    self.stats.add_sent(accepted as u64);
                    report.messages_sent += accepted as u64;

                    let dropped = (batch.len() - accepted) as u64;
                    if dropped > 0 {
                        debug!(
                            worker = self.id,
                            "Sink accepted {} of {} messages",
                            accepted,
                            batch.len()
                        );
                        self.stats.add_dropped(dropped);
                        report.dropped += dropped;
                    }
                }
                Err(e) => {
                    warn!(worker = self.id, error = %e, "Submit to {} failed", self.sink.name());
                    self.stats.add_failed_submit();
                    report.failed_submits += 1;

                    tokio::select! {
                        biased;
                        _ = self.shutdown.cancelled() => break,
                        _ = tokio::time::sleep(self.error_backoff) => {}
                    }
                }
            }
        }

        debug!(
            worker = self.id,
            sent = report.messages_sent,
            batches = report.batches,
            "Worker stopped"
        );
        report
    }
}
