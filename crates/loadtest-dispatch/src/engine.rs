//! Engine orchestration: spawn workers, wait for the stop condition, drain.

use crate::config::{DispatchConfig, RunSettings};
use crate::error::DispatchError;
use crate::plan::{split_rate, worker_count, BatchPlan};
use crate::reporter::run_reporter;
use crate::stats::{per_second, StatsAggregator};
use crate::worker::{RateWorker, WorkerReport};
use loadtest_generator::MessageGenerator;
use loadtest_sink::Sink;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// Engine lifecycle. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    Running,
    Draining,
    Stopped,
}

/// Why the run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShutdownReason {
    DurationElapsed,
    Cancelled,
}

impl fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShutdownReason::DurationElapsed => write!(f, "duration elapsed"),
            ShutdownReason::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Numbers reported once every task has exited.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinalSummary {
    pub target_rate: u64,
    pub total_sent: u64,
    pub elapsed_secs: f64,
    pub average_rate: f64,
    pub failed_submits: u64,
    pub dropped: u64,
    pub worker_count: usize,
    pub reason: ShutdownReason,
    pub workers: Vec<WorkerReport>,
}

impl FinalSummary {
    /// Achieved average rate as a fraction of the target.
    pub fn efficiency(&self) -> f64 {
        if self.target_rate == 0 {
            return 0.0;
        }
        self.average_rate / self.target_rate as f64
    }
}

/// Rate-controlled dispatch engine.
///
/// An engine runs once. Cancelling the token from [`shutdown_token`] (any
/// number of times, from any task) moves a running engine to draining;
/// cancelling it before `run` makes the run end immediately.
///
/// [`shutdown_token`]: DispatchEngine::shutdown_token
pub struct DispatchEngine {
    sink: Arc<dyn Sink>,
    generator: Arc<MessageGenerator>,
    config: DispatchConfig,
    shutdown: CancellationToken,
    state: watch::Sender<EngineState>,
}

impl DispatchEngine {
    pub fn new(sink: Arc<dyn Sink>, generator: Arc<MessageGenerator>, config: DispatchConfig) -> Self {
        let (state, _) = watch::channel(EngineState::Idle);
        Self {
            sink,
            generator,
            config,
            shutdown: CancellationToken::new(),
            state,
        }
    }

    /// Use `token` as the shutdown signal instead of a fresh one.
    ///
    /// Passing a child token lets a parent scope stop this engine without
    /// the engine's own shutdown leaking back up.
    pub fn with_shutdown_token(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    /// Token that stops the run when cancelled.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<EngineState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> EngineState {
        *self.state.borrow()
    }

    /// Run the engine to completion.
    ///
    /// Returns once the duration has elapsed or the shutdown token was
    /// cancelled, and every worker plus the reporter has exited. Sink errors
    /// during the run are absorbed by the workers and show up only in the
    /// summary counters.
    pub async fn run(&self, settings: RunSettings) -> Result<FinalSummary, DispatchError> {
        if settings.target_rate == 0 {
            return Err(DispatchError::InvalidRate);
        }
        let batch = &self.config.batch;
        if batch.min_batch == 0 || batch.min_batch > batch.max_batch {
            return Err(DispatchError::InvalidBatchBounds {
                min: batch.min_batch,
                max: batch.max_batch,
            });
        }

        let started = self.state.send_if_modified(|state| {
            if *state == EngineState::Idle {
                *state = EngineState::Running;
                true
            } else {
                false
            }
        });
        if !started {
            return Err(DispatchError::AlreadyStarted);
        }

        let stats = Arc::new(StatsAggregator::new());
        let num_workers = worker_count(settings.target_rate, settings.max_workers);
        let shares = split_rate(settings.target_rate, num_workers);

        info!(
            "Starting {} workers for {} msg/s to {}",
            num_workers,
            settings.target_rate,
            self.sink.name()
        );
        match settings.duration {
            Some(duration) => info!("Run duration: {:?}", duration),
            None => info!("Running until interrupted"),
        }

        let mut workers = JoinSet::new();
        for (id, share) in shares.into_iter().enumerate() {
            let plan = BatchPlan::for_rate(share, batch, self.config.idle_pause);
            let worker = RateWorker::new(
                id,
                Arc::clone(&self.sink),
                Arc::clone(&self.generator),
                plan,
                Arc::clone(&stats),
                self.shutdown.clone(),
            )
            .with_error_backoff(self.config.error_backoff);
            workers.spawn(worker.run());
        }

        let reporter = tokio::spawn(run_reporter(
            Arc::clone(&stats),
            self.config.report_interval,
            self.shutdown.clone(),
        ));

        let reason = match settings.duration {
            Some(duration) => tokio::select! {
                _ = tokio::time::sleep(duration) => ShutdownReason::DurationElapsed,
                _ = self.shutdown.cancelled() => ShutdownReason::Cancelled,
            },
            None => {
                self.shutdown.cancelled().await;
                ShutdownReason::Cancelled
            }
        };

        info!("Stopping workers ({reason})");
        self.state.send_replace(EngineState::Draining);
        self.shutdown.cancel();

        let mut reports = Vec::with_capacity(num_workers);
        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok(report) => reports.push(report),
                Err(e) => error!("Worker task failed: {e}"),
            }
        }
        match reporter.await {
            Ok(windows) => debug!("Reporter stopped after {windows} windows"),
            Err(e) => error!("Reporter task failed: {e}"),
        }
        reports.sort_by_key(|r| r.worker_id);

        let snapshot = stats.final_summary();
        self.state.send_replace(EngineState::Stopped);

        Ok(FinalSummary {
            target_rate: settings.target_rate,
            total_sent: snapshot.total_sent,
            elapsed_secs: snapshot.elapsed.as_secs_f64(),
            average_rate: per_second(snapshot.total_sent, snapshot.elapsed),
            failed_submits: snapshot.failed_submits,
            dropped: snapshot.dropped,
            worker_count: num_workers,
            reason,
            workers: reports,
        })
    }
}
