//! Engine tests on tokio's paused clock.

use loadtest_dispatch::{
    DispatchConfig, DispatchEngine, DispatchError, EngineState, RunSettings, ShutdownReason,
};
use loadtest_generator::{GenerationSpec, MessageGenerator};
use loadtest_sink::{NullSink, Sink, SinkError};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_test_writer()
        .try_init();
}

fn small_generator() -> Arc<MessageGenerator> {
    let spec = GenerationSpec {
        target_size: 200,
        ..Default::default()
    };
    Arc::new(MessageGenerator::new(spec).unwrap())
}

fn engine_with(sink: Arc<dyn Sink>) -> DispatchEngine {
    init_logging();
    DispatchEngine::new(sink, small_generator(), DispatchConfig::default())
}

/// Accepts up to `limit` payloads per call and counts them.
struct CappedSink {
    limit: usize,
    accepted: AtomicU64,
}

impl CappedSink {
    fn new(limit: usize) -> Self {
        Self {
            limit,
            accepted: AtomicU64::new(0),
        }
    }
}

#[async_trait::async_trait]
impl Sink for CappedSink {
    fn name(&self) -> &str {
        "capped"
    }

    async fn submit(&self, batch: &[Vec<u8>]) -> Result<usize, SinkError> {
        let n = batch.len().min(self.limit);
        self.accepted.fetch_add(n as u64, Ordering::Relaxed);
        Ok(n)
    }
}

/// Fails the first `failures` calls, then accepts everything.
struct RecoveringSink {
    failures: AtomicU64,
}

#[async_trait::async_trait]
impl Sink for RecoveringSink {
    fn name(&self) -> &str {
        "recovering"
    }

    async fn submit(&self, batch: &[Vec<u8>]) -> Result<usize, SinkError> {
        let remaining = self.failures.load(Ordering::Relaxed);
        if remaining > 0 {
            self.failures.store(remaining - 1, Ordering::Relaxed);
            return Err(SinkError::Rejected {
                status: 503,
                body: "unavailable".to_string(),
            });
        }
        Ok(batch.len())
    }
}

#[tokio::test(start_paused = true)]
async fn test_single_worker_hits_target_rate() {
    let sink = Arc::new(CappedSink::new(usize::MAX));
    let engine = engine_with(sink.clone());

    let settings = RunSettings::new(2000, Some(Duration::from_secs(5))).with_max_workers(1);
    let summary = engine.run(settings).await.unwrap();

    assert_eq!(summary.reason, ShutdownReason::DurationElapsed);
    assert_eq!(summary.worker_count, 1);
    assert!(
        (9_000..=11_000).contains(&summary.total_sent),
        "sent {}",
        summary.total_sent
    );
    assert!(summary.elapsed_secs >= 5.0 && summary.elapsed_secs < 6.0);
    assert_eq!(summary.total_sent, sink.accepted.load(Ordering::Relaxed));
    assert_eq!(summary.workers[0].batch_size, 200);
    assert_eq!(summary.failed_submits, 0);
    assert_eq!(summary.dropped, 0);
    assert!(summary.efficiency() > 0.9);
}

#[tokio::test(start_paused = true)]
async fn test_rate_split_across_workers() {
    let sink = Arc::new(CappedSink::new(usize::MAX));
    let engine = engine_with(sink);

    let settings = RunSettings::new(10_003, Some(Duration::from_secs(2)));
    let summary = engine.run(settings).await.unwrap();

    assert_eq!(summary.worker_count, 10);
    let shares: Vec<u64> = summary.workers.iter().map(|w| w.rate_share).collect();
    assert_eq!(shares.iter().sum::<u64>(), 10_003);
    assert_eq!(&shares[..3], &[1001, 1001, 1001]);
    assert!(summary.workers.iter().all(|w| w.messages_sent > 0));
}

#[tokio::test(start_paused = true)]
async fn test_double_cancel_is_idempotent() {
    let engine = engine_with(Arc::new(NullSink::new()));
    let token = engine.shutdown_token();

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(1)).await;
        token.cancel();
        token.cancel();
    });

    let summary = engine.run(RunSettings::new(1000, None)).await.unwrap();

    assert_eq!(summary.reason, ShutdownReason::Cancelled);
    assert!(summary.elapsed_secs >= 1.0 && summary.elapsed_secs < 1.5);
    assert!(summary.total_sent > 0);
    assert_eq!(engine.state(), EngineState::Stopped);

    // A late cancel after the run changes nothing
    engine.shutdown_token().cancel();
    assert_eq!(engine.state(), EngineState::Stopped);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_interrupts_slow_submit() {
    let sink = Arc::new(NullSink::new().with_latency(Duration::from_secs(30)));
    let engine = engine_with(sink.clone());
    let token = engine.shutdown_token();

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(500)).await;
        token.cancel();
    });

    let start = tokio::time::Instant::now();
    let summary = engine
        .run(RunSettings::new(1000, Some(Duration::from_secs(60))))
        .await
        .unwrap();

    assert!(start.elapsed() < Duration::from_secs(1));
    assert_eq!(summary.total_sent, 0);
    assert_eq!(sink.messages_accepted(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_before_run_ends_immediately() {
    let engine = engine_with(Arc::new(NullSink::new()));
    engine.shutdown_token().cancel();

    let summary = engine
        .run(RunSettings::new(1000, Some(Duration::from_secs(10))))
        .await
        .unwrap();

    assert_eq!(summary.reason, ShutdownReason::Cancelled);
    assert!(summary.elapsed_secs < 0.1);
}

#[tokio::test(start_paused = true)]
async fn test_sink_failures_do_not_stop_workers() {
    let sink = Arc::new(RecoveringSink {
        failures: AtomicU64::new(5),
    });
    let engine = engine_with(sink);

    let summary = engine
        .run(RunSettings::new(1000, Some(Duration::from_secs(3))).with_max_workers(1))
        .await
        .unwrap();

    assert_eq!(summary.failed_submits, 5);
    assert_eq!(summary.workers[0].failed_submits, 5);
    assert!(summary.total_sent > 0);
    assert!(summary.total_sent < 3000);
}

#[tokio::test(start_paused = true)]
async fn test_partial_acceptance_counts_dropped() {
    let sink = Arc::new(CappedSink::new(40));
    let engine = engine_with(sink.clone());

    // One worker, batches of 100 every 100ms
    let summary = engine
        .run(RunSettings::new(1000, Some(Duration::from_secs(2))).with_max_workers(1))
        .await
        .unwrap();

    let batches = summary.workers[0].batches;
    assert!(batches >= 20);
    assert_eq!(summary.total_sent, batches * 40);
    assert_eq!(summary.dropped, batches * 60);
    assert_eq!(summary.failed_submits, 0);
}

#[tokio::test(start_paused = true)]
async fn test_second_run_rejected() {
    let engine = engine_with(Arc::new(NullSink::new()));

    engine
        .run(RunSettings::new(1000, Some(Duration::from_millis(200))))
        .await
        .unwrap();

    let again = engine
        .run(RunSettings::new(1000, Some(Duration::from_millis(200))))
        .await;
    assert_eq!(again.unwrap_err(), DispatchError::AlreadyStarted);
}

#[tokio::test]
async fn test_invalid_settings_leave_engine_idle() {
    let engine = engine_with(Arc::new(NullSink::new()));

    let result = engine.run(RunSettings::new(0, None)).await;
    assert_eq!(result.unwrap_err(), DispatchError::InvalidRate);
    assert_eq!(engine.state(), EngineState::Idle);

    let mut config = DispatchConfig::default();
    config.batch.min_batch = 0;
    let engine = DispatchEngine::new(Arc::new(NullSink::new()), small_generator(), config);
    let result = engine.run(RunSettings::new(1000, None)).await;
    assert!(matches!(
        result,
        Err(DispatchError::InvalidBatchBounds { min: 0, .. })
    ));
}

#[tokio::test(start_paused = true)]
async fn test_state_transitions_are_published() {
    let engine = Arc::new(engine_with(Arc::new(NullSink::new())));
    let mut states = engine.subscribe_state();
    assert_eq!(*states.borrow(), EngineState::Idle);

    let runner = {
        let engine = Arc::clone(&engine);
        tokio::spawn(async move {
            engine
                .run(RunSettings::new(1000, Some(Duration::from_secs(1))))
                .await
        })
    };

    states
        .wait_for(|s| *s == EngineState::Running)
        .await
        .unwrap();
    states
        .wait_for(|s| *s == EngineState::Stopped)
        .await
        .unwrap();

    let summary = runner.await.unwrap().unwrap();
    assert_eq!(summary.reason, ShutdownReason::DurationElapsed);
}

#[tokio::test(start_paused = true)]
async fn test_summary_serializes() {
    let engine = engine_with(Arc::new(NullSink::new()));
    let summary = engine
        .run(RunSettings::new(500, Some(Duration::from_millis(500))))
        .await
        .unwrap();

    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["reason"], "duration_elapsed");
    assert_eq!(json["target_rate"], 500);
    assert_eq!(json["workers"].as_array().unwrap().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_parent_token_stops_child_engine() {
    let parent = tokio_util::sync::CancellationToken::new();
    let engine =
        engine_with(Arc::new(NullSink::new())).with_shutdown_token(parent.child_token());

    let trigger = parent.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(300)).await;
        trigger.cancel();
    });

    let summary = engine.run(RunSettings::new(1000, None)).await.unwrap();
    assert_eq!(summary.reason, ShutdownReason::Cancelled);

    // An engine finishing on its own leaves the parent untouched
    let parent = tokio_util::sync::CancellationToken::new();
    let engine =
        engine_with(Arc::new(NullSink::new())).with_shutdown_token(parent.child_token());
    engine
        .run(RunSettings::new(1000, Some(Duration::from_millis(200))))
        .await
        .unwrap();
    assert!(!parent.is_cancelled());
}
