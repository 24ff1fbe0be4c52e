//! Rate-controlled dispatch engine for the stream-sim load testing tool.
//!
//! The engine splits a global target rate (messages per second) across a
//! pool of concurrent workers. Each worker generates batches with the shared
//! `MessageGenerator`, submits them to the shared `Sink`, and paces itself to
//! its share of the rate. All workers feed one `StatsAggregator`, which a
//! reporter samples once per window.
//!
//! # Architecture
//!
//! ```text
//!                   DispatchEngine::run(RunSettings)
//!                                │
//!            split_rate(target, worker_count(target, cap))
//!                                │
//!          ┌─────────────────────┼─────────────────────┐
//!          ▼                     ▼                     ▼
//!   ┌─────────────┐       ┌─────────────┐       ┌─────────────┐
//!   │ RateWorker 0│       │ RateWorker 1│  ...  │ RateWorker N│
//!   │ gen → submit│       │ gen → submit│       │ gen → submit│
//!   │   → pace    │       │   → pace    │       │   → pace    │
//!   └──────┬──────┘       └──────┬──────┘       └──────┬──────┘
//!          └─────────────────────┼─────────────────────┘
//!                                ▼ add_sent
//!                       ┌─────────────────┐      ┌──────────┐
//!                       │ StatsAggregator │◄─────│ reporter │
//!                       └─────────────────┘      └──────────┘
//! ```
//!
//! # Lifecycle
//!
//! `Idle → Running → Draining → Stopped`. Draining starts when the duration
//! elapses or the shutdown token is cancelled; the engine then waits for
//! every task to exit and returns a [`FinalSummary`].

pub mod config;
pub mod engine;
pub mod error;
pub mod plan;
pub mod reporter;
pub mod stats;
pub mod worker;

// Re-exports for convenience
pub use config::{BatchConfig, DispatchConfig, RunSettings};
pub use engine::{DispatchEngine, EngineState, FinalSummary, ShutdownReason};
pub use error::DispatchError;
pub use plan::{split_rate, worker_count, BatchPlan, RATE_PER_WORKER};
pub use stats::{StatsAggregator, StatsSnapshot, WindowSnapshot};
pub use worker::{RateWorker, WorkerReport};
