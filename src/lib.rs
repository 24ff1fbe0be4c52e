//! stream-sim library
//!
//! Glue between the command line and the load generation crates:
//!
//! - `loadtest_generator` builds JSON messages close to a target size
//! - `loadtest_sink` delivers batches (null, JSONL file/stdout, HTTP)
//! - `loadtest_dispatch` splits a target rate across paced workers
//!
//! # CLI Usage
//!
//! ```bash
//! # 50k msg/s for five minutes into the null sink
//! stream-sim run --rate 50000 --duration 5m
//!
//! # 1 KiB messages for three symbols, posted to an HTTP endpoint
//! stream-sim run --rate 5000 --msg-size 1024 --stocks "AAPL,GOOGL,MSFT" \
//!   --sink http --endpoint http://localhost:8080/ingest
//!
//! # Check generated message sizes without sending anything
//! stream-sim inspect --sizes 256,500,1024
//!
//! # Find the highest sustainable rate for a sink
//! stream-sim sweep --sink jsonl --output /tmp/out.jsonl --sweep-sizes
//! ```

pub mod cli;
pub mod config;
pub mod inspect;
pub mod report;
pub mod runner;
pub mod sink;
pub mod sweep;

pub use cli::{Cli, Commands, OutputFormat};
pub use config::SimulatorConfig;
