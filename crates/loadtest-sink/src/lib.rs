//! Sink trait abstraction for stream-sim.
//!
//! This crate defines the `Sink` trait the dispatch engine submits batches
//! through, plus the sinks shipped with the CLI:
//!
//! - [`NullSink`] - discards payloads, optionally with simulated latency
//! - [`JsonlSink`] - writes one payload per line to a file or stdout
//! - [`HttpSink`] - posts newline-delimited payloads to an HTTP endpoint
//!
//! Payloads are opaque byte strings. The engine never inspects them and
//! never retries a payload a sink did not accept.

mod error;
mod http;
mod jsonl;
mod null;
mod traits;

pub use error::SinkError;
pub use http::{plan_requests, HttpSink, HttpSinkConfig};
pub use jsonl::JsonlSink;
pub use null::NullSink;
pub use traits::Sink;
