//! Error types for sinks.

use thiserror::Error;

/// Errors that can occur while building or submitting to a sink.
#[derive(Error, Debug)]
pub enum SinkError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("Endpoint rejected request with status {status}: {body}")]
    Rejected { status: u16, body: String },

    /// Invalid sink configuration.
    #[error("Sink configuration error: {0}")]
    Config(String),

    /// The sink was closed before the call.
    #[error("Sink is closed")]
    Closed,
}
