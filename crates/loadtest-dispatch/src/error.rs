//! Error types for the dispatch engine.

use thiserror::Error;

/// Engine-level errors. Worker-level sink failures never surface here.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("Target rate must be greater than zero")]
    InvalidRate,

    #[error("Batch bounds are invalid: min {min}, max {max}")]
    InvalidBatchBounds { min: usize, max: usize },

    #[error("Engine has already been started")]
    AlreadyStarted,
}
