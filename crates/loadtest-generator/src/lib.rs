//! Message generator for the stream-sim load testing tool.
//!
//! This crate provides the `MessageGenerator` which produces compact JSON
//! records approximating a target byte size. Every record carries a
//! generation timestamp and a category value (for example a stock ticker),
//! followed by synthetic fields until the size or field budget is used up.
//!
//! # Architecture
//!
//! ```text
//! GenerationSpec (immutable, shared)
//!        │
//!        ▼
//! ┌──────────────────┐
//! │ MessageGenerator │
//! │                  │
//! │  - spec          │
//! │  - FieldKind set │
//! └────────┬─────────┘
//!          │  generate()
//!          ▼
//!   {"timestamp":...,"stockName":...,"field_0":...}
//! ```
//!
//! # Example
//!
//! ```rust
//! use loadtest_generator::{GenerationSpec, MessageGenerator};
//!
//! let spec = GenerationSpec {
//!     target_size: 256,
//!     categories: vec!["AAPL".to_string(), "MSFT".to_string()],
//!     ..Default::default()
//! };
//! let generator = MessageGenerator::new(spec).unwrap();
//! let payload = generator.generate();
//! let value: serde_json::Value = serde_json::from_slice(&payload).unwrap();
//! assert!(value.get("timestamp").is_some());
//! ```
//!
//! # Field kinds
//!
//! - `integer` - Random integer in the configured number range
//! - `float` - Random float rounded to the configured precision
//! - `boolean` - `true` or `false`
//! - `random_string` - Alphanumeric string within the string length range
//! - `status` - One of `active`, `inactive`, `pending`, `completed`, `failed`
//! - `user_id` - `user_NNNN`
//! - `session_id` - `session_NNNNNN`
//! - `large_integer` - Ten digit integer

pub mod generator;
pub mod generators;
pub mod spec;

// Re-exports for convenience
pub use generator::MessageGenerator;
pub use generators::{FieldKind, FieldValue};
pub use spec::{GenerationSpec, SpecError};
