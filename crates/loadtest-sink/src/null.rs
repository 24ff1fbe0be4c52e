//! Sink that accepts and discards everything.

use crate::error::SinkError;
use crate::traits::Sink;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Sink that discards payloads after counting them.
///
/// Useful for measuring how fast the generator and scheduler can go without
/// a network in the way. An optional per-call latency makes it behave like a
/// remote service with a fixed round trip.
#[derive(Debug, Default)]
pub struct NullSink {
    latency: Option<Duration>,
    messages: AtomicU64,
    bytes: AtomicU64,
}

impl NullSink {
    /// Create a new null sink without latency.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep for `latency` on every submit.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Total messages accepted so far.
    pub fn messages_accepted(&self) -> u64 {
        self.messages.load(Ordering::Relaxed)
    }

    /// Total payload bytes accepted so far.
    pub fn bytes_accepted(&self) -> u64 {
        self.bytes.load(Ordering::Relaxed)
    }
}

#[async_trait::async_trait]
impl Sink for NullSink {
    fn name(&self) -> &str {
        "null"
    }

    async fn submit(&self, batch: &[Vec<u8>]) -> Result<usize, SinkError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let bytes: usize = batch.iter().map(|p| p.len()).sum();
        self.messages
            .fetch_add(batch.len() as u64, Ordering::Relaxed);
        self.bytes.fetch_add(bytes as u64, Ordering::Relaxed);

        Ok(batch.len())
    }
}
