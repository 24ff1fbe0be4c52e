//! Sink trait definition.

use crate::error::SinkError;

/// Trait for delivering batches of generated payloads downstream.
///
/// Implementations must tolerate concurrent `submit` calls from every
/// worker, either because the underlying client is thread-safe or because
/// the sink serializes access internally.
///
/// # Usage Pattern
///
/// ```ignore
/// let sink: Arc<dyn Sink> = Arc::new(NullSink::new());
/// let accepted = sink.submit(&batch).await?;
/// // `accepted` may be lower than `batch.len()` on partial acceptance;
/// // the remainder is dropped by the caller.
/// ```
#[async_trait::async_trait]
pub trait Sink: Send + Sync {
    /// Short name used in logs and summaries.
    fn name(&self) -> &str;

    /// Submit an ordered batch of payloads.
    ///
    /// Returns how many payloads were accepted, counted from the start of
    /// the batch. An `Err` means nothing from this call can be assumed
    /// delivered.
    async fn submit(&self, batch: &[Vec<u8>]) -> Result<usize, SinkError>;

    /// Flush buffered data and release resources.
    async fn close(&self) -> Result<(), SinkError> {
        Ok(())
    }
}
