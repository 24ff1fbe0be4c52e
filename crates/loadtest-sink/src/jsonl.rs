//! Sink that writes newline-delimited payloads to a file or stdout.

use crate::error::SinkError;
use crate::traits::Sink;
use std::path::Path;
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Default buffer size for JSONL writing.
pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

type BoxedWriter = BufWriter<Box<dyn AsyncWrite + Send + Unpin>>;

/// JSONL sink: one payload per line.
///
/// Each batch is encoded into one buffer and written with a single call
/// under the lock, so lines from concurrent workers never interleave.
pub struct JsonlSink {
    label: String,
    writer: Mutex<Option<BoxedWriter>>,
    flush_each_batch: bool,
}

impl JsonlSink {
    /// Create (or truncate) the file at `path` and write to it.
    pub async fn create<P: AsRef<Path>>(path: P) -> Result<Self, SinkError> {
        let path = path.as_ref();
        let file = tokio::fs::File::create(path).await?;
        info!("Writing messages to '{}'", path.display());

        Ok(Self {
            label: format!("jsonl:{}", path.display()),
            writer: Mutex::new(Some(BufWriter::with_capacity(
                DEFAULT_BUFFER_SIZE,
                Box::new(file),
            ))),
            flush_each_batch: false,
        })
    }

    /// Write to the process stdout, flushing after every batch.
    pub fn stdout() -> Self {
        Self {
            label: "stdout".to_string(),
            writer: Mutex::new(Some(BufWriter::with_capacity(
                DEFAULT_BUFFER_SIZE,
                Box::new(tokio::io::stdout()),
            ))),
            flush_each_batch: true,
        }
    }
}

#[async_trait::async_trait]
impl Sink for JsonlSink {
    fn name(&self) -> &str {
        &self.label
    }

    async fn submit(&self, batch: &[Vec<u8>]) -> Result<usize, SinkError> {
        let total: usize = batch.iter().map(|p| p.len() + 1).sum();
        let mut buf = Vec::with_capacity(total);
        for payload in batch {
            buf.extend_from_slice(payload);
            buf.push(b'\n');
        }

        let mut guard = self.writer.lock().await;
        let writer = guard.as_mut().ok_or(SinkError::Closed)?;
        writer.write_all(&buf).await?;
        if self.flush_each_batch {
            writer.flush().await?;
        }

        Ok(batch.len())
    }

    async fn close(&self) -> Result<(), SinkError> {
        let mut guard = self.writer.lock().await;
        if let Some(mut writer) = guard.take() {
            writer.flush().await?;
            writer.shutdown().await?;
            debug!("Closed sink {}", self.label);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_writes_one_line_per_payload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.jsonl");
        let sink = JsonlSink::create(&path).await.unwrap();

        let batch = vec![b"{\"a\":1}".to_vec(), b"{\"a\":2}".to_vec()];
        assert_eq!(sink.submit(&batch).await.unwrap(), 2);
        assert_eq!(sink.submit(&batch[..1]).await.unwrap(), 1);
        sink.close().await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines, vec!["{\"a\":1}", "{\"a\":2}", "{\"a\":1}"]);
    }

    #[tokio::test]
    async fn test_submit_after_close_fails() {
        let dir = TempDir::new().unwrap();
        let sink = JsonlSink::create(dir.path().join("out.jsonl"))
            .await
            .unwrap();

        sink.close().await.unwrap();
        // Closing twice is a no-op
        sink.close().await.unwrap();

        let result = sink.submit(&[b"{}".to_vec()]).await;
        assert!(matches!(result, Err(SinkError::Closed)));
    }

    #[tokio::test]
    async fn test_create_in_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let result = JsonlSink::create(dir.path().join("missing").join("out.jsonl")).await;
        assert!(matches!(result, Err(SinkError::Io(_))));
    }
}
