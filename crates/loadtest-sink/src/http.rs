//! Sink that posts newline-delimited payloads to an HTTP endpoint.

use crate::error::SinkError;
use crate::traits::Sink;
use reqwest::header::CONTENT_TYPE;
use std::ops::Range;
use std::time::Duration;
use tracing::{debug, warn};

/// Settings for [`HttpSink`].
#[derive(Debug, Clone)]
pub struct HttpSinkConfig {
    /// Endpoint URL receiving POST requests
    pub endpoint: String,
    /// Upper bound on one request body, in bytes
    pub max_request_bytes: usize,
    /// Upper bound on payloads per request
    pub max_request_messages: usize,
    /// Per-request timeout
    pub timeout: Duration,
}

impl HttpSinkConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            max_request_bytes: 1024 * 1024,
            max_request_messages: 500,
            timeout: Duration::from_secs(30),
        }
    }
}

/// HTTP sink.
///
/// A batch is split into requests that respect the configured size and count
/// limits, sent in order. When a request fails after earlier requests of the
/// same batch went through, the call reports the payloads delivered so far
/// instead of an error.
pub struct HttpSink {
    client: reqwest::Client,
    config: HttpSinkConfig,
}

impl HttpSink {
    /// Build the sink and its HTTP client.
    pub fn new(config: HttpSinkConfig) -> Result<Self, SinkError> {
        let url = reqwest::Url::parse(&config.endpoint)
            .map_err(|e| SinkError::Config(format!("Invalid endpoint '{}': {e}", config.endpoint)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(SinkError::Config(format!(
                "Unsupported endpoint scheme '{}'",
                url.scheme()
            )));
        }
        if config.max_request_bytes == 0 || config.max_request_messages == 0 {
            return Err(SinkError::Config(
                "Request limits must be greater than zero".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &HttpSinkConfig {
        &self.config
    }

    async fn post(&self, body: Vec<u8>) -> Result<(), SinkError> {
        let response = self
            .client
            .post(&self.config.endpoint)
            .header(CONTENT_TYPE, "application/x-ndjson")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SinkError::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl Sink for HttpSink {
    fn name(&self) -> &str {
        &self.config.endpoint
    }

    async fn submit(&self, batch: &[Vec<u8>]) -> Result<usize, SinkError> {
        let mut accepted = 0;

        for range in plan_requests(
            batch,
            self.config.max_request_bytes,
            self.config.max_request_messages,
        ) {
            let count = range.len();
            let mut body = Vec::new();
            for payload in &batch[range] {
                body.extend_from_slice(payload);
                body.push(b'\n');
            }

            match self.post(body).await {
                Ok(()) => accepted += count,
                Err(e) if accepted > 0 => {
                    warn!(
                        endpoint = %self.config.endpoint,
                        error = %e,
                        "Request failed mid-batch, {} of {} payloads delivered",
                        accepted,
                        batch.len()
                    );
                    return Ok(accepted);
                }
                Err(e) => return Err(e),
            }
        }

        debug!("Delivered {} payloads to {}", accepted, self.config.endpoint);
        Ok(accepted)
    }
}

/// Split a batch into consecutive request ranges.
///
/// Each range holds at most `max_messages` payloads and at most `max_bytes`
/// bytes of body (payload plus newline), except that a single payload larger
/// than `max_bytes` gets a range of its own.
pub fn plan_requests(batch: &[Vec<u8>], max_bytes: usize, max_messages: usize) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let mut start = 0;
    let mut size = 0;

    for (i, payload) in batch.iter().enumerate() {
        let len = payload.len() + 1;
        if i > start && (size + len > max_bytes || i - start >= max_messages) {
            ranges.push(start..i);
            start = i;
            size = 0;
        }
        size += len;
    }
    if start < batch.len() {
        ranges.push(start..batch.len());
    }

    ranges
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payloads(sizes: &[usize]) -> Vec<Vec<u8>> {
        sizes.iter().map(|&n| vec![b'x'; n]).collect()
    }

    #[test]
    fn test_plan_single_request() {
        let batch = payloads(&[10, 10, 10]);
        assert_eq!(plan_requests(&batch, 1000, 100), vec![0..3]);
    }

    #[test]
    fn test_plan_splits_on_bytes() {
        // Each payload takes 10 bytes with its newline
        let batch = payloads(&[9, 9, 9, 9, 9]);
        assert_eq!(plan_requests(&batch, 25, 100), vec![0..2, 2..4, 4..5]);
    }

    #[test]
    fn test_plan_splits_on_count() {
        let batch = payloads(&[1; 7]);
        assert_eq!(plan_requests(&batch, 1000, 3), vec![0..3, 3..6, 6..7]);
    }

    #[test]
    fn test_plan_oversized_payload_alone() {
        let batch = payloads(&[5, 100, 5]);
        assert_eq!(plan_requests(&batch, 20, 10), vec![0..1, 1..2, 2..3]);
    }

    #[test]
    fn test_plan_empty_batch() {
        assert!(plan_requests(&[], 10, 10).is_empty());
    }

    #[test]
    fn test_invalid_endpoint_rejected() {
        assert!(matches!(
            HttpSink::new(HttpSinkConfig::new("not a url")),
            Err(SinkError::Config(_))
        ));
        assert!(matches!(
            HttpSink::new(HttpSinkConfig::new("ftp://example.com/upload")),
            Err(SinkError::Config(_))
        ));
    }

    #[test]
    fn test_zero_limits_rejected() {
        let mut config = HttpSinkConfig::new("http://localhost:8080/ingest");
        config.max_request_messages = 0;
        assert!(matches!(HttpSink::new(config), Err(SinkError::Config(_))));
    }
}
