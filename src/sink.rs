//! Sink construction from CLI options.

use crate::cli::{SinkChoice, SinkOpts};
use anyhow::Context;
use loadtest_sink::{HttpSink, HttpSinkConfig, JsonlSink, NullSink, Sink};
use std::sync::Arc;
use std::time::Duration;

/// Build the sink selected on the command line.
///
/// Failures here are fatal: the run has not started yet.
pub async fn build_sink(opts: &SinkOpts) -> anyhow::Result<Arc<dyn Sink>> {
    let sink: Arc<dyn Sink> = match opts.sink {
        SinkChoice::Null => {
            let sink = NullSink::new();
            match opts.sink_latency_ms {
                Some(ms) => Arc::new(sink.with_latency(Duration::from_millis(ms))),
                None => Arc::new(sink),
            }
        }
        SinkChoice::Stdout => Arc::new(JsonlSink::stdout()),
        SinkChoice::Jsonl => Arc::new(
            JsonlSink::create(&opts.output)
                .await
                .with_context(|| format!("Failed to open output file {:?}", opts.output))?,
        ),
        SinkChoice::Http => {
            let endpoint = opts
                .endpoint
                .clone()
                .context("The http sink needs --endpoint or SINK_ENDPOINT")?;
            let config = HttpSinkConfig {
                max_request_bytes: opts.max_request_bytes,
                max_request_messages: opts.max_request_messages,
                ..HttpSinkConfig::new(endpoint)
            };
            Arc::new(HttpSink::new(config).context("Failed to create HTTP sink")?)
        }
    };
    Ok(sink)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn opts(sink: SinkChoice) -> SinkOpts {
        SinkOpts {
            sink,
            output: PathBuf::from("messages.jsonl"),
            endpoint: None,
            max_request_bytes: 1024 * 1024,
            max_request_messages: 500,
            sink_latency_ms: None,
        }
    }

    #[tokio::test]
    async fn test_null_sink() {
        let sink = build_sink(&opts(SinkChoice::Null)).await.unwrap();
        assert_eq!(sink.name(), "null");
    }

    #[tokio::test]
    async fn test_jsonl_sink_creates_file() {
        let dir = TempDir::new().unwrap();
        let mut options = opts(SinkChoice::Jsonl);
        options.output = dir.path().join("out.jsonl");

        let sink = build_sink(&options).await.unwrap();
        sink.submit(&[b"{}".to_vec()]).await.unwrap();
        sink.close().await.unwrap();

        assert_eq!(std::fs::read_to_string(&options.output).unwrap(), "{}\n");
    }

    #[tokio::test]
    async fn test_http_sink_needs_endpoint() {
        let err = build_sink(&opts(SinkChoice::Http)).await.err().unwrap();
        assert!(err.to_string().contains("--endpoint"));
    }

    #[tokio::test]
    async fn test_http_sink_rejects_bad_endpoint() {
        let mut options = opts(SinkChoice::Http);
        options.endpoint = Some("not a url".to_string());
        assert!(build_sink(&options).await.is_err());
    }
}
