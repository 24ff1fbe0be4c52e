//! CLI argument definitions for stream-sim.

use crate::config::{parse_duration, RunOverrides, DEFAULT_CONFIG_PATH};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

/// Rate-controlled synthetic message load generator.
#[derive(Parser)]
#[command(name = "stream-sim")]
#[command(about = "Generate synthetic JSON messages at a target rate and send them to a sink")]
#[command(version)]
pub struct Cli {
    /// JSON configuration file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Send messages at a target rate until the duration elapses or Ctrl-C
    Run(RunArgs),

    /// Generate messages locally and check their size and shape
    Inspect(InspectArgs),

    /// Run the engine at a series of rates and recommend the best one
    Sweep(SweepArgs),
}

/// Output format for summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
}

/// Sink destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SinkChoice {
    /// Discard messages after counting them
    Null,
    /// One message per line on stdout
    Stdout,
    /// One message per line in a file
    Jsonl,
    /// POST newline-delimited batches to an HTTP endpoint
    Http,
}

/// Sink selection options.
#[derive(Args, Debug, Clone)]
pub struct SinkOpts {
    /// Where generated messages go
    #[arg(long, value_enum, default_value = "null")]
    pub sink: SinkChoice,

    /// Output file for the jsonl sink
    #[arg(long, default_value = "messages.jsonl")]
    pub output: PathBuf,

    /// Endpoint URL for the http sink
    #[arg(long, env = "SINK_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Maximum request body size for the http sink, in bytes
    #[arg(long, default_value = "1048576")]
    pub max_request_bytes: usize,

    /// Maximum messages per request for the http sink
    #[arg(long, default_value = "500")]
    pub max_request_messages: usize,

    /// Simulated per-batch latency for the null sink, in milliseconds
    #[arg(long)]
    pub sink_latency_ms: Option<u64>,
}

/// Rate and message options shared by `run` and `sweep`.
#[derive(Args, Debug, Clone)]
pub struct MessageOpts {
    /// Comma-separated stock symbols, or a file with one symbol per line
    #[arg(long)]
    pub stocks: Option<String>,

    /// Approximate message size in bytes
    #[arg(long)]
    pub msg_size: Option<usize>,

    /// Maximum number of concurrent workers
    #[arg(long)]
    pub max_workers: Option<usize>,
}

/// Arguments for `run`.
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Target messages per second
    #[arg(long)]
    pub rate: Option<u64>,

    /// Run duration (e.g. "300", "300s", "30m", "1h"); unlimited when omitted
    #[arg(long, value_parser = parse_duration)]
    pub duration: Option<Duration>,

    #[command(flatten)]
    pub message: MessageOpts,

    #[command(flatten)]
    pub sink: SinkOpts,

    /// Final summary format
    #[arg(long, value_enum, default_value = "table")]
    pub output_format: OutputFormat,
}

impl RunArgs {
    pub fn overrides(&self) -> RunOverrides {
        RunOverrides {
            rate: self.rate,
            duration: self.duration,
            message_size: self.message.msg_size,
            max_workers: self.message.max_workers,
            categories: self.message.stocks.clone(),
        }
    }
}

/// Arguments for `inspect`.
#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    /// Target sizes to check, in bytes
    #[arg(long, value_delimiter = ',', default_value = "256,500,1024")]
    pub sizes: Vec<usize>,

    /// Messages generated per size
    #[arg(long, default_value = "1000")]
    pub count: usize,

    /// Comma-separated stock symbols, or a file with one symbol per line
    #[arg(long)]
    pub stocks: Option<String>,

    /// Print one sample message per size
    #[arg(long)]
    pub show_sample: bool,

    #[arg(long, value_enum, default_value = "table")]
    pub output_format: OutputFormat,
}

/// Arguments for `sweep`.
#[derive(Args, Debug, Clone)]
pub struct SweepArgs {
    /// Target rates to try, in order
    #[arg(
        long,
        value_delimiter = ',',
        default_value = "1000,5000,10000,25000,50000,100000"
    )]
    pub rates: Vec<u64>,

    /// Duration of each rate step
    #[arg(long, value_parser = parse_duration, default_value = "30s")]
    pub step_duration: Duration,

    /// Also try several message sizes at the recommended rate
    #[arg(long)]
    pub sweep_sizes: bool,

    /// Message sizes for the size sweep
    #[arg(long, value_delimiter = ',', default_value = "256,512,1024,2048")]
    pub sizes: Vec<usize>,

    /// Duration of each size step
    #[arg(long, value_parser = parse_duration, default_value = "20s")]
    pub size_step_duration: Duration,

    #[command(flatten)]
    pub message: MessageOpts,

    #[command(flatten)]
    pub sink: SinkOpts,

    #[arg(long, value_enum, default_value = "table")]
    pub output_format: OutputFormat,
}

impl SweepArgs {
    /// Overrides for one step of the sweep.
    pub fn overrides(&self, rate: u64, message_size: Option<usize>) -> RunOverrides {
        RunOverrides {
            rate: Some(rate),
            duration: Some(self.step_duration),
            message_size: message_size.or(self.message.msg_size),
            max_workers: self.message.max_workers,
            categories: self.message.stocks.clone(),
        }
    }
}
