//! Command-line interface for stream-sim
//!
//! # Usage Examples
//!
//! ```bash
//! # Run at 25k msg/s with symbols from a file for ten minutes
//! stream-sim run --rate 25000 --stocks stocks.txt --duration 600
//!
//! # Write messages to a JSONL file and print a JSON summary
//! stream-sim run --rate 2000 --duration 30s --sink jsonl --output out.jsonl \
//!   --output-format json
//!
//! # Inspect generator output for several sizes
//! stream-sim inspect --sizes 256,512,1024,2048 --count 5000
//!
//! # Sweep rates against an HTTP sink
//! SINK_ENDPOINT=http://localhost:8080/ingest stream-sim sweep --sink http
//! ```

use anyhow::Context;
use clap::Parser;
use loadtest_generator::MessageGenerator;
use stream_sim::cli::{Cli, Commands, InspectArgs, OutputFormat, RunArgs, SinkChoice, SweepArgs};
use stream_sim::config::categories::preview;
use stream_sim::config::{RunOverrides, SimulatorConfig};
use stream_sim::inspect::inspect_generator;
use stream_sim::report::{format_inspect_table, format_json, format_sweep_table, format_table};
use stream_sim::runner::{execute, spawn_interrupt_handler};
use stream_sim::sweep::run_sweep;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    // Initialize tracing; logs go to stderr so stdout can carry messages
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = SimulatorConfig::load(&cli.config)?;

    match cli.command {
        Commands::Run(args) => run_simulation(&config, args).await,
        Commands::Inspect(args) => run_inspect(&config, args),
        Commands::Sweep(args) => run_rate_sweep(&config, args).await,
    }
}

async fn run_simulation(config: &SimulatorConfig, args: RunArgs) -> anyhow::Result<()> {
    let run = config.resolve(&args.overrides())?;

    info!(
        "Loaded {} stock symbols: {}",
        run.categories.len(),
        preview(&run.categories)
    );
    info!("Target rate: {} messages/second", run.rate);
    info!("Message size: ~{} bytes", run.message_size);
    match run.duration {
        Some(duration) => info!("Duration: {} seconds", duration.as_secs()),
        None => info!("Duration: unlimited"),
    }
    info!("Sink: {:?}", args.sink.sink);
    info!("Press Ctrl+C to stop gracefully");

    let shutdown = CancellationToken::new();
    spawn_interrupt_handler(shutdown.clone());

    let summary = execute(config, &run, &args.sink, shutdown).await?;

    let rendered = match args.output_format {
        OutputFormat::Json => format_json(&summary)?,
        OutputFormat::Table => format_table(&summary),
    };
    // Keep stdout clean of anything but messages when it is the sink
    if args.sink.sink == SinkChoice::Stdout {
        eprintln!("{rendered}");
    } else {
        println!("{rendered}");
    }

    Ok(())
}

fn run_inspect(config: &SimulatorConfig, args: InspectArgs) -> anyhow::Result<()> {
    let mut checks = Vec::with_capacity(args.sizes.len());
    for &size in &args.sizes {
        let overrides = RunOverrides {
            message_size: Some(size),
            categories: args.stocks.clone(),
            ..Default::default()
        };
        let run = config.resolve(&overrides)?;
        let generator = MessageGenerator::new(config.generation_spec(&run))
            .with_context(|| format!("Invalid generation settings for {size} bytes"))?;

        info!(
            "Generating {} messages of ~{} bytes for {} symbols",
            args.count,
            size,
            run.categories.len()
        );
        checks.push(inspect_generator(&generator, args.count, args.show_sample));
    }

    match args.output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&checks)?),
        OutputFormat::Table => println!("{}", format_inspect_table(&checks)),
    }

    let invalid: usize = checks.iter().map(|c| c.invalid).sum();
    if invalid > 0 {
        anyhow::bail!("{invalid} generated messages failed validation");
    }
    Ok(())
}

async fn run_rate_sweep(config: &SimulatorConfig, args: SweepArgs) -> anyhow::Result<()> {
    if args.rates.is_empty() {
        anyhow::bail!("No rates to sweep");
    }

    let interrupt = CancellationToken::new();
    spawn_interrupt_handler(interrupt.clone());

    let report = run_sweep(config, &args, interrupt).await?;

    let rendered = match args.output_format {
        OutputFormat::Json => serde_json::to_string_pretty(&report)?,
        OutputFormat::Table => format_sweep_table(&report),
    };
    if args.sink.sink == SinkChoice::Stdout {
        eprintln!("{rendered}");
    } else {
        println!("{rendered}");
    }

    Ok(())
}
