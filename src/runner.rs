//! Wiring for one engine run: sink, generator, engine, interrupt handling.

use crate::cli::SinkOpts;
use crate::config::{ResolvedRun, SimulatorConfig};
use crate::sink::build_sink;
use anyhow::Context;
use loadtest_dispatch::{DispatchEngine, FinalSummary};
use loadtest_generator::MessageGenerator;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Cancel `token` on Ctrl-C. Later interrupts are logged and ignored.
pub fn spawn_interrupt_handler(token: CancellationToken) {
    tokio::spawn(async move {
        loop {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Failed to listen for Ctrl+C: {e}");
                return;
            }
            if token.is_cancelled() {
                info!("Shutdown already in progress");
            } else {
                info!("Received interrupt signal (Ctrl+C), stopping workers");
                token.cancel();
            }
        }
    });
}

/// Build the sink and engine for `run` and drive it to completion.
///
/// The engine stops when the run duration elapses or `shutdown` is
/// cancelled. The sink is closed afterwards whatever the outcome.
pub async fn execute(
    config: &SimulatorConfig,
    run: &ResolvedRun,
    sink_opts: &SinkOpts,
    shutdown: CancellationToken,
) -> anyhow::Result<FinalSummary> {
    let generator = MessageGenerator::new(config.generation_spec(run))
        .context("Invalid message generation settings")?;
    let sink = build_sink(sink_opts).await?;

    let engine = DispatchEngine::new(
        Arc::clone(&sink),
        Arc::new(generator),
        config.dispatch_config(),
    )
    .with_shutdown_token(shutdown);

    let result = engine.run(run.run_settings()).await;

    if let Err(e) = sink.close().await {
        warn!("Failed to close sink {}: {e}", sink.name());
    }

    result.context("Dispatch engine failed to start")
}
