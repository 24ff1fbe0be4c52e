//! Rate sweep: run the engine at increasing rates and pick the best one.

use crate::cli::SweepArgs;
use crate::config::SimulatorConfig;
use crate::runner::execute;
use loadtest_dispatch::FinalSummary;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Rates above this are dropped from the sweep once efficiency collapses.
pub const EARLY_STOP_MIN_RATE: u64 = 10_000;
/// Efficiency below which a high-rate step ends the sweep.
pub const EARLY_STOP_EFFICIENCY: f64 = 0.5;
/// Minimum efficiency for a rate to be recommended.
pub const RECOMMEND_MIN_EFFICIENCY: f64 = 0.8;

/// Outcome of one sweep step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepStep {
    pub target_rate: u64,
    pub message_size: usize,
    pub total_sent: u64,
    pub actual_rate: f64,
    pub efficiency: f64,
}

impl SweepStep {
    pub fn from_summary(summary: &FinalSummary, message_size: usize) -> Self {
        Self {
            target_rate: summary.target_rate,
            message_size,
            total_sent: summary.total_sent,
            actual_rate: summary.average_rate,
            efficiency: summary.efficiency(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SweepReport {
    pub rate_steps: Vec<SweepStep>,
    pub size_steps: Vec<SweepStep>,
    pub recommended: Option<SweepStep>,
    pub stopped_early_at: Option<u64>,
    pub aborted: bool,
}

/// Whether a step performed badly enough to skip the remaining rates.
pub fn should_stop(step: &SweepStep) -> bool {
    step.target_rate > EARLY_STOP_MIN_RATE && step.efficiency < EARLY_STOP_EFFICIENCY
}

/// Step with the highest efficiency above [`RECOMMEND_MIN_EFFICIENCY`].
/// The earliest step wins a tie.
pub fn recommend(steps: &[SweepStep]) -> Option<&SweepStep> {
    let mut best: Option<&SweepStep> = None;
    for step in steps {
        if step.efficiency <= RECOMMEND_MIN_EFFICIENCY {
            continue;
        }
        let better = match best {
            Some(b) => step.efficiency > b.efficiency,
            None => true,
        };
        if better {
            best = Some(step);
        }
    }
    best
}

/// Run the sweep. Cancelling `interrupt` ends the current step early and
/// skips the rest.
pub async fn run_sweep(
    config: &SimulatorConfig,
    args: &SweepArgs,
    interrupt: CancellationToken,
) -> anyhow::Result<SweepReport> {
    let mut report = SweepReport::default();

    info!(
        "Running {} rate steps ({}s each)",
        args.rates.len(),
        args.step_duration.as_secs()
    );

    for &rate in &args.rates {
        let run = config.resolve(&args.overrides(rate, None))?;
        info!("Testing {} msg/s (msg size: {} bytes)", rate, run.message_size);

        let summary = execute(config, &run, &args.sink, interrupt.child_token()).await?;
        let step = SweepStep::from_summary(&summary, run.message_size);
        info!(
            "{} messages sent, {:.0} msg/s actual ({:.1}% efficiency)",
            step.total_sent,
            step.actual_rate,
            step.efficiency * 100.0
        );
        let stop = should_stop(&step);
        report.rate_steps.push(step);

        if interrupt.is_cancelled() {
            warn!("Sweep interrupted");
            report.aborted = true;
            return Ok(report);
        }
        if stop {
            warn!("Stopping sweep: performance degraded significantly at {rate} msg/s");
            report.stopped_early_at = Some(rate);
            break;
        }
    }

    report.recommended = recommend(&report.rate_steps).cloned();

    if args.sweep_sizes {
        if let Some(best) = report.recommended.clone() {
            info!("Testing message sizes at {} msg/s", best.target_rate);
            for &size in &args.sizes {
                let mut overrides = args.overrides(best.target_rate, Some(size));
                overrides.duration = Some(args.size_step_duration);
                let run = config.resolve(&overrides)?;

                let summary = execute(config, &run, &args.sink, interrupt.child_token()).await?;
                let step = SweepStep::from_summary(&summary, size);
                info!(
                    "Message size {} bytes: {:.1}% efficiency",
                    size,
                    step.efficiency * 100.0
                );
                report.size_steps.push(step);

                if interrupt.is_cancelled() {
                    warn!("Sweep interrupted");
                    report.aborted = true;
                    break;
                }
            }
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(target_rate: u64, efficiency: f64) -> SweepStep {
        SweepStep {
            target_rate,
            message_size: 500,
            total_sent: 0,
            actual_rate: target_rate as f64 * efficiency,
            efficiency,
        }
    }

    #[test]
    fn test_should_stop_only_above_threshold_rate() {
        assert!(!should_stop(&step(10_000, 0.2)));
        assert!(should_stop(&step(25_000, 0.49)));
        assert!(!should_stop(&step(25_000, 0.5)));
    }

    #[test]
    fn test_recommend_best_efficiency() {
        let steps = vec![
            step(1000, 0.99),
            step(5000, 0.995),
            step(10_000, 0.95),
            step(25_000, 0.6),
        ];
        assert_eq!(recommend(&steps).unwrap().target_rate, 5000);
    }

    #[test]
    fn test_recommend_tie_keeps_first() {
        let steps = vec![step(1000, 0.9), step(5000, 0.9)];
        assert_eq!(recommend(&steps).unwrap().target_rate, 1000);
    }

    #[test]
    fn test_recommend_needs_eighty_percent() {
        let steps = vec![step(1000, 0.8), step(5000, 0.4)];
        assert!(recommend(&steps).is_none());
        assert!(recommend(&[]).is_none());
    }
}
