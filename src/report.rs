//! Summary rendering for the `run` and `sweep` commands.

use crate::inspect::SizeCheck;
use crate::sweep::SweepReport;
use comfy_table::{presets::UTF8_FULL, Cell, Color, Table};
use loadtest_dispatch::FinalSummary;

/// Format a run summary as a table of workers plus a totals row.
pub fn format_table(summary: &FinalSummary) -> String {
    let mut output = String::new();

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec![
        "Worker", "Rate share", "Batch", "Batches", "Sent", "Failed", "Dropped",
    ]);

    for worker in &summary.workers {
        let failed_cell = if worker.failed_submits > 0 {
            Cell::new(format_number(worker.failed_submits)).fg(Color::Red)
        } else {
            Cell::new("0")
        };

        table.add_row(vec![
            Cell::new(worker.worker_id),
            Cell::new(format_number(worker.rate_share)),
            Cell::new(worker.batch_size),
            Cell::new(format_number(worker.batches)),
            Cell::new(format_number(worker.messages_sent)),
            failed_cell,
            Cell::new(format_number(worker.dropped)),
        ]);
    }

    table.add_row(vec![
        Cell::new("TOTAL").fg(Color::Cyan),
        Cell::new(format_number(summary.target_rate)),
        Cell::new("-"),
        Cell::new(format_number(
            summary.workers.iter().map(|w| w.batches).sum(),
        )),
        Cell::new(format_number(summary.total_sent)),
        Cell::new(format_number(summary.failed_submits)),
        Cell::new(format_number(summary.dropped)),
    ]);

    output.push_str(&table.to_string());
    output.push_str("\n\nFinal Statistics:\n");
    output.push_str(&format!(
        "  Total runtime: {}\n",
        format_duration(summary.elapsed_secs)
    ));
    output.push_str(&format!(
        "  Total messages sent: {}\n",
        format_number(summary.total_sent)
    ));
    output.push_str(&format!(
        "  Average rate: {} messages/second ({:.1}% of target)\n",
        format_number(summary.average_rate.round() as u64),
        summary.efficiency() * 100.0
    ));
    output.push_str(&format!("  Stopped: {}\n", summary.reason));

    output
}

/// Format a run summary as pretty JSON.
pub fn format_json(summary: &FinalSummary) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(summary)?)
}

/// Format sweep results as a table with the recommendation below it.
pub fn format_sweep_table(report: &SweepReport) -> String {
    let mut output = String::new();

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec![
        "Target rate",
        "Msg size",
        "Messages sent",
        "Actual rate",
        "Efficiency",
    ]);

    for step in report.rate_steps.iter().chain(&report.size_steps) {
        let efficiency = step.efficiency * 100.0;
        let efficiency_cell = if efficiency >= 80.0 {
            Cell::new(format!("{efficiency:.1}%")).fg(Color::Green)
        } else if efficiency < 50.0 {
            Cell::new(format!("{efficiency:.1}%")).fg(Color::Red)
        } else {
            Cell::new(format!("{efficiency:.1}%"))
        };

        table.add_row(vec![
            Cell::new(format_number(step.target_rate)),
            Cell::new(step.message_size),
            Cell::new(format_number(step.total_sent)),
            Cell::new(format_number(step.actual_rate.round() as u64)),
            efficiency_cell,
        ]);
    }

    output.push_str(&table.to_string());
    output.push('\n');

    if let Some(rate) = report.stopped_early_at {
        output.push_str(&format!(
            "\nStopped early: performance degraded significantly at {} msg/s\n",
            format_number(rate)
        ));
    }

    match &report.recommended {
        Some(best) => output.push_str(&format!(
            "\nRecommended rate: {} messages/second ({:.1}% efficiency)\n",
            format_number(best.target_rate),
            best.efficiency * 100.0
        )),
        None => output.push_str(
            "\nNo rate reached 80% efficiency. Check the sink and start with lower rates.\n",
        ),
    }

    output
}

/// Format generator checks, one row per target size.
pub fn format_inspect_table(checks: &[SizeCheck]) -> String {
    let mut output = String::new();

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec![
        "Target",
        "Avg size",
        "Range",
        "Variance",
        "Avg fields",
        "In tolerance",
        "Msg/s",
        "Status",
    ]);

    for check in checks {
        let status_cell = if check.passed() {
            Cell::new("OK").fg(Color::Green)
        } else {
            Cell::new(format!("{} INVALID", check.invalid)).fg(Color::Red)
        };

        table.add_row(vec![
            Cell::new(check.target_size),
            Cell::new(format!("{:.1}", check.avg_size)),
            Cell::new(format!("{} - {}", check.min_size, check.max_size)),
            Cell::new(format!("{:.1}", check.size_variance)),
            Cell::new(format!("{:.1}", check.avg_fields)),
            Cell::new(format!("{:.1}%", check.within_tolerance * 100.0)),
            Cell::new(format_number(check.messages_per_sec.round() as u64)),
            status_cell,
        ]);
    }

    output.push_str(&table.to_string());
    output.push('\n');

    for check in checks {
        if let Some(sample) = &check.sample {
            output.push_str(&format!("\nSample ({} bytes target):\n{sample}\n", check.target_size));
        }
        for problem in &check.problems {
            output.push_str(&format!("  [{}] {problem}\n", check.target_size));
        }
    }

    output
}

/// Format duration in human-readable format.
pub fn format_duration(secs: f64) -> String {
    if secs < 60.0 {
        format!("{secs:.1}s")
    } else if secs < 3600.0 {
        let mins = (secs / 60.0).floor();
        let remaining_secs = secs - (mins * 60.0);
        format!("{}m {:02.0}s", mins as u64, remaining_secs)
    } else {
        let hours = (secs / 3600.0).floor();
        let remaining = secs - (hours * 3600.0);
        let mins = (remaining / 60.0).floor();
        format!("{}h {:02.0}m", hours as u64, mins as u64)
    }
}

/// Format number with thousands separators.
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);

    for (i, c) in s.chars().enumerate() {
        if i > 0 && (s.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }

    result
}
