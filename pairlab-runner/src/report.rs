//! Reporting and export: console text and JSON.
//!
//! The console report prints one block per evaluation snapshot, then a
//! summary of trigger counts and realized results. JSON export writes the
//! full `RunResult` record.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use pairlab_core::engine::{EvaluationSnapshot, RunResult};

// ─── Console report ─────────────────────────────────────────────────

/// One evaluation block: day index then three percentages.
pub fn render_snapshot(snapshot: &EvaluationSnapshot) -> String {
    format!(
        "Day {} eval:\n\t{:.1}% market growth\n\t{:.1}% algo growth value\n\t{:.1}% performance\n",
        snapshot.day,
        snapshot.benchmark_growth * 100.0,
        snapshot.portfolio_growth * 100.0,
        snapshot.normalized_performance * 100.0,
    )
}

/// Closing summary lines.
pub fn render_summary(result: &RunResult) -> String {
    let t = &result.totals;
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Executed {} rotations out of {} attempted triggers.",
        t.executed_triggers, t.attempted_triggers
    );
    let _ = writeln!(
        out,
        "Reached daily trade limit {} times ({} bars vetoed).",
        t.daily_limit_reached_count, t.vetoed_bar_count
    );
    if t.limit_rejections > 0 {
        let _ = writeln!(out, "Limit-order gate rejected {} triggers.", t.limit_rejections);
    }
    let _ = writeln!(
        out,
        "Total gains: {:.2}, total losses: {:.2}, net: {:.2}",
        t.total_gains,
        t.total_losses,
        t.net_realized()
    );
    let _ = writeln!(out, "Days elapsed: {}", result.days_elapsed);
    if result.stopped_early {
        let _ = writeln!(out, "Stopped at configured duration.");
    }
    out
}

/// Full console report: every periodic snapshot, the final snapshot, and the summary.
pub fn render_report(result: &RunResult) -> String {
    let mut out = String::new();
    for snapshot in &result.snapshots {
        out.push_str(&render_snapshot(snapshot));
        out.push('\n');
    }
    match &result.final_snapshot {
        Some(snapshot) => {
            out.push_str(&render_snapshot(snapshot));
            out.push('\n');
        }
        None => out.push_str("No position was opened; nothing to evaluate.\n\n"),
    }
    out.push_str(&render_summary(result));
    out
}

// ─── JSON export ────────────────────────────────────────────────────

/// Serialize a `RunResult` to pretty JSON.
pub fn export_json(result: &RunResult) -> Result<String> {
    serde_json::to_string_pretty(result).context("failed to serialize RunResult to JSON")
}

/// Write a `RunResult` as pretty JSON to `path`.
pub fn write_json(result: &RunResult, path: &Path) -> Result<()> {
    let json = export_json(result)?;
    std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
}
