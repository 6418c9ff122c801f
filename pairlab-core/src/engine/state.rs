//! Mutable simulation state and run result types.

use serde::{Deserialize, Serialize};

use crate::domain::{Fill, Portfolio};

use super::evaluator::{EvaluationSnapshot, PerformanceEvaluator};

/// Run-wide accumulators.
///
/// Gains and losses are both stored as non-negative magnitudes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunningTotals {
    pub total_gains: f64,
    pub total_losses: f64,
    /// Bars where the deviation crossed the threshold while holding the wrong leg.
    pub attempted_triggers: u64,
    /// Attempted triggers that produced a rotation.
    pub executed_triggers: u64,
    /// Attempted triggers rejected by the limit-order gate.
    pub limit_rejections: u64,
    /// Times an executed trade used up the day's budget.
    pub daily_limit_reached_count: u64,
    /// Bars skipped because the day's budget was exhausted.
    pub vetoed_bar_count: u64,
}

impl RunningTotals {
    /// Book the realized result of one sale.
    pub fn record_realized(&mut self, realized: f64) {
        if realized > 0.0 {
            self.total_gains += realized;
        } else if realized < 0.0 {
            self.total_losses += -realized;
        }
    }

    pub fn net_realized(&self) -> f64 {
        self.total_gains - self.total_losses
    }
}

/// State owned by the simulation loop for the duration of one run.
#[derive(Debug, Clone)]
pub struct SimulationState {
    pub portfolio: Portfolio,
    pub totals: RunningTotals,
    /// Set by the initializing purchase.
    pub evaluator: Option<PerformanceEvaluator>,
    pub days_elapsed: u32,
    pub fills: Vec<Fill>,
    pub snapshots: Vec<EvaluationSnapshot>,
}

impl SimulationState {
    pub fn new(initial_cash: f64) -> Self {
        Self {
            portfolio: Portfolio::new(initial_cash),
            totals: RunningTotals::default(),
            evaluator: None,
            days_elapsed: 0,
            fills: Vec::new(),
            snapshots: Vec::new(),
        }
    }

    pub fn has_initialized(&self) -> bool {
        self.evaluator.is_some()
    }
}

/// Result of a complete simulation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    /// Periodic snapshots, in day order.
    pub snapshots: Vec<EvaluationSnapshot>,
    /// Snapshot taken once at the end. `None` if the run never made its
    /// initializing purchase.
    pub final_snapshot: Option<EvaluationSnapshot>,
    pub fills: Vec<Fill>,
    pub totals: RunningTotals,
    pub final_portfolio: Portfolio,
    pub days_elapsed: u32,
    /// Days counted from the end of `skip_days`, as shown in reports.
    pub evaluated_days: u32,
    pub bars_processed: usize,
    pub warmup_bars: usize,
    /// True when `duration_days` cut the run short.
    pub stopped_early: bool,
    pub config_hash: String,
    pub dataset_hash: String,
}
