//! Performance evaluator: portfolio growth against an equal-weight
//! buy-and-hold benchmark of both legs.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::{PerLeg, Portfolio};

/// One evaluation point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationSnapshot {
    /// Days since evaluation began (days elapsed minus skipped days).
    pub day: u32,
    /// Timestamp of the bar whose prices were used.
    pub timestamp: NaiveDateTime,
    pub prices: PerLeg<f64>,
    /// Mean of each leg's price relative to its initial price.
    pub benchmark_growth: f64,
    /// Portfolio value relative to initial cash.
    pub portfolio_growth: f64,
    /// `portfolio_growth / benchmark_growth`; 1.0 means matching buy-and-hold.
    pub normalized_performance: f64,
    /// Portfolio as it stood at the snapshot.
    pub portfolio: Portfolio,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceEvaluator {
    initial_cash: f64,
    initial_prices: PerLeg<f64>,
}

impl PerformanceEvaluator {
    /// `initial_prices` are the leg prices at the initializing purchase.
    pub fn new(initial_cash: f64, initial_prices: PerLeg<f64>) -> Self {
        Self {
            initial_cash,
            initial_prices,
        }
    }

    pub fn benchmark_growth(&self, prices: &PerLeg<f64>) -> f64 {
        let a = prices.a / self.initial_prices.a;
        let b = prices.b / self.initial_prices.b;
        (a + b) / 2.0
    }

    pub fn portfolio_growth(&self, portfolio: &Portfolio, prices: &PerLeg<f64>) -> f64 {
        portfolio.value(prices) / self.initial_cash
    }

    pub fn evaluate(
        &self,
        portfolio: &Portfolio,
        prices: PerLeg<f64>,
        day: u32,
        timestamp: NaiveDateTime,
    ) -> EvaluationSnapshot {
        let benchmark_growth = self.benchmark_growth(&prices);
        let portfolio_growth = self.portfolio_growth(portfolio, &prices);
        EvaluationSnapshot {
            day,
            timestamp,
            prices,
            benchmark_growth,
            portfolio_growth,
            normalized_performance: portfolio_growth / benchmark_growth,
            portfolio: portfolio.clone(),
        }
    }
}

/// Whether a periodic snapshot is due after `days_elapsed` day transitions.
pub fn evaluation_due(days_elapsed: u32, skip_days: u32, frequency_days: u32) -> bool {
    days_elapsed > skip_days && (days_elapsed - skip_days) % frequency_days == 0
}
