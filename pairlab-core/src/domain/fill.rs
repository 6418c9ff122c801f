//! Fill: one executed buy or sell of a single leg.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::leg::Leg;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeSide {
    Buy,
    Sell,
}

/// Why a fill happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FillReason {
    /// The unconditional first purchase that opens the run.
    Initial,
    /// Part of a signal-driven rotation from one leg to the other.
    Rotation,
}

/// A single executed order against one leg.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fill {
    /// Index of the signal bar that caused the fill.
    pub bar_index: usize,
    pub timestamp: NaiveDateTime,
    pub leg: Leg,
    pub side: TradeSide,
    pub reason: FillReason,
    pub shares: f64,
    /// Price before market impact.
    pub reference_price: f64,
    /// Fractional market impact applied to the reference price.
    pub impact: f64,
    /// Impact-adjusted price: `reference * (1 + impact)` for buys,
    /// `reference * (1 - impact)` for sells.
    pub fill_price: f64,
    /// Signed change in cash: negative for buys, positive for sells.
    pub cash_delta: f64,
}
