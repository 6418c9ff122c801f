//! Trade governor: per-day trade budget with reset at calendar-day boundaries.
//!
//! A limit of 0 means unlimited: the governor never vetoes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The day currently being tracked and the trades still allowed on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayState {
    pub day: NaiveDate,
    pub trades_left: u32,
    pub trades_executed: u32,
}

impl DayState {
    fn open(day: NaiveDate, limit: u32) -> Self {
        Self {
            day,
            trades_left: limit,
            trades_executed: 0,
        }
    }
}

/// Outcome of showing the governor a bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarGate {
    /// The bar starts a new calendar day. The budget was reset; `closed` is
    /// the day that just ended.
    NewDay { closed: DayState },
    /// Same day, budget available (or unlimited).
    Open,
    /// Same day, budget exhausted. No trigger may be attempted on this bar.
    Vetoed,
}

#[derive(Debug, Clone)]
pub struct TradeGovernor {
    limit: u32,
    state: DayState,
}

impl TradeGovernor {
    pub fn new(limit: u32, first_day: NaiveDate) -> Self {
        Self {
            limit,
            state: DayState::open(first_day, limit),
        }
    }

    /// Track the day of a bar and decide whether it may trade.
    ///
    /// The budget is consulted, never reset, while the day is unchanged.
    pub fn observe(&mut self, day: NaiveDate) -> BarGate {
        if day != self.state.day {
            let closed = self.state;
            self.state = DayState::open(day, self.limit);
            return BarGate::NewDay { closed };
        }

        if self.is_exhausted() {
            BarGate::Vetoed
        } else {
            BarGate::Open
        }
    }

    /// Consume one trade from today's budget.
    ///
    /// Returns `true` when this trade used up the last of a finite budget.
    pub fn record_trade(&mut self) -> bool {
        self.state.trades_executed += 1;
        if self.is_unlimited() {
            return false;
        }
        debug_assert!(self.state.trades_left > 0, "trade recorded with no budget left");
        self.state.trades_left = self.state.trades_left.saturating_sub(1);
        self.state.trades_left == 0
    }

    pub fn is_unlimited(&self) -> bool {
        self.limit == 0
    }

    pub fn is_exhausted(&self) -> bool {
        !self.is_unlimited() && self.state.trades_left == 0
    }

    pub fn state(&self) -> &DayState {
        &self.state
    }
}
