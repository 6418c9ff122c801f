//! Portfolio: cash, shares per leg, and the cost basis of each leg.

use serde::{Deserialize, Serialize};

use super::leg::{Leg, PerLeg};

/// Tolerance for cash that rounding pushes just below zero after a full-cash buy.
pub const CASH_EPSILON: f64 = 1e-6;

/// Cash plus one position per leg.
///
/// Mutated only by the execution engine. `cost_basis[leg]` is the
/// impact-adjusted price of the last buy of that leg; the next sale of
/// the leg realizes gain or loss against it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    pub cash: f64,
    pub shares: PerLeg<f64>,
    pub cost_basis: PerLeg<f64>,
}

impl Portfolio {
    pub fn new(initial_cash: f64) -> Self {
        Self {
            cash: initial_cash,
            shares: PerLeg::default(),
            cost_basis: PerLeg::default(),
        }
    }

    /// Cash plus the market value of both legs at `prices`.
    pub fn value(&self, prices: &PerLeg<f64>) -> f64 {
        self.cash + self.shares.a * prices.a + self.shares.b * prices.b
    }

    /// The leg holding more shares, if either does.
    ///
    /// Ties (including both flat) return `None`: no rotation is possible.
    pub fn dominant_leg(&self) -> Option<Leg> {
        if self.shares.a > self.shares.b {
            Some(Leg::A)
        } else if self.shares.b > self.shares.a {
            Some(Leg::B)
        } else {
            None
        }
    }

    pub fn is_flat(&self) -> bool {
        self.shares.a == 0.0 && self.shares.b == 0.0
    }

    /// Check the non-negativity invariants. A violation is a modeling bug.
    pub fn check_invariants(&self) {
        debug_assert!(
            self.cash >= -CASH_EPSILON,
            "portfolio cash went negative: {}",
            self.cash
        );
        debug_assert!(
            self.shares.a >= 0.0 && self.shares.b >= 0.0,
            "portfolio shares went negative: {:?}",
            self.shares
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_portfolio_is_all_cash() {
        let p = Portfolio::new(100_000.0);
        assert_eq!(p.cash, 100_000.0);
        assert!(p.is_flat());
        assert_eq!(p.dominant_leg(), None);
        assert_eq!(p.value(&PerLeg::new(10.0, 20.0)), 100_000.0);
    }

    #[test]
    fn value_marks_both_legs() {
        let mut p = Portfolio::new(0.0);
        p.cash = 50.0;
        p.shares = PerLeg::new(2.0, 3.0);
        assert_eq!(p.value(&PerLeg::new(10.0, 100.0)), 50.0 + 20.0 + 300.0);
    }

    #[test]
    fn dominant_leg_compares_share_counts() {
        let mut p = Portfolio::new(0.0);
        p.shares = PerLeg::new(0.0, 10.0);
        assert_eq!(p.dominant_leg(), Some(Leg::B));
        p.shares = PerLeg::new(10.0, 0.0);
        assert_eq!(p.dominant_leg(), Some(Leg::A));
        p.shares = PerLeg::new(5.0, 5.0);
        assert_eq!(p.dominant_leg(), None);
    }
}
