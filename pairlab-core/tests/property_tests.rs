//! Property tests for engine invariants.
//!
//! Uses proptest to verify:
//! 1. Frictionless round trip: buying then selling at the same price returns the cash
//! 2. Non-negativity: cash and shares never go negative through any run
//! 3. Daily cap: executed rotations per day never exceed the limit
//! 4. Gains and losses: both accumulate as non-negative magnitudes

use chrono::{NaiveDate, NaiveDateTime};
use proptest::prelude::*;
use std::collections::BTreeMap;

use pairlab_core::config::{ImpactConfig, SimConfig};
use pairlab_core::domain::{
    FillReason, Leg, PairBar, Portfolio, Quote, TradeSide, CASH_EPSILON,
};
use pairlab_core::engine::{run_simulation, ExecutionEngine, FillContext, RunningTotals};

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_price() -> impl Strategy<Value = f64> {
    (10.0..500.0_f64).prop_map(|p| (p * 100.0).round() / 100.0)
}

fn arb_cash() -> impl Strategy<Value = f64> {
    1_000.0..1_000_000.0_f64
}

/// Random walk of both legs over a few days of minute bars.
fn arb_series() -> impl Strategy<Value = Vec<PairBar>> {
    (
        prop::collection::vec((-0.01..0.01_f64, -0.01..0.01_f64), 60..240),
        1usize..4,
    )
        .prop_map(|(steps, days)| {
            let per_day = steps.len() / days + 1;
            let (mut a, mut b) = (250.0, 400.0);
            steps
                .iter()
                .enumerate()
                .map(|(i, (da, db))| {
                    a *= 1.0 + da;
                    b *= 1.0 + db;
                    PairBar::new(timestamp(i, per_day), Quote::flat(a), Quote::flat(b))
                })
                .collect()
        })
}

fn timestamp(i: usize, per_day: usize) -> NaiveDateTime {
    let day = (i / per_day) as u32 + 1;
    NaiveDate::from_ymd_opt(2024, 7, day)
        .unwrap()
        .and_hms_opt(13, 30, 0)
        .unwrap()
        + chrono::Duration::minutes((i % per_day) as i64)
}

fn ctx() -> FillContext {
    FillContext {
        bar_index: 0,
        timestamp: timestamp(0, 1),
        reason: FillReason::Rotation,
    }
}

// ── 1. Frictionless round trip ───────────────────────────────────────

proptest! {
    /// With no impact and no fee, buy-then-sell at the same price returns the cash.
    #[test]
    fn frictionless_round_trip(cash in arb_cash(), price in arb_price()) {
        let engine = ExecutionEngine::frictionless();
        let mut portfolio = Portfolio::new(cash);
        let mut totals = RunningTotals::default();

        engine.buy(&mut portfolio, Leg::B, cash, price, ctx());
        engine.sell(&mut portfolio, &mut totals, Leg::B, price, ctx());

        prop_assert!((portfolio.cash - cash).abs() < 1e-6 * cash);
        prop_assert_eq!(portfolio.shares.b, 0.0);
        prop_assert!(totals.total_gains.abs() < 1e-6 * cash);
        prop_assert!(totals.total_losses.abs() < 1e-6 * cash);
    }

    /// Impact and fee only ever cost money on a same-price round trip.
    #[test]
    fn round_trip_with_costs_loses(cash in arb_cash(), price in arb_price()) {
        let engine = ExecutionEngine::from_config(&SimConfig::default());
        let mut portfolio = Portfolio::new(cash);
        let mut totals = RunningTotals::default();

        engine.buy(&mut portfolio, Leg::A, cash, price, ctx());
        engine.sell(&mut portfolio, &mut totals, Leg::A, price, ctx());

        prop_assert!(portfolio.cash < cash);
        prop_assert!(portfolio.cash > 0.0);
    }
}

// ── 2-4. Whole-run invariants ────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn run_invariants_hold(
        bars in arb_series(),
        threshold in 0.0..0.01_f64,
        limit in 0u32..4,
        window in 1usize..30,
        delay in 0usize..3,
    ) {
        let config = SimConfig {
            threshold,
            daily_trade_limit: limit,
            ma_window: window,
            trade_delay: delay,
            ..SimConfig::default()
        };
        let result = run_simulation(&bars, &config).unwrap();

        // 2. Non-negativity at every snapshot and at the end.
        for snap in result.snapshots.iter().chain(result.final_snapshot.iter()) {
            prop_assert!(snap.portfolio.cash >= -CASH_EPSILON);
            prop_assert!(snap.portfolio.shares.a >= 0.0);
            prop_assert!(snap.portfolio.shares.b >= 0.0);
        }
        prop_assert!(result.final_portfolio.cash >= -CASH_EPSILON);

        // 3. Daily cap.
        if limit > 0 {
            let mut per_day: BTreeMap<NaiveDate, u32> = BTreeMap::new();
            for fill in &result.fills {
                if fill.reason == FillReason::Rotation && fill.side == TradeSide::Sell {
                    *per_day.entry(fill.timestamp.date()).or_default() += 1;
                }
            }
            prop_assert!(per_day.values().all(|&n| n <= limit));
        }

        // 4. Magnitudes.
        prop_assert!(result.totals.total_gains >= 0.0);
        prop_assert!(result.totals.total_losses >= 0.0);
        prop_assert!(result.totals.executed_triggers <= result.totals.attempted_triggers);
        prop_assert_eq!(
            result.fills.iter().filter(|f| f.reason == FillReason::Rotation).count() as u64,
            2 * result.totals.executed_triggers
        );
    }

    /// Frictionless rotations with flat prices never change portfolio value.
    #[test]
    fn frictionless_rotation_preserves_value(cash in arb_cash(), pa in arb_price(), pb in arb_price()) {
        let engine = ExecutionEngine::new(
            pairlab_core::engine::SquareRootImpact::from_config(&ImpactConfig::frictionless()),
            0.0,
        );
        let prices = pairlab_core::domain::PerLeg::new(pa, pb);
        let mut portfolio = Portfolio::new(cash);
        let mut totals = RunningTotals::default();
        engine.buy(&mut portfolio, Leg::B, cash, pb, ctx());
        engine.rotate(&mut portfolio, &mut totals, Leg::B, &prices, ctx());
        engine.rotate(&mut portfolio, &mut totals, Leg::A, &prices, ctx());

        prop_assert!((portfolio.value(&prices) - cash).abs() < 1e-6 * cash);
        prop_assert_eq!(portfolio.dominant_leg(), Some(Leg::B));
    }
}
