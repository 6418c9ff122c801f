//! Bar-by-bar simulation pass: the heart of the engine.
//!
//! Per processed bar:
//! 1. Day tracking: the governor sees the bar's date. A new day resets the
//!    budget, may take a periodic snapshot, and may end the run.
//! 2. Gating: vetoed bars and bars inside `skip_days` do not trade.
//! 3. Initializing purchase on the first tradable bar.
//! 4. Trigger check on the deviation, optional limit-order gate, rotation.
//!
//! Bars `0..ma_window` are warm-up only. Trades fill at the trade-basis
//! prices of bar `i + trade_delay`, so the last `trade_delay` bars are never
//! signal bars.

use tracing::{debug, info};

use crate::config::SimConfig;
use crate::data::dataset_hash;
use crate::domain::{FillReason, Leg, PairBar, PerLeg};
use crate::error::SimError;
use crate::signal::RatioSignal;

use super::evaluator::{evaluation_due, PerformanceEvaluator};
use super::execution::{ExecutionEngine, FillContext};
use super::governor::{BarGate, TradeGovernor};
use super::state::{RunResult, SimulationState};

/// Run one simulation over an aligned bar series.
pub fn run_simulation(bars: &[PairBar], config: &SimConfig) -> Result<RunResult, SimError> {
    config.validate()?;

    let window = config.ma_window;
    let delay = config.trade_delay;
    if bars.len() <= window + delay {
        return Err(SimError::InsufficientBars {
            bars: bars.len(),
            window,
            delay,
        });
    }
    check_bars(bars)?;

    let signal = RatioSignal::new(bars, config.eval_basis, window)?;
    let execution = ExecutionEngine::from_config(config);
    let mut state = SimulationState::new(config.initial_cash);
    let mut governor = TradeGovernor::new(config.daily_trade_limit, bars[window].day());

    let end = bars.len() - delay;
    let mut last_index = window;
    let mut bars_processed = 0;
    let mut stopped_early = false;
    let stop_day = config.skip_days.saturating_add(config.duration_days);

    info!(
        bars = bars.len(),
        window,
        delay,
        threshold = config.threshold,
        daily_trade_limit = config.daily_trade_limit,
        "starting simulation"
    );

    for i in window..end {
        let bar = &bars[i];

        match governor.observe(bar.day()) {
            BarGate::NewDay { closed } => {
                state.days_elapsed += 1;
                debug!(
                    day = %closed.day,
                    trades = closed.trades_executed,
                    "day closed"
                );

                if evaluation_due(
                    state.days_elapsed,
                    config.skip_days,
                    config.eval_frequency_days,
                ) {
                    take_snapshot(&mut state, &bars[last_index], config);
                }

                if config.duration_days != 0 && state.days_elapsed >= stop_day {
                    stopped_early = true;
                    info!(days = state.days_elapsed, "duration reached, stopping");
                    break;
                }
            }
            BarGate::Vetoed => {
                state.totals.vetoed_bar_count += 1;
                last_index = i;
                bars_processed += 1;
                continue;
            }
            BarGate::Open => {}
        }

        last_index = i;
        bars_processed += 1;

        if state.days_elapsed < config.skip_days {
            continue;
        }

        let exec_prices = bars[i + delay].prices(config.trade_basis);

        if !state.has_initialized() {
            initial_purchase(&mut state, &execution, config, i, bar, exec_prices);
        }

        if !config.trading_enabled {
            continue;
        }

        let deviation = signal.deviation(i)?;
        let Some(held) = state.portfolio.dominant_leg() else {
            continue;
        };

        let triggered = match held {
            Leg::A => deviation > config.threshold,
            Leg::B => deviation < -config.threshold,
        };
        if !triggered {
            continue;
        }

        state.totals.attempted_triggers += 1;

        // Limit gate: the delayed sale must not fill below the signal-time price.
        if config.limit_ordering && exec_prices[held] < bar.price(held, config.eval_basis) {
            state.totals.limit_rejections += 1;
            continue;
        }

        let ctx = FillContext {
            bar_index: i,
            timestamp: bar.timestamp,
            reason: FillReason::Rotation,
        };
        let fills = execution.rotate(
            &mut state.portfolio,
            &mut state.totals,
            held,
            &exec_prices,
            ctx,
        );
        state.fills.extend(fills);
        state.totals.executed_triggers += 1;

        debug!(
            time = %bar.timestamp,
            sold = %held,
            bought = %held.other(),
            deviation,
            "rotated"
        );

        if governor.record_trade() {
            state.totals.daily_limit_reached_count += 1;
            debug!(day = %bar.day(), "daily trade limit reached, skipping rest of day");
        }
    }

    let final_snapshot = state.evaluator.as_ref().map(|evaluator| {
        let bar = &bars[last_index];
        evaluator.evaluate(
            &state.portfolio,
            bar.prices(config.eval_basis),
            state.days_elapsed.saturating_sub(config.skip_days),
            bar.timestamp,
        )
    });

    let totals = &state.totals;
    info!(
        executed = totals.executed_triggers,
        attempted = totals.attempted_triggers,
        daily_limit_hits = totals.daily_limit_reached_count,
        days = state.days_elapsed,
        "simulation finished"
    );

    Ok(RunResult {
        snapshots: state.snapshots,
        final_snapshot,
        fills: state.fills,
        totals: state.totals,
        final_portfolio: state.portfolio,
        days_elapsed: state.days_elapsed,
        evaluated_days: state.days_elapsed.saturating_sub(config.skip_days),
        bars_processed,
        warmup_bars: window,
        stopped_early,
        config_hash: config.config_hash(),
        dataset_hash: dataset_hash(bars),
    })
}

/// Every quote sane and timestamps strictly increasing.
fn check_bars(bars: &[PairBar]) -> Result<(), SimError> {
    for (index, bar) in bars.iter().enumerate() {
        if let Some(leg) = Leg::BOTH.into_iter().find(|&leg| !bar.quotes[leg].is_sane()) {
            return Err(SimError::InvalidQuote { index, leg });
        }
        if index > 0 && bar.timestamp <= bars[index - 1].timestamp {
            return Err(SimError::NonIncreasingTimestamp {
                index,
                timestamp: bar.timestamp,
            });
        }
    }
    Ok(())
}

/// Buy the opening position and fix the benchmark's reference prices.
///
/// `initial_allocation_a` of the cash goes to leg A, the rest to leg B.
fn initial_purchase(
    state: &mut SimulationState,
    execution: &ExecutionEngine,
    config: &SimConfig,
    index: usize,
    bar: &PairBar,
    prices: PerLeg<f64>,
) {
    let ctx = FillContext {
        bar_index: index,
        timestamp: bar.timestamp,
        reason: FillReason::Initial,
    };

    if config.initial_allocation_a > 0.0 {
        let cash = state.portfolio.cash * config.initial_allocation_a;
        let fill = execution.buy(&mut state.portfolio, Leg::A, cash, prices.a, ctx);
        state.fills.push(fill);
    }
    if config.initial_allocation_a < 1.0 {
        let cash = state.portfolio.cash;
        let fill = execution.buy(&mut state.portfolio, Leg::B, cash, prices.b, ctx);
        state.fills.push(fill);
    }

    state.evaluator = Some(PerformanceEvaluator::new(config.initial_cash, prices));
    debug!(time = %bar.timestamp, a = prices.a, b = prices.b, "initial purchase");
}

fn take_snapshot(state: &mut SimulationState, bar: &PairBar, config: &SimConfig) {
    let Some(evaluator) = state.evaluator.as_ref() else {
        return;
    };
    let snapshot = evaluator.evaluate(
        &state.portfolio,
        bar.prices(config.eval_basis),
        state.days_elapsed - config.skip_days,
        bar.timestamp,
    );
    info!(
        day = snapshot.day,
        market_growth = snapshot.benchmark_growth,
        algo_growth = snapshot.portfolio_growth,
        performance = snapshot.normalized_performance,
        "evaluation"
    );
    state.snapshots.push(snapshot);
}
