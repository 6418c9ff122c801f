//! Backtesting engine: bar-by-bar simulation loop and supporting pieces.
//!
//! The loop consumes an aligned pair series and, per processed bar:
//!
//! 1. Day tracking: the trade governor resets the budget on a new day
//! 2. Periodic evaluation and the duration cutoff at day transitions
//! 3. Trigger check on the ratio deviation
//! 4. Rotation through the execution engine

pub mod evaluator;
pub mod execution;
pub mod governor;
pub mod loop_runner;
pub mod state;

pub use evaluator::{evaluation_due, EvaluationSnapshot, PerformanceEvaluator};
pub use execution::{BuyQuote, ExecutionEngine, FillContext, SellQuote, SquareRootImpact};
pub use governor::{BarGate, DayState, TradeGovernor};
pub use loop_runner::run_simulation;
pub use state::{RunResult, RunningTotals, SimulationState};
