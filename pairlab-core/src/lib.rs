//! PairLab Core: domain types, feed input, signal, and the simulation loop
//! for a two-stock pairs-trading backtest.
//!
//! This crate contains:
//! - Domain types (legs, quotes, pair bars, portfolio, fills)
//! - Aligned feed reader and two-instrument alignment
//! - Price-ratio signal against its trailing moving average
//! - Trade governor with a per-day budget
//! - Execution with square-root market impact and sales fee
//! - Performance evaluation against an equal-weight buy-and-hold benchmark

pub mod config;
pub mod data;
pub mod domain;
pub mod engine;
pub mod error;
pub mod signal;

pub use config::{ConfigError, ImpactConfig, SimConfig};
pub use engine::{run_simulation, EvaluationSnapshot, RunResult, RunningTotals};
pub use error::SimError;
