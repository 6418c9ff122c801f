//! PairLab Runner: run orchestration on top of `pairlab-core`.
//!
//! This crate provides:
//! - TOML run files (data path + simulation parameters) with CLI overrides
//! - Single-run entry points that load the aligned feed and simulate
//! - Console report rendering and JSON export of the result record

pub mod config;
pub mod report;
pub mod runner;

pub use config::{DataPaths, RunFile, RunOverrides};
pub use report::{export_json, render_report, render_snapshot, render_summary, write_json};
pub use runner::{run_from_file, run_with_config, RunError, RunOutcome};
