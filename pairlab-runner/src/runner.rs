//! Run orchestration: wires the run file, the feed reader, and the engine.
//!
//! Two entry points:
//! - `run_from_file()`: loads a TOML run file, applies overrides, then runs. Used by the CLI.
//! - `run_with_config()`: takes a fully built `RunFile`. Used by tests and callers
//!   that assemble configuration in code.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use pairlab_core::data::{read_aligned_csv, DataError};
use pairlab_core::engine::{run_simulation, RunResult};
use pairlab_core::error::SimError;

use crate::config::{RunFile, RunOverrides};

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("cannot read run file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid run file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("no aligned feed given (set [data] aligned or pass --data)")]
    NoData,
    #[error("data error: {0}")]
    Data(#[from] DataError),
    #[error("simulation error: {0}")]
    Sim(#[from] SimError),
}

/// A finished run together with the configuration that produced it.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub run: RunFile,
    pub feed: PathBuf,
    pub bar_count: usize,
    pub result: RunResult,
}

/// Load a run file (or start from defaults when `path` is `None`), apply
/// `overrides`, and run.
pub fn run_from_file(path: Option<&Path>, overrides: &RunOverrides) -> Result<RunOutcome, RunError> {
    let mut run = match path {
        Some(path) => RunFile::from_file(path)?,
        None => RunFile::default(),
    };
    overrides.apply(&mut run);
    run_with_config(run)
}

/// Read the aligned feed named by `run` and simulate it.
pub fn run_with_config(run: RunFile) -> Result<RunOutcome, RunError> {
    let feed = run.data.aligned.clone().ok_or(RunError::NoData)?;
    run.simulation.validate().map_err(SimError::from)?;

    let bars = read_aligned_csv(&feed, &run.simulation.instruments)?;
    info!(feed = %feed.display(), bars = bars.len(), "loaded aligned feed");

    let result = run_simulation(&bars, &run.simulation)?;

    Ok(RunOutcome {
        bar_count: bars.len(),
        run,
        feed,
        result,
    })
}
