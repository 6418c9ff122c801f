//! Run file: where the aligned feed lives and how to simulate it.
//!
//! ```toml
//! [data]
//! aligned = "histories/visa_mastercard_clean.csv"
//!
//! [simulation]
//! threshold = 0.005
//! daily_trade_limit = 10
//! ```
//!
//! Every `[simulation]` key is optional; missing keys take their defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use pairlab_core::config::SimConfig;

use crate::runner::RunError;

/// Input file locations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataPaths {
    /// Aligned pair feed. Relative paths resolve against the run file's directory.
    pub aligned: Option<PathBuf>,
}

/// A complete run description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunFile {
    pub data: DataPaths,
    pub simulation: SimConfig,
}

impl RunFile {
    /// Load a run file from disk.
    pub fn from_file(path: &Path) -> Result<Self, RunError> {
        let content = std::fs::read_to_string(path).map_err(|source| RunError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut run = Self::from_toml(&content).map_err(|source| RunError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        if let (Some(aligned), Some(dir)) = (run.data.aligned.as_mut(), path.parent()) {
            if aligned.is_relative() {
                *aligned = dir.join(&*aligned);
            }
        }
        Ok(run)
    }

    /// Parse a run file from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Serialize back to TOML.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Command-line values that replace run-file values when present.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunOverrides {
    pub data: Option<PathBuf>,
    pub threshold: Option<f64>,
    pub daily_trade_limit: Option<u32>,
    pub ma_window: Option<usize>,
    pub trade_delay: Option<usize>,
    pub duration_days: Option<u32>,
    pub skip_days: Option<u32>,
}

impl RunOverrides {
    pub fn apply(&self, run: &mut RunFile) {
        let sim = &mut run.simulation;
        if let Some(path) = &self.data {
            run.data.aligned = Some(path.clone());
        }
        if let Some(v) = self.threshold {
            sim.threshold = v;
        }
        if let Some(v) = self.daily_trade_limit {
            sim.daily_trade_limit = v;
        }
        if let Some(v) = self.ma_window {
            sim.ma_window = v;
        }
        if let Some(v) = self.trade_delay {
            sim.trade_delay = v;
        }
        if let Some(v) = self.duration_days {
            sim.duration_days = v;
        }
        if let Some(v) = self.skip_days {
            sim.skip_days = v;
        }
    }
}
