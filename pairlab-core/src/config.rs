//! Simulation configuration.
//!
//! One `SimConfig` is built at startup (from defaults, a TOML run file, or
//! CLI overrides) and threaded by reference through every component. No
//! component reads ambient configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{PerLeg, PriceBasis};

/// Errors from configuration validation.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("moving-average window must be at least 1 bar")]
    ZeroWindow,

    #[error("evaluation frequency must be at least 1 day")]
    ZeroEvalFrequency,

    #[error("{field} must be finite and non-negative (got {value})")]
    NegativeParameter { field: &'static str, value: f64 },

    #[error("{field} must be finite and positive (got {value})")]
    NonPositiveParameter { field: &'static str, value: f64 },

    #[error("initial allocation to leg A must be within [0, 1] (got {0})")]
    AllocationOutOfRange(f64),

    #[error("instrument prefixes must be non-empty and distinct (got '{a}' and '{b}')")]
    InvalidInstruments { a: String, b: String },
}

/// Parameters of the square-root market-impact model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImpactConfig {
    /// Daily volatility of the instruments, as a fraction.
    pub volatility: f64,
    /// Typical shares traded per day.
    pub average_daily_volume: f64,
    pub impact_coefficient: f64,
}

impl Default for ImpactConfig {
    fn default() -> Self {
        Self {
            volatility: 0.15,
            average_daily_volume: 6_000_000.0,
            impact_coefficient: 0.0055,
        }
    }
}

impl ImpactConfig {
    /// No market impact at all.
    pub fn frictionless() -> Self {
        Self {
            impact_coefficient: 0.0,
            ..Self::default()
        }
    }
}

/// Configuration for a single simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Fractional deviation of ratio from its moving average that triggers a rotation.
    pub threshold: f64,
    /// Maximum executed rotations per calendar day. 0 = unlimited.
    pub daily_trade_limit: u32,
    /// Number of preceding bars averaged into the moving average.
    pub ma_window: usize,
    /// Bars between the signal bar and the bar whose prices fill the trade.
    pub trade_delay: usize,
    /// Price read when computing the signal and evaluating performance.
    pub eval_basis: PriceBasis,
    /// Price read when filling trades.
    pub trade_basis: PriceBasis,
    /// Only sell when the delayed fill price is no worse than the signal-time price.
    pub limit_ordering: bool,
    pub initial_cash: f64,
    /// Days to run before trading and evaluation begin.
    pub skip_days: u32,
    /// Days after `skip_days` at which the run stops. 0 = run the full series.
    pub duration_days: u32,
    /// Take a performance snapshot every this many days.
    pub eval_frequency_days: u32,
    pub impact: ImpactConfig,
    /// Fee rate charged on sale proceeds only.
    pub sales_fee: f64,
    /// When false, only the initializing purchase happens.
    pub trading_enabled: bool,
    /// Fraction of initial cash the initializing purchase puts into leg A.
    /// The remainder goes to leg B.
    pub initial_allocation_a: f64,
    /// Column prefixes of the two instruments in the aligned feed.
    pub instruments: PerLeg<String>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            threshold: 0.005,
            daily_trade_limit: 10,
            ma_window: 240,
            trade_delay: 1,
            eval_basis: PriceBasis::Close,
            trade_basis: PriceBasis::Close,
            limit_ordering: false,
            initial_cash: 100_000.0,
            skip_days: 0,
            duration_days: 0,
            eval_frequency_days: 1,
            impact: ImpactConfig::default(),
            sales_fee: 0.000_027_8,
            trading_enabled: true,
            initial_allocation_a: 0.0,
            instruments: PerLeg::new("visa".to_string(), "mastercard".to_string()),
        }
    }
}

impl SimConfig {
    /// Validate every parameter. Called once before a run starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ma_window == 0 {
            return Err(ConfigError::ZeroWindow);
        }
        if self.eval_frequency_days == 0 {
            return Err(ConfigError::ZeroEvalFrequency);
        }

        non_negative("threshold", self.threshold)?;
        non_negative("sales_fee", self.sales_fee)?;
        non_negative("impact.volatility", self.impact.volatility)?;
        non_negative("impact.impact_coefficient", self.impact.impact_coefficient)?;
        positive("initial_cash", self.initial_cash)?;
        positive("impact.average_daily_volume", self.impact.average_daily_volume)?;

        if !(0.0..=1.0).contains(&self.initial_allocation_a) {
            return Err(ConfigError::AllocationOutOfRange(self.initial_allocation_a));
        }

        let PerLeg { a, b } = &self.instruments;
        if a.is_empty() || b.is_empty() || a == b {
            return Err(ConfigError::InvalidInstruments {
                a: a.clone(),
                b: b.clone(),
            });
        }

        Ok(())
    }

    /// Deterministic identity of this configuration (BLAKE3 over canonical JSON).
    pub fn config_hash(&self) -> String {
        // Struct fields serialize in declaration order, so the JSON is stable.
        let json = serde_json::to_string(self).unwrap_or_default();
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NegativeParameter { field, value })
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositiveParameter { field, value })
    }
}
