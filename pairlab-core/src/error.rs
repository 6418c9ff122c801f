//! Top-level simulation error.
//!
//! Every variant is a deterministic function of the input series and the
//! configuration; retrying without changing either gives the same error.

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::config::ConfigError;
use crate::data::DataError;
use crate::domain::Leg;
use crate::signal::SignalError;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("data error: {0}")]
    Data(#[from] DataError),

    #[error(
        "series has {bars} bars; need more than {window} warm-up bars plus {delay} delay bars"
    )]
    InsufficientBars {
        bars: usize,
        window: usize,
        delay: usize,
    },

    #[error("bar {index}: leg {leg} has a price that is not positive and finite")]
    InvalidQuote { index: usize, leg: Leg },

    #[error("bar {index}: timestamp {timestamp} does not follow the previous bar")]
    NonIncreasingTimestamp {
        index: usize,
        timestamp: NaiveDateTime,
    },

    #[error("signal error: {0}")]
    Signal(#[from] SignalError),
}
