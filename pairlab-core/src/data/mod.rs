//! Feed input: the aligned pair CSV, and the alignment step that builds it
//! from two single-instrument files.

pub mod align;
pub mod feed;

pub use align::{align_pair, read_leg, read_leg_csv, write_aligned, write_aligned_csv, Alignment, Gap, LegBar};
pub use feed::{read_aligned, read_aligned_csv};

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::PairBar;

/// Timestamp formats accepted in feed files.
pub const TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Format used when writing timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Structured error types for feed operations.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("cannot open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing required column: {0}")]
    MissingColumn(String),

    #[error("row {row}: unparseable timestamp '{value}'")]
    BadTimestamp { row: usize, value: String },

    #[error("row {row}: column '{column}' is not a number ('{value}')")]
    BadNumber {
        row: usize,
        column: String,
        value: String,
    },

    #[error("row {row}: prices for '{instrument}' must be positive and finite")]
    InvalidPrice { row: usize, instrument: String },

    #[error("row {row}: timestamp {timestamp} does not follow the previous row")]
    NonIncreasingTimestamp { row: usize, timestamp: String },
}

/// BLAKE3 digest over every timestamp and price of the series.
///
/// Two runs on the same feed report the same hash.
pub fn dataset_hash(bars: &[PairBar]) -> String {
    let mut hasher = blake3::Hasher::new();
    for bar in bars {
        hasher.update(&bar.timestamp.and_utc().timestamp().to_le_bytes());
        for quote in [&bar.quotes.a, &bar.quotes.b] {
            for price in [quote.open, quote.high, quote.low, quote.close] {
                hasher.update(&price.to_le_bytes());
            }
        }
    }
    hasher.finalize().to_hex().to_string()
}

pub(crate) fn parse_timestamp(row: usize, value: &str) -> Result<chrono::NaiveDateTime, DataError> {
    let trimmed = value.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| chrono::NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| DataError::BadTimestamp {
            row,
            value: value.to_string(),
        })
}

pub(crate) fn parse_number(row: usize, column: &str, value: &str) -> Result<f64, DataError> {
    value.trim().parse::<f64>().map_err(|_| DataError::BadNumber {
        row,
        column: column.to_string(),
        value: value.to_string(),
    })
}
