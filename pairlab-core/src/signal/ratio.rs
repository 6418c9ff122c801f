//! Ratio signal: price ratio of leg A to leg B, its trailing moving
//! average, and the deviation of one from the other.
//!
//! `moving_average(i)` averages the `window` ratios strictly before bar `i`,
//! so the first index with a full window is `window`. The ratio series is
//! precomputed once; each average is summed front-to-back over its slice so
//! results do not depend on how the pass reached index `i`.

use thiserror::Error;

use crate::domain::{Leg, PairBar, PriceBasis};

#[derive(Debug, Error, PartialEq)]
pub enum SignalError {
    #[error("bar {index}: moving average needs {window} preceding bars")]
    WindowNotFull { index: usize, window: usize },

    #[error("bar {index}: moving average of ratio is degenerate ({value})")]
    DegenerateMovingAverage { index: usize, value: f64 },

    #[error("bar {index}: price ratio is not a positive finite number ({value})")]
    InvalidRatio { index: usize, value: f64 },
}

/// Precomputed ratio series over a bar slice.
#[derive(Debug, Clone)]
pub struct RatioSignal {
    window: usize,
    ratios: Vec<f64>,
}

impl RatioSignal {
    /// Compute `price_A / price_B` on `basis` for every bar.
    ///
    /// Fails on the first bar whose ratio is not a positive finite number.
    pub fn new(bars: &[PairBar], basis: PriceBasis, window: usize) -> Result<Self, SignalError> {
        let ratios = bars
            .iter()
            .enumerate()
            .map(|(index, bar)| {
                let value = bar.price(Leg::A, basis) / bar.price(Leg::B, basis);
                if value.is_finite() && value > 0.0 {
                    Ok(value)
                } else {
                    Err(SignalError::InvalidRatio { index, value })
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { window, ratios })
    }

    pub fn len(&self) -> usize {
        self.ratios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratios.is_empty()
    }

    pub fn ratio(&self, index: usize) -> f64 {
        self.ratios[index]
    }

    /// Mean of `ratio(index - window) .. ratio(index - 1)`.
    pub fn moving_average(&self, index: usize) -> Result<f64, SignalError> {
        if index < self.window || index > self.ratios.len() {
            return Err(SignalError::WindowNotFull {
                index,
                window: self.window,
            });
        }

        let slice = &self.ratios[index - self.window..index];
        let sum: f64 = slice.iter().sum();
        let mean = sum / self.window as f64;

        if !mean.is_finite() || mean == 0.0 {
            return Err(SignalError::DegenerateMovingAverage { index, value: mean });
        }
        Ok(mean)
    }

    /// `ratio(index) / moving_average(index) - 1`.
    ///
    /// Positive when leg A is rich relative to its recent average against leg B.
    pub fn deviation(&self, index: usize) -> Result<f64, SignalError> {
        let ma = self.moving_average(index)?;
        Ok(self.ratio(index) / ma - 1.0)
    }
}
