//! Bar: one timestamped row of the aligned pair feed.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::leg::{Leg, PerLeg};

/// Which price of a bar a computation reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceBasis {
    Open,
    Close,
    /// Midpoint of the bar's range, (high + low) / 2.
    Mid,
}

impl std::str::FromStr for PriceBasis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "open" => Ok(PriceBasis::Open),
            "close" => Ok(PriceBasis::Close),
            "mid" => Ok(PriceBasis::Mid),
            other => Err(format!("unknown price basis '{other}' (expected open, close or mid)")),
        }
    }
}

/// OHLC prices of a single instrument within one bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Quote {
    pub fn new(open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            open,
            high,
            low,
            close,
        }
    }

    /// A quote where every field is the same price.
    pub fn flat(price: f64) -> Self {
        Self::new(price, price, price, price)
    }

    pub fn mid(&self) -> f64 {
        (self.high + self.low) / 2.0
    }

    pub fn price(&self, basis: PriceBasis) -> f64 {
        match basis {
            PriceBasis::Open => self.open,
            PriceBasis::Close => self.close,
            PriceBasis::Mid => self.mid(),
        }
    }

    /// All fields finite and strictly positive.
    pub fn is_sane(&self) -> bool {
        [self.open, self.high, self.low, self.close]
            .iter()
            .all(|p| p.is_finite() && *p > 0.0)
    }
}

/// One row of the aligned feed: both instruments at the same minute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairBar {
    pub timestamp: NaiveDateTime,
    pub quotes: PerLeg<Quote>,
}

impl PairBar {
    pub fn new(timestamp: NaiveDateTime, a: Quote, b: Quote) -> Self {
        Self {
            timestamp,
            quotes: PerLeg::new(a, b),
        }
    }

    /// Calendar day of the bar, used for day-boundary tracking.
    pub fn day(&self) -> NaiveDate {
        self.timestamp.date()
    }

    pub fn price(&self, leg: Leg, basis: PriceBasis) -> f64 {
        self.quotes[leg].price(basis)
    }

    pub fn prices(&self, basis: PriceBasis) -> PerLeg<f64> {
        PerLeg::from_fn(|leg| self.price(leg, basis))
    }
}
