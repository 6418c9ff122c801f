//! Domain types for PairLab

pub mod bar;
pub mod fill;
pub mod leg;
pub mod portfolio;

pub use bar::{PairBar, PriceBasis, Quote};
pub use fill::{Fill, FillReason, TradeSide};
pub use leg::{Leg, PerLeg};
pub use portfolio::{Portfolio, CASH_EPSILON};
