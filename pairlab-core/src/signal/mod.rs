//! Relative-value signal between the two legs.

pub mod ratio;

pub use ratio::{RatioSignal, SignalError};
