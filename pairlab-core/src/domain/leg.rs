//! Leg: which side of the pair a value belongs to.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};

/// One of the two instruments in the pair.
///
/// Leg B is the default side: the initializing purchase buys it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Leg {
    A,
    B,
}

impl Leg {
    pub const BOTH: [Leg; 2] = [Leg::A, Leg::B];

    /// The leg on the other side of the pair.
    pub fn other(self) -> Leg {
        match self {
            Leg::A => Leg::B,
            Leg::B => Leg::A,
        }
    }
}

impl fmt::Display for Leg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Leg::A => write!(f, "A"),
            Leg::B => write!(f, "B"),
        }
    }
}

/// A pair of values, one per leg, indexed by [`Leg`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PerLeg<T> {
    pub a: T,
    pub b: T,
}

impl<T> PerLeg<T> {
    pub fn new(a: T, b: T) -> Self {
        Self { a, b }
    }

    /// Build both values from a function of the leg.
    pub fn from_fn(mut f: impl FnMut(Leg) -> T) -> Self {
        Self {
            a: f(Leg::A),
            b: f(Leg::B),
        }
    }

    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> PerLeg<U> {
        PerLeg {
            a: f(self.a),
            b: f(self.b),
        }
    }
}

impl<T> Index<Leg> for PerLeg<T> {
    type Output = T;

    fn index(&self, leg: Leg) -> &T {
        match leg {
            Leg::A => &self.a,
            Leg::B => &self.b,
        }
    }
}

impl<T> IndexMut<Leg> for PerLeg<T> {
    fn index_mut(&mut self, leg: Leg) -> &mut T {
        match leg {
            Leg::A => &mut self.a,
            Leg::B => &mut self.b,
        }
    }
}
