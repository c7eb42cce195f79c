//! # Position Units
//!
//! All lengths in the core are millimetres, and all punch positions are
//! quantised to the half millimetre, the finest increment the press can
//! index to. Rather than carrying raw `f64` positions through the planner
//! (and chasing representation drift through every comparison), positions are
//! stored as [`HalfMm`]: an integer count of half millimetres.
//!
//! ## Design Philosophy
//!
//! - Exact equality and ordering, no float tolerance anywhere positions meet
//! - JSON serialization stays a plain number of millimetres
//! - Quantisation happens once, at the boundary, via [`round_half`]
//!
//! ## Example
//!
//! ```rust
//! use punch_core::units::{round_half, HalfMm};
//!
//! assert_eq!(round_half(479.26), 479.5);
//!
//! let pos = HalfMm::from_mm(570.5);
//! assert_eq!(pos.as_mm(), 570.5);
//! assert_eq!(pos.to_string(), "570.5");
//! assert_eq!(HalfMm::from_mm(30.0).to_string(), "30");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

/// Quantise a millimetre value to the nearest half millimetre.
pub fn round_half(x: f64) -> f64 {
    (x * 2.0).round() / 2.0
}

/// A position along the member, in integer half millimetres.
///
/// `HalfMm(61)` is 30.5 mm. Construction from `f64` always quantises, so a
/// `HalfMm` can never hold an off-grid value.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(from = "f64", into = "f64")]
pub struct HalfMm(i64);

impl HalfMm {
    /// Zero position (the start end of the member)
    pub const ZERO: HalfMm = HalfMm(0);

    /// Create from a millimetre value, quantising to the half millimetre
    pub fn from_mm(mm: f64) -> Self {
        HalfMm((mm * 2.0).round() as i64)
    }

    /// Create from a raw half-millimetre count
    pub const fn from_halves(halves: i64) -> Self {
        HalfMm(halves)
    }

    /// The raw half-millimetre count
    pub const fn halves(self) -> i64 {
        self.0
    }

    /// The position in millimetres
    pub fn as_mm(self) -> f64 {
        self.0 as f64 / 2.0
    }

    /// Absolute distance to another position, in millimetres
    pub fn distance_mm(self, other: HalfMm) -> f64 {
        (self.0 - other.0).abs() as f64 / 2.0
    }
}

impl From<f64> for HalfMm {
    fn from(mm: f64) -> Self {
        HalfMm::from_mm(mm)
    }
}

impl From<HalfMm> for f64 {
    fn from(p: HalfMm) -> Self {
        p.as_mm()
    }
}

impl Add for HalfMm {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        HalfMm(self.0 + rhs.0)
    }
}

impl Sub for HalfMm {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        HalfMm(self.0 - rhs.0)
    }
}

impl fmt::Display for HalfMm {
    /// Formats whole millimetres without a decimal and half positions with
    /// `.5`, the format the press CSV consumes.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 % 2 == 0 {
            write!(f, "{}", self.0 / 2)
        } else {
            write!(f, "{:.1}", self.0 as f64 / 2.0)
        }
    }
}
