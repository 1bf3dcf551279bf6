//! Bit-widths and the closed arithmetic over them.
//!
//! A [`Width`] is either a known integer or unknown. Width inference and every
//! pass that propagates widths combine them only through the operations here:
//! known with known gives a known result computed exactly, and an unknown
//! operand makes the result unknown. The arithmetic is arbitrary precision,
//! so it is total. Subtraction may produce a negative known width; rejecting
//! such widths is the job of validation, not of this algebra.

use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

/// The bit-width of a ground value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Width {
    /// A known width. Non-negative in a valid circuit.
    Known(BigInt),
    /// Not yet inferred.
    Unknown,
}

impl Width {
    /// Creates a known width.
    pub fn known(value: impl Into<BigInt>) -> Self {
        Width::Known(value.into())
    }

    /// Returns `true` if the width is known.
    pub fn is_known(&self) -> bool {
        matches!(self, Width::Known(_))
    }

    /// Returns the known value, if any.
    pub fn value(&self) -> Option<&BigInt> {
        match self {
            Width::Known(v) => Some(v),
            Width::Unknown => None,
        }
    }

    /// Returns the known value as a `u64`, if it is known and fits.
    pub fn as_u64(&self) -> Option<u64> {
        self.value().and_then(ToPrimitive::to_u64)
    }

    /// Returns `true` if the width is known and negative.
    pub fn is_negative(&self) -> bool {
        self.value().is_some_and(Signed::is_negative)
    }

    fn combine(&self, other: &Width, op: impl FnOnce(&BigInt, &BigInt) -> BigInt) -> Width {
        match (self, other) {
            (Width::Known(a), Width::Known(b)) => Width::Known(op(a, b)),
            _ => Width::Unknown,
        }
    }

    /// The larger of two widths; unknown if either is.
    pub fn max(&self, other: &Width) -> Width {
        self.combine(other, |a, b| a.max(b).clone())
    }

    /// The smaller of two widths; unknown if either is.
    pub fn min(&self, other: &Width) -> Width {
        self.combine(other, |a, b| a.min(b).clone())
    }
}

impl Add for &Width {
    type Output = Width;

    fn add(self, rhs: &Width) -> Width {
        self.combine(rhs, |a, b| a + b)
    }
}

impl Sub for &Width {
    type Output = Width;

    fn sub(self, rhs: &Width) -> Width {
        self.combine(rhs, |a, b| a - b)
    }
}

impl Add for Width {
    type Output = Width;

    fn add(self, rhs: Width) -> Width {
        &self + &rhs
    }
}

impl Sub for Width {
    type Output = Width;

    fn sub(self, rhs: Width) -> Width {
        &self - &rhs
    }
}

impl fmt::Display for Width {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::serialize::serialize_width(self))
    }
}
