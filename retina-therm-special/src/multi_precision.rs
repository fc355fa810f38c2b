//! Arbitrary-precision evaluation at an explicit number of decimal digits.
//!
//! There is no ambient precision context: every operation takes a
//! [`Precision`], and every value created through it carries that precision
//! into later arithmetic.

mod erf;
mod pi;

use dashu_base::SquareRoot;
use dashu_float::{FBig, round::mode::HalfEven};

/// Binary floating-point number with round-half-even arithmetic.
pub type BigFloat = FBig<HalfEven>;

/// Extra bits carried beyond the requested decimal digits.
const GUARD_BITS: usize = 32;

/// Working precision for arbitrary-precision evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Precision {
    digits: u32,
    bits: usize,
}

impl Precision {
    /// Creates a precision of at least `digits` significant decimal digits.
    #[must_use]
    pub fn from_digits(digits: u32) -> Self {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let bits = (f64::from(digits.max(1)) * std::f64::consts::LOG2_10).ceil() as usize;
        Self {
            digits,
            bits: bits + GUARD_BITS,
        }
    }

    /// Requested decimal digits.
    #[must_use]
    pub fn digits(self) -> u32 {
        self.digits
    }

    /// Working precision in bits, guard bits included.
    #[must_use]
    pub fn bits(self) -> usize {
        self.bits
    }

    /// Converts a double at this precision, or `None` for NaN.
    #[must_use]
    pub fn float(self, x: f64) -> Option<BigFloat> {
        let value = BigFloat::try_from(x).ok()?;
        Some(value.with_precision(self.bits).value())
    }

    /// Converts an integer at this precision.
    #[must_use]
    pub fn int(self, n: i64) -> BigFloat {
        BigFloat::from(n).with_precision(self.bits).value()
    }

    /// Returns the square root of `x`.
    ///
    /// # Panics
    ///
    /// Panics if `x` is negative.
    #[must_use]
    pub fn sqrt(self, x: &BigFloat) -> BigFloat {
        x.clone().with_precision(self.bits).value().sqrt()
    }

    /// Returns pi at this precision.
    #[must_use]
    pub fn pi(self) -> BigFloat {
        pi::gauss_legendre(self)
    }

    /// Returns `erf(x)` at this precision.
    #[must_use]
    pub fn erf(self, x: &BigFloat) -> BigFloat {
        erf::erf(self, x)
    }
}

/// Rounds to the nearest double.
#[must_use]
pub fn to_f64(x: &BigFloat) -> f64 {
    x.to_f64().value()
}
