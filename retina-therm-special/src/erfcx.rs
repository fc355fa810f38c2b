//! Scaled complementary error function, `erfcx(x) = exp(x^2) erfc(x)`.
//!
//! For large positive arguments `erfc` underflows while `exp(x^2)` overflows,
//! so the product is taken from its asymptotic expansion instead.

use std::f64::consts::PI;

use libm::erfc;

/// Arguments at or above this use the asymptotic expansion.
pub const ASYMPTOTIC_THRESHOLD: f64 = 5.0;

/// Returns `exp(x^2) erfc(x)`.
#[must_use]
pub fn erfcx(x: f64) -> f64 {
    shifted_erfcx(x, 0.0)
}

/// Returns `exp(x^2 - shift) erfc(x)`.
///
/// Folding `shift` into the exponent keeps products such as
/// `exp(-q^2) erfcx(s - q)` finite when `s - q` is large and negative.
#[must_use]
pub fn shifted_erfcx(x: f64, shift: f64) -> f64 {
    if x >= ASYMPTOTIC_THRESHOLD {
        (-shift).exp() * asymptotic_erfcx(x)
    } else {
        (x * x - shift).exp() * erfc(x)
    }
}

/// Long-argument expansion of `erfcx`,
/// `1/(x sqrt(pi)) * sum_n (-1)^n (2n-1)!! / (2x^2)^n`.
///
/// The divergent series is cut at its smallest term.
#[must_use]
pub fn asymptotic_erfcx(x: f64) -> f64 {
    let inv = 1.0 / (2.0 * x * x);
    let mut term = 1.0_f64;
    let mut sum = 1.0;
    for n in 1..200 {
        let next = -term * f64::from(2 * n - 1) * inv;
        if next.abs() >= term.abs() || next.abs() < f64::EPSILON * sum {
            break;
        }
        sum += next;
        term = next;
    }
    sum / (x * PI.sqrt())
}
