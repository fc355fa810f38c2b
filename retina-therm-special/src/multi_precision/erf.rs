use dashu_base::{EstimatedLog2, Sign, SquareRoot};

use super::{BigFloat, Precision, to_f64};

/// Evaluates `erf(x)` from the all-positive series
/// `erf(x) = 2x/sqrt(pi) * exp(-x^2) * sum_n (2x^2)^n / (2n + 1)!!`.
///
/// Once `erfc(x)` is below the working resolution the result is exactly
/// `+-1`.
pub(super) fn erf(precision: Precision, x: &BigFloat) -> BigFloat {
    if x.repr().is_zero() {
        return precision.int(0);
    }
    if x.sign() == Sign::Negative {
        return -erf(precision, &-x);
    }

    let x2 = x * x;
    let x2_approx = to_f64(&x2);

    #[allow(clippy::cast_precision_loss)]
    let bits = precision.bits() as f64;
    if x2_approx > (bits + 2.0) * std::f64::consts::LN_2 {
        return precision.int(1);
    }

    let two_x2 = &x2 * 2u8;
    let mut term = x.clone();
    let mut sum = x.clone();
    #[allow(clippy::cast_precision_loss)]
    let resolution = (precision.bits() + 8) as f32;

    let mut n: u32 = 1;
    loop {
        term = &term * &two_x2 / (2 * n + 1);
        sum = &sum + &term;
        if f64::from(n) > x2_approx && term.log2_est() < sum.log2_est() - resolution {
            break;
        }
        n += 1;
    }

    let scale = precision.int(2) * (-x2).exp() / precision.pi().sqrt();
    sum * scale
}
