use dashu_base::{EstimatedLog2, SquareRoot};

use super::{BigFloat, Precision};

/// Computes pi with the Gauss–Legendre iteration, which doubles the number of
/// correct digits per step.
pub(super) fn gauss_legendre(precision: Precision) -> BigFloat {
    #[allow(clippy::cast_precision_loss)]
    let target = -(precision.bits() as f32);

    let mut a = precision.int(1);
    let mut b = (precision.int(1) / 2u8).sqrt();
    let mut t = precision.int(1) / 4u8;
    let mut p = precision.int(1);

    for _ in 0..64 {
        let next_a = (&a + &b) / 2u8;
        b = (&a * &b).sqrt();
        let step = &a - &next_a;
        t = &t - &(&p * &(&step * &step));
        p = p * 2u8;
        a = next_a;

        let gap = &a - &b;
        if gap.repr().is_zero() || gap.log2_est() < target {
            break;
        }
    }

    let sum = &a + &b;
    &sum * &sum / (t * 4u8)
}
