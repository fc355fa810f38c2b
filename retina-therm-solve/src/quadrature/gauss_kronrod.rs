//! The 7-point Gauss / 15-point Kronrod rule on a finite interval.

/// Kronrod abscissae on [-1, 1], positive half. The odd entries are the
/// Gauss nodes; the last entry is the center.
const XGK: [f64; 8] = [
    0.991_455_371_120_812_639_206_854_697_526_329,
    0.949_107_912_342_758_524_526_189_684_047_851,
    0.864_864_423_359_769_072_789_712_788_640_926,
    0.741_531_185_599_394_439_863_864_773_280_788,
    0.586_087_235_467_691_130_294_144_845_693_013,
    0.405_845_151_377_397_166_906_606_412_076_961,
    0.207_784_955_007_898_467_600_689_403_773_245,
    0.0,
];

/// Kronrod weights matching `XGK`.
const WGK: [f64; 8] = [
    0.022_935_322_010_529_224_963_732_008_058_970,
    0.063_092_092_629_978_553_290_700_663_189_204,
    0.104_790_010_322_250_183_839_876_322_541_518,
    0.140_653_259_715_525_918_745_189_590_510_238,
    0.169_004_726_639_267_902_826_583_426_598_550,
    0.190_350_578_064_785_409_913_256_402_421_014,
    0.204_432_940_075_298_892_414_161_999_234_649,
    0.209_482_141_084_727_828_012_999_174_891_714,
];

/// Gauss weights for the nodes `XGK[1]`, `XGK[3]`, `XGK[5]` and the center.
const WG: [f64; 4] = [
    0.129_484_966_168_869_693_270_611_432_679_082,
    0.279_705_391_489_276_667_901_467_771_423_780,
    0.381_830_050_505_118_944_950_369_775_488_975,
    0.417_959_183_673_469_387_755_102_040_816_327,
];

/// Number of integrand evaluations per rule application.
pub(super) const EVALUATIONS: usize = 15;

/// A subinterval with its Kronrod estimate and error estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct Segment {
    pub(super) a: f64,
    pub(super) b: f64,
    pub(super) value: f64,
    pub(super) error: f64,
}

/// Applies the rule on `[a, b]`.
///
/// Returns the first non-finite sample as `Err((x, f(x)))`.
pub(super) fn apply<F>(f: &mut F, a: f64, b: f64) -> Result<Segment, (f64, f64)>
where
    F: FnMut(f64) -> f64,
{
    let center = 0.5 * (a + b);
    let half = 0.5 * (b - a);

    let mut sample = |x: f64| {
        let value = f(x);
        if value.is_finite() {
            Ok(value)
        } else {
            Err((x, value))
        }
    };

    let f_center = sample(center)?;
    let mut kronrod = WGK[7] * f_center;
    let mut gauss = WG[3] * f_center;

    for (i, (&x, &w)) in XGK.iter().zip(WGK.iter()).take(7).enumerate() {
        let dx = half * x;
        let pair = sample(center - dx)? + sample(center + dx)?;
        kronrod += w * pair;
        if i % 2 == 1 {
            gauss += WG[i / 2] * pair;
        }
    }

    Ok(Segment {
        a,
        b,
        value: kronrod * half,
        error: ((kronrod - gauss) * half).abs(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn weights_integrate_constants() {
        let kronrod: f64 = 2.0 * WGK[..7].iter().sum::<f64>() + WGK[7];
        let gauss: f64 = 2.0 * WG[..3].iter().sum::<f64>() + WG[3];
        assert_relative_eq!(kronrod, 2.0, epsilon = 1e-14);
        assert_relative_eq!(gauss, 2.0, epsilon = 1e-14);
    }

    #[test]
    fn exact_for_low_degree_polynomials() {
        let segment = apply(&mut |x: f64| x.powi(5) - 2.0 * x * x + 1.0, 0.0, 2.0)
            .expect("finite integrand");
        // 64/6 - 16/3 + 2
        assert_relative_eq!(segment.value, 22.0 / 3.0, epsilon = 1e-12);
        assert!(segment.error < 1e-12);
    }

    #[test]
    fn reports_non_finite_sample() {
        let result = apply(&mut |x: f64| if x > 0.5 { f64::NAN } else { x }, 0.0, 1.0);
        assert!(matches!(result, Err((x, v)) if x > 0.5 && v.is_nan()));
    }
}
