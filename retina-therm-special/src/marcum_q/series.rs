use statrs::function::gamma::ln_gamma;

use super::{MarcumQ, trivial_case, upper_gamma};

/// Poisson weights below this are dropped once past the mode.
const WEIGHT_TOL: f64 = 1e-20;

/// Hard cap on the number of terms summed on each side of the mode.
const MAX_TERMS: usize = 100_000;

/// Reference Marcum Q: the Poisson-weighted incomplete gamma series.
///
/// Each weight is formed in log space and summation starts at the Poisson
/// mode, so large noncentralities do not underflow.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeriesMarcumQ;

impl MarcumQ for SeriesMarcumQ {
    fn q(&self, nu: f64, a: f64, b: f64) -> f64 {
        if let Some(value) = trivial_case(nu, a, b) {
            return value;
        }

        let x = 0.5 * b * b;
        if a == 0.0 {
            return upper_gamma(nu, x);
        }

        let lambda = 0.5 * a * a;
        let ln_lambda = lambda.ln();
        #[allow(clippy::cast_precision_loss)]
        let weight = |k: usize| {
            let k = k as f64;
            (k * ln_lambda - lambda - ln_gamma(k + 1.0)).exp()
        };
        #[allow(clippy::cast_precision_loss)]
        let term = |k: usize, w: f64| w * upper_gamma(nu + k as f64, x);

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let mode = lambda.floor() as usize;

        let mut sum = 0.0;
        for k in mode..mode + MAX_TERMS {
            let w = weight(k);
            sum += term(k, w);
            if w < WEIGHT_TOL {
                break;
            }
        }
        for k in (0..mode).rev().take(MAX_TERMS) {
            let w = weight(k);
            sum += term(k, w);
            if w < WEIGHT_TOL {
                break;
            }
        }

        sum.clamp(0.0, 1.0)
    }
}
