use statrs::function::gamma::ln_gamma;

use super::{MarcumQ, trivial_case, upper_gamma};

/// Relative size at which trailing Poisson weights are dropped.
const WEIGHT_TOL: f64 = 1e-18;

/// Hard cap on the number of terms.
const MAX_TERMS: usize = 100_000;

/// Accelerated Marcum Q using the incomplete gamma recurrence.
///
/// Only one incomplete gamma evaluation is needed; later orders follow from
/// `Q(s + 1, x) = Q(s, x) + x^s e^(-x) / Gamma(s + 1)`. The first Poisson
/// weight `exp(-a^2/2)` underflows for `a` above roughly 38.6, in which case
/// the result is NaN.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecurrenceMarcumQ;

impl MarcumQ for RecurrenceMarcumQ {
    fn q(&self, nu: f64, a: f64, b: f64) -> f64 {
        if let Some(value) = trivial_case(nu, a, b) {
            return value;
        }

        let lambda = 0.5 * a * a;
        let x = 0.5 * b * b;

        let mut weight = (-lambda).exp();
        let mut gamma_q = upper_gamma(nu, x);
        let mut step = (nu * x.ln() - x - ln_gamma(nu + 1.0)).exp();

        let mut sum = 0.0;
        let mut total = 0.0;
        for k in 0..MAX_TERMS {
            #[allow(clippy::cast_precision_loss)]
            let k = k as f64;

            sum += weight * gamma_q;
            total += weight;

            if weight == 0.0 || (k > lambda && weight < WEIGHT_TOL * total) {
                break;
            }

            gamma_q = (gamma_q + step).min(1.0);
            step *= x / (nu + k + 1.0);
            weight *= lambda / (k + 1.0);
        }

        (sum / total).clamp(0.0, 1.0)
    }
}
