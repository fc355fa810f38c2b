//! Depth and time dependence shared by all beam profiles.
//!
//! With `A = mua E0 / (2 rho c)`, `tau = sqrt(alpha t)`, `s = mua tau`,
//! `p = (z0 + d - z) / (2 tau)` and `q = (z - z0) / (2 tau)`:
//!
//! ```text
//! G(z, t) = A exp(s^2 - mua (z - z0)) [erf(s + p) - erf(s - q)]
//! ```

use retina_therm_special::{
    erfcx::shifted_erfcx,
    multi_precision::{self, Precision},
};
use libm::erf;

use crate::config::{Layer, PrecisionMode, ThermalProperties};

/// Axial part of a layer kernel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct AxialTerm {
    amplitude: f64,
    alpha: f64,
    mua: f64,
    d: f64,
    z0: f64,
}

/// Dimensionless arguments at one `(z, t > 0)`.
struct Arguments {
    s: f64,
    p: f64,
    q: f64,
}

impl AxialTerm {
    pub(super) fn new(layer: &Layer, thermal: &ThermalProperties, e0: f64) -> Self {
        Self {
            amplitude: layer.mua() * e0 / (2.0 * thermal.heat_capacity()),
            alpha: thermal.alpha(),
            mua: layer.mua(),
            d: layer.d(),
            z0: layer.z0(),
        }
    }

    /// Prefactor `A`, K/s.
    pub(super) fn amplitude(&self) -> f64 {
        self.amplitude
    }

    pub(super) fn evaluate(&self, z: f64, t: f64, mode: PrecisionMode) -> f64 {
        if t < 0.0 {
            return 0.0;
        }
        #[allow(clippy::float_cmp)]
        if t == 0.0 {
            return self.at_onset(z);
        }
        match mode {
            PrecisionMode::Fixed => self.fixed(z, t),
            PrecisionMode::Approximate => self.approximate(z, t),
            PrecisionMode::MultiPrecision { digits } => self
                .multi_precision(z, t, Precision::from_digits(digits))
                .unwrap_or(f64::NAN),
        }
    }

    /// The `t -> 0+` limit: `2A exp(-mua (z - z0))` inside the layer, half
    /// that on either face, zero outside.
    fn at_onset(&self, z: f64) -> f64 {
        let sides = sign(self.z0 + self.d - z) + sign(z - self.z0);
        if sides == 0.0 {
            return 0.0;
        }
        self.amplitude * (-self.mua * (z - self.z0)).exp() * sides
    }

    fn arguments(&self, z: f64, t: f64) -> Arguments {
        let tau = (self.alpha * t).sqrt();
        Arguments {
            s: self.mua * tau,
            p: (self.z0 + self.d - z) / (2.0 * tau),
            q: (z - self.z0) / (2.0 * tau),
        }
    }

    /// The closed form in `f64`. `exp(s^2)` overflows and the erf difference
    /// cancels at long times.
    fn fixed(&self, z: f64, t: f64) -> f64 {
        let Arguments { s, p, q } = self.arguments(z, t);
        let bracket = erf(s + p) - erf(s - q);
        if bracket == 0.0 {
            return 0.0;
        }
        self.amplitude * (s * s - self.mua * (z - self.z0)).exp() * bracket
    }

    /// The same quantity written with `erfcx`:
    ///
    /// ```text
    /// A [exp(-q^2) erfcx(s - q) - exp(-mua d - p^2) erfcx(s + p)]
    /// ```
    ///
    /// Large `erfcx` arguments, the long-time regime, use the asymptotic
    /// expansion.
    fn approximate(&self, z: f64, t: f64) -> f64 {
        let Arguments { s, p, q } = self.arguments(z, t);
        let front = shifted_erfcx(s - q, q * q);
        let back = shifted_erfcx(s + p, p * p + self.mua * self.d);
        self.amplitude * (front - back)
    }

    /// The closed form evaluated at `precision`. `None` only for NaN inputs.
    fn multi_precision(&self, z: f64, t: f64, precision: Precision) -> Option<f64> {
        let big = |x: f64| precision.float(x);

        let mua = big(self.mua)?;
        let z0 = big(self.z0)?;
        let z = big(z)?;
        let tau = precision.sqrt(&(big(self.alpha)? * big(t)?));
        let two_tau = &tau * 2u8;

        let s = &mua * &tau;
        let depth = &z - &z0;
        let p = (&z0 + big(self.d)? - &z) / &two_tau;
        let q = &depth / &two_tau;

        let bracket = precision.erf(&(&s + &p)) - precision.erf(&(&s - &q));
        if bracket.repr().is_zero() {
            return Some(0.0);
        }
        let growth = (&s * &s - &mua * &depth).exp();
        Some(self.amplitude * multi_precision::to_f64(&(growth * bracket)))
    }
}

fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}
