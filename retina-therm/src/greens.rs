//! Green's-function kernels for laser heating of absorbing layers.
//!
//! A kernel gives the instantaneous temperature-rise rate `G(z, r, t)` (K/s)
//! at depth `z` and radius `r` (cm), a time `t` (s) after the onset of a
//! step exposure. Integrating `G` over time gives the temperature rise; see
//! [`crate::exposure`].

mod axial;
mod layer;
mod multi_layer;
mod radial;

pub use layer::LayerGreensFunction;
pub use multi_layer::MultiLayerGreensFunction;

use uom::si::f64::{Length, Time};

use crate::units::{self, TemperatureRate};

/// A temperature-rise rate kernel.
pub trait GreensFunction {
    /// Rate of temperature rise in K/s at depth `z` and radius `r` (cm),
    /// `t` seconds after exposure onset. Zero for `t < 0`.
    fn rate(&self, z: f64, r: f64, t: f64) -> f64;

    /// Whether [`call`](Self::call) wraps results in `uom` quantities.
    fn with_units(&self) -> bool {
        false
    }

    /// Evaluates the kernel, wrapped according to [`with_units`](Self::with_units).
    fn call(&self, z: f64, r: f64, t: f64) -> Rate {
        let value = self.rate(z, r, t);
        if self.with_units() {
            Rate::Quantity(units::temperature_rate(value))
        } else {
            Rate::Plain(value)
        }
    }

    /// Evaluates the kernel at typed coordinates.
    fn rate_quantity(&self, z: Length, r: Length, t: Time) -> TemperatureRate {
        let (z, r, t) = (units::length_cm(z), units::length_cm(r), units::time_s(t));
        units::temperature_rate(self.rate(z, r, t))
    }
}

/// A kernel value, plain or with units.
///
/// Both variants carry the same number; `with_units` never changes it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rate {
    /// Rate in K/s.
    Plain(f64),
    /// Rate as a quantity.
    Quantity(TemperatureRate),
}

impl Rate {
    /// Rate in K/s.
    #[must_use]
    pub fn value(self) -> f64 {
        match self {
            Self::Plain(value) => value,
            Self::Quantity(rate) => units::kelvin_per_second(rate),
        }
    }
}

impl<G: GreensFunction + ?Sized> GreensFunction for &G {
    fn rate(&self, z: f64, r: f64, t: f64) -> f64 {
        (**self).rate(z, r, t)
    }

    fn with_units(&self) -> bool {
        (**self).with_units()
    }
}
