//! Quantity types for the typed entry points.
//!
//! The numeric core works in plain `f64` values in a fixed unit system:
//! length in cm, time in s, mass in g, energy in J, power in W and
//! temperature in K. The helpers here move values between that system and
//! `uom` quantities.

use uom::{
    si::{
        ISQ, Quantity, SI,
        f64::{Length, TemperatureInterval, Time},
        length::centimeter,
        temperature_interval::kelvin,
        time::second,
    },
    typenum::{N1, P1, Z0},
};

/// Temperature rate of change, K/s in SI.
pub type TemperatureRate = Quantity<ISQ<Z0, Z0, N1, Z0, P1, Z0, Z0>, SI<f64>, f64>;

/// Returns a length in centimeters.
#[must_use]
pub fn length_cm(length: Length) -> f64 {
    length.get::<centimeter>()
}

/// Returns a time in seconds.
#[must_use]
pub fn time_s(time: Time) -> f64 {
    time.get::<second>()
}

/// Wraps a rate given in K/s.
#[must_use]
pub fn temperature_rate(kelvin_per_second: f64) -> TemperatureRate {
    TemperatureInterval::new::<kelvin>(kelvin_per_second) / Time::new::<second>(1.0)
}

/// Returns a rate in K/s.
#[must_use]
pub fn kelvin_per_second(rate: TemperatureRate) -> f64 {
    (rate * Time::new::<second>(1.0)).get::<kelvin>()
}

/// Wraps a temperature rise given in K.
#[must_use]
pub fn temperature_rise(kelvin_rise: f64) -> TemperatureInterval {
    TemperatureInterval::new::<kelvin>(kelvin_rise)
}
