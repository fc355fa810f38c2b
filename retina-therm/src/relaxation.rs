//! How quickly the heating rate decays after a step exposure.

use ndarray::Array1;
use retina_therm_solve::bisection;
use thiserror::Error;
use tracing::debug;

use crate::greens::GreensFunction;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum RelaxationError {
    #[error("threshold must lie strictly between 0 and 1, got {value}")]
    InvalidThreshold { value: f64 },

    #[error("time step and horizon must be finite and positive")]
    InvalidTimes,

    #[error("rate at onset is {peak}; there is nothing to relax")]
    NoPeak { peak: f64 },

    #[error("kernel returned {value} at t = {t} s")]
    NonFiniteRate { t: f64, value: f64 },

    #[error("rate stays above the threshold until t = {max_time} s")]
    NotBracketed { max_time: f64 },

    #[error(transparent)]
    Bisection(#[from] bisection::Error),
}

/// Time sampling for the relaxation searches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    /// First sampling step, s.
    pub step: f64,
    /// Give up past this time, s.
    pub max_time: f64,
    pub bisection: bisection::Config,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            step: 1e-6,
            max_time: 365.25 * 24.0 * 3600.0,
            bisection: bisection::Config::default(),
        }
    }
}

/// Uniformly sampled heating rate after onset.
#[derive(Debug, Clone, PartialEq)]
pub struct ImpulseResponse {
    pub t: Array1<f64>,
    pub rate: Array1<f64>,
}

/// Result of a relaxation-time search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Relaxation {
    /// Time at which the rate falls to `threshold * peak`, s.
    pub time: f64,
    /// Rate at `time`, K/s.
    pub rate: f64,
    /// Rate at onset, K/s.
    pub peak: f64,
    /// Doubling bracket handed to the bisection, s.
    pub bracket: [f64; 2],
}

/// Samples `G(z, r, t)` every `config.step` seconds from onset until it
/// falls to `threshold` times its onset value or `config.max_time` passes.
/// The first sample at or below the threshold is included.
///
/// # Errors
///
/// Returns an error for an invalid threshold or sampling, or if the kernel
/// returns a non-finite value.
pub fn impulse_response(
    g: &impl GreensFunction,
    z: f64,
    r: f64,
    threshold: f64,
    config: &Config,
) -> Result<ImpulseResponse, RelaxationError> {
    validate(threshold, config)?;

    let peak = finite_rate(g, z, r, 0.0)?;
    let cutoff = threshold * peak;

    let mut t = Vec::new();
    let mut rate = Vec::new();
    for i in 0u64.. {
        #[allow(clippy::cast_precision_loss)]
        let time = i as f64 * config.step;
        let value = finite_rate(g, z, r, time)?;
        t.push(time);
        rate.push(value);
        if value <= cutoff || time >= config.max_time {
            break;
        }
    }

    debug!(samples = t.len(), peak, "sampled impulse response");
    Ok(ImpulseResponse {
        t: Array1::from(t),
        rate: Array1::from(rate),
    })
}

/// Finds the time at which `G(z, r, t)` first drops to `threshold` times its
/// onset value.
///
/// The step is doubled from `config.step` until the rate falls below the
/// target, then the last doubling interval is bisected.
///
/// # Errors
///
/// Returns an error for an invalid threshold or sampling, if the onset rate
/// is not positive, if the rate never falls below the target before
/// `config.max_time`, or if the bisection fails.
pub fn relaxation_time(
    g: &impl GreensFunction,
    z: f64,
    r: f64,
    threshold: f64,
    config: &Config,
) -> Result<Relaxation, RelaxationError> {
    validate(threshold, config)?;

    let peak = finite_rate(g, z, r, 0.0)?;
    if peak <= 0.0 {
        return Err(RelaxationError::NoPeak { peak });
    }
    let target = threshold * peak;

    let mut upper = config.step;
    let mut lower = 0.0;
    while finite_rate(g, z, r, upper)? > target {
        if upper > config.max_time {
            return Err(RelaxationError::NotBracketed {
                max_time: config.max_time,
            });
        }
        lower = upper;
        upper *= 2.0;
    }
    debug!(lower, upper, target, "relaxation time bracketed");

    let residual = |t| g.rate(z, r, t) - target;
    let solution = bisection::solve_unobserved(residual, [lower, upper], &config.bisection)?;

    Ok(Relaxation {
        time: solution.x,
        rate: solution.residual + target,
        peak,
        bracket: [lower, upper],
    })
}

fn validate(threshold: f64, config: &Config) -> Result<(), RelaxationError> {
    if !(threshold > 0.0 && threshold < 1.0) {
        return Err(RelaxationError::InvalidThreshold { value: threshold });
    }
    let positive = |value: f64| value.is_finite() && value > 0.0;
    if !positive(config.step) || !positive(config.max_time) {
        return Err(RelaxationError::InvalidTimes);
    }
    Ok(())
}

fn finite_rate(g: &impl GreensFunction, z: f64, r: f64, t: f64) -> Result<f64, RelaxationError> {
    let value = g.rate(z, r, t);
    if value.is_finite() {
        Ok(value)
    } else {
        Err(RelaxationError::NonFiniteRate { t, value })
    }
}
