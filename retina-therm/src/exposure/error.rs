use retina_therm_solve::quadrature;
use thiserror::Error;

use crate::{config::ConfigError, interpolation::InterpError};

/// Errors raised while integrating a kernel over an exposure.
#[derive(Debug, Error)]
pub enum ExposureError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("requested time is not finite: {value}")]
    NonFiniteTime { value: f64 },

    #[error("trapezoid step must be finite and positive, got {value}")]
    InvalidStep { value: f64 },

    #[error("invalid quadrature config: {reason}")]
    InvalidQuadrature { reason: &'static str },

    #[error("trapezoid grid needs {points:.0} points, more than the limit of {limit}")]
    TrapGridTooLarge { points: f64, limit: usize },

    #[error("kernel returned {value} at t = {t} s")]
    NonFiniteRate { t: f64, value: f64 },

    #[error("quadrature failed at t = {t} s")]
    Quadrature {
        t: f64,
        #[source]
        source: quadrature::Error,
    },

    #[error("failed to interpolate the cumulative response")]
    Interpolation(#[from] InterpError),

    #[error("cancelled after {completed} of {total} steps")]
    Cancelled { completed: usize, total: usize },
}
