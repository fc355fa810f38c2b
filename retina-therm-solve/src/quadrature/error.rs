use thiserror::Error;

/// Errors that can occur during adaptive quadrature.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum Error {
    #[error("integration bound is not finite: {value}")]
    NonFiniteBound { value: f64 },

    #[error("integrand returned {value} at x = {x}")]
    NonFiniteIntegrand { x: f64, value: f64 },

    #[error("invalid config: {reason}")]
    InvalidConfig { reason: &'static str },
}
