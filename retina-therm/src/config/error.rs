use thiserror::Error;

use crate::constraint::ConstraintError;

use super::ProfileKind;

/// Errors raised while building or validating a configuration.
///
/// These are fatal: they are reported before any kernel is evaluated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("invalid {name}: {source}")]
    Constraint {
        name: &'static str,
        #[source]
        source: ConstraintError,
    },

    #[error("at least one absorbing layer is required")]
    NoLayers,

    #[error(
        "layer {index} ends at z = {end} cm, past the start of layer {next} at z = {next_start} cm"
    )]
    OverlappingLayers {
        index: usize,
        end: f64,
        next: usize,
        next_start: f64,
    },

    #[error("{profile} beam requires a radius or a diameter")]
    MissingRadius { profile: ProfileKind },

    #[error("beam radius and diameter cannot both be given")]
    AmbiguousRadius,

    #[error("unknown beam profile '{name}', expected one of: 1d, flattop, gaussian")]
    UnknownProfile { name: String },

    #[error("multi-precision and approximate evaluation cannot both be enabled")]
    ConflictingPrecision,

    #[error("unknown integration method '{name}', expected one of: quad, trap")]
    UnknownIntegrationMethod { name: String },

    #[error("invalid exposure: {reason}")]
    InvalidExposure { reason: &'static str },
}
