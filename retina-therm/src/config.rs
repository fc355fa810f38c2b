//! Validated configuration bundles consumed by the Green's-function kernels.
//!
//! Every type here is an immutable value object. Constructors check the
//! numeric constraints once, and the `serde` representations route through
//! the same checks so an external loader cannot bypass them.

mod beam;
mod error;
mod layer;
mod model;
mod policy;
mod source;
mod thermal;

pub use beam::{BeamProfile, BeamSpec, ProfileKind};
pub use error::ConfigError;
pub use layer::{Layer, LayerSpec};
pub use model::ModelConfig;
pub use policy::{DEFAULT_DIGITS, EvaluationPolicy, PrecisionMode};
pub use source::Source;
pub use thermal::{ThermalProperties, ThermalSpec};

use crate::constraint::{NonNegativeF64, Positive};

/// Checks that a named parameter is finite and greater than zero.
pub(crate) fn positive(name: &'static str, value: f64) -> Result<Positive, ConfigError> {
    Positive::new(value).map_err(|source| ConfigError::Constraint { name, source })
}

/// Checks that a named parameter is finite and not negative.
pub(crate) fn non_negative(name: &'static str, value: f64) -> Result<NonNegativeF64, ConfigError> {
    NonNegativeF64::new(value).map_err(|source| ConfigError::Constraint { name, source })
}
