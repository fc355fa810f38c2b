//! Laser-induced temperature rise in layered retinal tissue.
//!
//! The crate turns a description of absorbing layers, bulk thermal
//! properties and an incident beam into closed-form heating-rate kernels,
//! integrates them against an exposure envelope, and superposes the
//! resulting temperature histories for repetitive exposures.
//!
//! ```no_run
//! use retina_therm::{
//!     config::{BeamProfile, EvaluationPolicy, Layer, ThermalProperties},
//!     exposure::{Exposure, ExposureIntegrator, IntegrationMethod},
//!     greens::MultiLayerGreensFunction,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let kernel = MultiLayerGreensFunction::new(
//!     &[Layer::new(12e-4, 1200.0, 0.0)?],
//!     &ThermalProperties::new(1.0, 4.1868, 0.00628)?,
//!     &BeamProfile::flat_top(50e-4)?,
//!     1.0,
//!     &EvaluationPolicy::approximate(),
//! )?;
//! let exposure = Exposure::continuous_wave(0.0, 0.1)?;
//! let rise = ExposureIntegrator::new(kernel, exposure).temperature_rise_unobserved(
//!     0.0,
//!     0.0,
//!     &[0.01, 0.1, 1.0],
//!     IntegrationMethod::Quad,
//! )?;
//! assert_eq!(rise.len(), 3);
//! # Ok(())
//! # }
//! ```
//!
//! Plain-`f64` APIs use cm, s, g, J, W and K throughout.

mod interpolation;

pub mod config;
pub mod constraint;
pub mod exposure;
pub mod greens;
pub mod history;
pub mod microcavitation;
pub mod progress;
pub mod relaxation;
pub mod units;

pub use interpolation::InterpError;
