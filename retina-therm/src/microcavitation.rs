//! Microcavitation thresholds for trains of short pulses.
//!
//! The fluence needed to nucleate a bubble falls linearly as the local
//! temperature approaches the nucleation temperature, `H = m (T - Tnuc)`
//! with `m < 0`. Pulse `n` of a train at repetition rate `f` starts from
//! `T0 + H R(n-1)`, where
//!
//! ```text
//! R(k) = sum_{j=1..k} G(z, r, j / f)
//! ```
//!
//! is the heating left by the `k` earlier pulses, per unit fluence, for a
//! kernel evaluated at unit irradiance. Solving for `H`:
//!
//! ```text
//! H(n) = m (T0 - Tnuc) / (1 - m R(n-1))
//! ```

use ndarray::Array1;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::{
    config::{ConfigError, ModelConfig, positive},
    greens::{GreensFunction, MultiLayerGreensFunction},
};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MicrocavitationError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("nucleation temperature {nucleation} K must exceed the baseline {baseline} K")]
    NucleationBelowBaseline { baseline: f64, nucleation: f64 },

    #[error("threshold slope must be finite and negative, got {value} J/(cm^2 K)")]
    InvalidSlope { value: f64 },

    #[error("kernel returned {value} at t = {t} s")]
    NonFiniteRate { t: f64, value: f64 },
}

/// Linear threshold-versus-temperature model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdModel {
    /// Ambient tissue temperature `T0`, K.
    #[serde(alias = "T0")]
    pub baseline: f64,
    /// Nucleation temperature `Tnuc`, K.
    #[serde(alias = "Tnuc")]
    pub nucleation: f64,
    /// Slope `m`, J/(cm^2 K).
    #[serde(alias = "m")]
    pub slope: f64,
}

/// 37 C tissue, 116 C nucleation, -1 mJ/(cm^2 K).
impl Default for ThresholdModel {
    fn default() -> Self {
        Self {
            baseline: 310.15,
            nucleation: 389.15,
            slope: -1e-3,
        }
    }
}

impl ThresholdModel {
    /// Checks `Tnuc > T0` and `m < 0`.
    ///
    /// # Errors
    ///
    /// Returns the first violated condition.
    pub fn validate(&self) -> Result<(), MicrocavitationError> {
        if !(self.slope.is_finite() && self.slope < 0.0) {
            return Err(MicrocavitationError::InvalidSlope { value: self.slope });
        }
        let ordered = self.baseline.is_finite()
            && self.nucleation.is_finite()
            && self.nucleation > self.baseline;
        if !ordered {
            return Err(MicrocavitationError::NucleationBelowBaseline {
                baseline: self.baseline,
                nucleation: self.nucleation,
            });
        }
        Ok(())
    }

    /// Threshold fluence (J/cm^2) on top of `residual` K per J/cm^2 of heating
    /// from earlier pulses.
    #[must_use]
    pub fn threshold(&self, residual: f64) -> f64 {
        self.slope * (self.baseline - self.nucleation) / (1.0 - self.slope * residual)
    }
}

/// Thresholds `H(1)..H(pulses)` in J/cm^2 at `(z, r)` for pulses repeated at
/// `repetition_rate` Hz.
///
/// `g` must be the kernel at unit irradiance, 1 W/cm^2.
///
/// # Errors
///
/// Returns an error if the rate is not positive, the model is invalid, or
/// the kernel returns a non-finite value.
pub fn thresholds(
    g: &impl GreensFunction,
    z: f64,
    r: f64,
    repetition_rate: f64,
    pulses: usize,
    model: &ThresholdModel,
) -> Result<Array1<f64>, MicrocavitationError> {
    let period = 1.0 / positive("repetition rate", repetition_rate)?.into_inner();
    model.validate()?;

    let mut residual = 0.0_f64;
    let mut thresholds = Array1::zeros(pulses);
    for (k, threshold) in thresholds.iter_mut().enumerate() {
        if k > 0 {
            #[allow(clippy::cast_precision_loss)]
            let t = k as f64 * period;
            let value = g.rate(z, r, t);
            if !value.is_finite() {
                return Err(MicrocavitationError::NonFiniteRate { t, value });
            }
            residual += value;
        }
        *threshold = model.threshold(residual);
    }

    debug!(pulses, period, residual, "microcavitation thresholds");
    Ok(thresholds)
}

/// [`thresholds`] for the stack described by `config`, with its source
/// replaced by unit irradiance.
///
/// # Errors
///
/// See [`thresholds`]. Also fails if the layer stack is invalid.
pub fn thresholds_for_config(
    config: &ModelConfig,
    z: f64,
    r: f64,
    repetition_rate: f64,
    pulses: usize,
    model: &ThresholdModel,
) -> Result<Array1<f64>, MicrocavitationError> {
    let g = MultiLayerGreensFunction::new(
        &config.layers,
        &config.thermal,
        &config.beam,
        1.0,
        &config.policy,
    )?;
    thresholds(&g, z, r, repetition_rate, pulses, model)
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    struct Decay;

    impl GreensFunction for Decay {
        fn rate(&self, _z: f64, _r: f64, t: f64) -> f64 {
            if t < 0.0 { 0.0 } else { (-t).exp() }
        }
    }

    #[test]
    fn residual_heating_lowers_later_thresholds() {
        let model = ThresholdModel::default();
        let h = thresholds(&Decay, 0.0, 0.0, 2.0, 4, &model).unwrap();

        // Single pulse: -1e-3 * (310.15 - 389.15).
        let single = 0.079;
        let residuals = [
            0.0,
            (-0.5f64).exp(),
            (-0.5f64).exp() + (-1.0f64).exp(),
            (-0.5f64).exp() + (-1.0f64).exp() + (-1.5f64).exp(),
        ];

        assert_eq!(h.len(), 4);
        for (value, residual) in h.iter().zip(residuals) {
            assert_relative_eq!(*value, single / (1.0 + 1e-3 * residual), max_relative = 1e-12);
        }
        assert!(h.windows(2).into_iter().all(|pair| pair[1] < pair[0]));
    }

    #[test]
    fn config_source_is_replaced_by_unit_irradiance() {
        let json = r#"{
            "thermal": { "rho": 1.0, "c": 1.0, "k": 1.0 },
            "layers": [{ "d": 1.0, "mua": 1.0 }],
            "source": { "irradiance": { "e0": 5.0 } }
        }"#;
        let config: ModelConfig = serde_json::from_str(json).unwrap();
        let model = ThresholdModel::default();

        let from_config = thresholds_for_config(&config, 0.5, 0.0, 10.0, 5, &model).unwrap();

        let unit = MultiLayerGreensFunction::new(
            &config.layers,
            &config.thermal,
            &config.beam,
            1.0,
            &config.policy,
        )
        .unwrap();
        let direct = thresholds(&unit, 0.5, 0.0, 10.0, 5, &model).unwrap();
        assert_eq!(from_config, direct);
    }

    #[test]
    fn rejects_bad_inputs() {
        let model = ThresholdModel::default();
        assert!(matches!(
            thresholds(&Decay, 0.0, 0.0, 0.0, 3, &model),
            Err(MicrocavitationError::Config(ConfigError::Constraint { .. }))
        ));

        let rising = ThresholdModel {
            slope: 1e-3,
            ..model
        };
        assert!(matches!(
            thresholds(&Decay, 0.0, 0.0, 1.0, 3, &rising),
            Err(MicrocavitationError::InvalidSlope { .. })
        ));

        let inverted = ThresholdModel {
            nucleation: 300.0,
            ..model
        };
        assert!(matches!(
            thresholds(&Decay, 0.0, 0.0, 1.0, 3, &inverted),
            Err(MicrocavitationError::NucleationBelowBaseline { .. })
        ));
    }

    #[test]
    fn model_reads_short_names() {
        let json = r#"{ "Tnuc": 400.0, "m": -2e-3 }"#;
        let model: ThresholdModel = serde_json::from_str(json).unwrap();
        assert_relative_eq!(model.baseline, 310.15);
        assert_relative_eq!(model.nucleation, 400.0);
        assert_relative_eq!(model.slope, -2e-3);

        let empty: ThresholdModel = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, ThresholdModel::default());
    }
}
