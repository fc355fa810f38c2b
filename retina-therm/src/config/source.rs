use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::constraint::Positive;

use super::{BeamProfile, ConfigError, positive};

/// How the incident irradiance `E0` is specified.
///
/// Power-based forms spread the power over `pi R^2` using the beam radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    /// Irradiance `E0`, W/cm^2.
    Irradiance { e0: f64 },
    /// Beam power `Phi`, W.
    Power { power: f64 },
    /// Radiant exposure `H` (J/cm^2) delivered over `duration` (s).
    RadiantExposure { exposure: f64, duration: f64 },
    /// Pulse energy `Q` (J) delivered over `duration` (s).
    PulseEnergy { energy: f64, duration: f64 },
}

impl Source {
    /// Resolves the irradiance `E0` in W/cm^2.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Constraint`] for non-positive inputs, or
    /// [`ConfigError::MissingRadius`] if a power-based source is paired with
    /// a beam that has no radius.
    pub fn irradiance(&self, beam: &BeamProfile) -> Result<Positive, ConfigError> {
        let area = || {
            beam.radius()
                .map(|r| PI * r * r)
                .ok_or(ConfigError::MissingRadius {
                    profile: beam.kind(),
                })
        };

        match *self {
            Self::Irradiance { e0 } => positive("irradiance E0", e0),
            Self::Power { power } => {
                let power = positive("power Phi", power)?.into_inner();
                positive("irradiance E0", power / area()?)
            }
            Self::RadiantExposure { exposure, duration } => {
                let exposure = positive("radiant exposure H", exposure)?.into_inner();
                let duration = positive("exposure duration", duration)?.into_inner();
                positive("irradiance E0", exposure / duration)
            }
            Self::PulseEnergy { energy, duration } => {
                let energy = positive("pulse energy Q", energy)?.into_inner();
                let duration = positive("exposure duration", duration)?.into_inner();
                positive("irradiance E0", energy / duration / area()?)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn irradiance_from_each_form() {
        let beam = BeamProfile::flat_top(0.1).unwrap();
        let area = PI * 0.01;

        let e0 = Source::Irradiance { e0: 2.0 }.irradiance(&beam).unwrap();
        assert_relative_eq!(e0.into_inner(), 2.0);

        let e0 = Source::Power { power: 1e-3 }.irradiance(&beam).unwrap();
        assert_relative_eq!(e0.into_inner(), 1e-3 / area);

        let e0 = Source::RadiantExposure {
            exposure: 5.0,
            duration: 0.25,
        }
        .irradiance(&beam)
        .unwrap();
        assert_relative_eq!(e0.into_inner(), 20.0);

        let e0 = Source::PulseEnergy {
            energy: 1e-6,
            duration: 1e-3,
        }
        .irradiance(&beam)
        .unwrap();
        assert_relative_eq!(e0.into_inner(), 1e-3 / area);
    }

    #[test]
    fn power_needs_a_beam_radius() {
        let result = Source::Power { power: 1.0 }.irradiance(&BeamProfile::OneD);
        assert!(matches!(result, Err(ConfigError::MissingRadius { .. })));
    }

    #[test]
    fn deserializes_tagged_forms() {
        let source: Source = serde_json::from_str(r#"{"power": {"power": 0.5}}"#).unwrap();
        assert_eq!(source, Source::Power { power: 0.5 });
    }
}
