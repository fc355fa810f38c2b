use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, non_negative};

/// Time profile of the laser exposure.
///
/// All times are in seconds. A continuous-wave exposure may last forever
/// (`duration = f64::INFINITY`); a pulse train is always finite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ExposureSpec", into = "ExposureSpec")]
pub enum Exposure {
    /// Constant irradiance over `[start, start + duration]`.
    ContinuousWave { start: f64, duration: f64 },
    /// Pulses of width `pulse_duration` every `pulse_period`, starting at
    /// `start` and stopping at `start + duration`.
    Pulsed {
        start: f64,
        duration: f64,
        pulse_duration: f64,
        pulse_period: f64,
    },
}

/// Unvalidated exposure parameters, as read from a configuration file.
///
/// Without a `pulse_period` the exposure is continuous-wave. A lone
/// `pulse_duration` stands for a single pulse of that width.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ExposureSpec {
    #[serde(default)]
    pub start: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pulse_duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pulse_period: Option<f64>,
}

/// One rectangular pulse of the envelope.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pulse {
    /// Onset time, s.
    pub arrival: f64,
    /// Width, s; infinite for an unending exposure.
    pub width: f64,
}

impl Exposure {
    /// Continuous-wave exposure switched on at `start`.
    ///
    /// # Errors
    ///
    /// Returns an error if `start` is negative or not finite, or if
    /// `duration` is not positive.
    pub fn continuous_wave(start: f64, duration: f64) -> Result<Self, ConfigError> {
        let start = non_negative("exposure start", start)?.into_inner();
        if duration.is_nan() || duration <= 0.0 {
            return Err(ConfigError::InvalidExposure {
                reason: "duration must be positive",
            });
        }
        Ok(Self::ContinuousWave { start, duration })
    }

    /// Regular pulse train.
    ///
    /// # Errors
    ///
    /// Returns an error if any time is out of range, or if the period is
    /// shorter than a pulse.
    pub fn pulsed(
        start: f64,
        duration: f64,
        pulse_duration: f64,
        pulse_period: f64,
    ) -> Result<Self, ConfigError> {
        let start = non_negative("exposure start", start)?.into_inner();
        for value in [duration, pulse_duration, pulse_period] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidExposure {
                    reason: "pulse train times must be finite and positive",
                });
            }
        }
        if pulse_period < pulse_duration {
            return Err(ConfigError::InvalidExposure {
                reason: "pulse_period is shorter than pulse_duration",
            });
        }
        Ok(Self::Pulsed {
            start,
            duration,
            pulse_duration,
            pulse_period,
        })
    }

    /// Onset of the first pulse, s.
    #[must_use]
    pub fn start(&self) -> f64 {
        match *self {
            Self::ContinuousWave { start, .. } | Self::Pulsed { start, .. } => start,
        }
    }

    /// The rectangular pulses making up the envelope, in arrival order.
    ///
    /// The last pulse of a train is cut short at `start + duration`.
    #[must_use]
    pub fn pulses(&self) -> Vec<Pulse> {
        match *self {
            Self::ContinuousWave { start, duration } => vec![Pulse {
                arrival: start,
                width: duration,
            }],
            Self::Pulsed {
                start,
                duration,
                pulse_duration,
                pulse_period,
            } => {
                let end = start + duration;
                (0u32..)
                    .map(|k| start + f64::from(k) * pulse_period)
                    .take_while(|&arrival| arrival < end)
                    .map(|arrival| Pulse {
                        arrival,
                        width: pulse_duration.min(end - arrival),
                    })
                    .collect()
            }
        }
    }
}

impl TryFrom<ExposureSpec> for Exposure {
    type Error = ConfigError;

    fn try_from(spec: ExposureSpec) -> Result<Self, Self::Error> {
        match (spec.pulse_duration, spec.pulse_period) {
            (None, None) => {
                Self::continuous_wave(spec.start, spec.duration.unwrap_or(f64::INFINITY))
            }
            (Some(pulse_duration), None) => Self::continuous_wave(spec.start, pulse_duration),
            (pulse_duration, Some(pulse_period)) => {
                let duration = spec.duration.ok_or(ConfigError::InvalidExposure {
                    reason: "a pulse train needs a total duration",
                })?;
                let pulse_duration = pulse_duration.ok_or(ConfigError::InvalidExposure {
                    reason: "a pulse train needs a pulse_duration",
                })?;
                Self::pulsed(spec.start, duration, pulse_duration, pulse_period)
            }
        }
    }
}

impl From<Exposure> for ExposureSpec {
    fn from(exposure: Exposure) -> Self {
        match exposure {
            Exposure::ContinuousWave { start, duration } => Self {
                start,
                duration: duration.is_finite().then_some(duration),
                ..Self::default()
            },
            Exposure::Pulsed {
                start,
                duration,
                pulse_duration,
                pulse_period,
            } => Self {
                start,
                duration: Some(duration),
                pulse_duration: Some(pulse_duration),
                pulse_period: Some(pulse_period),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn continuous_wave_is_one_pulse() {
        let exposure = Exposure::continuous_wave(0.5, f64::INFINITY).unwrap();
        assert_eq!(
            exposure.pulses(),
            vec![Pulse {
                arrival: 0.5,
                width: f64::INFINITY
            }]
        );
    }

    #[test]
    fn pulse_train_is_cut_at_the_end() {
        let exposure = Exposure::pulsed(1.0, 0.25, 0.04, 0.1).unwrap();
        let pulses = exposure.pulses();

        assert_eq!(pulses.len(), 3);
        assert_relative_eq!(pulses[1].arrival, 1.1);
        assert_relative_eq!(pulses[1].width, 0.04);
        assert_relative_eq!(pulses[2].arrival, 1.2);
        assert_relative_eq!(pulses[2].width, 0.04);

        let exposure = Exposure::pulsed(0.0, 0.22, 0.04, 0.1).unwrap();
        let last = exposure.pulses()[2];
        assert_relative_eq!(last.width, 0.02, epsilon = 1e-15);
    }

    #[test]
    fn rejects_invalid_envelopes() {
        assert!(Exposure::continuous_wave(-1.0, 1.0).is_err());
        assert!(Exposure::continuous_wave(0.0, 0.0).is_err());
        assert!(Exposure::continuous_wave(0.0, f64::NAN).is_err());
        assert!(Exposure::pulsed(0.0, f64::INFINITY, 0.1, 1.0).is_err());
        assert!(matches!(
            Exposure::pulsed(0.0, 1.0, 0.2, 0.1),
            Err(ConfigError::InvalidExposure { .. })
        ));
    }

    #[test]
    fn deserializes_each_form() {
        let cw: Exposure = serde_json::from_str("{}").unwrap();
        assert_eq!(cw, Exposure::continuous_wave(0.0, f64::INFINITY).unwrap());

        let single: Exposure = serde_json::from_str(r#"{ "pulse_duration": 1e-3 }"#).unwrap();
        assert_eq!(single, Exposure::continuous_wave(0.0, 1e-3).unwrap());

        let train: Exposure = serde_json::from_str(
            r#"{ "start": 0.1, "duration": 1.0, "pulse_duration": 1e-3, "pulse_period": 0.1 }"#,
        )
        .unwrap();
        assert_eq!(train, Exposure::pulsed(0.1, 1.0, 1e-3, 0.1).unwrap());

        assert!(serde_json::from_str::<Exposure>(r#"{ "pulse_period": 0.1 }"#).is_err());
    }
}
