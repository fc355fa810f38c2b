use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::constraint::Positive;

use super::{ConfigError, positive};

/// Names of the supported beam profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ProfileKind {
    /// Laterally infinite beam.
    OneD,
    /// Uniform disk of radius `R`.
    FlatTop,
    /// Gaussian with 1/e irradiance radius `R`.
    Gaussian,
}

impl ProfileKind {
    /// Canonical configuration name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::OneD => "1d",
            Self::FlatTop => "flattop",
            Self::Gaussian => "gaussian",
        }
    }
}

impl fmt::Display for ProfileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parses a profile name, ignoring case and whitespace.
impl FromStr for ProfileKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();
        match key.as_str() {
            "1d" | "oned" | "infinite" => Ok(Self::OneD),
            "flattop" | "flat-top" | "flat_top" => Ok(Self::FlatTop),
            "gaussian" => Ok(Self::Gaussian),
            _ => Err(ConfigError::UnknownProfile {
                name: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for ProfileKind {
    type Error = ConfigError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ProfileKind> for String {
    fn from(kind: ProfileKind) -> Self {
        kind.name().to_string()
    }
}

/// Lateral irradiance profile of the incident beam.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BeamSpec", into = "BeamSpec")]
pub enum BeamProfile {
    /// Laterally infinite beam; no radial dependence.
    #[default]
    OneD,
    /// Uniform disk of radius `radius` (cm).
    FlatTop { radius: Positive },
    /// `E0 * exp(-r^2 / radius^2)`, with `radius` in cm.
    Gaussian { radius: Positive },
}

/// Unvalidated beam description, as read from a configuration file.
///
/// Resolution rules:
/// - no profile and no radius or diameter: [`BeamProfile::OneD`];
/// - a radius or diameter without a profile: [`BeamProfile::FlatTop`];
/// - a finite-aperture profile needs exactly one of radius and diameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BeamSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<ProfileKind>,
    /// Radius `R`, cm.
    #[serde(default, rename = "R", alias = "radius", skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    /// Diameter `D = 2R`, cm.
    #[serde(default, rename = "D", alias = "diameter", skip_serializing_if = "Option::is_none")]
    pub diameter: Option<f64>,
}

impl BeamProfile {
    /// Creates a flat-top profile of radius `radius` (cm).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Constraint`] if the radius is not positive.
    pub fn flat_top(radius: f64) -> Result<Self, ConfigError> {
        Ok(Self::FlatTop {
            radius: positive("beam radius R", radius)?,
        })
    }

    /// Creates a Gaussian profile with 1/e radius `radius` (cm).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Constraint`] if the radius is not positive.
    pub fn gaussian(radius: f64) -> Result<Self, ConfigError> {
        Ok(Self::Gaussian {
            radius: positive("beam radius R", radius)?,
        })
    }

    #[must_use]
    pub fn kind(&self) -> ProfileKind {
        match self {
            Self::OneD => ProfileKind::OneD,
            Self::FlatTop { .. } => ProfileKind::FlatTop,
            Self::Gaussian { .. } => ProfileKind::Gaussian,
        }
    }

    /// Beam radius in cm, if the profile has one.
    #[must_use]
    pub fn radius(&self) -> Option<f64> {
        match self {
            Self::OneD => None,
            Self::FlatTop { radius } | Self::Gaussian { radius } => Some(radius.into_inner()),
        }
    }
}

impl TryFrom<BeamSpec> for BeamProfile {
    type Error = ConfigError;

    fn try_from(spec: BeamSpec) -> Result<Self, Self::Error> {
        let radius = match (spec.radius, spec.diameter) {
            (Some(_), Some(_)) => return Err(ConfigError::AmbiguousRadius),
            (Some(radius), None) => Some(radius),
            (None, Some(diameter)) => {
                Some(positive("beam diameter D", diameter)?.into_inner() / 2.0)
            }
            (None, None) => None,
        };

        let kind = match (spec.profile, radius) {
            (Some(kind), _) => kind,
            (None, Some(_)) => ProfileKind::FlatTop,
            (None, None) => ProfileKind::OneD,
        };

        match (kind, radius) {
            (ProfileKind::OneD, _) => Ok(Self::OneD),
            (profile, None) => Err(ConfigError::MissingRadius { profile }),
            (ProfileKind::FlatTop, Some(radius)) => Self::flat_top(radius),
            (ProfileKind::Gaussian, Some(radius)) => Self::gaussian(radius),
        }
    }
}

impl From<BeamProfile> for BeamSpec {
    fn from(profile: BeamProfile) -> Self {
        Self {
            profile: Some(profile.kind()),
            radius: profile.radius(),
            diameter: None,
        }
    }
}
