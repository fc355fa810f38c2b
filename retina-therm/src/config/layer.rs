use serde::{Deserialize, Serialize};

use crate::constraint::{NonNegativeF64, Positive};

use super::{ConfigError, non_negative, positive};

/// A single absorbing layer occupying `[z0, z0 + d)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LayerSpec", into = "LayerSpec")]
pub struct Layer {
    d: Positive,
    mua: Positive,
    z0: NonNegativeF64,
}

/// Unvalidated layer parameters, as read from a configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    /// Thickness, cm.
    pub d: f64,
    /// Absorption coefficient, 1/cm.
    pub mua: f64,
    /// Depth of the front face, cm.
    #[serde(default)]
    pub z0: f64,
}

impl Layer {
    /// Creates a layer of thickness `d` (cm) and absorption coefficient
    /// `mua` (1/cm) whose front face sits at depth `z0` (cm).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Constraint`] if `d` or `mua` is not positive, or
    /// if `z0` is negative.
    pub fn new(d: f64, mua: f64, z0: f64) -> Result<Self, ConfigError> {
        Ok(Self {
            d: positive("layer thickness d", d)?,
            mua: positive("absorption coefficient mua", mua)?,
            z0: non_negative("layer start z0", z0)?,
        })
    }

    /// Thickness, cm.
    #[must_use]
    pub fn d(&self) -> f64 {
        self.d.into_inner()
    }

    /// Absorption coefficient, 1/cm.
    #[must_use]
    pub fn mua(&self) -> f64 {
        self.mua.into_inner()
    }

    /// Depth of the front face, cm.
    #[must_use]
    pub fn z0(&self) -> f64 {
        self.z0.into_inner()
    }

    /// Depth of the back face, cm.
    #[must_use]
    pub fn end(&self) -> f64 {
        self.z0() + self.d()
    }

    /// Optical depth `mua * d` of the whole layer.
    #[must_use]
    pub fn optical_depth(&self) -> f64 {
        self.mua() * self.d()
    }
}

impl TryFrom<LayerSpec> for Layer {
    type Error = ConfigError;

    fn try_from(spec: LayerSpec) -> Result<Self, Self::Error> {
        Self::new(spec.d, spec.mua, spec.z0)
    }
}

impl From<Layer> for LayerSpec {
    fn from(layer: Layer) -> Self {
        Self {
            d: layer.d(),
            mua: layer.mua(),
            z0: layer.z0(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::constraint::ConstraintError;

    #[test]
    fn derived_geometry() {
        let layer = Layer::new(1e-3, 300.0, 2e-3).unwrap();
        assert_relative_eq!(layer.end(), 3e-3);
        assert_relative_eq!(layer.optical_depth(), 0.3);
    }

    #[test]
    fn rejects_invalid_parameters() {
        assert!(matches!(
            Layer::new(0.0, 1.0, 0.0),
            Err(ConfigError::Constraint {
                source: ConstraintError::Zero,
                ..
            })
        ));
        assert!(matches!(
            Layer::new(1.0, -1.0, 0.0),
            Err(ConfigError::Constraint {
                source: ConstraintError::Negative,
                ..
            })
        ));
        assert!(Layer::new(1.0, 1.0, -0.1).is_err());
    }

    #[test]
    fn deserializes_through_validation() {
        let layer: Layer = serde_json::from_str(r#"{"d": 0.001, "mua": 310}"#).unwrap();
        assert_relative_eq!(layer.z0(), 0.0);
        assert_relative_eq!(layer.mua(), 310.0);

        let err = serde_json::from_str::<Layer>(r#"{"d": -1, "mua": 310}"#);
        assert!(err.is_err());
    }
}
