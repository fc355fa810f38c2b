use serde::{Deserialize, Serialize};

use crate::constraint::Positive;

use super::{ConfigError, positive};

/// Bulk thermal properties shared by every layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ThermalSpec", into = "ThermalSpec")]
pub struct ThermalProperties {
    rho: Positive,
    c: Positive,
    k: Positive,
}

/// Unvalidated thermal properties, as read from a configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThermalSpec {
    /// Density, g/cm^3.
    pub rho: f64,
    /// Specific heat, J/(g K).
    pub c: f64,
    /// Thermal conductivity, W/(cm K).
    pub k: f64,
}

impl ThermalProperties {
    /// Creates thermal properties from density, specific heat and conductivity.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Constraint`] if any property is not positive.
    pub fn new(rho: f64, c: f64, k: f64) -> Result<Self, ConfigError> {
        Ok(Self {
            rho: positive("density rho", rho)?,
            c: positive("specific heat c", c)?,
            k: positive("conductivity k", k)?,
        })
    }

    /// Density, g/cm^3.
    #[must_use]
    pub fn rho(&self) -> f64 {
        self.rho.into_inner()
    }

    /// Specific heat, J/(g K).
    #[must_use]
    pub fn c(&self) -> f64 {
        self.c.into_inner()
    }

    /// Thermal conductivity, W/(cm K).
    #[must_use]
    pub fn k(&self) -> f64 {
        self.k.into_inner()
    }

    /// Volumetric heat capacity `rho * c`, J/(cm^3 K).
    #[must_use]
    pub fn heat_capacity(&self) -> f64 {
        self.rho() * self.c()
    }

    /// Thermal diffusivity `k / (rho * c)`, cm^2/s.
    #[must_use]
    pub fn alpha(&self) -> f64 {
        self.k() / self.heat_capacity()
    }
}

impl TryFrom<ThermalSpec> for ThermalProperties {
    type Error = ConfigError;

    fn try_from(spec: ThermalSpec) -> Result<Self, Self::Error> {
        Self::new(spec.rho, spec.c, spec.k)
    }
}

impl From<ThermalProperties> for ThermalSpec {
    fn from(props: ThermalProperties) -> Self {
        Self {
            rho: props.rho(),
            c: props.c(),
            k: props.k(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn diffusivity_is_derived() {
        let props = ThermalProperties::new(2.0, 3.0, 12.0).unwrap();
        assert_relative_eq!(props.heat_capacity(), 6.0);
        assert_relative_eq!(props.alpha(), 2.0);
    }

    #[test]
    fn rejects_non_positive_properties() {
        assert!(ThermalProperties::new(0.0, 1.0, 1.0).is_err());
        assert!(ThermalProperties::new(1.0, f64::NAN, 1.0).is_err());
        assert!(ThermalProperties::new(1.0, 1.0, -1.0).is_err());
    }

    #[test]
    fn serde_round_trip_preserves_values() {
        let props = ThermalProperties::new(1.0, 4.1868, 0.006_305).unwrap();
        let json = serde_json::to_string(&props).unwrap();
        let back: ThermalProperties = serde_json::from_str(&json).unwrap();
        assert_eq!(back, props);
    }
}
