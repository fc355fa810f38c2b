use retina_therm_special::marcum_q::MarcumQFunction;

use crate::config::{
    BeamProfile, ConfigError, EvaluationPolicy, Layer, PrecisionMode, ThermalProperties, positive,
};

use super::{GreensFunction, axial::AxialTerm, radial};

/// Kernel of a single absorbing layer under one beam profile.
///
/// The kernel is the product of the axial term, which depends only on depth
/// and time, and the profile's radial factor.
#[derive(Debug, Clone, Copy)]
pub struct LayerGreensFunction {
    layer: Layer,
    irradiance: f64,
    axial: AxialTerm,
    alpha: f64,
    profile: BeamProfile,
    mode: PrecisionMode,
    with_units: bool,
    marcum: MarcumQFunction,
}

impl LayerGreensFunction {
    /// Creates the kernel of `layer` for irradiance `e0` (W/cm^2) reaching its
    /// front face.
    ///
    /// # Errors
    ///
    /// Returns an error if `e0` is not positive or the policy asks for
    /// conflicting precision modes.
    pub fn new(
        layer: &Layer,
        thermal: &ThermalProperties,
        beam: &BeamProfile,
        e0: f64,
        policy: &EvaluationPolicy,
    ) -> Result<Self, ConfigError> {
        let e0 = positive("irradiance E0", e0)?.into_inner();
        Ok(Self::with_irradiance(layer, thermal, beam, e0, policy.mode()?, policy.with_units))
    }

    /// Creates a kernel from already validated parts. `e0` may be zero when
    /// the layer sits behind optically thick layers.
    pub(super) fn with_irradiance(
        layer: &Layer,
        thermal: &ThermalProperties,
        beam: &BeamProfile,
        e0: f64,
        mode: PrecisionMode,
        with_units: bool,
    ) -> Self {
        Self {
            layer: *layer,
            irradiance: e0,
            axial: AxialTerm::new(layer, thermal, e0),
            alpha: thermal.alpha(),
            profile: *beam,
            mode,
            with_units,
            marcum: MarcumQFunction::new(),
        }
    }

    #[must_use]
    pub fn layer(&self) -> &Layer {
        &self.layer
    }

    /// Irradiance reaching the front face, W/cm^2.
    #[must_use]
    pub fn irradiance(&self) -> f64 {
        self.irradiance
    }

    #[must_use]
    pub fn profile(&self) -> &BeamProfile {
        &self.profile
    }

    #[must_use]
    pub fn mode(&self) -> PrecisionMode {
        self.mode
    }

    /// Peak heating rate `mua E0 / (2 rho c)` on the front face at onset, K/s.
    #[must_use]
    pub fn amplitude(&self) -> f64 {
        self.axial.amplitude()
    }
}

impl GreensFunction for LayerGreensFunction {
    fn rate(&self, z: f64, r: f64, t: f64) -> f64 {
        if t < 0.0 {
            return 0.0;
        }
        let axial = self.axial.evaluate(z, t, self.mode);
        if axial == 0.0 {
            return 0.0;
        }
        axial * radial::factor(&self.profile, r, t, self.alpha, &self.marcum)
    }

    fn with_units(&self) -> bool {
        self.with_units
    }
}
