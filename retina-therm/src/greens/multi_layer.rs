use tracing::debug;

use crate::config::{
    BeamProfile, ConfigError, EvaluationPolicy, Layer, ModelConfig, ThermalProperties, positive,
};

use super::{GreensFunction, LayerGreensFunction};

/// Superposition of layer kernels with Beer-Lambert attenuation.
///
/// Layers are ordered by depth. Layer `i` sees the irradiance
/// `E0 exp(-sum_{j<i} mua_j d_j)` left over by the layers in front of it.
#[derive(Debug, Clone)]
pub struct MultiLayerGreensFunction {
    layers: Vec<LayerGreensFunction>,
    with_units: bool,
}

impl MultiLayerGreensFunction {
    /// Creates the kernel of a layer stack.
    ///
    /// The layers may be given in any order; they are sorted by `z0`.
    ///
    /// # Errors
    ///
    /// Returns an error if the stack is empty or overlapping, `e0` is not
    /// positive, or the policy is inconsistent.
    pub fn new(
        layers: &[Layer],
        thermal: &ThermalProperties,
        beam: &BeamProfile,
        e0: f64,
        policy: &EvaluationPolicy,
    ) -> Result<Self, ConfigError> {
        let e0 = positive("irradiance E0", e0)?.into_inner();
        let mode = policy.mode()?;
        let stack = sorted_stack(layers)?;

        let mut optical_depth = 0.0_f64;
        let kernels = stack
            .iter()
            .map(|layer| {
                let irradiance = e0 * (-optical_depth).exp();
                optical_depth += layer.optical_depth();
                LayerGreensFunction::with_irradiance(
                    layer,
                    thermal,
                    beam,
                    irradiance,
                    mode,
                    policy.with_units,
                )
            })
            .collect();

        debug!(layers = stack.len(), ?mode, profile = %beam.kind(), "built multi-layer kernel");

        Ok(Self {
            layers: kernels,
            with_units: policy.with_units,
        })
    }

    /// Creates the kernel described by a loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be resolved to an irradiance or
    /// the layer stack is invalid.
    pub fn from_config(config: &ModelConfig) -> Result<Self, ConfigError> {
        let e0 = config.source.irradiance(&config.beam)?;
        Self::new(
            &config.layers,
            &config.thermal,
            &config.beam,
            e0.into_inner(),
            &config.policy,
        )
    }

    /// Per-layer kernels, front to back.
    #[must_use]
    pub fn layers(&self) -> &[LayerGreensFunction] {
        &self.layers
    }
}

impl GreensFunction for MultiLayerGreensFunction {
    fn rate(&self, z: f64, r: f64, t: f64) -> f64 {
        self.layers.iter().map(|layer| layer.rate(z, r, t)).sum()
    }

    fn with_units(&self) -> bool {
        self.with_units
    }
}

/// Sorts a copy of `layers` by `z0` and checks that no two overlap.
fn sorted_stack(layers: &[Layer]) -> Result<Vec<Layer>, ConfigError> {
    if layers.is_empty() {
        return Err(ConfigError::NoLayers);
    }

    let mut stack = layers.to_vec();
    stack.sort_by(|a, b| a.z0().total_cmp(&b.z0()));

    for (index, pair) in stack.windows(2).enumerate() {
        let (layer, next) = (&pair[0], &pair[1]);
        if layer.end() > next.z0() {
            return Err(ConfigError::OverlappingLayers {
                index,
                end: layer.end(),
                next: index + 1,
                next_start: next.z0(),
            });
        }
    }

    Ok(stack)
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::config::Source;

    fn unit_thermal() -> ThermalProperties {
        ThermalProperties::new(1.0, 1.0, 1.0).unwrap()
    }

    #[test]
    fn kernels_can_be_shared_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<LayerGreensFunction>();
        assert_send_sync::<MultiLayerGreensFunction>();
    }

    #[test]
    fn single_layer_matches_layer_kernel() {
        let layer = Layer::new(1.0, 1.0, 0.0).unwrap();
        let policy = EvaluationPolicy::default();

        for beam in [BeamProfile::OneD, BeamProfile::flat_top(1.0).unwrap()] {
            let single =
                LayerGreensFunction::new(&layer, &unit_thermal(), &beam, 1.0, &policy).unwrap();
            let multi =
                MultiLayerGreensFunction::new(&[layer], &unit_thermal(), &beam, 1.0, &policy)
                    .unwrap();

            for (z, r, t) in [(0.0, 0.0, 0.0), (1.0, 0.0, 0.0), (1.0, 0.0, 1.0), (0.5, 0.3, 0.2)] {
                assert_eq!(multi.rate(z, r, t), single.rate(z, r, t));
            }
        }
    }

    #[test]
    fn overlapping_layers_are_rejected() {
        let layers = [
            Layer::new(1.0, 1.0, 0.0).unwrap(),
            Layer::new(1.0, 1.0, 0.5).unwrap(),
        ];
        let result = MultiLayerGreensFunction::new(
            &layers,
            &unit_thermal(),
            &BeamProfile::OneD,
            1.0,
            &EvaluationPolicy::default(),
        );
        assert!(matches!(
            result,
            Err(ConfigError::OverlappingLayers {
                index: 0,
                next: 1,
                ..
            })
        ));
    }

    #[test]
    fn touching_layers_are_allowed() {
        let layers = [
            Layer::new(1.0, 1.0, 1.0).unwrap(),
            Layer::new(1.0, 2.0, 0.0).unwrap(),
        ];
        let g = MultiLayerGreensFunction::new(
            &layers,
            &unit_thermal(),
            &BeamProfile::OneD,
            1.0,
            &EvaluationPolicy::default(),
        )
        .unwrap();

        // Sorted front to back.
        assert_relative_eq!(g.layers()[0].layer().z0(), 0.0);
        assert_relative_eq!(g.layers()[1].layer().z0(), 1.0);
    }

    #[test]
    fn empty_stack_is_rejected() {
        let result = MultiLayerGreensFunction::new(
            &[],
            &unit_thermal(),
            &BeamProfile::OneD,
            1.0,
            &EvaluationPolicy::default(),
        );
        assert!(matches!(result, Err(ConfigError::NoLayers)));
    }

    #[test]
    fn deeper_layers_see_attenuated_irradiance() {
        let layers = [
            Layer::new(0.5, 2.0, 0.0).unwrap(),
            Layer::new(1.0, 3.0, 0.5).unwrap(),
            Layer::new(1.0, 1.0, 2.0).unwrap(),
        ];
        let g = MultiLayerGreensFunction::new(
            &layers,
            &unit_thermal(),
            &BeamProfile::OneD,
            2.0,
            &EvaluationPolicy::default(),
        )
        .unwrap();

        let irradiance: Vec<f64> = g.layers().iter().map(LayerGreensFunction::irradiance).collect();
        assert_relative_eq!(irradiance[0], 2.0);
        assert_relative_eq!(irradiance[1], 2.0 * (-1.0f64).exp());
        assert_relative_eq!(irradiance[2], 2.0 * (-4.0f64).exp());

        // Onset inside the second layer comes from that layer alone.
        let second = &g.layers()[1];
        assert_relative_eq!(g.rate(1.0, 0.0, 0.0), 2.0 * second.amplitude() * (-1.5f64).exp());
    }

    #[test]
    fn sum_of_layers_at_later_times() {
        let layers = [
            Layer::new(0.5, 2.0, 0.0).unwrap(),
            Layer::new(1.0, 3.0, 0.5).unwrap(),
        ];
        let g = MultiLayerGreensFunction::new(
            &layers,
            &unit_thermal(),
            &BeamProfile::gaussian(0.8).unwrap(),
            1.0,
            &EvaluationPolicy::default(),
        )
        .unwrap();

        let expected: f64 = g.layers().iter().map(|layer| layer.rate(0.7, 0.1, 0.05)).sum();
        assert_relative_eq!(g.rate(0.7, 0.1, 0.05), expected);
        assert!(g.rate(0.7, 0.1, 0.05) > 0.0);
    }

    #[test]
    fn built_from_config() {
        let config = ModelConfig {
            thermal: unit_thermal(),
            layers: vec![Layer::new(1.0, 1.0, 0.0).unwrap()],
            beam: BeamProfile::flat_top(1.0).unwrap(),
            source: Source::Irradiance { e0: 1.0 },
            policy: EvaluationPolicy::default(),
        };
        let g = MultiLayerGreensFunction::from_config(&config).unwrap();
        assert_relative_eq!(g.rate(0.0, 0.0, 0.0), 0.5);

        let config = ModelConfig {
            beam: BeamProfile::OneD,
            source: Source::Power { power: 1.0 },
            ..config
        };
        assert!(matches!(
            MultiLayerGreensFunction::from_config(&config),
            Err(ConfigError::MissingRadius { .. })
        ));
    }
}
