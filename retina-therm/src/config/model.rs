use serde::{Deserialize, Serialize};

use super::{BeamProfile, EvaluationPolicy, Layer, Source, ThermalProperties};

/// Everything needed to build a multi-layer kernel.
///
/// This is the bundle an external loader hands over after resolving units
/// and expanding batch parameters. Each field validates itself on
/// deserialization; the layer stack is checked when the kernel is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub thermal: ThermalProperties,
    pub layers: Vec<Layer>,
    #[serde(default)]
    pub beam: BeamProfile,
    pub source: Source,
    #[serde(default)]
    pub policy: EvaluationPolicy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_with_defaults() {
        let json = r#"{
            "thermal": { "rho": 1.0, "c": 4.1868, "k": 0.00628 },
            "layers": [{ "d": 0.0012, "mua": 1200.0 }],
            "source": { "irradiance": { "e0": 1.0 } }
        }"#;
        let config: ModelConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.beam, BeamProfile::OneD);
        assert_eq!(config.policy, EvaluationPolicy::default());
        assert_eq!(config.layers.len(), 1);
        assert_eq!(
            config.source.irradiance(&config.beam).map(|e0| e0.into_inner()),
            Ok(1.0)
        );
    }

    #[test]
    fn radius_without_profile_is_flat_top() {
        let json = r#"{
            "thermal": { "rho": 1.0, "c": 1.0, "k": 1.0 },
            "layers": [{ "d": 1.0, "mua": 1.0, "z0": 0.5 }],
            "beam": { "D": 0.02 },
            "source": { "power": { "power": 1e-3 } },
            "policy": { "use_approximate": true }
        }"#;
        let config: ModelConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.beam, BeamProfile::flat_top(0.01).unwrap());
        assert_eq!(config.policy, EvaluationPolicy::approximate());
        assert_eq!(config.layers[0].z0(), 0.5);
    }

    #[test]
    fn invalid_fields_fail_to_load() {
        let json = r#"{
            "thermal": { "rho": 1.0, "c": 1.0, "k": 1.0 },
            "layers": [{ "d": 1.0, "mua": 1.0 }],
            "beam": { "profile": "gaussian" },
            "source": { "irradiance": { "e0": 1.0 } }
        }"#;
        let err = serde_json::from_str::<ModelConfig>(json).unwrap_err();
        assert!(err.to_string().contains("gaussian beam requires a radius"));
    }
}
