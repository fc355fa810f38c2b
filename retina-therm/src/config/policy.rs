use serde::{Deserialize, Serialize};

use crate::constraint::ConstraintError;

use super::ConfigError;

/// Default number of significant decimal digits for multi-precision evaluation.
pub const DEFAULT_DIGITS: u32 = 100;

/// How kernel values are computed and returned.
///
/// `use_multi_precision` and `use_approximate` select mutually exclusive
/// evaluation modes; `with_units` only changes the wrapper returned by
/// [`LayerGreensFunction::call`](crate::greens::LayerGreensFunction::call).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationPolicy {
    pub use_multi_precision: bool,
    pub use_approximate: bool,
    pub with_units: bool,
    /// Significant decimal digits used when `use_multi_precision` is set.
    pub digits: u32,
}

impl Default for EvaluationPolicy {
    fn default() -> Self {
        Self {
            use_multi_precision: false,
            use_approximate: false,
            with_units: false,
            digits: DEFAULT_DIGITS,
        }
    }
}

/// The resolved evaluation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrecisionMode {
    /// Closed form in `f64`.
    Fixed,
    /// Closed form at `digits` significant decimal digits.
    MultiPrecision { digits: u32 },
    /// Cancellation-free long-time form in `f64`.
    Approximate,
}

impl EvaluationPolicy {
    /// Policy for multi-precision evaluation at `digits` digits.
    #[must_use]
    pub fn multi_precision(digits: u32) -> Self {
        Self {
            use_multi_precision: true,
            digits,
            ..Self::default()
        }
    }

    /// Policy for the long-time approximation.
    #[must_use]
    pub fn approximate() -> Self {
        Self {
            use_approximate: true,
            ..Self::default()
        }
    }

    /// Resolves the evaluation mode.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ConflictingPrecision`] if both precision flags
    /// are set, or [`ConfigError::Constraint`] for a zero digit budget.
    pub fn mode(&self) -> Result<PrecisionMode, ConfigError> {
        match (self.use_multi_precision, self.use_approximate) {
            (true, true) => Err(ConfigError::ConflictingPrecision),
            (true, false) if self.digits == 0 => Err(ConfigError::Constraint {
                name: "digits",
                source: ConstraintError::Zero,
            }),
            (true, false) => Ok(PrecisionMode::MultiPrecision {
                digits: self.digits,
            }),
            (false, true) => Ok(PrecisionMode::Approximate),
            (false, false) => Ok(PrecisionMode::Fixed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_modes() {
        assert_eq!(EvaluationPolicy::default().mode(), Ok(PrecisionMode::Fixed));
        assert_eq!(
            EvaluationPolicy::approximate().mode(),
            Ok(PrecisionMode::Approximate)
        );
        assert_eq!(
            EvaluationPolicy::multi_precision(250).mode(),
            Ok(PrecisionMode::MultiPrecision { digits: 250 })
        );
    }

    #[test]
    fn rejects_conflicting_flags() {
        let policy = EvaluationPolicy {
            use_multi_precision: true,
            use_approximate: true,
            ..EvaluationPolicy::default()
        };
        assert_eq!(policy.mode(), Err(ConfigError::ConflictingPrecision));
        assert!(EvaluationPolicy::multi_precision(0).mode().is_err());
    }

    #[test]
    fn deserializes_partial_policy() {
        let policy: EvaluationPolicy =
            serde_json::from_str(r#"{"use_multi_precision": true}"#).unwrap();
        assert_eq!(
            policy.mode(),
            Ok(PrecisionMode::MultiPrecision {
                digits: DEFAULT_DIGITS
            })
        );
    }
}
