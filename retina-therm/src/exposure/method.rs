use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// How the kernel is integrated over time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum IntegrationMethod {
    /// Adaptive Gauss-Kronrod quadrature per pulse and time sample.
    #[default]
    Quad,
    /// Cumulative trapezoid on a uniform grid, shared by every time sample.
    Trap,
}

impl IntegrationMethod {
    /// Every available method.
    pub const ALL: [Self; 2] = [Self::Quad, Self::Trap];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Quad => "quad",
            Self::Trap => "trap",
        }
    }
}

impl fmt::Display for IntegrationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for IntegrationMethod {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|method| method.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::UnknownIntegrationMethod {
                name: s.to_string(),
            })
    }
}

impl TryFrom<String> for IntegrationMethod {
    type Error = ConfigError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<IntegrationMethod> for String {
    fn from(method: IntegrationMethod) -> Self {
        method.name().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_listed_name() {
        for method in IntegrationMethod::ALL {
            assert_eq!(method.name().parse(), Ok(method));
            assert_eq!(method.to_string(), method.name());
        }
        assert_eq!(" QUAD ".parse(), Ok(IntegrationMethod::Quad));
    }

    #[test]
    fn unknown_names_are_rejected() {
        let err = "simpson".parse::<IntegrationMethod>().unwrap_err();
        assert_eq!(
            err,
            ConfigError::UnknownIntegrationMethod {
                name: "simpson".to_string()
            }
        );
        assert_eq!(
            err.to_string(),
            "unknown integration method 'simpson', expected one of: quad, trap"
        );
    }
}
