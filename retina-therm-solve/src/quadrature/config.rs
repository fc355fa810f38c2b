/// Configuration for adaptive Gauss–Kronrod quadrature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    /// Absolute error target for the whole interval.
    pub abs_tol: f64,
    /// Error target relative to the magnitude of the integral.
    pub rel_tol: f64,
    /// Maximum number of subintervals kept by the adaptive scheme.
    pub max_subdivisions: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            abs_tol: 1e-10,
            rel_tol: 1e-8,
            max_subdivisions: 200,
        }
    }
}

impl Config {
    /// Validates tolerances and the subdivision limit.
    ///
    /// # Errors
    ///
    /// Returns an error if a tolerance is negative or non-finite, if both
    /// tolerances are zero, or if no subdivisions are allowed.
    pub fn validate(&self) -> Result<(), &'static str> {
        if !self.abs_tol.is_finite() || self.abs_tol < 0.0 {
            return Err("abs_tol must be finite and non-negative");
        }
        if !self.rel_tol.is_finite() || self.rel_tol < 0.0 {
            return Err("rel_tol must be finite and non-negative");
        }
        if self.abs_tol == 0.0 && self.rel_tol == 0.0 {
            return Err("abs_tol and rel_tol cannot both be zero");
        }
        if self.max_subdivisions == 0 {
            return Err("max_subdivisions must be at least 1");
        }
        Ok(())
    }
}
