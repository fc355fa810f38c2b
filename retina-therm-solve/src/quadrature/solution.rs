/// Indicates how the adaptive quadrature finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The error estimate met the configured tolerances.
    Converged,
    /// The subdivision limit was reached first.
    MaxSubdivisions,
    /// Stopped early due to an observer decision.
    StoppedByObserver,
}

/// The result of an adaptive quadrature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Solution {
    /// Final status.
    pub status: Status,
    /// Estimated value of the integral.
    pub value: f64,
    /// Estimated absolute error of `value`.
    pub error: f64,
    /// Number of integrand evaluations.
    pub evaluations: usize,
    /// Number of subintervals in the final partition.
    pub subdivisions: usize,
}
