/// Indicates whether the solver converged or hit the iteration limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Converged according to the configured tolerances.
    Converged,
    /// Reached the iteration limit without converging.
    MaxIters,
    /// Stopped early due to an observer decision.
    StoppedByObserver,
}

/// The result of a bisection solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Solution {
    /// Final solver status.
    pub status: Status,
    /// Best estimate of the root.
    pub x: f64,
    /// Residual at the reported root estimate.
    pub residual: f64,
    /// Final search bracket.
    pub bracket: [f64; 2],
    /// Iteration count when the solver finished.
    pub iters: usize,
}
