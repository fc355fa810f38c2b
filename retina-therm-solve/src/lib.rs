//! Scalar numerical solvers used by the retina thermal models.
//!
//! Both solvers take plain closures and report their progress to an
//! [`Observer`], which may also stop the iteration early.

mod observe;

pub mod bisection;
pub mod quadrature;

pub use observe::Observer;
