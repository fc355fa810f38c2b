//! Special functions needed by the retina Green's-function kernels.
//!
//! - [`marcum_q`]: generalized Marcum Q with an accelerated implementation
//!   that falls back to a reference series.
//! - [`erfcx`]: the scaled complementary error function, including the
//!   long-time asymptotic expansion.
//! - [`multi_precision`]: `erf` and `pi` at a caller-chosen number of
//!   decimal digits.

pub mod erfcx;
pub mod marcum_q;
pub mod multi_precision;
