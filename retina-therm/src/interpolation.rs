//! Linear interpolation over a strictly increasing grid.

use ndarray::Array1;
use ninterp::{
    error::{InterpolateError, ValidateError},
    interpolator::Extrapolate,
    prelude::{Interp1DOwned, Interpolator},
    strategy::Linear,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InterpError {
    #[error(transparent)]
    Validation(#[from] ValidateError),
    #[error(transparent)]
    Interpolation(#[from] InterpolateError),
}

/// Piecewise-linear interpolant that rejects points outside its grid.
pub(crate) struct LinearInterpolator(Interp1DOwned<f64, Linear>);

impl LinearInterpolator {
    pub(crate) fn new(x: Array1<f64>, f_x: Array1<f64>) -> Result<Self, InterpError> {
        Ok(Self(Interp1DOwned::new(x, f_x, Linear, Extrapolate::Error)?))
    }

    pub(crate) fn interpolate(&self, x: f64) -> Result<f64, InterpError> {
        self.0.interpolate(&[x]).map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn interpolates_between_nodes() {
        let interp = LinearInterpolator::new(array![0.0, 1.0, 2.0], array![0.0, 0.4, 0.8]).unwrap();
        assert_relative_eq!(interp.interpolate(1.4).unwrap(), 0.56);
        assert_relative_eq!(interp.interpolate(2.0).unwrap(), 0.8);
    }

    #[test]
    fn rejects_points_outside_the_grid() {
        let interp = LinearInterpolator::new(array![0.0, 1.0], array![1.0, 2.0]).unwrap();
        assert!(matches!(interp.interpolate(1.5), Err(InterpError::Interpolation(_))));
    }

    #[test]
    fn rejects_unsorted_grids() {
        let result = LinearInterpolator::new(array![0.0, 2.0, 1.0], array![1.0, 2.0, 3.0]);
        assert!(matches!(result, Err(InterpError::Validation(_))));
    }
}
