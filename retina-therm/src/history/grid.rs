use ndarray::{Array1, ArrayView1};

use crate::interpolation::LinearInterpolator;

use super::HistoryError;

/// Tolerance on time-grid spacing, s.
pub const GRID_TOLERANCE: f64 = 1e-10;

/// Returns `true` if every spacing of `x` is within `tol` of the first.
///
/// Grids with fewer than two points are trivially uniform.
#[must_use]
pub fn is_uniform_spaced(x: ArrayView1<'_, f64>, tol: f64) -> bool {
    first_deviation(x, tol).is_none()
}

/// Index and size of the first spacing that differs from `x[1] - x[0]` by
/// more than `tol`.
pub(super) fn first_deviation(x: ArrayView1<'_, f64>, tol: f64) -> Option<(usize, f64)> {
    if x.len() < 2 {
        return None;
    }
    let dx = x[1] - x[0];
    x.windows(2)
        .into_iter()
        .map(|pair| pair[1] - pair[0] - dx)
        .enumerate()
        .find(|(_, deviation)| deviation.abs() > tol)
}

/// Index of the first sample that does not increase on its predecessor.
pub(super) fn first_non_increasing(x: ArrayView1<'_, f64>) -> Option<usize> {
    if let Some(index) = x.iter().position(|value| !value.is_finite()) {
        return Some(index);
    }
    x.windows(2)
        .into_iter()
        .position(|pair| pair[1] <= pair[0])
        .map(|index| index + 1)
}

/// A uniform grid spanning `x` at its finest spacing.
///
/// The endpoints are kept; the step is shrunk slightly if the span is not a
/// whole multiple of the finest spacing.
///
/// # Errors
///
/// Returns an error if `x` is empty or not strictly increasing.
pub fn regularize_grid(x: ArrayView1<'_, f64>) -> Result<Array1<f64>, HistoryError> {
    if x.is_empty() {
        return Err(HistoryError::Empty);
    }
    if let Some(index) = first_non_increasing(x) {
        return Err(HistoryError::NotIncreasing { index });
    }
    if x.len() == 1 {
        return Ok(x.to_owned());
    }

    let finest = x
        .windows(2)
        .into_iter()
        .map(|pair| pair[1] - pair[0])
        .fold(f64::INFINITY, f64::min);
    let (first, last) = (x[0], x[x.len() - 1]);

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let intervals = ((last - first) / finest - 1e-9).ceil().max(1.0) as usize;
    Ok(Array1::linspace(first, last, intervals + 1))
}

/// Linearly resamples the history `(t, temperature)` onto `tp`.
///
/// # Errors
///
/// Returns an error if the inputs differ in length, `t` is not strictly
/// increasing, or a point of `tp` lies outside `t`.
pub fn interpolate_temperature_history(
    t: ArrayView1<'_, f64>,
    temperature: ArrayView1<'_, f64>,
    tp: ArrayView1<'_, f64>,
) -> Result<Array1<f64>, HistoryError> {
    if t.len() != temperature.len() {
        return Err(HistoryError::LengthMismatch {
            times: t.len(),
            temperatures: temperature.len(),
        });
    }
    if let Some(index) = first_non_increasing(t) {
        return Err(HistoryError::NotIncreasing { index });
    }

    let interp = LinearInterpolator::new(t.to_owned(), temperature.to_owned())?;
    tp.iter()
        .map(|&x| interp.interpolate(x).map_err(HistoryError::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn detects_uniform_spacing() {
        let uniform: Array1<f64> = (0..21).map(|i| f64::from(i) * 0.1).collect();
        assert!(is_uniform_spaced(uniform.view(), GRID_TOLERANCE));
        assert!(is_uniform_spaced(array![1.0].view(), GRID_TOLERANCE));

        let x = array![0.0, 0.1, 0.3, 0.4];
        assert!(!is_uniform_spaced(x.view(), GRID_TOLERANCE));
        // Shrinking steps count too.
        let x = array![0.0, 0.2, 0.3, 0.4];
        assert!(!is_uniform_spaced(x.view(), GRID_TOLERANCE));
    }

    #[test]
    fn regularized_grid_uses_finest_spacing() {
        let x = array![0.0, 0.1, 0.3, 0.6, 1.0];
        let grid = regularize_grid(x.view()).unwrap();

        assert_eq!(grid.len(), 11);
        assert_relative_eq!(grid[0], 0.0);
        assert_relative_eq!(grid[10], 1.0);
        assert!(is_uniform_spaced(grid.view(), GRID_TOLERANCE));
    }

    #[test]
    fn regularize_rejects_bad_grids() {
        assert!(matches!(
            regularize_grid(Array1::<f64>::zeros(0).view()),
            Err(HistoryError::Empty)
        ));
        assert!(matches!(
            regularize_grid(array![0.0, 0.2, 0.2].view()),
            Err(HistoryError::NotIncreasing { index: 2 })
        ));
    }

    #[test]
    fn interpolation_is_exact_for_linear_data() {
        let t = array![0.0, 0.1, 0.3, 0.6, 1.0];
        let temperature = t.mapv(|t| 3.0 * t + 1.0);
        let tp = regularize_grid(t.view()).unwrap();

        let resampled =
            interpolate_temperature_history(t.view(), temperature.view(), tp.view()).unwrap();
        for (value, t) in resampled.iter().zip(tp.iter()) {
            assert_relative_eq!(*value, 3.0 * t + 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn interpolation_checks_inputs() {
        let t = array![0.0, 1.0];
        assert!(matches!(
            interpolate_temperature_history(t.view(), array![1.0].view(), t.view()),
            Err(HistoryError::LengthMismatch { .. })
        ));
        assert!(matches!(
            interpolate_temperature_history(t.view(), t.view(), array![2.0].view()),
            Err(HistoryError::Interpolation(_))
        ));
    }
}
