//! Uniformly sampled temperature histories and multi-pulse synthesis.

mod builder;
mod error;
mod grid;

pub use builder::{MultiPulseBuilder, PulseContribution};
pub use error::HistoryError;
pub use grid::{GRID_TOLERANCE, interpolate_temperature_history, is_uniform_spaced, regularize_grid};

use ndarray::{Array1, ArrayView1, s};

/// Temperatures (K) sampled on a strictly increasing, uniform time grid (s).
#[derive(Debug, Clone, PartialEq)]
pub struct TemperatureHistory {
    t: Array1<f64>,
    temperature: Array1<f64>,
}

/// Where to cut the quiet tail of a history.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Threshold {
    /// A fraction of the peak temperature.
    Fraction(f64),
    /// An absolute temperature, K.
    Absolute(f64),
}

impl TemperatureHistory {
    /// Pairs times with temperatures.
    ///
    /// # Errors
    ///
    /// Returns an error if the arrays are empty or differ in length, or if
    /// the times are not strictly increasing and uniform within
    /// [`GRID_TOLERANCE`].
    pub fn new(t: Array1<f64>, temperature: Array1<f64>) -> Result<Self, HistoryError> {
        if t.is_empty() {
            return Err(HistoryError::Empty);
        }
        if t.len() != temperature.len() {
            return Err(HistoryError::LengthMismatch {
                times: t.len(),
                temperatures: temperature.len(),
            });
        }
        if let Some(index) = grid::first_non_increasing(t.view()) {
            return Err(HistoryError::NotIncreasing { index });
        }
        if let Some((index, deviation)) = grid::first_deviation(t.view(), GRID_TOLERANCE) {
            return Err(HistoryError::NonUniformGrid { index, deviation });
        }
        Ok(Self { t, temperature })
    }

    /// Builds a history from samples on any increasing grid, resampling onto
    /// the finest spacing when the grid is not uniform.
    ///
    /// # Errors
    ///
    /// Returns an error if the samples cannot be regularized.
    pub fn regularized(t: Array1<f64>, temperature: Array1<f64>) -> Result<Self, HistoryError> {
        if is_uniform_spaced(t.view(), GRID_TOLERANCE) {
            return Self::new(t, temperature);
        }
        let tp = regularize_grid(t.view())?;
        let resampled = interpolate_temperature_history(t.view(), temperature.view(), tp.view())?;
        Self::new(tp, resampled)
    }

    #[must_use]
    pub fn times(&self) -> ArrayView1<'_, f64> {
        self.t.view()
    }

    #[must_use]
    pub fn temperatures(&self) -> ArrayView1<'_, f64> {
        self.temperature.view()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.t.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }

    /// Grid spacing, s. `None` for a single sample.
    #[must_use]
    pub fn step(&self) -> Option<f64> {
        (self.t.len() > 1).then(|| self.t[1] - self.t[0])
    }

    /// Highest temperature, K.
    #[must_use]
    pub fn peak(&self) -> f64 {
        self.temperature.fold(f64::NEG_INFINITY, |peak, &value| peak.max(value))
    }

    /// Drops the trailing samples at or below `threshold`.
    ///
    /// The sample just above the threshold is kept. If no sample exceeds it,
    /// only the first sample remains.
    #[must_use]
    pub fn truncate_below(&self, threshold: Threshold) -> Self {
        let cutoff = match threshold {
            Threshold::Fraction(fraction) => fraction * self.peak(),
            Threshold::Absolute(temperature) => temperature,
        };
        let keep = self
            .temperature
            .iter()
            .rposition(|&value| value > cutoff)
            .map_or(1, |index| index + 1);
        Self {
            t: self.t.slice(s![..keep]).to_owned(),
            temperature: self.temperature.slice(s![..keep]).to_owned(),
        }
    }

    pub(crate) fn into_parts(self) -> (Array1<f64>, Array1<f64>) {
        (self.t, self.temperature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn validates_samples() {
        assert!(matches!(
            TemperatureHistory::new(array![], array![]),
            Err(HistoryError::Empty)
        ));
        assert!(matches!(
            TemperatureHistory::new(array![0.0, 1.0], array![1.0]),
            Err(HistoryError::LengthMismatch { times: 2, temperatures: 1 })
        ));
        assert!(matches!(
            TemperatureHistory::new(array![0.0, 1.0, 1.0], array![1.0, 2.0, 3.0]),
            Err(HistoryError::NotIncreasing { index: 2 })
        ));
        assert!(matches!(
            TemperatureHistory::new(array![0.0, 1.0, 3.0], array![1.0, 2.0, 3.0]),
            Err(HistoryError::NonUniformGrid { index: 1, .. })
        ));
    }

    #[test]
    fn regularizes_non_uniform_samples() {
        let t = array![0.0, 0.1, 0.3, 0.6, 1.0];
        let history = TemperatureHistory::regularized(t.clone(), t.mapv(|t| 2.0 * t)).unwrap();

        assert_eq!(history.len(), 11);
        assert_relative_eq!(history.step().unwrap(), 0.1, epsilon = 1e-12);
        assert_relative_eq!(history.temperatures()[5], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn truncates_quiet_tail() {
        let t = array![0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
        let temperature = array![0.0, 10.0, 4.0, 2.0, 0.5, 0.1];
        let history = TemperatureHistory::new(t, temperature).unwrap();

        let cut = history.truncate_below(Threshold::Fraction(0.1));
        assert_eq!(cut.temperatures(), array![0.0, 10.0, 4.0, 2.0]);

        let cut = history.truncate_below(Threshold::Absolute(3.0));
        assert_eq!(cut.len(), 3);
        assert_relative_eq!(cut.times()[2], 2.0);

        // Already above the threshold at the end.
        assert_eq!(history.truncate_below(Threshold::Absolute(0.0)), history);
        // Nothing above the threshold.
        assert_eq!(history.truncate_below(Threshold::Absolute(100.0)).len(), 1);
    }
}
