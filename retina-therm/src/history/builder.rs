use ndarray::{Array1, s};
use retina_therm_solve::Observer;
use tracing::debug;

use crate::progress::{Action, Progress, Tracker};

use super::{GRID_TOLERANCE, HistoryError, TemperatureHistory};

/// One time-shifted, scaled copy of the baseline response.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PulseContribution {
    /// Onset, s. Must coincide with a sample of the history grid.
    pub arrival_time: f64,
    pub scale: f64,
}

/// Synthesizes the response to repeated exposures from one baseline
/// temperature history.
///
/// The history is split into a baseline temperature `T0 = T[0]` and a rise
/// `T - T0`. Each contribution adds `scale * rise` shifted to its arrival
/// time; `T0` is added back at the end. Contributions persist across
/// [`build`](Self::build) calls until cleared.
#[derive(Debug, Clone, Default)]
pub struct MultiPulseBuilder {
    t: Option<Array1<f64>>,
    rise: Array1<f64>,
    baseline: f64,
    contributions: Vec<PulseContribution>,
}

impl MultiPulseBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the baseline temperature added to every built history.
    pub fn set_baseline_temperature(&mut self, temperature: f64) {
        self.baseline = temperature;
    }

    #[must_use]
    pub fn baseline_temperature(&self) -> f64 {
        self.baseline
    }

    /// Sets the single-exposure response. The baseline becomes `T[0]`.
    ///
    /// # Errors
    ///
    /// Returns an error if the samples do not form a valid uniform history.
    pub fn set_temperature_history(
        &mut self,
        t: Array1<f64>,
        temperature: Array1<f64>,
    ) -> Result<(), HistoryError> {
        self.set_history(TemperatureHistory::new(t, temperature)?);
        Ok(())
    }

    /// Sets the single-exposure response from a validated history.
    pub fn set_history(&mut self, history: TemperatureHistory) {
        let (t, temperature) = history.into_parts();
        self.baseline = temperature[0];
        self.rise = temperature - self.baseline;
        self.t = Some(t);
    }

    /// Queues a copy of the response arriving at `arrival_time` (s).
    ///
    /// # Errors
    ///
    /// Returns an error if the arrival time is negative or either value is
    /// not finite.
    pub fn add_contribution(&mut self, arrival_time: f64, scale: f64) -> Result<(), HistoryError> {
        if !arrival_time.is_finite() || arrival_time < 0.0 {
            return Err(HistoryError::InvalidContribution {
                reason: "arrival time must be finite and non-negative",
            });
        }
        if !scale.is_finite() {
            return Err(HistoryError::InvalidContribution {
                reason: "scale must be finite",
            });
        }
        self.contributions.push(PulseContribution {
            arrival_time,
            scale,
        });
        Ok(())
    }

    pub fn clear_contributions(&mut self) {
        self.contributions.clear();
    }

    #[must_use]
    pub fn contributions(&self) -> &[PulseContribution] {
        &self.contributions
    }

    /// Superposes the queued contributions.
    ///
    /// Contributions arriving after the end of the history are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if no history is set or an arrival time does not
    /// match a grid sample within [`GRID_TOLERANCE`].
    pub fn build(&self) -> Result<Array1<f64>, HistoryError> {
        self.build_observed(())
    }

    /// Like [`build`](Self::build), reporting one [`Progress`] step per
    /// contribution.
    ///
    /// # Errors
    ///
    /// See [`build`](Self::build). Also returns an error if the observer
    /// cancels.
    pub fn build_observed<Obs>(&self, observer: Obs) -> Result<Array1<f64>, HistoryError>
    where
        Obs: Observer<Progress, Action>,
    {
        let t = self.t.as_ref().ok_or(HistoryError::MissingHistory)?;
        let n = t.len();
        let end = t[n - 1];

        let mut tracker = Tracker::new(self.contributions.len(), observer);
        let mut temperature = Array1::zeros(n);

        for contribution in &self.contributions {
            if contribution.arrival_time <= end {
                let offset = grid_index(t, contribution.arrival_time).ok_or(
                    HistoryError::OffGridArrival {
                        arrival_time: contribution.arrival_time,
                    },
                )?;
                temperature
                    .slice_mut(s![offset..])
                    .scaled_add(contribution.scale, &self.rise.slice(s![..n - offset]));
            }
            tracker.advance().map_err(|progress| HistoryError::Cancelled {
                completed: progress.completed,
                total: progress.total,
            })?;
        }

        debug!(
            samples = n,
            contributions = self.contributions.len(),
            "built multi-pulse history"
        );
        Ok(temperature + self.baseline)
    }

    /// Turns a continuous-wave response into the response to one pulse of
    /// width `tau` (s), replacing the stored history.
    ///
    /// Queued contributions are discarded.
    ///
    /// # Errors
    ///
    /// Returns an error if no history is set or `tau` is not on the grid.
    pub fn convert_to_single_pulse(&mut self, tau: f64) -> Result<(), HistoryError> {
        let t = self.t.clone().ok_or(HistoryError::MissingHistory)?;

        self.clear_contributions();
        self.add_contribution(0.0, 1.0)?;
        self.add_contribution(tau, -1.0)?;
        let single = self.build();
        self.clear_contributions();

        self.set_temperature_history(t, single?)
    }

    /// Queues a regular train of unit pulses with period `period` (s),
    /// starting at zero.
    ///
    /// Pulses stop at the end of the history or after `count` pulses. Returns
    /// the number of pulses added.
    ///
    /// # Errors
    ///
    /// Returns an error if no history is set or `period` is not finite and
    /// positive.
    pub fn add_pulse_train(
        &mut self,
        period: f64,
        count: Option<usize>,
    ) -> Result<usize, HistoryError> {
        let end = self
            .t
            .as_ref()
            .and_then(|t| t.last().copied())
            .ok_or(HistoryError::MissingHistory)?;
        if !period.is_finite() || period <= 0.0 {
            return Err(HistoryError::InvalidContribution {
                reason: "pulse period must be finite and positive",
            });
        }

        let limit = count.unwrap_or(usize::MAX);
        let mut added = 0;
        while added < limit {
            #[allow(clippy::cast_precision_loss)]
            let arrival_time = added as f64 * period;
            if arrival_time >= end {
                break;
            }
            self.add_contribution(arrival_time, 1.0)?;
            added += 1;
        }
        Ok(added)
    }
}

/// Index of the sample of `t` within [`GRID_TOLERANCE`] of `time`.
fn grid_index(t: &Array1<f64>, time: f64) -> Option<usize> {
    t.iter().position(|&sample| (sample - time).abs() < GRID_TOLERANCE)
}
