//! Temperature rise under a finite exposure.
//!
//! A kernel `G(z, r, t)` is the heating rate after a step exposure switched
//! on at `t = 0`. The temperature under an envelope of rectangular pulses is
//! the superposition
//!
//! ```text
//! T(t) = sum over pulses of  integral of G from max(0, t - p - w) to max(0, t - p)
//! ```
//!
//! for pulses arriving at `p` with width `w`.

mod envelope;
mod error;
mod method;

pub use envelope::{Exposure, ExposureSpec, Pulse};
pub use error::ExposureError;
pub use method::IntegrationMethod;

use ndarray::{Array1, ArrayView1};
use retina_therm_solve::{Observer, quadrature};
use tracing::debug;
use uom::si::f64::{Length, TemperatureInterval, Time};

use crate::{
    greens::GreensFunction,
    interpolation::LinearInterpolator,
    progress::{Action, Progress, Tracker},
    units,
};

/// Default trapezoid intervals across the longest time since onset.
const TRAP_INTERVALS: u32 = 1000;

/// Default trapezoid intervals across the narrowest pulse.
const PULSE_INTERVALS: u32 = 10;

/// Knots closer than this fraction of the longest time since onset merge.
const KNOT_TOLERANCE: f64 = 1e-12;

/// Most grid points, and so kernel evaluations, the trapezoid rule may use
/// for one call.
pub const MAX_TRAP_POINTS: usize = 1_000_000;

/// Integrates a kernel over an exposure envelope.
#[derive(Debug, Clone)]
pub struct ExposureIntegrator<G> {
    kernel: G,
    exposure: Exposure,
    quadrature: quadrature::Config,
    trap_step: Option<f64>,
}

impl<G: GreensFunction> ExposureIntegrator<G> {
    /// Creates an integrator with default quadrature tolerances.
    ///
    /// The trapezoid rule integrates on a grid that holds every pulse edge
    /// seen from every requested time. Its step defaults to the finer of a
    /// thousandth of the longest time since onset and a tenth of the
    /// narrowest pulse.
    pub fn new(kernel: G, exposure: Exposure) -> Self {
        Self {
            kernel,
            exposure,
            quadrature: quadrature::Config::default(),
            trap_step: None,
        }
    }

    /// Replaces the quadrature tolerances.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn with_quadrature(mut self, config: quadrature::Config) -> Result<Self, ExposureError> {
        config
            .validate()
            .map_err(|reason| ExposureError::InvalidQuadrature { reason })?;
        self.quadrature = config;
        Ok(self)
    }

    /// Fixes the trapezoid grid step, s.
    ///
    /// A step that would need more than [`MAX_TRAP_POINTS`] grid points
    /// fails later, in [`temperature_rise`](Self::temperature_rise).
    ///
    /// # Errors
    ///
    /// Returns an error if `step` is not finite and positive.
    pub fn with_trap_step(mut self, step: f64) -> Result<Self, ExposureError> {
        if !step.is_finite() || step <= 0.0 {
            return Err(ExposureError::InvalidStep { value: step });
        }
        self.trap_step = Some(step);
        Ok(self)
    }

    pub fn kernel(&self) -> &G {
        &self.kernel
    }

    pub fn exposure(&self) -> &Exposure {
        &self.exposure
    }

    /// Temperature rise (K) at `(z, r)` for each of the times `ts` (s).
    ///
    /// The observer sees one [`Progress`] event per completed step and may
    /// cancel the computation.
    ///
    /// # Errors
    ///
    /// Returns an error if a time is not finite, the kernel produces a
    /// non-finite rate, the integration fails, or the observer cancels.
    pub fn temperature_rise<'a, Obs>(
        &self,
        z: f64,
        r: f64,
        ts: impl Into<ArrayView1<'a, f64>>,
        method: IntegrationMethod,
        observer: Obs,
    ) -> Result<Array1<f64>, ExposureError>
    where
        Obs: Observer<Progress, Action>,
    {
        let ts = ts.into();
        if let Some(&value) = ts.iter().find(|t| !t.is_finite()) {
            return Err(ExposureError::NonFiniteTime { value });
        }

        let pulses = self.exposure.pulses();
        debug!(
            z,
            r,
            samples = ts.len(),
            pulses = pulses.len(),
            %method,
            "computing temperature rise"
        );

        let temperatures = match method {
            IntegrationMethod::Quad => self.by_quadrature(z, r, ts, &pulses, observer)?,
            IntegrationMethod::Trap => self.by_trapezoid(z, r, ts, &pulses, observer)?,
        };

        debug!(samples = temperatures.len(), "temperature rise done");
        Ok(temperatures)
    }

    /// Runs [`temperature_rise`](Self::temperature_rise) without observation.
    ///
    /// # Errors
    ///
    /// See [`temperature_rise`](Self::temperature_rise).
    pub fn temperature_rise_unobserved<'a>(
        &self,
        z: f64,
        r: f64,
        ts: impl Into<ArrayView1<'a, f64>>,
        method: IntegrationMethod,
    ) -> Result<Array1<f64>, ExposureError> {
        self.temperature_rise(z, r, ts, method, ())
    }

    /// Temperature rise at a single typed point and time.
    ///
    /// # Errors
    ///
    /// See [`temperature_rise`](Self::temperature_rise).
    pub fn temperature_rise_at(
        &self,
        z: Length,
        r: Length,
        t: Time,
        method: IntegrationMethod,
    ) -> Result<TemperatureInterval, ExposureError> {
        let (z, r) = (units::length_cm(z), units::length_cm(r));
        let rise = self.temperature_rise_unobserved(z, r, &[units::time_s(t)], method)?;
        Ok(units::temperature_rise(rise[0]))
    }

    fn by_quadrature<Obs>(
        &self,
        z: f64,
        r: f64,
        ts: ArrayView1<'_, f64>,
        pulses: &[Pulse],
        observer: Obs,
    ) -> Result<Array1<f64>, ExposureError>
    where
        Obs: Observer<Progress, Action>,
    {
        let mut tracker = Tracker::new(ts.len(), observer);
        let mut temperatures = Array1::zeros(ts.len());

        for (temperature, &t) in temperatures.iter_mut().zip(ts.iter()) {
            for pulse in pulses {
                let upper = (t - pulse.arrival).max(0.0);
                let lower = (t - pulse.arrival - pulse.width).max(0.0);
                if upper <= lower {
                    continue;
                }
                let solution = quadrature::integrate_unobserved(
                    |tau| self.kernel.rate(z, r, tau),
                    [lower, upper],
                    &self.quadrature,
                )
                .map_err(|source| ExposureError::Quadrature { t, source })?;
                *temperature += solution.value;
            }
            tracker.advance().map_err(cancelled)?;
        }

        Ok(temperatures)
    }

    fn by_trapezoid<Obs>(
        &self,
        z: f64,
        r: f64,
        ts: ArrayView1<'_, f64>,
        pulses: &[Pulse],
        observer: Obs,
    ) -> Result<Array1<f64>, ExposureError>
    where
        Obs: Observer<Progress, Action>,
    {
        let knots = trapezoid_knots(ts, pulses);
        let span = knots.last().copied().unwrap_or(0.0);
        if span <= 0.0 {
            let mut tracker = Tracker::new(ts.len(), observer);
            for _ in 0..ts.len() {
                tracker.advance().map_err(cancelled)?;
            }
            return Ok(Array1::zeros(ts.len()));
        }

        let step = self.trap_step.unwrap_or_else(|| default_trap_step(span, pulses));
        let grid = refine_knots(&knots, step)?;
        debug!(knots = knots.len(), points = grid.len(), step, "trapezoid grid");

        let mut tracker = Tracker::new(grid.len() + ts.len(), observer);

        let mut rates = Array1::zeros(grid.len());
        for (rate, &tau) in rates.iter_mut().zip(grid.iter()) {
            let value = self.kernel.rate(z, r, tau);
            if !value.is_finite() {
                return Err(ExposureError::NonFiniteRate { t: tau, value });
            }
            *rate = value;
            tracker.advance().map_err(cancelled)?;
        }

        let cumulative = cumulative_trapezoid(&grid, &rates);
        let integral = LinearInterpolator::new(grid, cumulative)?;
        let response = |tau: f64| {
            if tau <= 0.0 {
                Ok(0.0)
            } else {
                integral.interpolate(tau.min(span))
            }
        };

        let mut temperatures = Array1::zeros(ts.len());
        for (temperature, &t) in temperatures.iter_mut().zip(ts.iter()) {
            for pulse in pulses.iter().take_while(|pulse| pulse.arrival < t) {
                let since_onset = t - pulse.arrival;
                *temperature += response(since_onset)? - response(since_onset - pulse.width)?;
            }
            tracker.advance().map_err(cancelled)?;
        }

        Ok(temperatures)
    }
}

fn cancelled(progress: Progress) -> ExposureError {
    ExposureError::Cancelled {
        completed: progress.completed,
        total: progress.total,
    }
}

/// Times since onset at which the cumulative response is read: zero, plus
/// every positive `t - arrival` and `t - arrival - width`.
///
/// Sorted, with knots closer than [`KNOT_TOLERANCE`] of the span merged.
fn trapezoid_knots(ts: ArrayView1<'_, f64>, pulses: &[Pulse]) -> Vec<f64> {
    let mut knots = vec![0.0];
    for &t in ts.iter() {
        for pulse in pulses.iter().take_while(|pulse| pulse.arrival < t) {
            let since_onset = t - pulse.arrival;
            knots.push(since_onset);
            let since_end = since_onset - pulse.width;
            if since_end > 0.0 {
                knots.push(since_end);
            }
        }
    }
    knots.sort_by(f64::total_cmp);
    let tolerance = KNOT_TOLERANCE * knots.last().copied().unwrap_or(0.0);
    knots.dedup_by(|next, kept| *next - *kept <= tolerance);
    knots
}

/// The finer of `span / TRAP_INTERVALS` and the narrowest finite pulse width
/// over `PULSE_INTERVALS`, but never so fine that the uniform part of the
/// grid exceeds half of [`MAX_TRAP_POINTS`].
fn default_trap_step(span: f64, pulses: &[Pulse]) -> f64 {
    let by_span = span / f64::from(TRAP_INTERVALS);
    let step = pulses
        .iter()
        .map(|pulse| pulse.width)
        .filter(|width| width.is_finite())
        .reduce(f64::min)
        .map_or(by_span, |width| by_span.min(width / f64::from(PULSE_INTERVALS)));
    #[allow(clippy::cast_precision_loss)]
    let finest = 2.0 * span / MAX_TRAP_POINTS as f64;
    step.max(finest)
}

/// Splits every gap between consecutive knots into equal pieces no longer
/// than `step`. The knots themselves stay on the grid.
fn refine_knots(knots: &[f64], step: f64) -> Result<Array1<f64>, ExposureError> {
    let pieces = |pair: &[f64]| ((pair[1] - pair[0]) / step).ceil().max(1.0);

    let points = 1.0 + knots.windows(2).map(pieces).sum::<f64>();
    #[allow(clippy::cast_precision_loss)]
    let limit = MAX_TRAP_POINTS as f64;
    if points > limit {
        return Err(ExposureError::TrapGridTooLarge {
            points,
            limit: MAX_TRAP_POINTS,
        });
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let mut grid: Vec<f64> = Vec::with_capacity(points as usize);
    grid.extend(knots.first());
    for pair in knots.windows(2) {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let count = pieces(pair) as usize;
        #[allow(clippy::cast_precision_loss)]
        let width = (pair[1] - pair[0]) / count as f64;
        #[allow(clippy::cast_precision_loss)]
        let interior = (1..count).map(|j| pair[0] + j as f64 * width);
        grid.extend(interior);
        grid.push(pair[1]);
    }
    Ok(Array1::from(grid))
}

/// Running trapezoid integral of `values` over the grid `x`, from zero.
fn cumulative_trapezoid(x: &Array1<f64>, values: &Array1<f64>) -> Array1<f64> {
    let mut total = 0.0_f64;
    let mut cumulative = Array1::zeros(values.len());
    for (j, (xs, ys)) in x.windows(2).into_iter().zip(values.windows(2)).enumerate() {
        total += 0.5 * (xs[1] - xs[0]) * (ys[0] + ys[1]);
        cumulative[j + 1] = total;
    }
    cumulative
}
