//! Adaptive Gauss–Kronrod quadrature on finite intervals.
//!
//! The interval with the largest error estimate is bisected until the summed
//! error meets `max(abs_tol, rel_tol * |value|)` or the subdivision limit is
//! reached.

mod config;
mod error;
mod gauss_kronrod;
mod solution;

pub use config::Config;
pub use error::Error;
pub use solution::{Solution, Status};

use gauss_kronrod::{EVALUATIONS, Segment};

use crate::Observer;

/// Control actions supported by the quadrature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Stop refining and report the current estimate.
    StopEarly,
}

/// Refinement event emitted after each bisection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event {
    /// Refinement counter (1-based).
    pub iter: usize,
    /// Current estimate of the integral.
    pub value: f64,
    /// Current summed error estimate.
    pub error: f64,
    /// Number of subintervals in the partition.
    pub subdivisions: usize,
}

/// Integrates `f` over `[a, b]`.
///
/// Reversed bounds return the negated integral and equal bounds return zero
/// without evaluating `f`.
///
/// # Errors
///
/// Returns an error if the config is invalid, a bound is not finite, or `f`
/// returns a non-finite value at any sample point.
pub fn integrate<F, Obs>(
    mut f: F,
    [a, b]: [f64; 2],
    config: &Config,
    mut observer: Obs,
) -> Result<Solution, Error>
where
    F: FnMut(f64) -> f64,
    Obs: Observer<Event, Action>,
{
    config
        .validate()
        .map_err(|reason| Error::InvalidConfig { reason })?;

    for value in [a, b] {
        if !value.is_finite() {
            return Err(Error::NonFiniteBound { value });
        }
    }

    #[allow(clippy::float_cmp)]
    if a == b {
        return Ok(Solution {
            status: Status::Converged,
            value: 0.0,
            error: 0.0,
            evaluations: 0,
            subdivisions: 1,
        });
    }

    let (lower, upper, sign) = if a < b { (a, b, 1.0) } else { (b, a, -1.0) };

    let mut segments = vec![rule(&mut f, lower, upper)?];
    let mut evaluations = EVALUATIONS;
    let mut iter = 0;

    let status = loop {
        let (value, error) = totals(&segments);
        if error <= config.abs_tol.max(config.rel_tol * value.abs()) {
            break Status::Converged;
        }
        if segments.len() >= config.max_subdivisions {
            tracing::warn!(
                lower,
                upper,
                value,
                error,
                subdivisions = segments.len(),
                "quadrature reached the subdivision limit"
            );
            break Status::MaxSubdivisions;
        }

        let worst = worst_segment(&segments);
        let Segment { a: left, b: right, .. } = segments.swap_remove(worst);
        let mid = 0.5 * (left + right);
        segments.push(rule(&mut f, left, mid)?);
        segments.push(rule(&mut f, mid, right)?);
        evaluations += 2 * EVALUATIONS;
        iter += 1;

        let (value, error) = totals(&segments);
        let event = Event {
            iter,
            value,
            error,
            subdivisions: segments.len(),
        };
        if let Some(Action::StopEarly) = observer.observe(&event) {
            break Status::StoppedByObserver;
        }
    };

    let (value, error) = totals(&segments);
    Ok(Solution {
        status,
        value: sign * value,
        error,
        evaluations,
        subdivisions: segments.len(),
    })
}

/// Integrates `f` over `[a, b]` without observation.
///
/// # Errors
///
/// See [`integrate`].
pub fn integrate_unobserved<F>(f: F, bounds: [f64; 2], config: &Config) -> Result<Solution, Error>
where
    F: FnMut(f64) -> f64,
{
    integrate(f, bounds, config, ())
}

fn rule<F: FnMut(f64) -> f64>(f: &mut F, a: f64, b: f64) -> Result<Segment, Error> {
    gauss_kronrod::apply(f, a, b).map_err(|(x, value)| Error::NonFiniteIntegrand { x, value })
}

fn totals(segments: &[Segment]) -> (f64, f64) {
    segments
        .iter()
        .fold((0.0, 0.0), |(value, error), s| (value + s.value, error + s.error))
}

fn worst_segment(segments: &[Segment]) -> usize {
    segments
        .iter()
        .enumerate()
        .max_by(|(_, x), (_, y)| x.error.total_cmp(&y.error))
        .map_or(0, |(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::f64::consts::PI;

    use approx::assert_relative_eq;

    #[test]
    fn integrates_smooth_function() {
        let solution = integrate_unobserved(f64::sin, [0.0, PI], &Config::default())
            .expect("should integrate");

        assert_eq!(solution.status, Status::Converged);
        assert_relative_eq!(solution.value, 2.0, epsilon = 1e-12);
        assert_eq!(solution.evaluations, 15);
    }

    #[test]
    fn refines_near_a_square_root_singularity() {
        let solution = integrate_unobserved(|x: f64| 1.0 / x.sqrt(), [0.0, 1.0], &Config::default())
            .expect("should integrate");

        assert_eq!(solution.status, Status::Converged);
        assert_relative_eq!(solution.value, 2.0, max_relative = 1e-7);
        assert!(solution.subdivisions > 1);
    }

    #[test]
    fn reversed_bounds_negate_the_integral() {
        let solution = integrate_unobserved(|x: f64| x * x, [3.0, 0.0], &Config::default())
            .expect("should integrate");

        assert_relative_eq!(solution.value, -9.0, epsilon = 1e-12);
    }

    #[test]
    fn equal_bounds_skip_evaluation() {
        let mut calls = 0;
        let solution = integrate_unobserved(
            |x: f64| {
                calls += 1;
                x
            },
            [1.0, 1.0],
            &Config::default(),
        )
        .expect("should integrate");

        assert_relative_eq!(solution.value, 0.0);
        assert_eq!(calls, 0);
    }

    #[test]
    fn reports_subdivision_limit() {
        let config = Config {
            abs_tol: 1e-15,
            rel_tol: 0.0,
            max_subdivisions: 3,
        };
        let solution = integrate_unobserved(|x: f64| 1.0 / x.sqrt(), [0.0, 1.0], &config)
            .expect("should return an estimate");

        assert_eq!(solution.status, Status::MaxSubdivisions);
        assert_eq!(solution.subdivisions, 3);
    }

    #[test]
    fn observer_can_stop_refinement() {
        let observer = |event: &Event| (event.iter == 2).then_some(Action::StopEarly);
        let config = Config {
            abs_tol: 1e-15,
            rel_tol: 0.0,
            max_subdivisions: 100,
        };
        let solution = integrate(|x: f64| 1.0 / x.sqrt(), [0.0, 1.0], &config, observer)
            .expect("should stop cleanly");

        assert_eq!(solution.status, Status::StoppedByObserver);
        assert_eq!(solution.subdivisions, 3);
        assert_eq!(solution.evaluations, 75);
    }

    #[test]
    fn errors_on_non_finite_input() {
        let config = Config::default();

        let result = integrate_unobserved(|x| x, [0.0, f64::INFINITY], &config);
        assert!(matches!(result, Err(Error::NonFiniteBound { .. })));

        let result = integrate_unobserved(|x: f64| x.ln(), [-1.0, 1.0], &config);
        assert!(matches!(result, Err(Error::NonFiniteIntegrand { .. })));

        let bad = Config {
            max_subdivisions: 0,
            ..config
        };
        let result = integrate_unobserved(|x| x, [0.0, 1.0], &bad);
        assert!(matches!(result, Err(Error::InvalidConfig { .. })));
    }
}
