//! Bracketed root finding by interval halving.

mod config;
mod error;
mod solution;

pub use config::Config;
pub use error::Error;
pub use solution::{Solution, Status};

use crate::Observer;

/// Control actions supported by the bisection solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Stop the solver and report the best point seen so far.
    StopEarly,
}

/// Iteration event emitted by the bisection solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event {
    /// Iteration counter (1-based within the bisection loop).
    pub iter: usize,
    /// Search bracket before this iteration shrinks it.
    pub bracket: [f64; 2],
    /// Midpoint evaluated in this iteration.
    pub x: f64,
    /// Residual at the midpoint.
    pub residual: f64,
}

/// Finds a root of `f` inside `bracket` using the bisection method.
///
/// Observers see each iteration's midpoint and bracket state.
///
/// # Errors
///
/// Returns an error if the config or bracket is invalid, if the residuals at
/// the endpoints share a sign, or if `f` returns a non-finite value.
pub fn solve<F, Obs>(
    mut f: F,
    bracket: [f64; 2],
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

    let (mut left, mut right) = validate_bracket(bracket)?;

    let mut left_residual = finite_residual(&mut f, left)?;
    if left_residual.abs() <= config.residual_tol {
        return Ok(converged_at(left, left_residual, [left, right], 0));
    }

    let right_residual = finite_residual(&mut f, right)?;
    if right_residual.abs() <= config.residual_tol {
        return Ok(converged_at(right, right_residual, [left, right], 0));
    }

    if left_residual.signum() == right_residual.signum() {
        return Err(Error::NoBracket {
            left,
            right,
            left_residual,
            right_residual,
        });
    }

    let (mut best, mut best_residual) = if left_residual.abs() <= right_residual.abs() {
        (left, left_residual)
    } else {
        (right, right_residual)
    };

    for iter in 1..=config.max_iters {
        let mid = 0.5 * (left + right);
        let mid_residual = finite_residual(&mut f, mid)?;

        let x_converged = (right - left).abs() <= config.x_abs_tol + config.x_rel_tol * mid.abs();
        let residual_converged = mid_residual.abs() <= config.residual_tol;
        if mid_residual.abs() < best_residual.abs() {
            best = mid;
            best_residual = mid_residual;
        }

        let event = Event {
            iter,
            bracket: [left, right],
            x: mid,
            residual: mid_residual,
        };
        if let Some(Action::StopEarly) = observer.observe(&event) {
            return Ok(Solution {
                status: Status::StoppedByObserver,
                x: best,
                residual: best_residual,
                bracket: [left, right],
                iters: iter,
            });
        }

        if x_converged || residual_converged {
            return Ok(converged_at(mid, mid_residual, [left, right], iter));
        }

        if left_residual.signum() == mid_residual.signum() {
            left = mid;
            left_residual = mid_residual;
        } else {
            right = mid;
        }
    }

    Ok(Solution {
        status: Status::MaxIters,
        x: best,
        residual: best_residual,
        bracket: [left, right],
        iters: config.max_iters,
    })
}

/// Runs bisection without observation.
///
/// # Errors
///
/// See [`solve`].
pub fn solve_unobserved<F>(f: F, bracket: [f64; 2], config: &Config) -> Result<Solution, Error>
where
    F: FnMut(f64) -> f64,
{
    solve(f, bracket, config, ())
}

fn converged_at(x: f64, residual: f64, bracket: [f64; 2], iters: usize) -> Solution {
    Solution {
        status: Status::Converged,
        x,
        residual,
        bracket,
        iters,
    }
}

fn finite_residual<F: FnMut(f64) -> f64>(f: &mut F, x: f64) -> Result<f64, Error> {
    let residual = f(x);
    if residual.is_finite() {
        Ok(residual)
    } else {
        Err(Error::NonFiniteResidual { x, residual })
    }
}

/// Validates bracket values and returns them in normalized (left < right) order.
fn validate_bracket(bracket: [f64; 2]) -> Result<(f64, f64), Error> {
    let [left, right] = bracket;

    if !left.is_finite() {
        return Err(Error::NonFiniteBracket { value: left });
    }

    if !right.is_finite() {
        return Err(Error::NonFiniteBracket { value: right });
    }

    #[allow(clippy::float_cmp)]
    if left == right {
        return Err(Error::ZeroWidthBracket { value: left });
    }

    if left < right {
        Ok((left, right))
    } else {
        Ok((right, left))
    }
}
