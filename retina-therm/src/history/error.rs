use thiserror::Error;

use crate::interpolation::InterpError;

/// Errors raised by temperature histories and the multi-pulse builder.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("temperature history is empty")]
    Empty,

    #[error("{times} times but {temperatures} temperatures")]
    LengthMismatch { times: usize, temperatures: usize },

    #[error("times must be finite and strictly increasing (index {index})")]
    NotIncreasing { index: usize },

    #[error("times are not uniformly spaced (index {index} deviates by {deviation:e} s)")]
    NonUniformGrid { index: usize, deviation: f64 },

    #[error("no temperature history has been set")]
    MissingHistory,

    #[error("pulse arrival at t = {arrival_time} s is not on the history grid")]
    OffGridArrival { arrival_time: f64 },

    #[error("invalid pulse contribution: {reason}")]
    InvalidContribution { reason: &'static str },

    #[error("failed to resample the temperature history")]
    Interpolation(#[from] InterpError),

    #[error("cancelled after {completed} of {total} contributions")]
    Cancelled { completed: usize, total: usize },
}
