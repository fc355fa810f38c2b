//! Progress reporting for long-running computations.
//!
//! Operations that loop over many samples accept an
//! [`Observer<Progress, Action>`](retina_therm_solve::Observer). The observer
//! sees one event per completed unit of work and may cancel the operation.

use retina_therm_solve::Observer;

/// Work completed so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

impl Progress {
    /// Completed fraction in `[0, 1]`; 1 when there is no work.
    #[must_use]
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            #[allow(clippy::cast_precision_loss)]
            let fraction = self.completed as f64 / self.total as f64;
            fraction
        }
    }
}

/// Control actions available to progress observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Abandon the computation.
    Cancel,
}

/// Counts completed work and forwards it to an observer.
pub(crate) struct Tracker<Obs> {
    observer: Obs,
    progress: Progress,
}

impl<Obs: Observer<Progress, Action>> Tracker<Obs> {
    pub(crate) fn new(total: usize, observer: Obs) -> Self {
        Self {
            observer,
            progress: Progress {
                completed: 0,
                total,
            },
        }
    }

    /// Records one completed step.
    ///
    /// Returns the progress so far as the error if the observer cancels.
    pub(crate) fn advance(&mut self) -> Result<(), Progress> {
        self.progress.completed += 1;
        match self.observer.observe(&self.progress) {
            Some(Action::Cancel) => Err(self.progress),
            None => Ok(()),
        }
    }
}
