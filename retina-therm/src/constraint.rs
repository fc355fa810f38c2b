//! Numeric constraints checked once at construction.
//!
//! A [`Constrained<T, C>`] value is known to satisfy `C` for its whole
//! lifetime, so layer and material types can store their parameters without
//! re-validating them on every kernel evaluation.

use std::marker::PhantomData;

use num_traits::Zero;
use thiserror::Error;

/// A numeric invariant enforced at construction time.
pub trait Constraint<T> {
    /// Checks that the given value satisfies this constraint.
    ///
    /// # Errors
    ///
    /// Returns a [`ConstraintError`] if the value does not satisfy the constraint.
    fn check(value: &T) -> Result<(), ConstraintError>;
}

/// An error returned when a [`Constraint`] is violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ConstraintError {
    #[error("value must not be negative")]
    Negative,
    #[error("value must not be zero")]
    Zero,
    #[error("value is not a number")]
    NotANumber,
    #[error("value must be finite")]
    Infinite,
}

/// A wrapper enforcing a numeric constraint at construction time.
///
/// ```
/// use retina_therm::constraint::{Constrained, StrictlyPositive};
///
/// let d = Constrained::<f64, StrictlyPositive>::new(1e-3).unwrap();
/// assert_eq!(d.into_inner(), 1e-3);
/// assert!(Constrained::<f64, StrictlyPositive>::new(0.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Constrained<T, C: Constraint<T>> {
    value: T,
    _marker: PhantomData<C>,
}

impl<T, C: Constraint<T>> Constrained<T, C> {
    /// Constructs a new constrained value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value does not satisfy the constraint.
    pub fn new(value: T) -> Result<Self, ConstraintError> {
        C::check(&value)?;
        Ok(Self {
            value,
            _marker: PhantomData,
        })
    }

    /// Consumes the wrapper and returns the inner value.
    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T, C: Constraint<T>> AsRef<T> for Constrained<T, C> {
    fn as_ref(&self) -> &T {
        &self.value
    }
}

/// Marker for values greater than zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct StrictlyPositive;

impl<T: PartialOrd + Zero> Constraint<T> for StrictlyPositive {
    fn check(value: &T) -> Result<(), ConstraintError> {
        match value.partial_cmp(&T::zero()) {
            Some(std::cmp::Ordering::Greater) => Ok(()),
            Some(std::cmp::Ordering::Equal) => Err(ConstraintError::Zero),
            Some(std::cmp::Ordering::Less) => Err(ConstraintError::Negative),
            None => Err(ConstraintError::NotANumber),
        }
    }
}

/// Marker for values that are zero or greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct NonNegative;

impl<T: PartialOrd + Zero> Constraint<T> for NonNegative {
    fn check(value: &T) -> Result<(), ConstraintError> {
        match value.partial_cmp(&T::zero()) {
            Some(std::cmp::Ordering::Greater | std::cmp::Ordering::Equal) => Ok(()),
            Some(std::cmp::Ordering::Less) => Err(ConstraintError::Negative),
            None => Err(ConstraintError::NotANumber),
        }
    }
}

/// Marker for finite values greater than zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FinitePositive;

impl Constraint<f64> for FinitePositive {
    fn check(value: &f64) -> Result<(), ConstraintError> {
        StrictlyPositive::check(value)?;
        if value.is_finite() {
            Ok(())
        } else {
            Err(ConstraintError::Infinite)
        }
    }
}

/// Marker for finite values that are zero or greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FiniteNonNegative;

impl Constraint<f64> for FiniteNonNegative {
    fn check(value: &f64) -> Result<(), ConstraintError> {
        NonNegative::check(value)?;
        if value.is_finite() {
            Ok(())
        } else {
            Err(ConstraintError::Infinite)
        }
    }
}

/// A finite, strictly positive `f64`.
pub type Positive = Constrained<f64, FinitePositive>;

/// A finite, non-negative `f64`.
pub type NonNegativeF64 = Constrained<f64, FiniteNonNegative>;
