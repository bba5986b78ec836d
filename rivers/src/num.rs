//! A thin abstraction over the different numerical types a river can be built from.

use malachite::Rational;
use ordered_float::NotNan;

/// A trait for abstracting over the properties we need from numerical types.
///
/// This is implemented for `NotNan<f64>`, `NotNan<f32>`, and `malachite::Rational`.
/// The float types are what you get from parsing a river file; the rational type
/// makes the sweep exact, which is mostly useful for checking the float results.
pub trait Float:
    Sized
    + std::ops::Add<Self, Output = Self>
    + std::ops::Sub<Self, Output = Self>
    + std::ops::Mul<Self, Output = Self>
    + std::ops::Div<Self, Output = Self>
    + std::ops::Neg<Output = Self>
    + for<'a> std::ops::Add<&'a Self, Output = Self>
    + for<'a> std::ops::Sub<&'a Self, Output = Self>
    + for<'a> std::ops::Mul<&'a Self, Output = Self>
    + for<'a> std::ops::Div<&'a Self, Output = Self>
    + Clone
    + std::fmt::Debug
    + Ord
    + Eq
    + 'static
{
    fn from_f32(x: f32) -> Self;

    /// Converts a coordinate read from outside, returning `None` if it isn't finite.
    fn from_f64(x: f64) -> Option<Self>;

    /// Rationals are always finite, but `NotNan` allows infinities.
    fn is_finite(&self) -> bool;

    /// # Panics
    /// Panics if `self` isn't finite.
    fn to_exact(&self) -> Rational;

    fn abs(self) -> Self;
}

impl Float for Rational {
    fn from_f32(x: f32) -> Self {
        Rational::try_from(x).unwrap()
    }

    fn from_f64(x: f64) -> Option<Self> {
        Rational::try_from(x).ok()
    }

    fn is_finite(&self) -> bool {
        true
    }

    fn to_exact(&self) -> Rational {
        self.clone()
    }

    fn abs(self) -> Self {
        <Rational as malachite::num::arithmetic::traits::Abs>::abs(self)
    }
}

impl Float for NotNan<f32> {
    fn from_f32(x: f32) -> Self {
        NotNan::try_from(x).unwrap()
    }

    fn from_f64(x: f64) -> Option<Self> {
        let x = x as f32;
        if x.is_finite() {
            NotNan::new(x).ok()
        } else {
            None
        }
    }

    fn is_finite(&self) -> bool {
        self.into_inner().is_finite()
    }

    fn to_exact(&self) -> Rational {
        self.into_inner().try_into().unwrap()
    }

    fn abs(self) -> Self {
        self.into_inner().abs().try_into().unwrap()
    }
}

impl Float for NotNan<f64> {
    fn from_f32(x: f32) -> Self {
        NotNan::try_from(f64::from(x)).unwrap()
    }

    fn from_f64(x: f64) -> Option<Self> {
        if x.is_finite() {
            NotNan::new(x).ok()
        } else {
            None
        }
    }

    fn is_finite(&self) -> bool {
        self.into_inner().is_finite()
    }

    fn to_exact(&self) -> Rational {
        self.into_inner().try_into().unwrap()
    }

    fn abs(self) -> Self {
        self.into_inner().abs().try_into().unwrap()
    }
}

/// Returns `x` if it's finite.
///
/// Arithmetic on finite values never produces a NaN, so checking every intermediate
/// result with this is enough to keep `NotNan` from panicking.
pub(crate) fn finite<F: Float>(x: F) -> Option<F> {
    x.is_finite().then_some(x)
}
