use malachite::Rational;
use serde::{Deserialize, Serialize};

use crate::num::{finite, Float};

/// A point in the plane, which doubles as a vector when adding and scaling.
///
/// Equality is exact; tolerant comparisons go through [`RiverCfg`](crate::RiverCfg).
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point<F: Float> {
    pub x: F,
    pub y: F,
}

impl<F: Float> std::fmt::Debug for Point<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:?}, {:?})", self.x, self.y)
    }
}

impl<F: Float> Point<F> {
    pub fn new(x: F, y: F) -> Self {
        Point { x, y }
    }

    pub fn scale(&self, k: &F) -> Self {
        Point {
            x: self.x.clone() * k,
            y: self.y.clone() * k,
        }
    }

    /// The slope of the line from `self` to `other`.
    ///
    /// This is symmetric: `a.slope_to(&b) == b.slope_to(&a)`.
    ///
    /// # Panics
    /// Panics if the two points have the same `x` coordinate. Every slope taken
    /// by the sweep is between points of an x-monotone chain, so this indicates a bug.
    pub fn slope_to(&self, other: &Self) -> F {
        assert!(
            self.x != other.x,
            "slope between vertically aligned points {self:?} and {other:?}"
        );
        (other.y.clone() - &self.y) / (other.x.clone() - &self.x)
    }

    /// Like [`Point::slope_to`], but returns `None` instead of overflowing.
    ///
    /// Both points must be finite, with different `x` coordinates.
    pub(crate) fn checked_slope_to(&self, other: &Self) -> Option<F> {
        let dy = finite(other.y.clone() - &self.y)?;
        let dx = finite(other.x.clone() - &self.x)?;
        finite(dy / dx)
    }

    /// The point a fraction `t` of the way from `self` to `other`.
    pub fn affine(&self, other: &Self, t: &F) -> Self {
        let one = F::from_f32(1.0);
        Point {
            x: (one.clone() - t) * &self.x + t.clone() * &other.x,
            y: (one - t) * &self.y + t.clone() * &other.y,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// # Panics
    /// Panics if either coordinate isn't finite.
    pub fn to_exact(&self) -> Point<Rational> {
        Point {
            x: self.x.to_exact(),
            y: self.y.to_exact(),
        }
    }
}

impl<F: Float> From<(F, F)> for Point<F> {
    fn from((x, y): (F, F)) -> Self {
        Self { x, y }
    }
}

impl<F: Float> std::ops::Add for Point<F> {
    type Output = Point<F>;

    fn add(self, rhs: Self) -> Self::Output {
        Point {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl<F: Float> std::ops::Sub for Point<F> {
    type Output = Point<F>;

    fn sub(self, rhs: Self) -> Self::Output {
        self + rhs * F::from_f32(-1.0)
    }
}

impl<F: Float> std::ops::Mul<F> for Point<F> {
    type Output = Point<F>;

    fn mul(self, k: F) -> Self::Output {
        self.scale(&k)
    }
}

/// The signed area of the parallelogram spanned by `b - a` and `c - b`, computed exactly.
///
/// Positive when `a`, `b`, `c` turn counter-clockwise. Returns `None` if any of the
/// points isn't finite.
pub(crate) fn orientation<F: Float>(
    a: &Point<F>,
    b: &Point<F>,
    c: &Point<F>,
) -> Option<Rational> {
    if !(a.is_finite() && b.is_finite() && c.is_finite()) {
        return None;
    }
    let (a, b, c) = (a.to_exact(), b.to_exact(), c.to_exact());
    let ux = &b.x - &a.x;
    let uy = &b.y - &a.y;
    let vx = &c.x - &b.x;
    let vy = &c.y - &b.y;
    Some(ux * vy - uy * vx)
}
