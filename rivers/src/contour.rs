use serde::{Deserialize, Serialize};

use crate::{
    geom::{orientation, Point},
    num::Float,
};

/// An indexed sequence of vertices, with some policy for finding a vertex's neighbors.
///
/// The two implementors differ only in what happens at the ends: a [`Shoreline`]
/// is open, so its neighbor lookups clamp to the first and last vertices, while an
/// [`IslandPolygon`] is closed and its lookups wrap around.
pub trait Contour<F: Float> {
    fn points(&self) -> &[Point<F>];

    /// The index of the vertex before `idx`.
    fn prev_idx(&self, idx: usize) -> usize;

    /// The index of the vertex after `idx`.
    fn next_idx(&self, idx: usize) -> usize;

    fn is_x_monotone(&self) -> bool;

    fn num_points(&self) -> usize {
        self.points().len()
    }

    fn get(&self, idx: usize) -> &Point<F> {
        &self.points()[idx]
    }

    fn prev(&self, idx: usize) -> &Point<F> {
        self.get(self.prev_idx(idx))
    }

    fn next(&self, idx: usize) -> &Point<F> {
        self.get(self.next_idx(idx))
    }
}

/// One bank of the river: an open polyline whose `x` coordinates should be
/// strictly increasing.
///
/// Construction doesn't check anything; [`River`](crate::River) does that.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Shoreline<F: Float> {
    points: Vec<Point<F>>,
}

impl<F: Float> Shoreline<F> {
    pub fn new<P: Into<Point<F>>>(ps: impl IntoIterator<Item = P>) -> Self {
        Shoreline {
            points: ps.into_iter().map(|p| p.into()).collect(),
        }
    }

    /// The first vertex, which sits on the left edge of the river.
    ///
    /// # Panics
    /// Panics if the shoreline is empty.
    pub fn first(&self) -> &Point<F> {
        &self.points[0]
    }

    /// The last vertex, which sits on the right edge of the river.
    ///
    /// # Panics
    /// Panics if the shoreline is empty.
    pub fn last(&self) -> &Point<F> {
        &self.points[self.points.len() - 1]
    }

    /// Returns the index of the first vertex that fails to be strictly to the right of its
    /// predecessor, if there is one.
    pub(crate) fn first_non_monotone(&self) -> Option<usize> {
        self.points
            .windows(2)
            .position(|pair| pair[1].x <= pair[0].x)
            .map(|i| i + 1)
    }
}

impl<F: Float> Contour<F> for Shoreline<F> {
    fn points(&self) -> &[Point<F>] {
        &self.points
    }

    fn prev_idx(&self, idx: usize) -> usize {
        idx.saturating_sub(1)
    }

    fn next_idx(&self, idx: usize) -> usize {
        (idx + 1).min(self.points.len().saturating_sub(1))
    }

    fn is_x_monotone(&self) -> bool {
        self.first_non_monotone().is_none()
    }
}

impl<F: Float> std::ops::Index<usize> for Shoreline<F> {
    type Output = Point<F>;

    fn index(&self, idx: usize) -> &Point<F> {
        &self.points[idx]
    }
}

/// An index into a river's list of islands.
#[derive(Clone, Copy, PartialOrd, Ord, PartialEq, Eq, Hash)]
pub struct IslandIdx(pub usize);

impl std::fmt::Debug for IslandIdx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "i_{}", self.0)
    }
}

/// The outline of an island, as a closed cycle of vertices.
///
/// A well-formed island is x-monotone (it has a single leftmost and a single
/// rightmost vertex, joined by a lower and an upper chain) and is oriented
/// counter-clockwise, so that walking forward from the leftmost vertex follows
/// the lower chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IslandPolygon<F: Float> {
    points: Vec<Point<F>>,
}

impl<F: Float> IslandPolygon<F> {
    pub fn new<P: Into<Point<F>>>(ps: impl IntoIterator<Item = P>) -> Self {
        IslandPolygon {
            points: ps.into_iter().map(|p| p.into()).collect(),
        }
    }

    /// The index of the vertex with the smallest `x` coordinate (the first one, on ties).
    pub fn leftmost(&self) -> Option<usize> {
        self.points
            .iter()
            .enumerate()
            .min_by(|(_, p), (_, q)| p.x.cmp(&q.x))
            .map(|(i, _)| i)
    }

    /// Is the boundary walked counter-clockwise?
    ///
    /// Only meaningful for simple polygons. The test looks at the turn made at the
    /// leftmost vertex, which is always convex, and is done in exact arithmetic.
    /// Returns `false` if any of the three vertices involved isn't finite.
    pub fn is_counter_clockwise(&self) -> bool {
        if self.points.len() < 3 {
            return false;
        }
        let Some(i) = self.leftmost() else {
            return false;
        };
        orientation(self.prev(i), self.get(i), self.next(i)).is_some_and(|o| o > 0)
    }

    /// Counts the vertices at which the boundary turns around horizontally.
    ///
    /// Returns `None` if some vertex shares its `x` coordinate with a neighbor, in which
    /// case there's no sensible answer.
    fn x_turns(&self) -> Option<(usize, usize)> {
        let mut minima = 0;
        let mut maxima = 0;
        for i in 0..self.points.len() {
            let x = &self.get(i).x;
            let prev = &self.prev(i).x;
            let next = &self.next(i).x;
            if prev == x || next == x {
                return None;
            }
            if prev > x && next > x {
                minima += 1;
            } else if prev < x && next < x {
                maxima += 1;
            }
        }
        Some((minima, maxima))
    }
}

impl<F: Float> Contour<F> for IslandPolygon<F> {
    fn points(&self) -> &[Point<F>] {
        &self.points
    }

    fn prev_idx(&self, idx: usize) -> usize {
        let n = self.points.len();
        (idx + n - 1) % n
    }

    fn next_idx(&self, idx: usize) -> usize {
        (idx + 1) % self.points.len()
    }

    fn is_x_monotone(&self) -> bool {
        self.points.len() >= 3 && self.x_turns() == Some((1, 1))
    }
}

impl<F: Float> std::ops::Index<usize> for IslandPolygon<F> {
    type Output = Point<F>;

    fn index(&self, idx: usize) -> &Point<F> {
        &self.points[idx]
    }
}
