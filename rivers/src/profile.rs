use serde::Serialize;

use crate::num::Float;

/// The width function just to the right of a breakpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Breakpoint<F: Float> {
    pub x: F,
    /// The width at `x`.
    pub width: F,
    /// The rate of change of the width, until the next breakpoint.
    pub slope: F,
}

impl<F: Float> Breakpoint<F> {
    fn eval(&self, x: &F) -> F {
        self.slope.clone() * (x.clone() - &self.x) + &self.width
    }
}

/// A river's width function, tabulated at its breakpoints.
///
/// [`River::width_at_x`](crate::River::width_at_x) scans every breakpoint on each
/// query. This does the scan once, so that each query is a binary search. The answers
/// are the same, down to the last bit.
#[derive(Clone, Debug, Serialize)]
pub struct WidthProfile<F: Float> {
    start_x: F,
    end_x: F,
    start_width: F,
    end_width: F,
    /// The first entry is the state at the left edge of the river, and there's one more
    /// for each event. The `x` coordinates after the first one are strictly increasing.
    breakpoints: Vec<Breakpoint<F>>,
}

impl<F: Float> WidthProfile<F> {
    pub(crate) fn new(
        start_x: F,
        end_x: F,
        start_width: F,
        end_width: F,
        breakpoints: Vec<Breakpoint<F>>,
    ) -> Self {
        debug_assert!(!breakpoints.is_empty());
        WidthProfile {
            start_x,
            end_x,
            start_width,
            end_width,
            breakpoints,
        }
    }

    pub fn breakpoints(&self) -> &[Breakpoint<F>] {
        &self.breakpoints
    }

    /// The width at horizontal position `x`.
    ///
    /// Panics in the same situations as [`River::width_at_x`](crate::River::width_at_x).
    pub fn width_at(&self, x: &F) -> F {
        let passed = self.breakpoints[1..].partition_point(|b| b.x <= *x);
        self.breakpoints[passed].eval(x)
    }

    /// The width at fraction `t` of the way across the river, without range checks.
    ///
    /// Like [`River::width`](crate::River::width), the two ends come straight from
    /// the shoreline endpoints.
    pub fn width(&self, t: &F) -> F {
        let zero = F::from_f32(0.0);
        let one = F::from_f32(1.0);
        if *t == zero {
            self.start_width.clone()
        } else if *t == one {
            self.end_width.clone()
        } else {
            let x = self.start_x.clone() + t.clone() * (self.end_x.clone() - &self.start_x);
            self.width_at(&x)
        }
    }

    /// The smallest width over the whole river.
    ///
    /// This is attained either at one of the ends, or at a breakpoint strictly between them.
    pub fn min_width(&self) -> F {
        let inner = self.breakpoints[1..]
            .iter()
            .filter(|b| b.x > self.start_x && b.x < self.end_x)
            .map(|b| b.width.clone());
        [self.start_width.clone(), self.end_width.clone()]
            .into_iter()
            .chain(inner)
            .min()
            .unwrap_or_else(|| self.start_width.clone())
    }
}

#[cfg(test)]
mod tests {
    use malachite::Rational;

    use super::*;

    fn q(n: i64) -> Rational {
        Rational::from(n)
    }

    fn bp(x: i64, width: i64, slope: i64) -> Breakpoint<Rational> {
        Breakpoint {
            x: q(x),
            width: q(width),
            slope: q(slope),
        }
    }

    // A valley: width 10 at x = 0, down to 4 at x = 4, back up to 7 at x = 6.
    fn valley() -> WidthProfile<Rational> {
        WidthProfile::new(
            q(0),
            q(6),
            q(10),
            q(7),
            vec![bp(0, 10, -1), bp(1, 9, -2), bp(3, 5, -1), bp(4, 4, 1), bp(5, 5, 2)],
        )
    }

    #[test]
    fn lookup() {
        let p = valley();
        assert_eq!(p.width_at(&q(0)), q(10));
        assert_eq!(p.width_at(&q(2)), q(7));
        assert_eq!(p.width_at(&q(3)), q(5));
        assert_eq!(p.width_at(&q(4)), q(4));
        assert_eq!(p.width_at(&q(6)), q(7));
        assert_eq!(p.width(&(q(1) / q(2))), q(5));
        assert_eq!(p.width(&q(1)), q(7));
    }

    #[test]
    fn minimum() {
        assert_eq!(valley().min_width(), q(4));

        let flat = WidthProfile::new(q(0), q(6), q(3), q(3), vec![bp(0, 3, 0)]);
        assert_eq!(flat.min_width(), q(3));

        // Breakpoints outside the river don't count.
        let outside = WidthProfile::new(q(0), q(6), q(3), q(3), vec![bp(0, 3, 0), bp(7, -1, 0)]);
        assert_eq!(outside.min_width(), q(3));
    }
}
