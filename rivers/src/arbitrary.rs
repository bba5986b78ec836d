//! Random valid rivers, and a slow but straightforward width computation to check
//! the sweep against.

use malachite::Rational;
use ordered_float::NotNan;
use proptest::prelude::*;

use crate::{
    contour::{Contour, IslandPolygon},
    geom::Point,
    num::Float,
    river::River,
};

type F64 = NotNan<f64>;

fn p(x: f64, y: f64) -> Point<F64> {
    Point::new(NotNan::new(x).unwrap(), NotNan::new(y).unwrap())
}

/// Horizontal positions are multiples of this, strictly between 0 and 10.
const GRID: f64 = 0.05;
const GRID_SLOTS: u32 = 200;

/// The vertical bands used by a random river with `islands` islands.
///
/// Each island gets its own band, so islands never overlap even when their `x` ranges do.
/// The lower chain stays below the middle of the band and the upper chain above it.
fn island_band(j: usize) -> f64 {
    10.0 * j as f64
}

fn island_points(xs: &[f64], ys: &[f64], upper: &[bool], j: usize) -> Vec<Point<F64>> {
    let mut order: Vec<usize> = (0..xs.len()).collect();
    order.sort_by(|&a, &b| xs[a].total_cmp(&xs[b]));
    let base = island_band(j);

    let (first, last) = (order[0], order[order.len() - 1]);
    let middle = &order[1..order.len() - 1];

    let mut ret = vec![p(xs[first], base + 5.0)];
    ret.extend(
        middle
            .iter()
            .filter(|&&i| !upper[i])
            .map(|&i| p(xs[i], base + 1.0 + 3.0 * ys[i])),
    );
    ret.push(p(xs[last], base + 5.0));
    ret.extend(
        middle
            .iter()
            .rev()
            .filter(|&&i| upper[i])
            .map(|&i| p(xs[i], base + 6.0 + 3.0 * ys[i])),
    );
    ret
}

fn shore_points(xs: &[f64], ys: &[f64], ends: (f64, f64), base: f64) -> Vec<Point<F64>> {
    let mut interior: Vec<(f64, f64)> = xs.iter().copied().zip(ys.iter().copied()).collect();
    interior.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut ret = vec![p(0.0, base + 1.0 + 8.0 * ends.0)];
    ret.extend(interior.iter().map(|&(x, y)| p(x, base + 1.0 + 8.0 * y)));
    ret.push(p(10.0, base + 1.0 + 8.0 * ends.1));
    ret
}

/// A strategy for valid rivers on `[0, 10]`, with up to three interior vertices on each
/// shoreline and up to two islands.
pub fn arb_river() -> impl Strategy<Value = River<F64>> {
    (0usize..4, 0usize..4, prop::collection::vec(3usize..7, 0..3))
        .prop_flat_map(|(a, b, sizes)| {
            let n = a + b + sizes.iter().sum::<usize>();
            let slots = prop::sample::subsequence((1..GRID_SLOTS).collect::<Vec<_>>(), n)
                .prop_shuffle();
            (
                Just((a, b, sizes)),
                slots,
                prop::collection::vec(0.0f64..1.0, n),
                prop::collection::vec(any::<bool>(), n),
                (0.0f64..1.0, 0.0f64..1.0),
                (0.0f64..1.0, 0.0f64..1.0),
            )
        })
        .prop_map(|((a, b, sizes), slots, ys, upper, north_ends, south_ends)| {
            let xs: Vec<f64> = slots.iter().map(|&k| k as f64 * GRID).collect();
            let north_base = island_band(sizes.len());

            let north = shore_points(&xs[..a], &ys[..a], north_ends, north_base);
            let south = shore_points(&xs[a..a + b], &ys[a..a + b], south_ends, -10.0);

            let mut start = a + b;
            let mut islands = Vec::new();
            for (j, &size) in sizes.iter().enumerate() {
                let range = start..start + size;
                islands.push(island_points(
                    &xs[range.clone()],
                    &ys[range.clone()],
                    &upper[range],
                    j,
                ));
                start += size;
            }

            River::new(north, south, islands).unwrap()
        })
}

pub fn to_exact<F: Float>(points: &[Point<F>]) -> Vec<Point<Rational>> {
    points.iter().map(Point::to_exact).collect()
}

/// The height of an x-monotone polyline at `x`, which must be within its horizontal range.
fn chain_y<F: Float>(chain: &[Point<F>], x: &F) -> F {
    let i = chain
        .windows(2)
        .position(|w| w[0].x <= *x && *x <= w[1].x)
        .unwrap();
    let (a, b) = (&chain[i], &chain[i + 1]);
    let t = (x.clone() - &a.x) / (b.x.clone() - &a.x);
    a.affine(b, &t).y
}

/// Splits an island into its lower and upper chains, both running from left to right.
fn island_chains<F: Float>(island: &IslandPolygon<F>) -> (Vec<Point<F>>, Vec<Point<F>>) {
    let beg = island.leftmost().unwrap();
    let end = (0..island.num_points())
        .max_by(|&i, &j| island[i].x.cmp(&island[j].x))
        .unwrap();

    let walk = |step: &dyn Fn(usize) -> usize| {
        let mut ret = vec![island[beg].clone()];
        let mut i = beg;
        while i != end {
            i = step(i);
            ret.push(island[i].clone());
        }
        ret
    };
    (
        walk(&|i| island.next_idx(i)),
        walk(&|i| island.prev_idx(i)),
    )
}

/// The width at `x`, computed by interpolating every shoreline and island chain directly.
pub fn brute_force_width<F: Float>(river: &River<F>, x: &F) -> F {
    let mut width = chain_y(river.north().points(), x) - chain_y(river.south().points(), x);
    for island in river.islands() {
        let (lower, upper) = island_chains(island);
        if lower[0].x < *x && *x < lower[lower.len() - 1].x {
            width = width - (chain_y(&upper, x) - chain_y(&lower, x));
        }
    }
    width
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn generated_islands_are_well_formed(river in arb_river()) {
            for island in river.islands() {
                prop_assert!(island.is_x_monotone());
                prop_assert!(island.is_counter_clockwise());
                let (lower, upper) = island_chains(island);
                prop_assert_eq!(lower.len() + upper.len(), island.num_points() + 2);
            }
        }
    }
}
