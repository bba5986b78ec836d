//! The river itself: validation, breakpoint generation, and the width sweep.
//!
//! Between two consecutive breakpoints the width of the river (the vertical
//! distance between the shorelines, minus whatever islands are in the way) is a
//! linear function of `x`. Every vertex of a shoreline or an island is a potential
//! breakpoint, because that's where some bounding segment changes its slope. So to
//! evaluate the width we sweep from left to right over the vertices, keeping track
//! of the current width and its slope, and adjusting the slope at each vertex.

use serde::{Deserialize, Deserializer, Serialize};

use crate::{
    contour::{Contour, IslandIdx, IslandPolygon, Shoreline},
    error::{InvalidRiver, OutOfRange, Shore},
    event::{Event, EventKind, VertexRef},
    geom::Point,
    num::{finite, Float},
    profile::{Breakpoint, WidthProfile},
};

/// Tolerances used when validating a river.
///
/// `eps` applies to the two equality checks whose inputs typically come from
/// parsed text: that the shorelines start and end at the same `x` coordinate,
/// and that no two breakpoints share an `x` coordinate. Two coordinates closer
/// than `eps` count as equal. The default is zero, meaning exact comparison, and a
/// negative tolerance means the same thing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(deserialize = "F: Deserialize<'de>"))]
pub struct RiverCfg<F: Float> {
    #[serde(default = "zero", deserialize_with = "non_negative")]
    pub eps: F,
}

fn zero<F: Float>() -> F {
    F::from_f32(0.0)
}

fn non_negative<'de, F, D>(de: D) -> Result<F, D::Error>
where
    F: Float + Deserialize<'de>,
    D: Deserializer<'de>,
{
    F::deserialize(de).map(|eps| eps.max(zero()))
}

impl<F: Float> Default for RiverCfg<F> {
    fn default() -> Self {
        Self { eps: zero() }
    }
}

impl<F: Float> RiverCfg<F> {
    /// Negative values are clamped to zero.
    pub fn with_eps(eps: F) -> Self {
        Self {
            eps: eps.max(zero()),
        }
    }

    /// Are `a` and `b` equal, up to our tolerance?
    pub fn same_x(&self, a: &F, b: &F) -> bool {
        a == b || (a.clone() - b).abs() <= self.eps
    }
}

/// A river, bounded by a north and a south shoreline, with some islands in between.
///
/// Rivers are validated on construction and immutable afterwards.
#[derive(Clone, Debug)]
pub struct River<F: Float> {
    north: Shoreline<F>,
    south: Shoreline<F>,
    islands: Vec<IslandPolygon<F>>,
    cfg: RiverCfg<F>,
    plan: SweepPlan<F>,
}

/// Everything the sweep needs, computed once at construction.
#[derive(Clone, Debug)]
struct SweepPlan<F: Float> {
    /// All breakpoints, sorted by `x`.
    events: Vec<Event<F>>,
    /// The slope of the width at the left edge of the river.
    start_slope: F,
    /// How much the slope changes at each event, in the same order as `events`.
    slope_changes: Vec<F>,
}

impl<F: Float> River<F> {
    /// Builds a river with exact validity checks. See [`River::with_cfg`].
    pub fn new<P, I>(
        north: impl IntoIterator<Item = P>,
        south: impl IntoIterator<Item = P>,
        islands: impl IntoIterator<Item = I>,
    ) -> Result<Self, InvalidRiver>
    where
        P: Into<Point<F>>,
        I: IntoIterator<Item = P>,
    {
        Self::with_cfg(north, south, islands, RiverCfg::default())
    }

    /// Builds a river, checking that
    ///
    /// 1. every coordinate is finite,
    /// 2. both shorelines have at least two points and are x-monotone,
    /// 3. the shorelines start and end at the same `x` coordinates,
    /// 4. the north shoreline starts above the south one,
    /// 5. every island has at least three points, is x-monotone, and is counter-clockwise,
    /// 6. no two breakpoints have the same `x` coordinate,
    /// 7. computing the width doesn't overflow, anywhere between the two ends.
    ///
    /// Whether the shorelines cross each other, and whether the islands are actually
    /// between them, is not checked.
    pub fn with_cfg<P, I>(
        north: impl IntoIterator<Item = P>,
        south: impl IntoIterator<Item = P>,
        islands: impl IntoIterator<Item = I>,
        cfg: RiverCfg<F>,
    ) -> Result<Self, InvalidRiver>
    where
        P: Into<Point<F>>,
        I: IntoIterator<Item = P>,
    {
        let mut river = River {
            north: Shoreline::new(north),
            south: Shoreline::new(south),
            islands: islands
                .into_iter()
                .map(|island| IslandPolygon::new(island))
                .collect(),
            cfg,
            plan: SweepPlan {
                events: Vec::new(),
                start_slope: zero(),
                slope_changes: Vec::new(),
            },
        };

        match river.plan() {
            Ok(plan) => river.plan = plan,
            Err(e) => {
                tracing::debug!(error = %e, "rejected river configuration");
                return Err(e);
            }
        }

        tracing::debug!(
            north = river.north.num_points(),
            south = river.south.num_points(),
            islands = river.islands.len(),
            events = river.plan.events.len(),
            "built river"
        );
        Ok(river)
    }

    pub fn north(&self) -> &Shoreline<F> {
        &self.north
    }

    pub fn south(&self) -> &Shoreline<F> {
        &self.south
    }

    pub fn islands(&self) -> &[IslandPolygon<F>] {
        &self.islands
    }

    pub fn island(&self, idx: IslandIdx) -> &IslandPolygon<F> {
        &self.islands[idx.0]
    }

    pub fn cfg(&self) -> &RiverCfg<F> {
        &self.cfg
    }

    /// Re-runs all the construction checks.
    ///
    /// This always succeeds for a river that was built with [`River::new`] or
    /// [`River::with_cfg`].
    pub fn validate(&self) -> Result<(), InvalidRiver> {
        self.plan().map(drop)
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    fn plan(&self) -> Result<SweepPlan<F>, InvalidRiver> {
        self.check_geometry()?;
        let events = self.sorted_events_checked()?;
        self.checked_sweep(events)
    }

    fn first_non_finite(&self) -> Option<VertexRef> {
        let bad = |points: &[Point<F>]| points.iter().position(|p| !p.is_finite());
        if let Some(i) = bad(self.north.points()) {
            return Some(VertexRef::North(i));
        }
        if let Some(i) = bad(self.south.points()) {
            return Some(VertexRef::South(i));
        }
        self.islands.iter().enumerate().find_map(|(j, island)| {
            bad(island.points()).map(|i| VertexRef::Island(IslandIdx(j), i))
        })
    }

    /// Checks the shape of the river: everything except for the uniqueness of the
    /// breakpoints and the arithmetic.
    fn check_geometry(&self) -> Result<(), InvalidRiver> {
        if let Some(vertex) = self.first_non_finite() {
            return Err(InvalidRiver::NonFiniteCoordinate(vertex));
        }

        for (shore, line) in [(Shore::North, &self.north), (Shore::South, &self.south)] {
            if line.num_points() < 2 {
                return Err(InvalidRiver::ShorelineTooShort {
                    shore,
                    len: line.num_points(),
                });
            }
            if let Some(idx) = line.first_non_monotone() {
                return Err(InvalidRiver::ShorelineNotMonotone { shore, idx });
            }
        }

        if !self.cfg.same_x(&self.north.first().x, &self.south.first().x) {
            return Err(InvalidRiver::StartMismatch);
        }
        if !self.cfg.same_x(&self.north.last().x, &self.south.last().x) {
            return Err(InvalidRiver::EndMismatch);
        }

        if self.north.first().y <= self.south.first().y {
            return Err(InvalidRiver::NotNorthOfSouth);
        }

        for (i, island) in self.islands.iter().enumerate() {
            let idx = IslandIdx(i);
            if island.num_points() < 3 {
                return Err(InvalidRiver::IslandTooSmall {
                    island: idx,
                    len: island.num_points(),
                });
            }
            if !island.is_x_monotone() {
                return Err(InvalidRiver::IslandNotMonotone(idx));
            }
            if !island.is_counter_clockwise() {
                return Err(InvalidRiver::IslandClockwise(idx));
            }
        }

        Ok(())
    }

    /// Sorts the breakpoints, and checks that no two of them share an `x` coordinate.
    fn sorted_events_checked(&self) -> Result<Vec<Event<F>>, InvalidRiver> {
        let mut events = self.events();
        events.sort_by(|a, b| a.x.cmp(&b.x));

        for pair in events.windows(2) {
            if self.cfg.same_x(&pair[0].x, &pair[1].x) {
                return Err(InvalidRiver::SharedEventX(
                    pair[0].kind.vertex(),
                    pair[1].kind.vertex(),
                ));
            }
        }
        Ok(events)
    }

    /// Computes the slope of the width at the left edge and how it changes at every
    /// event, and runs the whole sweep once to check that none of it overflows.
    ///
    /// Every query between the two ends then works with values bounded by the ones
    /// checked here.
    fn checked_sweep(&self, events: Vec<Event<F>>) -> Result<SweepPlan<F>, InvalidRiver> {
        let (n, s) = (&self.north, &self.south);
        let overflow = InvalidRiver::Overflow;
        let left = VertexRef::North(0);
        let right = VertexRef::North(n.num_points() - 1);

        finite(n.last().x.clone() - &n.first().x).ok_or(overflow(right))?;
        let mut width = finite(self.start_width()).ok_or(overflow(left))?;
        let start_slope = n[0]
            .checked_slope_to(&n[1])
            .zip(s[0].checked_slope_to(&s[1]))
            .and_then(|(north, south)| finite(north - south))
            .ok_or(overflow(left))?;
        finite(self.end_width()).ok_or(overflow(right))?;

        let mut x = n.first().x.clone();
        let mut slope = start_slope.clone();
        let mut slope_changes = Vec::with_capacity(events.len());
        for ev in &events {
            let here = overflow(ev.kind.vertex());
            width = checked_eval(&x, &width, &slope, &ev.x).ok_or_else(|| here.clone())?;
            let change = self.slope_change(&ev.kind).ok_or_else(|| here.clone())?;
            slope = finite(slope + &change).ok_or(here)?;
            x = ev.x.clone();
            slope_changes.push(change);
        }
        if x < n.last().x {
            checked_eval(&x, &width, &slope, &n.last().x).ok_or(overflow(right))?;
        }

        Ok(SweepPlan {
            events,
            start_slope,
            slope_changes,
        })
    }

    /// The number of breakpoints: every interior shoreline vertex, and every island vertex.
    pub fn num_events(&self) -> usize {
        self.north.num_points().saturating_sub(2)
            + self.south.num_points().saturating_sub(2)
            + self
                .islands
                .iter()
                .map(|island| island.num_points())
                .sum::<usize>()
    }

    /// All the breakpoints, in the order they were generated: north, then south,
    /// then each island in turn.
    pub fn events(&self) -> Vec<Event<F>> {
        let mut events = Vec::with_capacity(self.num_events());

        let interior = |line: &Shoreline<F>| 1..line.num_points().saturating_sub(1);
        for i in interior(&self.north) {
            events.push(Event {
                x: self.north[i].x.clone(),
                kind: EventKind::UpperShore(i),
            });
        }
        for i in interior(&self.south) {
            events.push(Event {
                x: self.south[i].x.clone(),
                kind: EventKind::LowerShore(i),
            });
        }

        for (island_idx, island) in self.islands.iter().enumerate() {
            for i in 0..island.num_points() {
                let x = &island[i].x;
                events.push(Event {
                    x: x.clone(),
                    kind: EventKind::island_vertex(
                        &island.prev(i).x,
                        x,
                        &island.next(i).x,
                        IslandIdx(island_idx),
                        i,
                    ),
                });
            }
        }

        events
    }

    /// All the breakpoints, sorted by increasing `x`.
    pub fn sorted_events(&self) -> &[Event<F>] {
        &self.plan.events
    }

    /// The `x` coordinate at fraction `t` of the way across the river.
    pub fn x_at(&self, t: &F) -> F {
        let x0 = &self.north.first().x;
        let x1 = &self.north.last().x;
        x0.clone() + t.clone() * (x1.clone() - x0)
    }

    /// The width at the left edge of the river.
    pub fn start_width(&self) -> F {
        self.north.first().y.clone() - &self.south.first().y
    }

    /// The width at the right edge of the river.
    pub fn end_width(&self) -> F {
        self.north.last().y.clone() - &self.south.last().y
    }

    /// The width of the river at fraction `t` of the way across.
    ///
    /// The two ends are computed directly from the shoreline endpoints; everything in
    /// between comes from sweeping over the breakpoints.
    pub fn width(&self, t: F) -> Result<F, OutOfRange<F>> {
        let zero = F::from_f32(0.0);
        let one = F::from_f32(1.0);
        if t < zero || t > one {
            return Err(OutOfRange { t });
        }

        if t == zero {
            Ok(self.start_width())
        } else if t == one {
            Ok(self.end_width())
        } else {
            Ok(self.width_at_x(&self.x_at(&t)))
        }
    }

    /// The width of the river at horizontal position `x`, by a linear scan over the breakpoints.
    ///
    /// Outside of the river's horizontal extent this extrapolates the first or last piece.
    ///
    /// # Panics
    /// With `NotNan` coordinates, this panics if `x` is so far outside the river that
    /// the extrapolation overflows into a NaN. Anywhere between the two ends, it doesn't.
    pub fn width_at_x(&self, x: &F) -> F {
        let mut state = SweepState::start(self);
        for (ev, change) in self.steps().take_while(|(ev, _)| ev.x <= *x) {
            state.advance(ev, change);
        }
        state.eval(x)
    }

    /// The smallest width anywhere in the river.
    ///
    /// The width is piecewise linear, so it's enough to look at the two ends and at
    /// the breakpoints.
    pub fn min_width(&self) -> F {
        self.profile().min_width()
    }

    /// Precomputes the width function, for answering many queries quickly.
    pub fn profile(&self) -> WidthProfile<F> {
        let mut state = SweepState::start(self);
        let mut states = Vec::with_capacity(self.plan.events.len() + 1);
        states.push(state.clone());
        for (ev, change) in self.steps() {
            state.advance(ev, change);
            states.push(state.clone());
        }
        WidthProfile::new(
            self.north.first().x.clone(),
            self.north.last().x.clone(),
            self.start_width(),
            self.end_width(),
            states.into_iter().map(SweepState::into_breakpoint).collect(),
        )
    }

    /// The sorted events, along with how much the slope changes at each one.
    fn steps(&self) -> impl Iterator<Item = (&Event<F>, &F)> {
        self.plan.events.iter().zip(&self.plan.slope_changes)
    }

    /// How much the slope of the width changes at a breakpoint, or `None` if that
    /// overflows.
    fn slope_change(&self, kind: &EventKind) -> Option<F> {
        let (plus, minus) = match *kind {
            EventKind::UpperShore(i) => {
                let n = &self.north;
                (
                    n[i].checked_slope_to(n.next(i))?,
                    n.prev(i).checked_slope_to(&n[i])?,
                )
            }
            EventKind::LowerShore(i) => {
                let s = &self.south;
                (
                    s.prev(i).checked_slope_to(&s[i])?,
                    s[i].checked_slope_to(s.next(i))?,
                )
            }
            // At the leftmost vertex the lower chain leaves forwards and the upper chain
            // leaves backwards. At the rightmost vertex it's the other way around, but
            // the upper chain is now the one that matters with a positive sign, so the
            // formula ends up the same.
            EventKind::BegIsland(island, i) | EventKind::EndIsland(island, i) => {
                let p = self.island(island);
                (
                    p[i].checked_slope_to(p.next(i))?,
                    p[i].checked_slope_to(p.prev(i))?,
                )
            }
            // The upper chain is walked backwards, so its incoming segment is the one to
            // the next vertex. The island's top gets subtracted from the width.
            EventKind::UpperIsland(island, i) => {
                let p = self.island(island);
                (
                    p.next(i).checked_slope_to(&p[i])?,
                    p[i].checked_slope_to(p.prev(i))?,
                )
            }
            EventKind::LowerIsland(island, i) => {
                let p = self.island(island);
                (
                    p[i].checked_slope_to(p.next(i))?,
                    p.prev(i).checked_slope_to(&p[i])?,
                )
            }
        };
        finite(plus - minus)
    }
}

/// `width + slope * (to - from)`, the same way [`SweepState::eval`] computes it, or `None`
/// if anything along the way overflows.
fn checked_eval<F: Float>(from: &F, width: &F, slope: &F, to: &F) -> Option<F> {
    let dx = finite(to.clone() - from)?;
    let dw = finite(slope.clone() * dx)?;
    finite(dw + width)
}

/// The state of the width sweep, just after processing the breakpoint at `x`.
#[derive(Clone, Debug)]
struct SweepState<F: Float> {
    x: F,
    width: F,
    slope: F,
}

impl<F: Float> SweepState<F> {
    fn start(river: &River<F>) -> Self {
        SweepState {
            x: river.north.first().x.clone(),
            width: river.start_width(),
            slope: river.plan.start_slope.clone(),
        }
    }

    fn advance(&mut self, ev: &Event<F>, slope_change: &F) {
        self.width = self.eval(&ev.x);
        self.x = ev.x.clone();
        self.slope = self.slope.clone() + slope_change;
    }

    fn eval(&self, x: &F) -> F {
        self.slope.clone() * (x.clone() - &self.x) + &self.width
    }

    fn into_breakpoint(self) -> Breakpoint<F> {
        Breakpoint {
            x: self.x,
            width: self.width,
            slope: self.slope,
        }
    }
}
