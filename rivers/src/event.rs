use serde::{Deserialize, Serialize};

use crate::{contour::IslandIdx, num::Float};

/// The different reasons for the width of a river to change slope.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventCategory {
    /// An interior vertex of the north shoreline.
    UpperShore,
    /// An interior vertex of the south shoreline.
    LowerShore,
    /// The leftmost vertex of an island, where it starts to block the water.
    BegIsland,
    /// The rightmost vertex of an island.
    EndIsland,
    /// A vertex on the upper chain of an island.
    UpperIsland,
    /// A vertex on the lower chain of an island.
    LowerIsland,
}

impl EventCategory {
    /// Classifies an island vertex by comparing its `x` coordinate to those of its
    /// predecessor and successor on a counter-clockwise island.
    ///
    /// A neighbor sharing the vertex's `x` coordinate gets `BegIsland`. Such an island
    /// isn't x-monotone, so a [`River`](crate::River) never contains one.
    pub fn of_island_vertex<F: Float>(prev: &F, x: &F, next: &F) -> Self {
        EventKind::island_vertex(prev, x, next, IslandIdx(0), 0).category()
    }
}

/// A vertex of a river, identified by where it lives.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexRef {
    North(usize),
    South(usize),
    Island(IslandIdx, usize),
}

impl std::fmt::Debug for VertexRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VertexRef::North(idx) => write!(f, "north[{idx}]"),
            VertexRef::South(idx) => write!(f, "south[{idx}]"),
            VertexRef::Island(island, idx) => write!(f, "{island:?}[{idx}]"),
        }
    }
}

/// The vertex that produced an event, along with what kind of vertex it is.
///
/// Shoreline events only ever come from interior vertices, which is what makes
/// it safe to look at both of their neighbors.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    UpperShore(usize),
    LowerShore(usize),
    BegIsland(IslandIdx, usize),
    EndIsland(IslandIdx, usize),
    UpperIsland(IslandIdx, usize),
    LowerIsland(IslandIdx, usize),
}

impl EventKind {
    /// The event for vertex `idx` of a counter-clockwise island, given the `x` coordinates
    /// of the vertex and its two neighbors.
    pub fn island_vertex<F: Float>(
        prev: &F,
        x: &F,
        next: &F,
        island: IslandIdx,
        idx: usize,
    ) -> Self {
        use std::cmp::Ordering::*;

        match (prev.cmp(x), next.cmp(x)) {
            (Greater, Greater) => EventKind::BegIsland(island, idx),
            (Less, Less) => EventKind::EndIsland(island, idx),
            (Greater, Less) => EventKind::UpperIsland(island, idx),
            (Less, Greater) => EventKind::LowerIsland(island, idx),
            (Equal, _) | (_, Equal) => EventKind::BegIsland(island, idx),
        }
    }

    pub fn category(&self) -> EventCategory {
        match self {
            EventKind::UpperShore(_) => EventCategory::UpperShore,
            EventKind::LowerShore(_) => EventCategory::LowerShore,
            EventKind::BegIsland(..) => EventCategory::BegIsland,
            EventKind::EndIsland(..) => EventCategory::EndIsland,
            EventKind::UpperIsland(..) => EventCategory::UpperIsland,
            EventKind::LowerIsland(..) => EventCategory::LowerIsland,
        }
    }

    pub fn vertex(&self) -> VertexRef {
        match *self {
            EventKind::UpperShore(idx) => VertexRef::North(idx),
            EventKind::LowerShore(idx) => VertexRef::South(idx),
            EventKind::BegIsland(island, idx)
            | EventKind::EndIsland(island, idx)
            | EventKind::UpperIsland(island, idx)
            | EventKind::LowerIsland(island, idx) => VertexRef::Island(island, idx),
        }
    }
}

impl std::fmt::Debug for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}({:?})", self.category(), self.vertex())
    }
}

/// A breakpoint of the width function.
#[derive(Clone, PartialEq, Eq)]
pub struct Event<F: Float> {
    pub x: F,
    pub kind: EventKind,
}

impl<F: Float> Event<F> {
    pub fn category(&self) -> EventCategory {
        self.kind.category()
    }
}

impl<F: Float> std::fmt::Debug for Event<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?} -> {:?}", self.x, self.kind)
    }
}
