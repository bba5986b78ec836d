//! Widths of rivers with islands.
//!
//! A [`River`] is bounded above by a north [`Shoreline`] and below by a south one, and
//! may contain any number of x-monotone [`IslandPolygon`]s. Its width at a horizontal
//! position is the total vertical extent of water there: the distance between the
//! shorelines, minus the height of every island in the way.

mod contour;
mod error;
mod event;
mod geom;
mod num;
mod profile;
pub mod read;
mod river;

pub use contour::{Contour, IslandIdx, IslandPolygon, Shoreline};
pub use error::{InvalidRiver, OutOfRange, ReadError, Shore};
pub use event::{Event, EventCategory, EventKind, VertexRef};
pub use geom::Point;
pub use num::Float;
pub use profile::{Breakpoint, WidthProfile};
pub use read::RiverPoints;
pub use river::{River, RiverCfg};

#[cfg(test)]
mod arbitrary;
