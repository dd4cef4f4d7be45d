//! Structural errors raised while building grids, shapes and paths.

use std::fmt::{Display, Formatter};

use crate::location::{Location, Slot};

/// Reasons input to this crate may be rejected outright, before any validation happens.
///
/// Constraint violations found while validating are never reported this way; see [`Verdict`](crate::Verdict).
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PuzzleError {
    /// A setter addressed a slot outside the grid.
    OutOfRange {
        /// The offending slot.
        slot: Slot,
    },
    /// Two consecutive path points, or the two ends of a line, are not adjacent.
    NonContiguousPath {
        /// The earlier point.
        from: Location,
        /// The later point.
        to: Location,
    },
    /// A path visits the same point twice.
    RepeatedPoint {
        /// The point visited again.
        point: Location,
    },
    /// A path, or one of its strokes, has no points.
    EmptyPath,
    /// A polyomino's cell list does not divide into rows of its width.
    BadShape {
        /// The declared width.
        width: usize,
        /// The number of cells supplied.
        cells: usize,
    },
    /// A triangle count outside `1..=3`.
    BadTriangleCount(u8),
    /// A path or shape was combined with a grid of different dimensions, or grown to a size too small for it.
    BadDimensions,
}

impl Display for PuzzleError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OutOfRange { slot } => write!(f, "{:?} at {:?} is outside the grid", slot.kind, slot.location),
            Self::NonContiguousPath { from, to } => write!(f, "path steps from {from:?} to non-adjacent {to:?}"),
            Self::RepeatedPoint { point } => write!(f, "path visits {point:?} more than once"),
            Self::EmptyPath => write!(f, "path has no points"),
            Self::BadShape { width, cells } => write!(f, "{cells} cells do not form rows of width {width}"),
            Self::BadTriangleCount(count) => write!(f, "triangle count {count} is not between 1 and 3"),
            Self::BadDimensions => write!(f, "dimensions do not agree"),
        }
    }
}

impl std::error::Error for PuzzleError {}
