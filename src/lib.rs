#![warn(missing_docs)]

//! # `pathcheck`
//!
//! A validator for grid path-drawing puzzles in the style of The Witness: a path is drawn along the lines of a grid,
//! and the regions it cuts the grid into must each satisfy the symbols inside them.
//! Begin by building a [`Grid`] and placing [`Entity`]s on its points, lines and cells, then describe the drawn path as a [`Path`].
//! Pass both to [`validate`] (or a configured [`Validator`]) to receive a [`Verdict`].
//!
//! # Internals
//! A grid `w` by `h` cells in size is stored at doubled resolution, `2w + 1` by `2h + 1` slots, so points, lines and cells
//! share one array and the kind of a slot follows from the parity of its coordinates. See [`Slot`].
//!
//! Validation proceeds as follows:
//!
//! 1. Symbols which only depend on their own slot are checked first. A hexagon must lie on the path; a triangle must be
//! bordered by exactly as many path lines as it shows.
//! 2. The path partitions the cells into regions with a union-find flood fill.
//! 3. Each region is checked against its symbols. Squares of different colors may not share a region. A star must share
//! its region with exactly one other symbol of its color. Polyominos, with negative polyominos subtracting area, must tile
//! their region exactly; this is decided by a breadth-first search bounded by a timeout.
//! 4. Error symbols in a region excuse exactly as many failures there. A region with error symbols it cannot spend exactly fails.

pub use entity::{Color, Entity, Kind, TriangleCount};
pub use error::PuzzleError;
pub use grid::{Grid, Symmetry};
pub use grouping::Region;
pub use location::{Coord, Dimension, Line, Location, Offset, Slot, SlotKind};
pub use path::Path;
pub use shape::Polyomino;
pub use step::Step;
pub use validate::{validate, Validator, ValidatorConfig, Verdict};

pub mod entity;
pub mod error;
pub mod grid;
pub mod grouping;
pub(crate) mod location;
pub mod path;
pub mod shape;
pub(crate) mod step;
pub mod tetris;
pub mod validate;
