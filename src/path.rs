//! Drawn paths and lookup of the points and lines they cover.

use std::collections::HashSet;

use itertools::Itertools;
use petgraph::graphmap::UnGraphMap;

use crate::error::PuzzleError;
use crate::location::{Dimension, Line, Location, Slot};

/// A drawn path: one or more strokes of distinct, adjacent points.
///
/// Most puzzles draw a single stroke. Under a [`Symmetry`](crate::Symmetry), the mirrored stroke is drawn alongside it;
/// lines join consecutive points within a stroke and never bridge two strokes.
#[derive(Clone, Debug)]
pub struct Path {
    strokes: Vec<Vec<Location>>,
    // nodes are the points visited, edges the lines drawn
    graph: UnGraphMap<Location, ()>,
    dims: (Dimension, Dimension),
}

impl Path {
    /// A single stroke over a grid `dims` cells in size.
    pub fn new(points: Vec<Location>, dims: (Dimension, Dimension)) -> Result<Self, PuzzleError> {
        Self::with_strokes(vec![points], dims)
    }

    /// Several independent strokes over a grid `dims` cells in size.
    ///
    /// Fails if there are no strokes or any is empty, if a point lies off the grid or is visited twice,
    /// or if two consecutive points of a stroke are not adjacent.
    pub fn with_strokes(strokes: Vec<Vec<Location>>, dims: (Dimension, Dimension)) -> Result<Self, PuzzleError> {
        if strokes.is_empty() || strokes.iter().any(Vec::is_empty) {
            return Err(PuzzleError::EmptyPath);
        }

        let point_count = strokes.iter().map(Vec::len).sum::<usize>();
        let mut graph = UnGraphMap::with_capacity(point_count, point_count);
        let mut seen = HashSet::with_capacity(point_count);

        for point in strokes.iter().flatten() {
            if point.0 > dims.0.get() || point.1 > dims.1.get() {
                return Err(PuzzleError::OutOfRange { slot: Slot::point(*point) });
            }
            if !seen.insert(*point) {
                return Err(PuzzleError::RepeatedPoint { point: *point });
            }
            graph.add_node(*point);
        }

        for stroke in &strokes {
            for (from, to) in stroke.iter().tuple_windows() {
                if Line::between(*from, *to).is_none() {
                    return Err(PuzzleError::NonContiguousPath { from: *from, to: *to });
                }
                graph.add_edge(*from, *to, ());
            }
        }

        Ok(Self { strokes, graph, dims })
    }

    /// Width and height, in cells, of the grid this path was drawn over.
    pub fn dims(&self) -> (Dimension, Dimension) {
        self.dims
    }

    /// The strokes, in the order they were drawn.
    pub fn strokes(&self) -> &[Vec<Location>] {
        &self.strokes
    }

    /// Every point visited, stroke by stroke.
    pub fn points(&self) -> impl Iterator<Item = Location> + '_ {
        self.strokes.iter().flatten().copied()
    }

    /// Every line drawn, stroke by stroke.
    pub fn lines(&self) -> impl Iterator<Item = Line> + '_ {
        self.strokes.iter()
            .flat_map(|stroke| stroke.iter().tuple_windows())
            .filter_map(|(from, to)| Line::between(*from, *to))
    }

    /// Whether the path visits `point`.
    pub fn contains_point(&self, point: Location) -> bool {
        self.graph.contains_node(point)
    }

    /// Whether the path draws `line`.
    pub fn contains_line(&self, line: Line) -> bool {
        let endpoints = line.endpoints();
        self.graph.contains_edge(endpoints.0, endpoints.1)
    }
}
