//! Partitioning the cells of a grid into the regions a [`Path`] separates.

use std::collections::HashSet;

use itertools::Itertools;
use ndarray::Array2;
use strum::VariantArray;

use crate::location::{Coord, Location, Slot, SlotKind};
use crate::path::Path;
use crate::shape::Polyomino;
use crate::step::Step;

/// A maximal set of cells mutually reachable without crossing the path.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Region {
    // sorted
    cells: Vec<Location>,
    members: HashSet<Location>,
    top_left: Location,
    shape: Polyomino,
}

impl Region {
    fn finalize(mut cells: Vec<Location>) -> Self {
        cells.sort();
        let (min_i, max_i) = cells.iter().map(|cell| cell.0).minmax().into_option().unwrap_or_default();
        let (min_j, max_j) = cells.iter().map(|cell| cell.1).minmax().into_option().unwrap_or_default();
        let members: HashSet<Location> = cells.iter().copied().collect();

        let shape = Polyomino::from_cells(Array2::from_shape_fn(
            (max_j - min_j + 1, max_i - min_i + 1),
            |(j, i)| members.contains(&Location(min_i + i, min_j + j)),
        ));

        Self { cells, members, top_left: Location(min_i, min_j), shape }
    }

    /// Every cell of the region, in ascending order.
    pub fn cells(&self) -> &[Location] {
        &self.cells
    }

    /// The number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Regions are never empty; provided for completeness alongside [`len`](Self::len).
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Whether `cell` is part of this region.
    pub fn contains(&self, cell: Location) -> bool {
        self.members.contains(&cell)
    }

    /// The top left corner of the region's bounding box.
    pub fn top_left(&self) -> Location {
        self.top_left
    }

    /// The region as a shape over its bounding box, for tiling.
    pub fn shape(&self) -> &Polyomino {
        &self.shape
    }
}

/// Union-find over cells, each region a record in an arena addressed by index.
struct RegionArena {
    // which record every cell belongs to, indexed (j, i)
    owner: Array2<usize>,
    // cells of each record; emptied when merged away
    records: Vec<Vec<Location>>,
}

impl RegionArena {
    fn new(width: Coord, height: Coord) -> Self {
        Self {
            owner: Array2::from_shape_fn((height, width), |(j, i)| j * width + i),
            records: (0..height)
                .flat_map(|j| (0..width).map(move |i| vec![Location(i, j)]))
                .collect(),
        }
    }

    fn find(&self, cell: Location) -> usize {
        self.owner[cell.as_index()]
    }

    /// Merge the regions holding `a` and `b`, moving the smaller record into the larger.
    fn union(&mut self, a: Location, b: Location) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return;
        }

        let (into, from) = if self.records[ra].len() >= self.records[rb].len() { (ra, rb) } else { (rb, ra) };
        let moved = std::mem::take(&mut self.records[from]);
        for cell in &moved {
            self.owner[cell.as_index()] = into;
        }
        self.records[into].extend(moved);
    }
}

impl Path {
    fn cell_neighbors(&self, cell: Location) -> impl Iterator<Item = Location> + '_ {
        let (width, height) = (self.dims().0.get(), self.dims().1.get());
        Step::VARIANTS.iter().filter_map(move |step| {
            let neighbor = step.attempt_from(cell);
            (neighbor.0 < width && neighbor.1 < height && !self.contains_line(step.cell_edge(cell)))
                .then_some(neighbor)
        })
    }

    /// Partition the grid's cells into regions separated by this path.
    ///
    /// Without `seeds`, every region is returned. With them, only regions containing at least one seed are;
    /// seeds off the grid are ignored. Regions come out ordered by their smallest cell.
    pub fn groupings(&self, seeds: Option<&[Location]>) -> Vec<Region> {
        let (width, height) = (self.dims().0.get(), self.dims().1.get());
        let mut arena = RegionArena::new(width, height);
        let mut visited = Array2::from_elem((height, width), false);

        let starts = match seeds {
            Some(seeds) => seeds.iter().copied().filter(|seed| seed.0 < width && seed.1 < height).collect_vec(),
            None => (0..height).flat_map(|j| (0..width).map(move |i| Location(i, j))).collect_vec(),
        };

        for start in &starts {
            let mut stack = vec![*start];
            while let Some(cell) = stack.pop() {
                if visited[cell.as_index()] {
                    continue;
                }
                visited[cell.as_index()] = true;

                for neighbor in self.cell_neighbors(cell) {
                    arena.union(cell, neighbor);
                    stack.push(neighbor);
                }
            }
        }

        let wanted: HashSet<usize> = starts.iter().map(|start| arena.find(*start)).collect();
        arena.records.into_iter()
            .enumerate()
            .filter(|(index, cells)| !cells.is_empty() && wanted.contains(index))
            .map(|(_, cells)| Region::finalize(cells))
            .sorted_by_key(|region| region.cells[0])
            .collect_vec()
    }

    /// Whether `slot` lies wholly inside `region`: every cell it touches is in the region.
    ///
    /// Cells beyond the edge of the grid count as inside every region, so a point on the border
    /// only needs its cells within the grid to belong.
    pub fn grouping_includes(&self, region: &Region, slot: Slot) -> bool {
        let (width, height) = (self.dims().0.get(), self.dims().1.get());
        let included = |di: isize, dj: isize| {
            let cell = slot.location.offset_by((di, dj));
            // off the top or left edge wraps past the bottom or right edge
            cell.0 >= width || cell.1 >= height || region.contains(cell)
        };

        match slot.kind {
            SlotKind::Cell => included(0, 0),
            SlotKind::Point => included(0, 0) && included(-1, 0) && included(0, -1) && included(-1, -1),
            SlotKind::HLine => included(0, 0) && included(0, -1),
            SlotKind::VLine => included(0, 0) && included(-1, 0),
        }
    }
}
