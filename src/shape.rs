//! Polyomino geometry, independent of any [`Grid`](crate::Grid).
//!
//! A [`Polyomino`] is a rectangle of booleans. The same representation serves for the pieces drawn in cells,
//! for the area of a region those pieces must tile, and for the intermediate grids of the tiling search.

use std::collections::VecDeque;
use std::fmt::{Display, Formatter};

use itertools::{Itertools, MinMaxResult};
use ndarray::{s, Array2};

use crate::error::PuzzleError;
use crate::location::Offset;

/// A rectangular boolean shape, stored row-major.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Polyomino {
    // rows, columns
    cells: Array2<bool>,
    free: bool,
    negative: bool,
}

/// Order-able identity of a cell pattern, ignoring the `free` and `negative` flags.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ShapeKey {
    width: usize,
    height: usize,
    bits: Vec<bool>,
}

/// How far a placement may stray from the area it is placed on, and how many of its cells may do so.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct NegativeAllowance {
    /// Columns a placement may overhang on either side.
    pub width: usize,
    /// Rows a placement may overhang on either side.
    pub height: usize,
    /// Cells of one placement which may land off the area.
    pub count: usize,
}

impl NegativeAllowance {
    /// The allowance spanned by `pieces`: the largest width and height any of them can take, and their total area.
    ///
    /// Returns [`None`] when there are no pieces.
    pub fn covering<'a>(pieces: impl IntoIterator<Item = &'a Polyomino>) -> Option<Self> {
        pieces.into_iter().fold(None, |acc: Option<Self>, piece| {
            let acc = acc.unwrap_or_default();
            let (width, height) = if piece.free {
                let long = piece.width().max(piece.height());
                (long, long)
            } else {
                (piece.width(), piece.height())
            };

            Some(Self {
                width: acc.width.max(width),
                height: acc.height.max(height),
                count: acc.count + piece.area(),
            })
        })
    }
}

/// A placement of a piece on an area, as found by [`Polyomino::fits`].
#[derive(Clone, Debug)]
pub struct Fit<'a> {
    /// Column of the piece's top left corner, in the area's coordinates. May be negative.
    pub i: isize,
    /// Row of the piece's top left corner, in the area's coordinates. May be negative.
    pub j: isize,
    /// The placed piece.
    pub piece: &'a Polyomino,
    /// The piece's cells which landed off the area, in the piece's own coordinates, if there were any.
    pub missing: Option<Polyomino>,
}

impl Fit<'_> {
    /// The piece's top left corner.
    pub fn position(&self) -> Offset {
        (self.i, self.j)
    }
}

impl Polyomino {
    /// Build a shape from a row-major list of cells, `width` to a row.
    pub fn new(width: usize, cells: Vec<bool>) -> Result<Self, PuzzleError> {
        if width == 0 || cells.is_empty() || cells.len() % width != 0 {
            return Err(PuzzleError::BadShape { width, cells: cells.len() });
        }

        let len = cells.len();
        let cells = Array2::from_shape_vec((len / width, width), cells)
            .map_err(|_| PuzzleError::BadShape { width, cells: len })?;

        Ok(Self::from_cells(cells))
    }

    /// Build a shape from rows of text, `#` marking a set cell and anything else a clear one.
    pub fn from_rows(rows: &[&str]) -> Result<Self, PuzzleError> {
        let width = rows.first().map_or(0, |row| row.chars().count());
        let cells = rows.iter().flat_map(|row| row.chars().map(|c| c == '#')).collect_vec();
        if rows.iter().any(|row| row.chars().count() != width) {
            return Err(PuzzleError::BadShape { width, cells: cells.len() });
        }

        Self::new(width, cells)
    }

    pub(crate) fn from_cells(cells: Array2<bool>) -> Self {
        Self { cells, free: false, negative: false }
    }

    /// Mark whether this shape may be matched in any of its four rotations.
    pub fn with_free(mut self, free: bool) -> Self {
        self.free = free;
        self
    }

    /// Mark whether this shape subtracts area rather than covering it.
    pub fn with_negative(mut self, negative: bool) -> Self {
        self.negative = negative;
        self
    }

    /// Whether this shape may be matched in any of its four rotations.
    pub fn is_free(&self) -> bool {
        self.free
    }

    /// Whether this shape subtracts area rather than covering it.
    pub fn is_negative(&self) -> bool {
        self.negative
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.cells.ncols()
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.cells.nrows()
    }

    /// Number of set cells.
    pub fn area(&self) -> usize {
        self.cells.iter().filter(|cell| **cell).count()
    }

    /// Whether no cell is set.
    pub fn is_empty(&self) -> bool {
        !self.cells.iter().any(|cell| *cell)
    }

    /// Whether the cell at column `i`, row `j` is set. Coordinates outside the shape are never set.
    pub fn get(&self, i: usize, j: usize) -> bool {
        self.cells.get((j, i)).copied().unwrap_or(false)
    }

    pub(crate) fn is_set(&self, at: Offset) -> bool {
        at.0 >= 0 && at.1 >= 0 && self.get(at.0 as usize, at.1 as usize)
    }

    /// Identity of the cell pattern.
    pub fn key(&self) -> ShapeKey {
        ShapeKey {
            width: self.width(),
            height: self.height(),
            bits: self.cells.iter().copied().collect_vec(),
        }
    }

    /// Shrink to the tight bounding box of the set cells.
    ///
    /// Every coordinate in `relative`, expressed in this shape's system, is moved into the reduced shape's system.
    /// A shape without set cells reduces to 0 by 0 and leaves `relative` alone.
    pub fn reduce(&self, relative: &mut [Offset]) -> Polyomino {
        let set = self.cells.indexed_iter()
            .filter(|(_, cell)| **cell)
            .map(|(index, _)| index)
            .collect_vec();

        let (rows, columns) = match (set.iter().map(|(j, _)| *j).minmax(), set.iter().map(|(_, i)| *i).minmax()) {
            (MinMaxResult::NoElements, _) | (_, MinMaxResult::NoElements) => {
                return Self { cells: Array2::from_elem((0, 0), false), ..self.clone() };
            }
            (rows, columns) => (
                rows.into_option().unwrap_or_default(),
                columns.into_option().unwrap_or_default(),
            ),
        };

        for coord in relative.iter_mut() {
            coord.0 -= columns.0 as isize;
            coord.1 -= rows.0 as isize;
        }

        if rows == (0, self.height() - 1) && columns == (0, self.width() - 1) {
            return self.clone();
        }

        Self {
            cells: self.cells.slice(s![rows.0..=rows.1, columns.0..=columns.1]).to_owned(),
            ..self.clone()
        }
    }

    /// Grow to `width` by `height`, placing the current content with its top left corner at `(left, top)`.
    ///
    /// Every coordinate in `relative` is moved into the expanded shape's system.
    /// Fails if the content would not fit.
    pub fn expand(&self, left: usize, top: usize, width: usize, height: usize, relative: &mut [Offset]) -> Result<Polyomino, PuzzleError> {
        if width < self.width() + left || height < self.height() + top {
            return Err(PuzzleError::BadDimensions);
        }

        for coord in relative.iter_mut() {
            coord.0 += left as isize;
            coord.1 += top as isize;
        }

        let cells = Array2::from_shape_fn((height, width), |(j, i)| {
            j >= top && i >= left && self.get(i - left, j - top)
        });

        Ok(Self { cells, ..self.clone() })
    }

    /// This shape turned a quarter turn clockwise.
    pub fn rotate_clockwise(&self) -> Polyomino {
        let height = self.height();
        // read each column from the bottom up to form a row
        let cells = Array2::from_shape_fn((self.width(), height), |(j, i)| self.cells[(height - 1 - i, j)]);
        Self { cells, ..self.clone() }
    }

    /// Every distinct orientation this shape may be matched in: only itself unless it is free.
    pub fn orientations(&self) -> Vec<Polyomino> {
        let mut orientations = vec![self.clone()];
        if !self.free {
            return orientations;
        }

        let mut current = self.clone();
        for _ in 0..3 {
            current = current.rotate_clockwise();
            if !orientations.contains(&current) {
                orientations.push(current.clone());
            }
        }

        orientations
    }

    /// Whether the set cells form more than one 4-connected component.
    pub fn has_multiple_components(&self) -> bool {
        let Some(start) = self.cells.indexed_iter().find(|(_, cell)| **cell).map(|(index, _)| index) else {
            return false;
        };

        let mut colored = Array2::from_elem(self.cells.raw_dim(), false);
        colored[start] = true;
        let mut queue = VecDeque::from([start]);
        while let Some((j, i)) = queue.pop_front() {
            let neighbors = [
                (j.wrapping_sub(1), i),
                (j + 1, i),
                (j, i.wrapping_sub(1)),
                (j, i + 1),
            ];
            for neighbor in neighbors {
                if self.cells.get(neighbor).copied().unwrap_or(false) && !colored[neighbor] {
                    colored[neighbor] = true;
                    queue.push_back(neighbor);
                }
            }
        }

        self.cells.iter().zip(colored.iter()).any(|(cell, seen)| *cell && !seen)
    }

    /// Every placement of `self` over `grid` such that each set cell of `self` lands on a set cell of `grid`
    /// and, if `blacklist` is given, not on a set cell of the blacklist.
    ///
    /// `blacklist` is paired with the offset which takes `grid` coordinates to blacklist coordinates.
    ///
    /// With an `allowance`, placements may also overhang `grid` by up to its width and height,
    /// and up to its count of cells may land anywhere they otherwise could not. Those cells are reported in [`Fit::missing`].
    pub fn fits(&self, grid: &Polyomino, allowance: Option<NegativeAllowance>, blacklist: Option<(&Polyomino, Offset)>) -> Vec<Fit<'_>> {
        let mut fits = Vec::new();
        let negatives = allowance.is_some();
        let NegativeAllowance { width: over_i, height: over_j, count } = allowance.unwrap_or_default();
        if self.width() > grid.width() + over_i * 2 || self.height() > grid.height() + over_j * 2 {
            return fits;
        }

        let (over_i, over_j) = (over_i as isize, over_j as isize);
        let last_i = grid.width() as isize - self.width() as isize + over_i;
        let last_j = grid.height() as isize - self.height() as isize + over_j;
        for i in -over_i..=last_i {
            'placement: for j in -over_j..=last_j {
                let mut missing = Array2::from_elem(self.cells.raw_dim(), false);
                let mut missing_count = 0;

                for ((pj, pi), _) in self.cells.indexed_iter().filter(|(_, cell)| **cell) {
                    let at = (i + pi as isize, j + pj as isize);
                    let blocked = !grid.is_set(at)
                        || blacklist.is_some_and(|(black, offset)| black.is_set((at.0 + offset.0, at.1 + offset.1)));
                    if blocked {
                        if negatives && missing_count < count {
                            missing[(pj, pi)] = true;
                            missing_count += 1;
                        } else {
                            continue 'placement;
                        }
                    }
                }

                fits.push(Fit {
                    i,
                    j,
                    piece: self,
                    missing: (missing_count > 0).then(|| Self::from_cells(missing)),
                });
            }
        }

        fits
    }

    /// Write `value` into every cell of `self` which a set cell of `piece` covers when its top left corner is at `at`.
    /// Cells falling outside `self` are skipped.
    pub fn paint(&mut self, piece: &Polyomino, at: Offset, value: bool) {
        for ((pj, pi), _) in piece.cells.indexed_iter().filter(|(_, cell)| **cell) {
            let (i, j) = (at.0 + pi as isize, at.1 + pj as isize);
            if i < 0 || j < 0 {
                continue;
            }
            if let Some(cell) = self.cells.get_mut((j as usize, i as usize)) {
                *cell = value;
            }
        }
    }

    /// Write `value` under every cell a placement covers.
    ///
    /// `translate` takes the coordinates the placement was found in to the coordinates of `self`,
    /// for when the two differ.
    pub fn set_on(&mut self, fit: &Fit, value: bool, translate: Offset) {
        self.paint(fit.piece, (fit.i + translate.0, fit.j + translate.1), value);
    }
}

impl Display for Polyomino {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for row in self.cells.rows() {
            for cell in row {
                write!(f, "{}", if *cell { '#' } else { '.' })?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}
