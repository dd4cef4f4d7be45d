use strum::VariantArray;

use crate::location::{Line, Location};

/// A unit step between adjacent points or cells. Also the orientation of an [`End`](crate::Entity::End).
#[derive(Copy, Clone, VariantArray, Eq, PartialEq, Hash, Debug, Ord, PartialOrd)]
pub enum Step {
    /// Toward row 0.
    Up,
    /// Away from row 0.
    Down,
    /// Toward column 0.
    Left,
    /// Away from column 0.
    Right,
}

impl Step {
    /// Attempt the step from `location` in the direction specified by `self` and return the resultant [`Location`].
    ///
    /// Stepping off the top or left edge wraps to a huge coordinate, which no grid contains.
    pub fn attempt_from(&self, location: Location) -> Location {
        location.offset_by(self.delta())
    }

    /// The `(horizontal, vertical)` unit displacement of this step.
    pub fn delta(&self) -> (isize, isize) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }

    /// Invert the direction specified by `self`.
    pub fn invert(&self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Determine the direction from `a` to `b`, or [`None`] if they are not adjacent.
    pub fn direction_to(a: Location, b: Location) -> Option<Self> {
        Self::VARIANTS.iter().find(|dir| dir.attempt_from(a) == b).copied()
    }

    /// The line bordering cell `cell` on the side this step points to.
    pub(crate) fn cell_edge(&self, cell: Location) -> Line {
        match self {
            Self::Up => Line::horizontal(cell),
            Self::Down => Line::horizontal(Self::Down.attempt_from(cell)),
            Self::Left => Line::vertical(cell),
            Self::Right => Line::vertical(Self::Right.attempt_from(cell)),
        }
    }

    /// The line leaving point `point` in this direction.
    pub(crate) fn point_edge(&self, point: Location) -> Line {
        match self {
            Self::Up => Line::vertical(Self::Up.attempt_from(point)),
            Self::Down => Line::vertical(point),
            Self::Left => Line::horizontal(Self::Left.attempt_from(point)),
            Self::Right => Line::horizontal(point),
        }
    }
}
