use std::num::NonZero;

use ndarray::Ix;
use unordered_pair::UnorderedPair;

use crate::error::PuzzleError;
use crate::step::Step;

/// One logical coordinate.
pub type Coord = usize;
/// A width or height of a grid, in cells.
pub type Dimension = NonZero<Coord>;
/// A signed displacement `(i, j)`, used while shapes move between coordinate systems.
pub type Offset = (isize, isize);

#[derive(Clone, Eq, Hash, Copy, PartialEq, Ord, PartialOrd, Debug)]
/// A logical location `(i, j)` on a grid, `i` counting columns and `j` rows. The top left corner is `Location(0, 0)`.
///
/// Whether this names a point, a cell or a line depends on the [`SlotKind`] it is paired with.
pub struct Location(pub Coord, pub Coord);

impl Location {
    pub(crate) fn as_index(&self) -> (Coord, Coord) {
        (self.1, self.0)
    }

    /// Offset this location, wrapping on underflow so that out-of-range results simply fail later bounds checks.
    pub fn offset_by(self, rhs: (isize, isize)) -> Self {
        Self(self.0.wrapping_add_signed(rhs.0), self.1.wrapping_add_signed(rhs.1))
    }
}

impl From<(Ix, Ix)> for Location {
    fn from(value: (Ix, Ix)) -> Self {
        Self(value.1, value.0)
    }
}

/// What lives at a storage slot, determined by the parity of its storage coordinates.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum SlotKind {
    /// Both storage coordinates even; an intersection the path may visit.
    Point,
    /// Both storage coordinates odd; a square enclosed by four lines.
    Cell,
    /// A line joining two points side by side.
    HLine,
    /// A line joining two points one above the other.
    VLine,
}

impl SlotKind {
    /// Classify storage coordinate `(a, b)`.
    pub fn of(a: Coord, b: Coord) -> Self {
        match (a % 2, b % 2) {
            (0, 0) => Self::Point,
            (1, 1) => Self::Cell,
            (1, 0) => Self::HLine,
            _ => Self::VLine,
        }
    }
}

/// A typed address of one storage slot: a logical [`Location`] and what kind of slot it is.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Slot {
    /// The kind of slot.
    pub kind: SlotKind,
    /// The logical location; for lines, the top or left endpoint.
    pub location: Location,
}

impl Slot {
    /// A point slot.
    pub fn point(location: Location) -> Self {
        Self { kind: SlotKind::Point, location }
    }

    /// A cell slot.
    pub fn cell(location: Location) -> Self {
        Self { kind: SlotKind::Cell, location }
    }

    /// The slot stored at storage coordinate `(a, b)`.
    pub fn from_storage(a: Coord, b: Coord) -> Self {
        Self { kind: SlotKind::of(a, b), location: Location(a / 2, b / 2) }
    }

    /// Storage coordinate `(a, b)` of this slot in the doubled-resolution grid.
    pub fn storage(&self) -> (Coord, Coord) {
        // wrapped locations stay wrapped, and so out of range
        let Location(i, j) = self.location;
        let (i, j) = (i.wrapping_mul(2), j.wrapping_mul(2));
        match self.kind {
            SlotKind::Point => (i, j),
            SlotKind::Cell => (i.wrapping_add(1), j.wrapping_add(1)),
            SlotKind::HLine => (i.wrapping_add(1), j),
            SlotKind::VLine => (i, j.wrapping_add(1)),
        }
    }

    pub(crate) fn storage_index(&self) -> (Coord, Coord) {
        let (a, b) = self.storage();
        (b, a)
    }
}

/// A line segment between two adjacent points.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Line {
    /// The top or left endpoint.
    pub origin: Location,
    /// Whether the line runs from `origin` downward rather than rightward.
    pub vertical: bool,
}

impl Line {
    /// A line running right from `origin`.
    pub fn horizontal(origin: Location) -> Self {
        Self { origin, vertical: false }
    }

    /// A line running down from `origin`.
    pub fn vertical(origin: Location) -> Self {
        Self { origin, vertical: true }
    }

    /// The line joining `a` and `b`, if they are adjacent.
    pub fn between(a: Location, b: Location) -> Option<Self> {
        Step::direction_to(a, b).map(|_| Self {
            origin: Location(a.0.min(b.0), a.1.min(b.1)),
            vertical: a.0 == b.0,
        })
    }

    /// Both endpoints of this line.
    pub fn endpoints(&self) -> UnorderedPair<Location> {
        let step = if self.vertical { Step::Down } else { Step::Right };
        UnorderedPair(self.origin, step.attempt_from(self.origin))
    }

    /// The storage slot holding this line.
    pub fn slot(&self) -> Slot {
        Slot {
            kind: if self.vertical { SlotKind::VLine } else { SlotKind::HLine },
            location: self.origin,
        }
    }
}

impl TryFrom<UnorderedPair<Location>> for Line {
    type Error = PuzzleError;

    fn try_from(value: UnorderedPair<Location>) -> Result<Self, Self::Error> {
        let UnorderedPair(a, b) = value;
        Self::between(a, b).ok_or(PuzzleError::NonContiguousPath { from: a, to: b })
    }
}
