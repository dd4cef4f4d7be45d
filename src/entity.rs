//! The symbols which occupy points, lines and cells.

use strum::{EnumDiscriminants, VariantArray};

use crate::error::PuzzleError;
use crate::shape::Polyomino;
use crate::step::Step;

/// Colors a symbol may carry.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, VariantArray)]
pub enum Color {
    Black,
    White,
    Cyan,
    Magenta,
    Yellow,
    Red,
    Green,
    Blue,
    Orange,
}

/// The number of path lines a triangle demands around its cell.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, VariantArray)]
pub enum TriangleCount {
    /// One line.
    One,
    /// Two lines.
    Two,
    /// Three lines.
    Three,
}

impl TriangleCount {
    /// The count as a number.
    pub fn get(&self) -> usize {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Three => 3,
        }
    }
}

impl TryFrom<u8> for TriangleCount {
    type Error = PuzzleError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            3 => Ok(Self::Three),
            _ => Err(PuzzleError::BadTriangleCount(value)),
        }
    }
}

/// What occupies one storage slot of a [`Grid`](crate::Grid).
///
/// Each variant carries exactly the data its symbol needs, so a square without a color or an end without
/// an orientation cannot be expressed.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq, EnumDiscriminants)]
#[strum_discriminants(name(Kind), derive(Hash, Ord, PartialOrd))]
pub enum Entity {
    /// Nothing at all; on a line, the path may not pass.
    Missing,
    /// An ordinary point, line or cell.
    #[default]
    Basic,
    /// Where the path may begin.
    Start,
    /// Where the path may finish, poking out of the grid toward `orientation`.
    End {
        /// The direction the end sticks out in.
        orientation: Step,
    },
    /// A line broken in the middle.
    Disjoint,
    /// A dot the path must pass through.
    Hexagon,
    /// Must share its region only with squares of its own color.
    Square {
        /// The square's color.
        color: Color,
    },
    /// Must share its region with exactly one other symbol of its color.
    Star {
        /// The star's color.
        color: Color,
    },
    /// A polyomino which, together with the others in its region, must tile that region.
    Tetris {
        /// The piece.
        shape: Polyomino,
        /// An explicit color, overriding the implied yellow or blue.
        color: Option<Color>,
    },
    /// Cancels exactly one otherwise failing symbol in its region.
    Error {
        /// An explicit color, overriding the implied white.
        color: Option<Color>,
    },
    /// Demands its cell be bordered by exactly `count` path lines.
    Triangle {
        /// The number of lines.
        count: TriangleCount,
        /// An explicit color, overriding the implied orange.
        color: Option<Color>,
    },
}

impl Entity {
    /// A square of `color`.
    pub fn square(color: Color) -> Self {
        Self::Square { color }
    }

    /// A star of `color`.
    pub fn star(color: Color) -> Self {
        Self::Star { color }
    }

    /// An uncolored polyomino.
    pub fn tetris(shape: Polyomino) -> Self {
        Self::Tetris { shape, color: None }
    }

    /// An uncolored error symbol.
    pub fn error() -> Self {
        Self::Error { color: None }
    }

    /// An uncolored triangle demanding `count` lines.
    pub fn triangle(count: u8) -> Result<Self, PuzzleError> {
        Ok(Self::Triangle { count: TriangleCount::try_from(count)?, color: None })
    }

    /// The kind of this entity.
    pub fn kind(&self) -> Kind {
        Kind::from(self)
    }

    /// The color this entity counts as when symbols in a region are bucketed by color.
    ///
    /// Symbols without an explicit color fall back to an implied one: positive polyominos are yellow,
    /// negative ones blue, errors white and triangles orange. Other uncolored symbols have no color.
    pub fn effective_color(&self) -> Option<Color> {
        match self {
            Self::Square { color } | Self::Star { color } => Some(*color),
            Self::Tetris { color: Some(color), .. }
            | Self::Error { color: Some(color) }
            | Self::Triangle { color: Some(color), .. } => Some(*color),
            Self::Tetris { shape, color: None } => Some(if shape.is_negative() { Color::Blue } else { Color::Yellow }),
            Self::Error { color: None } => Some(Color::White),
            Self::Triangle { color: None, .. } => Some(Color::Orange),
            _ => None,
        }
    }

    /// Whether this entity carries no information beyond its slot existing, so an encoder may compress it away.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Basic | Self::Missing)
    }

    pub(crate) fn display(&self) -> char {
        match self {
            Self::Missing => ' ',
            Self::Basic => '.',
            Self::Start => 'S',
            Self::End { .. } => 'E',
            Self::Disjoint => '/',
            Self::Hexagon => 'o',
            Self::Square { .. } => '#',
            Self::Star { .. } => '*',
            Self::Tetris { shape, .. } => if shape.is_negative() { 't' } else { 'T' },
            Self::Error { .. } => 'Y',
            Self::Triangle { count, .. } => match count {
                TriangleCount::One => '1',
                TriangleCount::Two => '2',
                TriangleCount::Three => '3',
            },
        }
    }
}
