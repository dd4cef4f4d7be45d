//! Puzzle storage: every point, line and cell of a grid, and the symmetry relating them.

use std::fmt::{Display, Formatter};
use std::num::NonZero;
use std::ops::IndexMut;

use log::debug;
use ndarray::{Array2, AssignElem};
use strum::VariantArray;
use unordered_pair::UnorderedPair;

use crate::entity::{Entity, Kind};
use crate::error::PuzzleError;
use crate::location::{Coord, Dimension, Line, Location, Slot, SlotKind};
use crate::step::Step;

/// Mirroring applied to start and end points.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, VariantArray)]
pub enum Symmetry {
    /// Start and end points stand alone.
    #[default]
    None,
    /// Mirrored left to right.
    Horizontal,
    /// Mirrored top to bottom.
    Vertical,
    /// Turned half way around the center.
    Rotational,
}

impl Symmetry {
    /// The point mirroring `point` on a grid `dims` cells in size, or [`None`] without symmetry.
    pub fn reflect_point(&self, point: Location, dims: (Dimension, Dimension)) -> Option<Location> {
        let (width, height) = (dims.0.get(), dims.1.get());
        match self {
            Self::None => None,
            Self::Horizontal => Some(Location(width - point.0, point.1)),
            Self::Vertical => Some(Location(point.0, height - point.1)),
            Self::Rotational => Some(Location(width - point.0, height - point.1)),
        }
    }

    /// The step mirroring `step`, or [`None`] without symmetry.
    pub fn reflect_step(&self, step: Step) -> Option<Step> {
        let flip_horizontal = matches!(step, Step::Left | Step::Right);
        match self {
            Self::None => None,
            Self::Horizontal => Some(if flip_horizontal { step.invert() } else { step }),
            Self::Vertical => Some(if flip_horizontal { step } else { step.invert() }),
            Self::Rotational => Some(step.invert()),
        }
    }
}

/// The state of every point, line and cell of a puzzle.
///
/// A grid `width` by `height` cells in size has `width + 1` by `height + 1` points.
/// Internally, every slot lives in one array at doubled resolution: see [`Slot::storage`].
///
/// Getters return [`None`] out of range, so neighbors can be probed without bounds checks.
/// Setters fail with [`PuzzleError::OutOfRange`] instead.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Grid {
    // width, height
    dims: (Dimension, Dimension),
    // row major over storage coordinates: indexed (b, a)
    entities: Array2<Entity>,
    symmetry: Symmetry,
}

impl Default for Grid {
    fn default() -> Self {
        Self::with_dims((NonZero::new(5).unwrap(), NonZero::new(5).unwrap()))
    }
}

impl Grid {
    /// Construct a new grid with the specified dimensions, specified in `(width, height)` order,
    /// starting at the bottom left point and ending at the top right one.
    pub fn with_dims(dims: (Dimension, Dimension)) -> Self {
        let mut grid = Self::blank(dims);
        let (width, height) = (dims.0.get(), dims.1.get());
        grid.entities.index_mut(Slot::point(Location(0, height)).storage_index()).assign_elem(Entity::Start);
        grid.entities.index_mut(Slot::point(Location(width, 0)).storage_index())
            .assign_elem(Entity::End { orientation: Step::Right });

        grid
    }

    /// Construct a grid with the specified dimensions and nothing on it.
    pub fn blank(dims: (Dimension, Dimension)) -> Self {
        Self {
            dims,
            entities: Array2::from_shape_simple_fn((dims.1.get() * 2 + 1, dims.0.get() * 2 + 1), Entity::default),
            symmetry: Symmetry::None,
        }
    }

    /// Width and height, in cells.
    pub fn dims(&self) -> (Dimension, Dimension) {
        self.dims
    }

    /// Width, in cells.
    pub fn width(&self) -> Coord {
        self.dims.0.get()
    }

    /// Height, in cells.
    pub fn height(&self) -> Coord {
        self.dims.1.get()
    }

    /// The symmetry start and end points obey.
    pub fn symmetry(&self) -> Symmetry {
        self.symmetry
    }

    /// Set the symmetry, then [`sanitize`](Self::sanitize) to match it.
    pub fn set_symmetry(&mut self, symmetry: Symmetry) -> &mut Self {
        self.symmetry = symmetry;
        self.sanitize();
        self
    }

    /// The entity in any slot.
    pub fn slot(&self, slot: Slot) -> Option<&Entity> {
        self.entities.get(slot.storage_index())
    }

    /// Replace the entity in any slot.
    pub fn set_slot(&mut self, slot: Slot, entity: Entity) -> Result<&mut Self, PuzzleError> {
        match self.entities.get_mut(slot.storage_index()) {
            None => Err(PuzzleError::OutOfRange { slot }),
            Some(existing) => {
                existing.assign_elem(entity);
                Ok(self)
            }
        }
    }

    /// The entity at a point.
    pub fn point(&self, location: Location) -> Option<&Entity> {
        self.slot(Slot::point(location))
    }

    /// Replace the entity at a point.
    pub fn set_point(&mut self, location: Location, entity: Entity) -> Result<&mut Self, PuzzleError> {
        self.set_slot(Slot::point(location), entity)
    }

    /// The entity in a cell.
    pub fn cell(&self, location: Location) -> Option<&Entity> {
        self.slot(Slot::cell(location))
    }

    /// Replace the entity in a cell.
    pub fn set_cell(&mut self, location: Location, entity: Entity) -> Result<&mut Self, PuzzleError> {
        self.set_slot(Slot::cell(location), entity)
    }

    /// The entity on a line.
    pub fn line(&self, line: Line) -> Option<&Entity> {
        self.slot(line.slot())
    }

    /// Replace the entity on a line.
    pub fn set_line(&mut self, line: Line, entity: Entity) -> Result<&mut Self, PuzzleError> {
        self.set_slot(line.slot(), entity)
    }

    /// The entity on the line joining two points. Fails if the points are not adjacent.
    pub fn line_between(&self, points: UnorderedPair<Location>) -> Result<Option<&Entity>, PuzzleError> {
        Ok(self.line(Line::try_from(points)?))
    }

    /// Visit every slot once, in row-major storage order.
    pub fn entities(&self) -> impl Iterator<Item = (Slot, &Entity)> {
        self.entities.indexed_iter().map(|((b, a), entity)| (Slot::from_storage(a, b), entity))
    }

    /// The orientation an end placed at `point` should take: toward its only open edge.
    ///
    /// An edge is open if it leaves the grid or its line is [`Entity::Missing`].
    /// Returns [`None`] when no edge, or more than one, is open.
    pub fn end_placement(&self, point: Location) -> Option<Step> {
        let mut open = Step::VARIANTS.iter()
            .filter(|step| matches!(self.line(step.point_edge(point)), None | Some(Entity::Missing)));

        match (open.next(), open.next()) {
            (Some(step), None) => Some(*step),
            _ => None,
        }
    }

    /// Repair start and end points so that they come in pairs mirrored by the grid's symmetry.
    ///
    /// A start or end which is its own reflection is removed. One whose reflection differs in kind overwrites it;
    /// a mirrored end takes its [`end_placement`](Self::end_placement) there, or failing that, the reflection of its own orientation.
    /// Running this again changes nothing.
    pub fn sanitize(&mut self) {
        if self.symmetry == Symmetry::None {
            return;
        }

        for j in 0..=self.height() {
            for i in 0..=self.width() {
                let point = Location(i, j);
                let Some(value) = self.point(point).cloned() else { continue };
                if !matches!(value.kind(), Kind::Start | Kind::End) {
                    continue;
                }

                let Some(reflected) = self.symmetry.reflect_point(point, self.dims) else { continue };
                if reflected == point {
                    debug!("removing {:?} from self-symmetric point {:?}", value.kind(), point);
                    self.entities.index_mut(Slot::point(point).storage_index()).assign_elem(Entity::Basic);
                    continue;
                }

                let reflected_kind = self.point(reflected).map(Entity::kind);
                if reflected_kind == Some(value.kind()) {
                    continue;
                }

                let mirrored = match value {
                    Entity::End { orientation } => Entity::End {
                        orientation: self.end_placement(reflected)
                            .or_else(|| self.symmetry.reflect_step(orientation))
                            .unwrap_or(orientation),
                    },
                    other => other,
                };
                debug!("mirroring {:?} from {:?} onto {:?}", mirrored.kind(), point, reflected);
                self.entities.index_mut(Slot::point(reflected).storage_index()).assign_elem(mirrored);
            }
        }
    }

    /// Change the dimensions, keeping every slot whose storage coordinate still fits and leaving new slots basic.
    pub fn resize(&mut self, dims: (Dimension, Dimension)) -> &mut Self {
        let old = std::mem::replace(&mut self.entities, Array2::default((0, 0)));
        self.entities = Array2::from_shape_fn((dims.1.get() * 2 + 1, dims.0.get() * 2 + 1), |index| {
            old.get(index).cloned().unwrap_or_default()
        });
        self.dims = dims;

        self
    }
}

impl Display for Grid {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (b, row) in self.entities.rows().into_iter().enumerate() {
            let mut out = String::with_capacity(row.len());
            for (a, entity) in row.iter().enumerate() {
                out.push(match (entity, SlotKind::of(a, b)) {
                    (Entity::Basic, SlotKind::Point) => '+',
                    (Entity::Basic, SlotKind::HLine) => '-',
                    (Entity::Basic, SlotKind::VLine) => '|',
                    (Entity::Basic, SlotKind::Cell) => ' ',
                    (other, _) => other.display(),
                });
            }
            writeln!(f, "{}", out.trim_end())?;
        }

        Ok(())
    }
}
