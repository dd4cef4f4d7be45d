//! Checking a drawn path against the symbols of a grid.

use std::collections::{BTreeMap, HashSet};
use std::time::Duration;

use itertools::Itertools;
use log::debug;
use strum::VariantArray;

use crate::entity::{Color, Entity};
use crate::error::PuzzleError;
use crate::grid::Grid;
use crate::grouping::Region;
use crate::location::{Line, Slot, SlotKind};
use crate::path::Path;
use crate::shape::Polyomino;
use crate::step::Step;
use crate::tetris::validate_tetris;

/// Advisory attached when a region has polyominos and more than one error symbol to spend on them.
pub const MULTIPLE_ERRORS_ADVISORY: &str = "won't mix multiple error symbols and polyominos (missing feature)";
/// Advisory attached when a tiling search runs out of time.
pub const TIMED_OUT_ADVISORY: &str = "timed out validating polyominos";
/// Advisory attached to a successful verdict which relied on cancelling polyomino areas.
pub const COUNT_CANCELLED_ADVISORY: &str = "cancelling positive and negative polyominos by count, not shape";

/// Tunables for [`Validator`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ValidatorConfig {
    /// Wall-clock budget shared by every tiling search in one region.
    pub tiling_timeout: Duration,
    /// How many search states are dequeued between checks of the clock.
    pub timeout_check_interval: usize,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            tiling_timeout: Duration::from_secs(4),
            timeout_check_interval: 50,
        }
    }
}

/// The outcome of validating a path.
///
/// Constraint failures are reported here rather than as errors: a verdict is a success exactly when
/// [`hard_errors`](Self::hard_errors) is empty.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Verdict {
    /// Slots whose constraints fail and were not excused.
    pub hard_errors: Vec<Slot>,
    /// Slots whose constraints fail but were excused by error symbols in their region.
    pub excusable_errors: Vec<Slot>,
    /// Messages which do not affect success.
    pub advisories: Vec<String>,
    /// Every slot which failed a constraint, before any was excused.
    pub violations: Vec<Slot>,
}

impl Verdict {
    /// Whether the path solves the puzzle.
    pub fn is_success(&self) -> bool {
        self.hard_errors.is_empty()
    }
}

/// Checks drawn paths against the symbols of a grid.
#[derive(Clone, Copy, Debug, Default)]
pub struct Validator {
    config: ValidatorConfig,
}

/// A failure found by looking at one slot alone.
#[derive(Clone, Copy, Debug)]
struct EntityFailure {
    slot: Slot,
    // hexagons are never excused
    excusable: bool,
}

/// What one region contributes to the verdict.
#[derive(Debug, Default)]
struct RegionVerdict {
    hard_errors: Vec<Slot>,
    excusable_errors: Vec<Slot>,
    violations: Vec<Slot>,
    advisories: Vec<String>,
    // entity failures inside the region paid for by its error symbols
    excused_entities: Vec<Slot>,
    count_cancelled: bool,
}

impl Validator {
    /// A validator with the given configuration.
    pub fn new(config: ValidatorConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Validate `path` as a solution to `grid`.
    ///
    /// Fails only when the two were built for grids of different dimensions.
    pub fn validate(&self, grid: &Grid, path: &Path) -> Result<Verdict, PuzzleError> {
        if grid.dims() != path.dims() {
            return Err(PuzzleError::BadDimensions);
        }

        let failures = Self::entity_failures(grid, path);
        let mut verdict = Verdict {
            violations: failures.iter().map(|failure| failure.slot).collect_vec(),
            ..Verdict::default()
        };

        let mut excused = HashSet::new();
        let mut count_cancelled = false;
        for region in path.groupings(None) {
            let result = self.check_region(grid, path, &region, &failures);
            debug!("region at {:?} with {} cells: {} hard errors, {} excused",
                region.top_left(), region.len(), result.hard_errors.len(), result.excusable_errors.len());

            verdict.hard_errors.extend(result.hard_errors);
            verdict.excusable_errors.extend(result.excusable_errors);
            verdict.violations.extend(result.violations);
            verdict.advisories.extend(result.advisories);
            excused.extend(result.excused_entities);
            count_cancelled |= result.count_cancelled;
        }

        verdict.hard_errors.extend(failures.iter().map(|failure| failure.slot).filter(|slot| !excused.contains(slot)));
        for slots in [&mut verdict.hard_errors, &mut verdict.excusable_errors, &mut verdict.violations] {
            slots.sort_unstable();
            slots.dedup();
        }

        if count_cancelled && verdict.is_success() {
            verdict.advisories.push(COUNT_CANCELLED_ADVISORY.to_owned());
        }

        Ok(verdict)
    }

    /// Hexagons off the path and triangles with the wrong number of lines around them.
    fn entity_failures(grid: &Grid, path: &Path) -> Vec<EntityFailure> {
        grid.entities()
            .filter_map(|(slot, entity)| {
                let location = slot.location;
                let failed = match (entity, slot.kind) {
                    (Entity::Hexagon, SlotKind::Point) => !path.contains_point(location),
                    (Entity::Hexagon, SlotKind::HLine) => !path.contains_line(Line::horizontal(location)),
                    (Entity::Hexagon, SlotKind::VLine) => !path.contains_line(Line::vertical(location)),
                    (Entity::Triangle { count, .. }, SlotKind::Cell) => {
                        let lines = Step::VARIANTS.iter()
                            .filter(|step| path.contains_line(step.cell_edge(location)))
                            .count();
                        lines != count.get()
                    }
                    _ => false,
                };

                failed.then_some(EntityFailure { slot, excusable: !matches!(entity, Entity::Hexagon) })
            })
            .collect_vec()
    }

    fn check_region(&self, grid: &Grid, path: &Path, region: &Region, failures: &[EntityFailure]) -> RegionVerdict {
        let mut result = RegionVerdict::default();
        let symbols = region.cells().iter()
            .filter_map(|cell| {
                let slot = Slot::cell(*cell);
                grid.slot(slot).filter(|entity| !entity.is_empty()).map(|entity| (slot, entity))
            })
            .collect_vec();

        let expected = symbols.iter().filter(|(_, entity)| matches!(entity, Entity::Error { .. })).count();
        // may go negative when there is more to excuse than there are error symbols
        let mut remaining = expected as isize;
        let mut feasible = expected > 0;
        let mut errors: Vec<Slot> = Vec::new();
        let mut allowed: Vec<Slot> = Vec::new();

        let mut by_color: BTreeMap<Color, Vec<Slot>> = BTreeMap::new();
        let mut squares: BTreeMap<Color, Vec<Slot>> = BTreeMap::new();
        let mut stars: BTreeMap<Color, Vec<Slot>> = BTreeMap::new();
        for (slot, entity) in &symbols {
            if let Some(color) = entity.effective_color() {
                by_color.entry(color).or_default().push(*slot);
            }
            match entity {
                Entity::Square { color } => squares.entry(*color).or_default().push(*slot),
                Entity::Star { color } => stars.entry(*color).or_default().push(*slot),
                _ => {}
            }
        }

        if squares.len() > 1 {
            let counts = squares.iter().map(|(color, slots)| (slots.len(), *color)).sorted().collect_vec();
            // between two colors only the smaller is at fault; otherwise every square is
            let fault_count = if counts.len() == 2 { Some(counts[0].0) } else { None };
            for slots in squares.values() {
                if fault_count.map_or(true, |count| count == slots.len()) {
                    errors.extend(slots);
                }
            }

            if remaining >= 0 {
                let majority = counts.last().map(|(_, color)| *color);
                for (color, slots) in &squares {
                    if Some(*color) != majority {
                        allowed.extend(slots);
                        remaining -= slots.len() as isize;
                    }
                }
            }
        }

        for (color, slots) in &stars {
            let total = by_color.get(color).map_or(0, Vec::len);
            if total == 2 {
                continue;
            }

            errors.extend(slots);
            if remaining >= 0 {
                // remove every star, or just enough to leave a pair, whichever is fewer
                let mut spend = slots.len();
                if slots.len() > 1 {
                    spend = spend.min(total - 2);
                }
                allowed.extend(&slots[..spend]);
                remaining -= spend as isize;
            }
        }

        let mut inside = Vec::new();
        if remaining >= 0 {
            inside = failures.iter()
                .filter(|failure| failure.excusable && path.grouping_includes(region, failure.slot))
                .map(|failure| failure.slot)
                .collect_vec();
            remaining -= inside.len() as isize;
        }

        let pieces: Vec<(Slot, Polyomino)> = symbols.iter()
            .filter_map(|(slot, entity)| match entity {
                Entity::Tetris { shape, .. } => Some((*slot, shape.clone())),
                _ => None,
            })
            .collect_vec();
        if !pieces.is_empty() {
            let report = validate_tetris(
                region.shape(),
                &pieces,
                remaining.max(0) as usize,
                self.config.tiling_timeout,
                self.config.timeout_check_interval,
            );

            if !report.success {
                match &report.allowed {
                    Some(excused) => {
                        allowed.extend(excused);
                        remaining -= excused.len() as isize;
                    }
                    None => feasible = false,
                }
                errors.extend(pieces.iter().map(|(slot, _)| *slot));
            }
            if report.multiple_errors {
                result.advisories.push(MULTIPLE_ERRORS_ADVISORY.to_owned());
            }
            if report.timed_out {
                result.advisories.push(TIMED_OUT_ADVISORY.to_owned());
            }
            result.count_cancelled = report.count_cancelled;
        }

        result.violations = errors.clone();
        feasible &= remaining == 0;
        if feasible {
            result.excusable_errors.extend(&inside);
            result.excusable_errors.extend(allowed);
            result.excused_entities = inside;
        } else {
            errors.extend(symbols.iter()
                .filter(|(_, entity)| matches!(entity, Entity::Error { .. }))
                .map(|(slot, _)| *slot));
            result.hard_errors = errors;
        }

        result
    }
}

/// Validate `path` against `grid` with the default configuration.
pub fn validate(grid: &Grid, path: &Path) -> Result<Verdict, PuzzleError> {
    Validator::default().validate(grid, path)
}
