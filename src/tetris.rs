//! Exact tiling of a region by positive and negative polyominos.
//!
//! The search is breadth first over search states. A state holds what is left of the region, how many of each
//! piece remain, and an overflow: cells a positive piece covered outside the region, which a negative piece must
//! cancel before anything else happens.
//!
//! Positive pieces are placed one at a time. While negative pieces remain, a placement may overhang the region
//! by up to the total negative area; the overhang becomes the overflow. Negative pieces are then placed over the
//! overflow, and any of their cells which cancel nothing are added back to the region for positives to cover.

use std::cmp::Ordering;
use std::collections::{HashSet, VecDeque};
use std::time::{Duration, Instant};

use itertools::Itertools;
use log::{debug, trace, warn};

use crate::location::{Offset, Slot};
use crate::shape::{Fit, NegativeAllowance, Polyomino, ShapeKey};

/// How a single tiling attempt ended.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TilingOutcome {
    /// The pieces tile the region exactly.
    Tiled,
    /// Positive and negative pieces have equal area, so they were cancelled against each other without a search.
    CountCancelled,
    /// No tiling exists.
    Failed,
    /// The search ran out of time before finding a tiling or exhausting the possibilities.
    TimedOut,
}

impl TilingOutcome {
    /// Whether the attempt counts as a success.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Tiled | Self::CountCancelled)
    }
}

/// A set of identical pieces, in every orientation they may take.
#[derive(Clone, Debug)]
struct PieceClass {
    orientations: Vec<Polyomino>,
    negative: bool,
    multiple: bool,
    area: usize,
    // where the pieces of this class are drawn
    slots: Vec<Slot>,
    key: (ShapeKey, bool, bool),
}

impl PieceClass {
    /// Larger pieces with fewer orientations and a single component branch least, so go first.
    fn safety_cmp(&self, other: &Self) -> Ordering {
        let denominator = |class: &Self| class.orientations.len() * if class.multiple { 2 } else { 1 };
        (other.area * denominator(self))
            .cmp(&(self.area * denominator(other)))
            .then_with(|| self.key.cmp(&other.key))
    }
}

/// Cells a positive piece covered outside the region, waiting to be cancelled.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
struct Overflow {
    shape: Polyomino,
    // top left corner, in the coordinates of the state's grid
    offset: Offset,
}

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
struct SearchState {
    grid: Polyomino,
    // remaining pieces, counted per class
    remaining: Vec<usize>,
    overflow: Option<Overflow>,
}

/// Which pieces one tiling attempt uses.
#[derive(Clone, Debug)]
pub struct TilingAttempt {
    remaining: Vec<usize>,
    positive_area: usize,
    negative_area: usize,
    excluded: Option<Slot>,
}

impl TilingAttempt {
    /// The piece left out of this attempt, if any.
    pub fn excluded(&self) -> Option<Slot> {
        self.excluded
    }
}

/// The result of checking one region's polyominos, as [`validate_tetris`] reports it.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TetrisReport {
    /// Whether every piece took part in a successful tiling.
    pub success: bool,
    /// Pieces which may be excused by error symbols. Set when leaving them out lets the rest succeed,
    /// or when there are exactly as many error symbols as pieces.
    pub allowed: Option<Vec<Slot>>,
    /// More than one error symbol was available, which is not searched for.
    pub multiple_errors: bool,
    /// Some attempt ran out of time.
    pub timed_out: bool,
    /// Some attempt succeeded only by cancelling areas.
    pub count_cancelled: bool,
}

/// The pieces of one region and the clock bounding every search over them.
pub struct TetrisState {
    region: Polyomino,
    region_area: usize,
    classes: Vec<PieceClass>,
    deadline: Instant,
    check_interval: usize,
}

impl TetrisState {
    /// Collect `pieces`, each paired with the slot it is drawn in, to be tiled over `region`.
    ///
    /// The clock starts now: every search made through this state shares the one `timeout`,
    /// checked once every `check_interval` dequeued states.
    pub fn new(region: &Polyomino, pieces: &[(Slot, Polyomino)], timeout: Duration, check_interval: usize) -> Self {
        let mut classes: Vec<PieceClass> = Vec::new();
        for (slot, piece) in pieces {
            let reduced = piece.reduce(&mut []);
            let orientations = reduced.orientations();
            let canonical = orientations.iter().map(Polyomino::key).min().unwrap_or_else(|| reduced.key());
            let key = (canonical, piece.is_free(), piece.is_negative());

            match classes.iter_mut().find(|class| class.key == key) {
                Some(class) => class.slots.push(*slot),
                None => classes.push(PieceClass {
                    negative: piece.is_negative(),
                    multiple: reduced.has_multiple_components(),
                    area: reduced.area(),
                    orientations,
                    slots: vec![*slot],
                    key,
                }),
            }
        }
        classes.sort_by(PieceClass::safety_cmp);

        let region = region.reduce(&mut []);
        Self {
            region_area: region.area(),
            region,
            classes,
            deadline: Instant::now() + timeout,
            check_interval: check_interval.max(1),
        }
    }

    fn attempt_without(&self, excluded: Option<usize>) -> TilingAttempt {
        let mut remaining = self.classes.iter().map(|class| class.slots.len()).collect_vec();
        if let Some(index) = excluded {
            remaining[index] -= 1;
        }

        let area = |negative: bool| {
            self.classes.iter()
                .zip(&remaining)
                .filter(|(class, _)| class.negative == negative)
                .map(|(class, count)| class.area * count)
                .sum::<usize>()
        };

        TilingAttempt {
            positive_area: area(false),
            negative_area: area(true),
            excluded: excluded.map(|index| self.classes[index].slots[0]),
            remaining,
        }
    }

    /// The attempt using every piece.
    pub fn full_attempt(&self) -> TilingAttempt {
        self.attempt_without(None)
    }

    /// One attempt for every distinct piece, leaving a single instance of it out.
    /// Positive pieces come first, then negative ones, each safest first.
    pub fn single_exclusions(&self) -> Vec<TilingAttempt> {
        let positive = self.classes.iter().positions(|class| !class.negative);
        let negative = self.classes.iter().positions(|class| class.negative);
        positive.chain(negative)
            .map(|index| self.attempt_without(Some(index)))
            .collect_vec()
    }

    /// Whether the clock has run out.
    pub fn timed_out(&self) -> bool {
        Instant::now() >= self.deadline
    }

    /// Search for a tiling using the pieces of `attempt`.
    pub fn search(&self, attempt: &TilingAttempt) -> TilingOutcome {
        let (positive, negative) = (attempt.positive_area, attempt.negative_area);
        if positive == negative {
            return TilingOutcome::CountCancelled;
        }
        if positive < negative || positive - negative != self.region_area {
            return TilingOutcome::Failed;
        }

        debug!("tiling {} cells with {} pieces", self.region_area, attempt.remaining.iter().sum::<usize>());
        let start = SearchState { grid: self.region.clone(), remaining: attempt.remaining.clone(), overflow: None };
        let mut seen = HashSet::from([start.clone()]);
        let mut queue = VecDeque::from([start]);
        let mut pops = 0usize;

        while let Some(state) = queue.pop_front() {
            pops += 1;
            if pops % self.check_interval == 0 && self.timed_out() {
                warn!("tiling search timed out after {} states", pops);
                return TilingOutcome::TimedOut;
            }

            trace!("state {}: {:?} remaining, overflow {:?}\n{}", pops, state.remaining, state.overflow, state.grid);
            if state.grid.is_empty() && state.overflow.is_none() && state.remaining.iter().all(|count| *count == 0) {
                debug!("tiled after {} states", pops);
                return TilingOutcome::Tiled;
            }

            let successors = match &state.overflow {
                Some(overflow) => self.cancel_overflow(&state, overflow),
                None => self.place_positive(&state),
            };
            for successor in successors {
                if seen.insert(successor.clone()) {
                    queue.push_back(successor);
                }
            }
        }

        debug!("no tiling after {} states", pops);
        TilingOutcome::Failed
    }

    fn remaining_classes<'a>(&'a self, state: &'a SearchState, negative: bool) -> impl Iterator<Item = (usize, &'a PieceClass)> + 'a {
        self.classes.iter()
            .enumerate()
            .filter(move |(index, class)| class.negative == negative && state.remaining[*index] > 0)
    }

    fn place_positive(&self, state: &SearchState) -> Vec<SearchState> {
        let allowance = NegativeAllowance::covering(
            self.remaining_classes(state, true)
                .flat_map(|(index, class)| std::iter::repeat(&class.orientations[0]).take(state.remaining[index])),
        );
        let grid_multiple = state.grid.has_multiple_components();

        let mut successors = Vec::new();
        for (index, class) in self.remaining_classes(state, false) {
            let mut remaining = state.remaining.clone();
            remaining[index] -= 1;

            for piece in &class.orientations {
                for fit in piece.fits(&state.grid, allowance, None) {
                    let Some((grid, overflow)) = remove_piece(&state.grid, &fit) else { continue };
                    // splitting the region only multiplies the branches, unless something was split already
                    if grid.has_multiple_components() && !(class.multiple || grid_multiple || allowance.is_some()) {
                        continue;
                    }

                    successors.push(SearchState { grid, remaining: remaining.clone(), overflow });
                }
            }
        }

        successors
    }

    fn cancel_overflow(&self, state: &SearchState, overflow: &Overflow) -> Vec<SearchState> {
        let mut successors = Vec::new();
        for (index, class) in self.remaining_classes(state, true) {
            let mut remaining = state.remaining.clone();
            remaining[index] -= 1;

            for piece in &class.orientations {
                let required = if class.orientations.len() == 1 && class.area == overflow.shape.area() { class.area } else { 1 };
                let allowance = NegativeAllowance {
                    width: piece.width(),
                    height: piece.height(),
                    count: class.area.saturating_sub(required),
                };

                for fit in piece.fits(&overflow.shape, Some(allowance), Some((&state.grid, overflow.offset))) {
                    let Some((grid, overflow)) = add_negative(&state.grid, overflow, &fit) else { continue };
                    successors.push(SearchState { grid, remaining: remaining.clone(), overflow });
                }
            }
        }

        successors
    }
}

/// Take a positive placement off `grid`, growing it first to hold any overhang.
fn remove_piece(grid: &Polyomino, fit: &Fit) -> Option<(Polyomino, Option<Overflow>)> {
    let Some(missing) = &fit.missing else {
        let mut grid = grid.clone();
        grid.set_on(fit, false, (0, 0));
        return Some((grid.reduce(&mut []), None));
    };

    let (i, j) = fit.position();
    let (left, top) = ((-i).max(0) as usize, (-j).max(0) as usize);
    let width = (left + grid.width()).max(i.max(0) as usize + fit.piece.width());
    let height = (top + grid.height()).max(j.max(0) as usize + fit.piece.height());

    let mut position = [fit.position()];
    let mut grown = grid.expand(left, top, width, height, &mut position).ok()?;
    grown.paint(fit.piece, position[0], false);

    let mut shift = [(0, 0)];
    let shape = missing.reduce(&mut shift);
    let offset = (position[0].0 - shift[0].0, position[0].1 - shift[0].1);

    Some(finish(grown, Overflow { shape, offset }))
}

/// Place a negative piece over an overflow, adding back to `grid` every cell of it which cancels nothing.
fn add_negative(grid: &Polyomino, overflow: &Overflow, fit: &Fit) -> Option<(Polyomino, Option<Overflow>)> {
    let mut cancelled = overflow.shape.clone();
    cancelled.set_on(fit, false, (0, 0));

    let mut shift = [(0, 0)];
    let remaining = cancelled.reduce(&mut shift);
    let mut offset = (overflow.offset.0 - shift[0].0, overflow.offset.1 - shift[0].1);

    let Some(missing) = &fit.missing else {
        return Some(finish(grid.clone(), Overflow { shape: remaining, offset }));
    };

    // where the piece sits over `grid`
    let (i, j) = (fit.i + overflow.offset.0, fit.j + overflow.offset.1);
    let (width, height) = (fit.piece.width(), fit.piece.height());
    let lands_on_grid = (0..height).cartesian_product(0..width)
        .any(|(pj, pi)| missing.get(pi, pj) && grid.is_set((i + pi as isize, j + pj as isize)));
    if lands_on_grid {
        return None;
    }

    let (left, top) = ((-i).max(0) as usize, (-j).max(0) as usize);
    let grown_width = (left + grid.width()).max(i.max(0) as usize + width);
    let grown_height = (top + grid.height()).max(j.max(0) as usize + height);

    let mut relative = [(i, j), offset];
    let mut grown = grid.expand(left, top, grown_width, grown_height, &mut relative).ok()?;
    grown.paint(missing, relative[0], true);
    offset = relative[1];

    Some(finish(grown, Overflow { shape: remaining, offset }))
}

/// Reduce `grid`, carrying the overflow along, and drop the overflow once nothing is left of it.
fn finish(grid: Polyomino, overflow: Overflow) -> (Polyomino, Option<Overflow>) {
    let Overflow { shape, offset } = overflow;
    if shape.is_empty() {
        return (grid.reduce(&mut []), None);
    }

    let mut relative = [offset];
    let grid = grid.reduce(&mut relative);
    // an empty grid has no position of its own
    let offset = if grid.is_empty() { (0, 0) } else { relative[0] };

    (grid, Some(Overflow { shape, offset }))
}

/// Decide whether `pieces` tile `region`, allowing `expected_errors` of them to be excused.
///
/// With no errors to spend, or exactly one per piece, only the full tiling is tried.
/// With one error, each piece is left out in turn until the rest succeed.
/// More than one is not supported and is reported through [`TetrisReport::multiple_errors`].
pub fn validate_tetris(
    region: &Polyomino,
    pieces: &[(Slot, Polyomino)],
    expected_errors: usize,
    timeout: Duration,
    check_interval: usize,
) -> TetrisReport {
    let mut report = TetrisReport::default();
    if pieces.is_empty() {
        report.success = true;
        return report;
    }

    let trivial = pieces.len() == expected_errors;
    let state = TetrisState::new(region, pieces, timeout, check_interval);
    let record = |report: &mut TetrisReport, outcome: TilingOutcome| {
        report.timed_out |= outcome == TilingOutcome::TimedOut;
        report.count_cancelled |= outcome == TilingOutcome::CountCancelled;
        outcome.is_success()
    };

    report.success = record(&mut report, state.search(&state.full_attempt()));
    if expected_errors == 0 || trivial {
        if trivial {
            report.allowed = Some(pieces.iter().map(|(slot, _)| *slot).collect_vec());
        }
        return report;
    }

    if expected_errors > 1 {
        report.multiple_errors = true;
        return report;
    }

    if !report.success {
        for attempt in state.single_exclusions() {
            if record(&mut report, state.search(&attempt)) {
                report.allowed = attempt.excluded().map(|slot| vec![slot]);
                break;
            }
        }
    }

    report
}
