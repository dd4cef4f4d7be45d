use std::collections::HashSet;
use std::num::NonZero;
use std::time::Duration;

use proptest::prelude::*;
use strum::VariantArray;

use pathcheck::tetris::validate_tetris;
use pathcheck::{validate, Color, Dimension, Entity, Grid, Line, Location, Path, Polyomino, Slot, Step, Symmetry, TriangleCount};

fn dims(width: usize, height: usize) -> (Dimension, Dimension) {
    (NonZero::new(width).unwrap(), NonZero::new(height).unwrap())
}

/// A self-avoiding walk: steps which would leave the grid or revisit a point are skipped.
fn walk(width: usize, height: usize, start: (usize, usize), steps: &[usize]) -> Path {
    let mut current = Location(start.0 % (width + 1), start.1 % (height + 1));
    let mut points = vec![current];
    let mut seen = HashSet::from([current]);
    for step in steps {
        let next = Step::VARIANTS[step % 4].attempt_from(current);
        if next.0 > width || next.1 > height || seen.contains(&next) {
            continue;
        }
        seen.insert(next);
        points.push(next);
        current = next;
    }

    Path::new(points, dims(width, height)).unwrap()
}

fn polyomino(width: usize, mut cells: Vec<bool>) -> Polyomino {
    let len = cells.len() - cells.len() % width;
    cells.truncate(len);
    cells[0] = true;
    Polyomino::new(width, cells).unwrap()
}

proptest! {
    #[test]
    fn groupings_partition_cells(
        width in 1usize..6,
        height in 1usize..6,
        start in (0usize..6, 0usize..6),
        steps in prop::collection::vec(0usize..4, 0..30),
    ) {
        let path = walk(width, height, start, &steps);
        let regions = path.groupings(None);

        let mut covered = HashSet::new();
        for region in &regions {
            prop_assert!(!region.is_empty());
            for cell in region.cells() {
                prop_assert!(covered.insert(*cell), "cell {:?} in two regions", cell);
            }
        }
        prop_assert_eq!(covered.len(), width * height);
        prop_assert_eq!(regions.iter().map(|region| region.len()).sum::<usize>(), width * height);
    }

    #[test]
    fn seeded_groupings_are_a_subset(
        width in 1usize..6,
        height in 1usize..6,
        start in (0usize..6, 0usize..6),
        steps in prop::collection::vec(0usize..4, 0..30),
        seed in (0usize..6, 0usize..6),
    ) {
        let path = walk(width, height, start, &steps);
        let all = path.groupings(None);
        let seeded = path.groupings(Some(&[Location(seed.0, seed.1)][..]));

        let in_bounds = seed.0 < width && seed.1 < height;
        prop_assert_eq!(seeded.len(), if in_bounds { 1 } else { 0 });
        for region in &seeded {
            prop_assert!(region.contains(Location(seed.0, seed.1)));
            prop_assert!(all.contains(region));
        }
    }

    #[test]
    fn sanitize_is_idempotent(
        width in 1usize..5,
        height in 1usize..5,
        marks in prop::collection::vec((0usize..6, 0usize..6, any::<bool>(), 0usize..4), 0..6),
        symmetry in prop::sample::select(Symmetry::VARIANTS.to_vec()),
    ) {
        let mut grid = Grid::blank(dims(width, height));
        for (i, j, start, orientation) in marks {
            let entity = if start { Entity::Start } else { Entity::End { orientation: Step::VARIANTS[orientation] } };
            let _ = grid.set_point(Location(i % (width + 1), j % (height + 1)), entity);
        }

        grid.set_symmetry(symmetry);
        grid.sanitize();
        let once = grid.clone();
        grid.sanitize();
        prop_assert_eq!(grid, once);
    }

    #[test]
    fn expand_then_reduce(
        width in 1usize..5,
        cells in prop::collection::vec(any::<bool>(), 1..20),
        left in 0usize..3,
        top in 0usize..3,
        extra in (0usize..3, 0usize..3),
    ) {
        let width = width.min(cells.len());
        let shape = polyomino(width, cells);
        let expanded = shape.expand(left, top, left + shape.width() + extra.0, top + shape.height() + extra.1, &mut []).unwrap();

        prop_assert_eq!(expanded.area(), shape.area());
        prop_assert_eq!(expanded.reduce(&mut []), shape.reduce(&mut []));
    }

    #[test]
    fn rotating_four_times_is_identity(
        width in 1usize..5,
        cells in prop::collection::vec(any::<bool>(), 1..20),
    ) {
        let width = width.min(cells.len());
        let shape = polyomino(width, cells);
        let turned = shape.rotate_clockwise();
        prop_assert_eq!((turned.width(), turned.height()), (shape.height(), shape.width()));
        prop_assert_eq!(turned.rotate_clockwise().rotate_clockwise().rotate_clockwise(), shape);
    }

    #[test]
    fn tiling_is_deterministic(
        region in prop::collection::vec(any::<bool>(), 1..10),
        pieces in prop::collection::vec((prop::collection::vec(any::<bool>(), 1..5), 1usize..3, any::<bool>(), any::<bool>()), 1..4),
        errors in 0usize..2,
    ) {
        let region = polyomino(3.min(region.len()), region);
        let pieces = pieces.into_iter()
            .enumerate()
            .map(|(index, (cells, width, free, negative))| {
                let width = width.min(cells.len());
                (Slot::cell(Location(index, 0)), polyomino(width, cells).with_free(free).with_negative(negative))
            })
            .collect::<Vec<_>>();

        let first = validate_tetris(&region, &pieces, errors, Duration::from_secs(60), 50);
        let second = validate_tetris(&region, &pieces, errors, Duration::from_secs(60), 50);
        prop_assert!(!first.timed_out);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn triangles_count_lines(
        width in 1usize..4,
        height in 1usize..4,
        start in (0usize..4, 0usize..4),
        steps in prop::collection::vec(0usize..4, 0..20),
        cell in (0usize..3, 0usize..3),
        count in prop::sample::select(TriangleCount::VARIANTS.to_vec()),
    ) {
        let path = walk(width, height, start, &steps);
        let cell = Location(cell.0 % width, cell.1 % height);
        let lines = [
            Line::horizontal(cell),
            Line::horizontal(Location(cell.0, cell.1 + 1)),
            Line::vertical(cell),
            Line::vertical(Location(cell.0 + 1, cell.1)),
        ].into_iter().filter(|line| path.contains_line(*line)).count();

        let mut grid = Grid::blank(dims(width, height));
        grid.set_cell(cell, Entity::Triangle { count, color: None }).unwrap();
        let verdict = validate(&grid, &path).unwrap();
        prop_assert_eq!(verdict.is_success(), lines == count.get());
    }

    #[test]
    fn squares_share_a_color(
        first in prop::sample::select(Color::VARIANTS.to_vec()),
        second in prop::sample::select(Color::VARIANTS.to_vec()),
    ) {
        let mut grid = Grid::blank(dims(2, 1));
        grid.set_cell(Location(0, 0), Entity::square(first)).unwrap()
            .set_cell(Location(1, 0), Entity::square(second)).unwrap();

        // a path along the top edge leaves both cells in one region
        let path = Path::new(vec![Location(0, 0), Location(1, 0)], dims(2, 1)).unwrap();
        let verdict = validate(&grid, &path).unwrap();
        prop_assert_eq!(verdict.is_success(), first == second);
    }
}
