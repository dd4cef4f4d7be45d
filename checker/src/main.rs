use std::num::NonZero;

use log::info;

use pathcheck::{validate, Color, Entity, Grid, Location, Path, Polyomino, Step};

fn main() {
    env_logger::init();

    let dims = (NonZero::new(3).unwrap(), NonZero::new(3).unwrap());
    let mut grid = Grid::blank(dims);
    grid.set_point(Location(0, 3), Entity::Start).unwrap()
        .set_point(Location(1, 0), Entity::End { orientation: Step::Up }).unwrap()
        .set_point(Location(1, 2), Entity::Hexagon).unwrap()
        .set_cell(Location(0, 1), Entity::square(Color::Black)).unwrap()
        .set_cell(Location(2, 1), Entity::square(Color::White)).unwrap()
        .set_cell(Location(0, 2), Entity::tetris(Polyomino::from_rows(&["#", "#", "#"]).unwrap())).unwrap()
        .set_cell(Location(1, 0), Entity::triangle(1).unwrap()).unwrap();

    print!("{}", grid);

    // split the first column from the rest
    let solution = Path::new(vec![Location(0, 3), Location(1, 3), Location(1, 2), Location(1, 1), Location(1, 0)], dims).unwrap();
    let verdict = validate(&grid, &solution).unwrap();
    info!("solution verdict: {:?}", verdict);
    assert!(verdict.is_success());

    // hugging the edge leaves one region holding every symbol
    let wrong = Path::new(vec![Location(0, 3), Location(0, 2), Location(0, 1), Location(0, 0), Location(1, 0)], dims).unwrap();
    let verdict = validate(&grid, &wrong).unwrap();
    assert!(!verdict.is_success());
    for slot in &verdict.hard_errors {
        println!("failed: {:?} at {:?}", slot.kind, slot.location);
    }
}
