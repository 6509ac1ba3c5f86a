//! Line of sight and projection geometry

use hb_core::dungeon::{los, projectable, Floor, Position, TerrainKind};
use hb_core::MAX_RANGE;
use proptest::prelude::*;

const W: i32 = 16;
const H: i32 = 12;

fn interior() -> impl Strategy<Value = Position> {
    (1..H - 1, 1..W - 1).prop_map(|(y, x)| Position::new(y, x))
}

/// A floor with granite dropped on the given cells
fn cave(walls: &[Position]) -> Floor {
    let mut floor = Floor::new(W, H);
    for &wall in walls {
        floor.set_terrain(wall, TerrainKind::Granite);
    }
    floor
}

#[test]
fn corner_cells_do_not_block_an_exact_corner_ray() {
    // From (1,1) to (2,4) the ray crosses the shared corner of (1,3) and (2,2)
    let floor = cave(&[Position::new(1, 3), Position::new(2, 2)]);
    assert!(los(&floor, Position::new(1, 1), Position::new(2, 4)));

    let floor = cave(&[Position::new(2, 3)]);
    assert!(!los(&floor, Position::new(1, 1), Position::new(2, 4)));
}

#[test]
fn glass_passes_sight_but_not_bolts() {
    let mut floor = Floor::new(W, H);
    floor.set_terrain(Position::new(5, 6), TerrainKind::GlassWall);
    let (from, to) = (Position::new(5, 2), Position::new(5, 10));
    assert!(los(&floor, from, to));
    assert!(!projectable(&floor, MAX_RANGE, from, to));
}

proptest! {
    #[test]
    fn a_cell_always_sees_itself_and_its_neighbours(
        walls in prop::collection::vec(interior(), 0..40),
        p in interior(),
        dy in -1i32..=1,
        dx in -1i32..=1,
    ) {
        let floor = cave(&walls);
        let q = Position::new(p.y + dy, p.x + dx);
        prop_assert!(los(&floor, p, p));
        prop_assert!(los(&floor, p, q));
        prop_assert!(los(&floor, q, p));
    }

    #[test]
    fn open_floor_is_fully_visible_and_projectable(p in interior(), q in interior()) {
        let floor = Floor::new(W, H);
        prop_assert!(los(&floor, p, q));
        prop_assert!(los(&floor, q, p));
        prop_assert!(projectable(&floor, MAX_RANGE, p, q));
    }

    #[test]
    fn a_wall_between_blocks_a_straight_line(
        y in 1..H - 1,
        x1 in 1..W - 1,
        x2 in 1..W - 1,
    ) {
        prop_assume!((x1 - x2).abs() >= 2);
        let mid = Position::new(y, (x1 + x2) / 2);
        let floor = cave(&[mid]);
        let (from, to) = (Position::new(y, x1), Position::new(y, x2));
        prop_assert!(!los(&floor, from, to));
        prop_assert!(!projectable(&floor, MAX_RANGE, from, to));
    }
}
