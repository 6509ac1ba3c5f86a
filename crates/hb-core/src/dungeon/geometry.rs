//! Integer grid geometry: distance, line of sight and bolt paths
//!
//! [`los`] answers "can these two cells see each other" and needs every cell
//! strictly between the endpoints to let sight through. [`projectable`]
//! answers "would a bolt arrive" by walking the bolt path and stopping at
//! the first cell that does not let projections through. The two differ on
//! purpose: glass lets sight through but stops bolts, trees do the opposite.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use super::floor::TerrainMap;
use crate::rng::GameRng;

/// A grid position (row, column)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub y: i32,
    pub x: i32,
}

impl Position {
    pub const fn new(y: i32, x: i32) -> Self {
        Self { y, x }
    }

    /// Chebyshev distance
    pub fn chebyshev(&self, other: Position) -> i32 {
        (self.y - other.y).abs().max((self.x - other.x).abs())
    }
}

/// Approximate distance: the longer axis plus half the shorter one.
pub fn distance(a: Position, b: Position) -> i32 {
    let dy = (a.y - b.y).abs();
    let dx = (a.x - b.x).abs();
    if dy > dx { dy + dx / 2 } else { dx + dy / 2 }
}

/// Line of sight between two cells.
///
/// Only the cells strictly between the endpoints are inspected. A ray that
/// passes exactly through a cell corner is not blocked by the cells sharing
/// that corner.
pub fn los<M: TerrainMap + ?Sized>(map: &M, from: Position, to: Position) -> bool {
    let (y1, x1, y2, x2) = (from.y, from.x, to.y, to.x);
    let dy = y2 - y1;
    let dx = x2 - x1;
    let ay = dy.abs();
    let ax = dx.abs();

    // Adjacent or identical
    if ax < 2 && ay < 2 {
        return true;
    }

    let open = |y: i32, x: i32| map.supports_sight(Position::new(y, x));

    // Vertical
    if dx == 0 {
        if dy > 0 {
            return (y1 + 1..y2).all(|ty| open(ty, x1));
        }
        return (y2 + 1..y1).all(|ty| open(ty, x1));
    }

    // Horizontal
    if dy == 0 {
        if dx > 0 {
            return (x1 + 1..x2).all(|tx| open(y1, tx));
        }
        return (x2 + 1..x1).all(|tx| open(y1, tx));
    }

    let sx = dx.signum();
    let sy = dy.signum();

    // Knight's move
    if ax == 1 {
        if ay == 2 && open(y1 + sy, x1) {
            return true;
        }
    } else if ay == 1 && ax == 2 && open(y1, x1 + sx) {
        return true;
    }

    let f2 = ax * ay;
    let f1 = f2 << 1;

    if ax >= ay {
        let mut qy = ay * ay;
        let m = qy << 1;
        let mut tx = x1 + sx;
        let mut ty;
        if qy == f2 {
            ty = y1 + sy;
            qy -= f1;
        } else {
            ty = y1;
        }

        while tx != x2 {
            if !open(ty, tx) {
                return false;
            }
            qy += m;
            if qy < f2 {
                tx += sx;
            } else if qy > f2 {
                ty += sy;
                if !open(ty, tx) {
                    return false;
                }
                qy -= f1;
                tx += sx;
            } else {
                // Exact corner: slide diagonally without checking
                ty += sy;
                qy -= f1;
                tx += sx;
            }
        }
        return true;
    }

    let mut qx = ax * ax;
    let m = qx << 1;
    let mut ty = y1 + sy;
    let mut tx;
    if qx == f2 {
        tx = x1 + sx;
        qx -= f1;
    } else {
        tx = x1;
    }

    while ty != y2 {
        if !open(ty, tx) {
            return false;
        }
        qx += m;
        if qx < f2 {
            ty += sy;
        } else if qx > f2 {
            tx += sx;
            if !open(ty, tx) {
                return false;
            }
            qx -= f1;
            ty += sy;
        } else {
            tx += sx;
            qx -= f1;
            ty += sy;
        }
    }
    true
}

bitflags! {
    /// Path walking options
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ProjectFlags: u8 {
        /// Continue past the destination
        const THRU = 0x01;
        /// Stop at the first occupied cell
        const STOP = 0x02;
        /// Ignore terrain entirely
        const PATH = 0x04;
    }
}

/// Walk the path a bolt takes from `from` towards `to`.
///
/// The returned cells exclude the origin. The walk ends on reaching the
/// destination (unless [`ProjectFlags::THRU`]), after entering a cell that
/// stops projections, when the range is exhausted (diagonal steps count one
/// and a half), or before leaving the map interior.
pub fn project_path<M: TerrainMap + ?Sized>(
    map: &M,
    range: i32,
    from: Position,
    to: Position,
    flags: ProjectFlags,
) -> Vec<Position> {
    let mut path = Vec::new();
    if from == to {
        return path;
    }

    let (y1, x1, y2, x2) = (from.y, from.x, to.y, to.x);
    let dy = y2 - y1;
    let dx = x2 - x1;
    let ay = dy.abs();
    let ax = dx.abs();
    let sy = if dy < 0 { -1 } else { 1 };
    let sx = if dx < 0 { -1 } else { 1 };

    // Number of "units" in one "half" grid and one "full" grid
    let half = ay * ax;
    let full = half << 1;

    // Returns true when the walk must stop at the cell just pushed.
    let blocked = |path: &Vec<Position>, pos: Position, penalty: i32| -> bool {
        let n = path.len() as i32;
        if n + penalty >= range {
            return true;
        }
        if !flags.contains(ProjectFlags::THRU) && pos == to {
            return true;
        }
        if !flags.contains(ProjectFlags::PATH) && !map.supports_projection(pos) {
            return true;
        }
        if flags.contains(ProjectFlags::STOP) && n > 0 && map.occupant_at(pos).is_some() {
            return true;
        }
        !map.in_bounds(pos)
    };

    if ay > ax {
        // Vertical major axis
        let m = ax * ax * 2;
        let mut y = y1 + sy;
        let mut x = x1;
        let mut frac = m;
        let mut k = 0;
        if frac > half {
            x += sx;
            frac -= full;
            k += 1;
        }
        loop {
            let pos = Position::new(y, x);
            path.push(pos);
            if blocked(&path, pos, k >> 1) {
                break;
            }
            if m != 0 {
                frac += m;
                if frac > half {
                    x += sx;
                    frac -= full;
                    k += 1;
                }
            }
            y += sy;
        }
    } else if ax > ay {
        // Horizontal major axis
        let m = ay * ay * 2;
        let mut y = y1;
        let mut x = x1 + sx;
        let mut frac = m;
        let mut k = 0;
        if frac > half {
            y += sy;
            frac -= full;
            k += 1;
        }
        loop {
            let pos = Position::new(y, x);
            path.push(pos);
            if blocked(&path, pos, k >> 1) {
                break;
            }
            if m != 0 {
                frac += m;
                if frac > half {
                    y += sy;
                    frac -= full;
                    k += 1;
                }
            }
            x += sx;
        }
    } else {
        // Diagonal
        let mut y = y1 + sy;
        let mut x = x1 + sx;
        loop {
            let pos = Position::new(y, x);
            path.push(pos);
            let n = path.len() as i32;
            if blocked(&path, pos, n >> 1) {
                break;
            }
            y += sy;
            x += sx;
        }
    }

    path
}

/// True when a bolt fired from `from` would arrive at `to`.
pub fn projectable<M: TerrainMap + ?Sized>(
    map: &M,
    range: i32,
    from: Position,
    to: Position,
) -> bool {
    let path = project_path(map, range, from, to, ProjectFlags::empty());
    match path.last() {
        None => true,
        Some(last) => *last == to,
    }
}

/// Pick a destination for a short-range teleport.
///
/// Candidates are spread around `from` at most `dist` away and at least half
/// that; the radius doubles (and the minimum halves) after every 500 failed
/// picks. `avoid` is kept clear (the player's cell).
pub fn pick_teleport_target<M: TerrainMap + ?Sized>(
    map: &M,
    rng: &mut GameRng,
    from: Position,
    dist: i32,
    avoid: Position,
    is_free: impl Fn(Position) -> bool,
) -> Option<Position> {
    let mut dis = dist.max(1);
    let mut min = dis / 2;
    for _ in 0..8 {
        for _ in 0..500 {
            let pos = Position::new(rng.rand_spread(from.y, dis), rng.rand_spread(from.x, dis));
            let d = distance(from, pos);
            if d < min || d > dis || pos == from || pos == avoid {
                continue;
            }
            if !map.in_bounds(pos) || !is_free(pos) {
                continue;
            }
            return Some(pos);
        }
        dis *= 2;
        min /= 2;
    }
    tracing::debug!(?from, dist, "no teleport destination found");
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::{Floor, TerrainKind};

    #[test]
    fn test_distance() {
        let o = Position::new(0, 0);
        assert_eq!(distance(o, Position::new(0, 5)), 5);
        assert_eq!(distance(o, Position::new(4, 2)), 5);
        assert_eq!(distance(o, Position::new(3, 3)), 4);
    }

    #[test]
    fn test_los_open_floor() {
        let floor = Floor::new(20, 20);
        assert!(los(&floor, Position::new(2, 2), Position::new(15, 9)));
        assert!(los(&floor, Position::new(15, 9), Position::new(2, 2)));
    }

    #[test]
    fn test_los_wall_blocks_horizontal() {
        let mut floor = Floor::new(10, 5);
        floor.set_terrain(Position::new(2, 4), TerrainKind::Granite);
        assert!(!los(&floor, Position::new(2, 1), Position::new(2, 7)));
        assert!(!los(&floor, Position::new(2, 7), Position::new(2, 1)));
        assert!(los(&floor, Position::new(1, 1), Position::new(1, 7)));
    }

    #[test]
    fn test_los_ignores_endpoints() {
        let mut floor = Floor::new(10, 5);
        floor.set_terrain(Position::new(2, 7), TerrainKind::Granite);
        assert!(los(&floor, Position::new(2, 1), Position::new(2, 7)));
    }

    #[test]
    fn test_los_knights_move() {
        let mut floor = Floor::new(7, 7);
        let from = Position::new(2, 2);
        let to = Position::new(4, 3);
        // The straight cell is open: visible
        assert!(los(&floor, from, to));
        // Block the straight cell; the general scan also needs it
        floor.set_terrain(Position::new(3, 2), TerrainKind::Granite);
        floor.set_terrain(Position::new(3, 3), TerrainKind::Granite);
        assert!(!los(&floor, from, to));
    }

    #[test]
    fn test_glass_and_tree() {
        let mut floor = Floor::new(9, 5);
        let from = Position::new(2, 1);
        let to = Position::new(2, 6);

        floor.set_terrain(Position::new(2, 3), TerrainKind::GlassWall);
        assert!(los(&floor, from, to));
        assert!(!projectable(&floor, 18, from, to));

        floor.set_terrain(Position::new(2, 3), TerrainKind::Tree);
        assert!(!los(&floor, from, to));
        assert!(projectable(&floor, 18, from, to));
    }

    #[test]
    fn test_project_path_straight() {
        let floor = Floor::new(10, 5);
        let path = project_path(&floor, 18, Position::new(2, 1), Position::new(2, 5), ProjectFlags::empty());
        assert_eq!(path.len(), 4);
        assert_eq!(path[0], Position::new(2, 2));
        assert_eq!(*path.last().unwrap(), Position::new(2, 5));
    }

    #[test]
    fn test_project_path_stops_on_wall() {
        let mut floor = Floor::new(10, 5);
        floor.set_terrain(Position::new(2, 3), TerrainKind::Granite);
        let path = project_path(&floor, 18, Position::new(2, 1), Position::new(2, 6), ProjectFlags::empty());
        assert_eq!(*path.last().unwrap(), Position::new(2, 3));
        let path = project_path(&floor, 18, Position::new(2, 1), Position::new(2, 6), ProjectFlags::PATH);
        assert_eq!(*path.last().unwrap(), Position::new(2, 6));
    }

    #[test]
    fn test_project_path_range() {
        let floor = Floor::new(40, 5);
        let path = project_path(&floor, 5, Position::new(2, 1), Position::new(2, 30), ProjectFlags::empty());
        assert_eq!(path.len(), 5);
        assert!(!projectable(&floor, 5, Position::new(2, 1), Position::new(2, 30)));
    }

    #[test]
    fn test_project_path_thru() {
        let floor = Floor::new(12, 5);
        let path = project_path(&floor, 18, Position::new(2, 1), Position::new(2, 4), ProjectFlags::THRU);
        // Continues to the last interior cell then stops at the boundary wall
        assert_eq!(*path.last().unwrap(), Position::new(2, 11));
    }

    #[test]
    fn test_project_path_stop_at_occupant() {
        use crate::monster::MonsterId;
        let mut floor = Floor::new(12, 5);
        floor.set_occupant(Position::new(2, 3), Some(MonsterId(1)));
        let path = project_path(&floor, 18, Position::new(2, 1), Position::new(2, 8), ProjectFlags::STOP);
        assert_eq!(*path.last().unwrap(), Position::new(2, 3));
    }

    #[test]
    fn test_projectable_same_cell() {
        let floor = Floor::new(5, 5);
        assert!(projectable(&floor, 18, Position::new(2, 2), Position::new(2, 2)));
    }

    #[test]
    fn test_pick_teleport_target_within_range() {
        let floor = Floor::new(30, 30);
        let mut rng = GameRng::new(42);
        let from = Position::new(15, 15);
        for _ in 0..20 {
            let pos = pick_teleport_target(&floor, &mut rng, from, 7, Position::new(1, 1), |p| {
                floor.is_empty_walkable(p)
            })
            .unwrap();
            assert!(distance(from, pos) <= 7);
            assert!(distance(from, pos) >= 3);
        }
    }
}
