//! The floor grid and the terrain query interface

use serde::{Deserialize, Serialize};

use super::cell::{Cell, TerrainFlags, TerrainKind};
use super::geometry::Position;
use crate::monster::MonsterId;
use crate::world::EngineError;

/// Read-only terrain queries used by the geometry engine.
///
/// Positions outside the map report empty flags, so they block both sight
/// and projection.
pub trait TerrainMap {
    fn terrain_flags_at(&self, pos: Position) -> TerrainFlags;
    fn occupant_at(&self, pos: Position) -> Option<MonsterId>;
    fn in_bounds(&self, pos: Position) -> bool;

    fn supports_sight(&self, pos: Position) -> bool {
        self.terrain_flags_at(pos).contains(TerrainFlags::LOS)
    }

    fn supports_projection(&self, pos: Position) -> bool {
        self.terrain_flags_at(pos).contains(TerrainFlags::PROJECT)
    }
}

/// A dungeon floor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Floor {
    width: i32,
    height: i32,
    cells: Vec<Cell>,
    /// Dungeon depth (0 = surface)
    pub depth: i32,
    /// Non-innate spells cannot be cast here
    pub no_magic: bool,
}

impl Floor {
    /// Create an open floor enclosed by permanent walls
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let mut cells = vec![Cell::new(TerrainKind::Floor); (width * height) as usize];
        for y in 0..height {
            for x in 0..width {
                if y == 0 || x == 0 || y == height - 1 || x == width - 1 {
                    cells[(y * width + x) as usize] = Cell::new(TerrainKind::PermanentWall);
                }
            }
        }
        Self {
            width,
            height,
            cells,
            depth: 1,
            no_magic: false,
        }
    }

    /// Build a floor from rows of map glyphs (see [`TerrainKind::symbol`]).
    ///
    /// Rows shorter than the widest row are padded with granite.
    pub fn from_rows(rows: &[&str]) -> Result<Self, EngineError> {
        let height = rows.len() as i32;
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0) as i32;
        if width == 0 || height == 0 {
            return Err(EngineError::Config("empty floor layout".to_string()));
        }
        let mut cells = Vec::with_capacity((width * height) as usize);
        for (y, row) in rows.iter().enumerate() {
            let mut count = 0;
            for (x, c) in row.chars().enumerate() {
                let kind = TerrainKind::from_symbol(c).ok_or_else(|| {
                    EngineError::Config(format!("unknown terrain glyph '{c}' at ({y}, {x})"))
                })?;
                cells.push(Cell::new(kind));
                count += 1;
            }
            for _ in count..width {
                cells.push(Cell::new(TerrainKind::Granite));
            }
        }
        Ok(Self {
            width,
            height,
            cells,
            depth: 1,
            no_magic: false,
        })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    fn index(&self, pos: Position) -> Option<usize> {
        if pos.x < 0 || pos.y < 0 || pos.x >= self.width || pos.y >= self.height {
            return None;
        }
        Some((pos.y * self.width + pos.x) as usize)
    }

    pub fn cell(&self, pos: Position) -> Option<&Cell> {
        self.index(pos).map(|i| &self.cells[i])
    }

    pub fn set_terrain(&mut self, pos: Position, kind: TerrainKind) {
        if let Some(i) = self.index(pos) {
            self.cells[i].kind = kind;
        }
    }

    pub fn set_occupant(&mut self, pos: Position, occupant: Option<MonsterId>) {
        if let Some(i) = self.index(pos) {
            self.cells[i].occupant = occupant;
        }
    }

    /// Walkable and unoccupied
    pub fn is_empty_walkable(&self, pos: Position) -> bool {
        self.cell(pos)
            .is_some_and(|c| c.flags().contains(TerrainFlags::MOVE) && c.occupant.is_none())
    }

    /// Render the terrain back into glyph rows
    pub fn render(&self) -> Vec<String> {
        self.cells
            .chunks(self.width as usize)
            .map(|row| row.iter().map(|c| c.kind.symbol()).collect())
            .collect()
    }
}

impl TerrainMap for Floor {
    fn terrain_flags_at(&self, pos: Position) -> TerrainFlags {
        self.cell(pos).map(Cell::flags).unwrap_or_else(TerrainFlags::empty)
    }

    fn occupant_at(&self, pos: Position) -> Option<MonsterId> {
        self.cell(pos).and_then(|c| c.occupant)
    }

    /// Interior cells only; the outer ring is never a valid target
    fn in_bounds(&self, pos: Position) -> bool {
        pos.y > 0 && pos.x > 0 && pos.y < self.height - 1 && pos.x < self.width - 1
    }
}
