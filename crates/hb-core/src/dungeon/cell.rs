//! Map cell types

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::monster::MonsterId;

bitflags! {
    /// Terrain capabilities
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TerrainFlags: u16 {
        /// Sight passes through
        const LOS = 0x0001;
        /// Bolts and balls pass through
        const PROJECT = 0x0002;
        /// Walkable
        const MOVE = 0x0004;
        const DOOR = 0x0008;
        /// Permanent rock, never altered
        const PERMANENT = 0x0010;
    }
}

// Manual serde for TerrainFlags
impl Serialize for TerrainFlags {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TerrainFlags {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bits = u16::deserialize(deserializer)?;
        Ok(TerrainFlags::from_bits_truncate(bits))
    }
}

/// Terrain type
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum TerrainKind {
    #[default]
    Floor = 0,
    Granite = 1,
    PermanentWall = 2,
    /// Transparent but solid
    GlassWall = 3,
    /// Blocks sight, lets bolts through
    Tree = 4,
    OpenDoor = 5,
    ClosedDoor = 6,
    Rubble = 7,
}

impl TerrainKind {
    /// Capability flags of this terrain
    pub const fn flags(&self) -> TerrainFlags {
        match self {
            TerrainKind::Floor => TerrainFlags::LOS
                .union(TerrainFlags::PROJECT)
                .union(TerrainFlags::MOVE),
            TerrainKind::Granite => TerrainFlags::empty(),
            TerrainKind::PermanentWall => TerrainFlags::PERMANENT,
            TerrainKind::GlassWall => TerrainFlags::LOS,
            TerrainKind::Tree => TerrainFlags::PROJECT.union(TerrainFlags::MOVE),
            TerrainKind::OpenDoor => TerrainFlags::LOS
                .union(TerrainFlags::PROJECT)
                .union(TerrainFlags::MOVE)
                .union(TerrainFlags::DOOR),
            TerrainKind::ClosedDoor => TerrainFlags::DOOR,
            TerrainKind::Rubble => TerrainFlags::empty(),
        }
    }

    /// Map glyph used by [`crate::dungeon::Floor::from_rows`]
    pub const fn symbol(&self) -> char {
        match self {
            TerrainKind::Floor => '.',
            TerrainKind::Granite => '#',
            TerrainKind::PermanentWall => 'X',
            TerrainKind::GlassWall => '=',
            TerrainKind::Tree => 'T',
            TerrainKind::OpenDoor => '\'',
            TerrainKind::ClosedDoor => '+',
            TerrainKind::Rubble => ':',
        }
    }

    /// Parse a map glyph
    pub const fn from_symbol(c: char) -> Option<Self> {
        match c {
            '.' => Some(TerrainKind::Floor),
            '#' => Some(TerrainKind::Granite),
            'X' => Some(TerrainKind::PermanentWall),
            '=' => Some(TerrainKind::GlassWall),
            'T' => Some(TerrainKind::Tree),
            '\'' => Some(TerrainKind::OpenDoor),
            '+' => Some(TerrainKind::ClosedDoor),
            ':' => Some(TerrainKind::Rubble),
            _ => None,
        }
    }
}

/// A single map cell
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub kind: TerrainKind,
    /// Monster standing here
    pub occupant: Option<MonsterId>,
}

impl Cell {
    pub const fn new(kind: TerrainKind) -> Self {
        Self {
            kind,
            occupant: None,
        }
    }

    pub const fn flags(&self) -> TerrainFlags {
        self.kind.flags()
    }

    pub const fn blocks_sight(&self) -> bool {
        !self.kind.flags().contains(TerrainFlags::LOS)
    }

    pub const fn blocks_projection(&self) -> bool {
        !self.kind.flags().contains(TerrainFlags::PROJECT)
    }
}
