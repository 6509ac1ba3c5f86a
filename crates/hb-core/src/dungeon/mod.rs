//! Dungeon terrain and geometry

mod cell;
mod floor;
pub mod geometry;

pub use cell::{Cell, TerrainFlags, TerrainKind};
pub use floor::{Floor, TerrainMap};
pub use geometry::{distance, los, project_path, projectable, Position, ProjectFlags};
