use glam::IVec2;
use serde::{Deserialize, Serialize};

/// Terrain type of a single map cell.
#[derive(
    Copy,
    Clone,
    Default,
    Eq,
    PartialEq,
    Hash,
    Debug,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "kebab-case")]
pub enum TileKind {
    #[default]
    RockyFloor,
    DirtFloor,
    FlagstoneFloor,
    Wall,
    BrokenWall,
}

use TileKind::*;

impl TileKind {
    pub fn is_walkable(self) -> bool {
        !self.is_wall()
    }

    pub fn is_wall(self) -> bool {
        matches!(self, Wall | BrokenWall)
    }
}

/// Named exit leading to another area.
#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub struct Transition {
    pub target_area: String,
}

/// A placed map cell. Immutable once placed, replaced wholesale on edit.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Tile {
    pub pos: IVec2,
    pub kind: TileKind,
    /// Index into the tile's sprite sheet, opaque to the simulation.
    pub frame: u16,
    pub transition: Option<Transition>,
}

impl Tile {
    pub fn new(pos: IVec2, kind: TileKind, frame: u16) -> Self {
        Tile {
            pos,
            kind,
            frame,
            transition: None,
        }
    }
}

/// Which half of a cell edge a wall piece occupies.
#[derive(
    Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize,
)]
pub enum WallSide {
    Left,
    Right,
}
