use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::{Tile, WallSide};

/// Decorative object sharing a cell with the terrain.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Prop {
    pub pos: IVec2,
    pub name: String,
    pub frame: u16,
}

/// Monster generator placed on the map.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Spawner {
    pub pos: IVec2,
    pub monster_code: String,
    pub count: u8,
}

/// Wall piece on a cell edge.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Wall {
    pub pos: IVec2,
    pub side: WallSide,
    pub frame: u16,
}

/// Anything that can occupy a map cell.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub enum GameObject {
    Tile(Tile),
    Wall(Wall),
    Prop(Prop),
    Spawner(Spawner),
}

/// Contents of a single map cell.
///
/// One tile and one spawner per cell, one wall per edge side, any number of
/// props. Adding an object replaces the previous holder of its slot.
#[derive(Clone, Default, PartialEq, Debug, Serialize, Deserialize)]
pub struct GameObjectCollection {
    pub tile: Option<Tile>,
    pub left_wall: Option<Wall>,
    pub right_wall: Option<Wall>,
    pub spawner: Option<Spawner>,
    pub props: Vec<Prop>,
}

impl GameObjectCollection {
    pub fn add(&mut self, object: GameObject) {
        match object {
            GameObject::Tile(t) => self.tile = Some(t),
            GameObject::Wall(w) => match w.side {
                WallSide::Left => self.left_wall = Some(w),
                WallSide::Right => self.right_wall = Some(w),
            },
            GameObject::Spawner(s) => self.spawner = Some(s),
            GameObject::Prop(p) => self.props.push(p),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tile.is_none()
            && self.left_wall.is_none()
            && self.right_wall.is_none()
            && self.spawner.is_none()
            && self.props.is_empty()
    }
}
