//! Tile and area datatypes for the game world.

mod area;
pub use area::{coord_key, coord_from_key, proximity_positions, Area};

mod object;
pub use object::{GameObject, GameObjectCollection, Prop, Spawner, Wall};

mod path;
pub use path::find_path;

mod record;
pub use record::{AreaRecord, TileRecord, TransitionRecord};

mod tile;
pub use tile::{Tile, TileKind, Transition, WallSide};

use glam::{ivec2, vec2, IVec2, Vec2};

/// Width of a tile in world units.
pub const TILE_WIDTH: f32 = 64.0;

/// Height of a tile in world units, half the width per the 2:1 projection.
pub const TILE_HEIGHT: f32 = 32.0;

/// Grid coordinate of the tile containing a continuous world position.
pub fn tile_pos_from_unit(pos: Vec2) -> IVec2 {
    ivec2(
        (pos.x / TILE_WIDTH).floor() as i32,
        (pos.y / TILE_HEIGHT).floor() as i32,
    )
}

/// Continuous world position of a tile's center.
pub fn unit_pos_from_tile(pos: IVec2) -> Vec2 {
    vec2(
        (pos.x as f32 + 0.5) * TILE_WIDTH,
        (pos.y as f32 + 0.5) * TILE_HEIGHT,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_tile_roundtrip() {
        for pos in [ivec2(0, 0), ivec2(-3, 7), ivec2(100, -41)] {
            assert_eq!(tile_pos_from_unit(unit_pos_from_tile(pos)), pos);
        }
        assert_eq!(tile_pos_from_unit(vec2(-1.0, -1.0)), ivec2(-1, -1));
    }
}
