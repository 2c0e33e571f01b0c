use glam::{ivec2, IVec2};
use serde::{Deserialize, Serialize};
use util::{interleave_u32, IndexMap};

use crate::{GameObject, GameObjectCollection, Tile, TileKind};

/// Key a grid coordinate into the sparse cell map.
///
/// Zigzag-encodes both components and interleaves the bits, a total bijection
/// from coordinate pairs to keys. The key is the sole cell identity, so
/// collisions would silently merge distinct cells.
pub fn coord_key(pos: IVec2) -> u64 {
    let zig = |v: i32| ((v << 1) ^ (v >> 31)) as u32;
    interleave_u32(zig(pos.x), zig(pos.y))
}

/// Inverse of `coord_key`.
pub fn coord_from_key(key: u64) -> IVec2 {
    let (a, b) = util::deinterleave_u64(key);
    let zag = |v: u32| ((v >> 1) as i32) ^ -((v & 1) as i32);
    ivec2(zag(a), zag(b))
}

/// The disk of grid positions within `radius` of `center`.
///
/// Computed column by column, including for each column the vertical span
/// `floor(sqrt(radius² − dx²))`. This gives a disk-shaped brush rather than a
/// square or a diamond.
pub fn proximity_positions(center: IVec2, radius: i32) -> Vec<IVec2> {
    let mut positions = Vec::new();
    let r2 = radius * radius;
    for cx in (center.x - radius)..=(center.x + radius) {
        let dx2 = (center.x - cx) * (center.x - cx);
        let dy = ((r2 - dx2) as f32).sqrt().floor() as i32;
        for cy in (center.y - dy)..=(center.y + dy) {
            positions.push(ivec2(cx, cy));
        }
    }
    positions
}

/// A named map: a sparse grid of cells addressed by coordinate key.
#[derive(Clone, Default, Debug, Serialize, Deserialize)]
pub struct Area {
    pub name: String,
    objects: IndexMap<u64, GameObjectCollection>,
}

impl Area {
    pub fn new(name: impl Into<String>) -> Self {
        Area {
            name: name.into(),
            objects: Default::default(),
        }
    }

    /// A square of floor tiles spanning `[-half, half]` on both axes.
    pub fn filled(
        name: impl Into<String>,
        half: i32,
        kind: TileKind,
        frame: u16,
    ) -> Self {
        let mut area = Area::new(name);
        for y in -half..=half {
            for x in -half..=half {
                area.add_tile(ivec2(x, y), kind, frame);
            }
        }
        area
    }

    /// Place a tile, overwriting and destroying any previous tile in the
    /// cell. Returns the placed tile.
    pub fn add_tile(
        &mut self,
        pos: IVec2,
        kind: TileKind,
        frame: u16,
    ) -> &Tile {
        let cell = self.objects.entry(coord_key(pos)).or_default();
        if cell.tile.is_some() {
            log::debug!("Area::add_tile: overwriting tile at {pos}");
        }
        cell.tile.insert(Tile::new(pos, kind, frame))
    }

    /// Remove and return the tile in a cell. A cell with bookkeeping but no
    /// tile is logged and treated as a no-op.
    pub fn remove_tile(&mut self, pos: IVec2) -> Option<Tile> {
        let cell = self.objects.get_mut(&coord_key(pos))?;
        if cell.tile.is_none() {
            log::warn!("Area::remove_tile: cell at {pos} has no tile");
            return None;
        }
        let tile = cell.tile.take();
        if cell.is_empty() {
            self.objects.shift_remove(&coord_key(pos));
        }
        tile
    }

    pub fn tile(&self, pos: IVec2) -> Option<&Tile> {
        self.objects.get(&coord_key(pos))?.tile.as_ref()
    }

    pub fn tile_mut(&mut self, pos: IVec2) -> Option<&mut Tile> {
        self.objects.get_mut(&coord_key(pos))?.tile.as_mut()
    }

    pub fn add_object(&mut self, object: GameObject) {
        let pos = match &object {
            GameObject::Tile(t) => t.pos,
            GameObject::Wall(w) => w.pos,
            GameObject::Prop(p) => p.pos,
            GameObject::Spawner(s) => s.pos,
        };
        self.objects.entry(coord_key(pos)).or_default().add(object);
    }

    pub fn cell(&self, pos: IVec2) -> Option<&GameObjectCollection> {
        self.objects.get(&coord_key(pos))
    }

    pub fn clear_cell(&mut self, pos: IVec2) {
        self.objects.shift_remove(&coord_key(pos));
    }

    /// All placed tiles, in placement order.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> + '_ {
        self.objects.values().filter_map(|c| c.tile.as_ref())
    }

    pub fn spawners(&self) -> impl Iterator<Item = &crate::Spawner> + '_ {
        self.objects.values().filter_map(|c| c.spawner.as_ref())
    }

    /// All existing tiles within the proximity disk around `center`.
    pub fn proximity_tiles(&self, center: IVec2, radius: i32) -> Vec<&Tile> {
        proximity_positions(center, radius)
            .into_iter()
            .filter_map(|pos| self.tile(pos))
            .collect()
    }
}
