//! Interchange records for the external campaign serializer.
//!
//! The exact on-disk format is owned by the campaign layer; the simulation
//! only consumes and produces these shapes.

use glam::ivec2;
use serde::{Deserialize, Serialize};

use crate::{Area, TileKind, Transition};

/// One placed tile as a `[x, y, kind, frame]` tuple.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct TileRecord(pub i32, pub i32, pub TileKind, pub u16);

/// A tile transition, keyed by tile coordinate.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub x: i32,
    pub y: i32,
    pub target_area: String,
}

#[derive(Clone, Default, PartialEq, Debug, Serialize, Deserialize)]
pub struct AreaRecord {
    pub name: String,
    pub tiles: Vec<TileRecord>,
    #[serde(default)]
    pub transitions: Vec<TransitionRecord>,
}

impl From<&Area> for AreaRecord {
    fn from(area: &Area) -> Self {
        let mut record = AreaRecord {
            name: area.name.clone(),
            ..Default::default()
        };
        for tile in area.tiles() {
            record.tiles.push(TileRecord(
                tile.pos.x,
                tile.pos.y,
                tile.kind,
                tile.frame,
            ));
            if let Some(t) = &tile.transition {
                record.transitions.push(TransitionRecord {
                    x: tile.pos.x,
                    y: tile.pos.y,
                    target_area: t.target_area.clone(),
                });
            }
        }
        record
    }
}

impl From<AreaRecord> for Area {
    fn from(record: AreaRecord) -> Self {
        let mut area = Area::new(record.name);
        for TileRecord(x, y, kind, frame) in record.tiles {
            area.add_tile(ivec2(x, y), kind, frame);
        }
        for t in record.transitions {
            if let Some(tile) = area.tile_mut(ivec2(t.x, t.y)) {
                tile.transition = Some(Transition {
                    target_area: t.target_area,
                });
            } else {
                log::warn!(
                    "AreaRecord: transition at ({}, {}) has no tile",
                    t.x,
                    t.y
                );
            }
        }
        area
    }
}

#[cfg(test)]
mod tests {
    use glam::ivec2;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn record_roundtrip() {
        let mut area = Area::new("crypt");
        area.add_tile(ivec2(0, 0), TileKind::RockyFloor, 8);
        area.add_tile(ivec2(1, 0), TileKind::Wall, 3);
        area.tile_mut(ivec2(0, 0)).unwrap().transition =
            Some(Transition {
                target_area: "catacombs".into(),
            });

        let record = AreaRecord::from(&area);
        assert_eq!(record.tiles.len(), 2);
        assert_eq!(record.transitions.len(), 1);

        let rebuilt = Area::from(record.clone());
        assert_eq!(AreaRecord::from(&rebuilt), record);
    }
}
