use glam::IVec2;
use util::DIR_4;

use crate::Area;

/// Shortest path over walkable tiles from `from` to `to`, both endpoints
/// included. Returns an empty path when either endpoint is missing or the
/// destination is unreachable, never an error.
///
/// Expansion order is fixed, so the same map and endpoints always produce
/// the same path.
pub fn find_path(area: &Area, from: IVec2, to: IVec2) -> Vec<IVec2> {
    let walkable =
        |pos: IVec2| area.tile(pos).map_or(false, |t| t.kind.is_walkable());

    if !walkable(from) || !walkable(to) {
        return Vec::new();
    }

    util::astar_path(
        &from,
        &to,
        |&pos| {
            DIR_4
                .iter()
                .map(move |&d| pos + d)
                .filter(|&n| walkable(n))
                .collect::<Vec<_>>()
        },
        |a, b| ((a.x - b.x).abs() + (a.y - b.y).abs()) as usize,
    )
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use glam::ivec2;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::TileKind;

    fn corridor() -> Area {
        // Two rooms joined by a one-tile corridor at y=0, wall in between.
        let mut area = Area::filled("corridor", 2, TileKind::RockyFloor, 0);
        area.add_tile(ivec2(0, -2), TileKind::Wall, 0);
        area.add_tile(ivec2(0, -1), TileKind::Wall, 0);
        area.add_tile(ivec2(0, 1), TileKind::Wall, 0);
        area.add_tile(ivec2(0, 2), TileKind::Wall, 0);
        area
    }

    #[test]
    fn path_goes_through_the_gap() {
        let area = corridor();
        let path = find_path(&area, ivec2(-2, -2), ivec2(2, -2));
        assert!(!path.is_empty());
        assert_eq!(path.first(), Some(&ivec2(-2, -2)));
        assert_eq!(path.last(), Some(&ivec2(2, -2)));
        // Must route through the single opening.
        assert!(path.contains(&ivec2(0, 0)));
        assert!(path.iter().all(|&p| area.tile(p).unwrap().kind.is_walkable()));
    }

    #[test]
    fn path_is_deterministic() {
        let area = corridor();
        let a = find_path(&area, ivec2(-2, -2), ivec2(2, 2));
        let b = find_path(&area, ivec2(-2, -2), ivec2(2, 2));
        assert_eq!(a, b);
    }

    #[test]
    fn unreachable_is_empty() {
        let mut area = corridor();
        // Close the gap.
        area.add_tile(ivec2(0, 0), TileKind::Wall, 0);
        assert_eq!(find_path(&area, ivec2(-2, 0), ivec2(2, 0)), Vec::<IVec2>::new());
        // Endpoints outside the map.
        assert_eq!(
            find_path(&area, ivec2(50, 50), ivec2(51, 50)),
            Vec::<IVec2>::new()
        );
    }

    #[test]
    fn trivial_path_is_single_tile() {
        let area = corridor();
        assert_eq!(find_path(&area, ivec2(1, 1), ivec2(1, 1)), vec![ivec2(1, 1)]);
    }
}
