use std::f32::consts::TAU;

use glam::{vec2, IVec2, Vec2};
use rand::Rng;

/// 8 directions, clock face order.
pub const DIR_8: [IVec2; 8] = [
    IVec2::from_array([0, -1]),
    IVec2::from_array([1, -1]),
    IVec2::from_array([1, 0]),
    IVec2::from_array([1, 1]),
    IVec2::from_array([0, 1]),
    IVec2::from_array([-1, 1]),
    IVec2::from_array([-1, 0]),
    IVec2::from_array([-1, -1]),
];

/// 4 directions, clock face order.
pub const DIR_4: [IVec2; 4] = [
    IVec2::from_array([0, -1]),
    IVec2::from_array([1, 0]),
    IVec2::from_array([0, 1]),
    IVec2::from_array([-1, 0]),
];

/// Plain euclidean distance between two points.
pub fn dist(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// Distance metric matching the map's 2:1 screen projection.
///
/// The vertical axis is displayed compressed by half, so the y delta counts
/// double. Range checks against gameplay distances must use this, not `dist`.
pub fn scaled_dist(a: Vec2, b: Vec2) -> f32 {
    let d = b - a;
    (d.x * d.x + (d.y * 2.0) * (d.y * 2.0)).sqrt()
}

/// Whether two values are within a threshold of each other.
pub fn within(current: f32, expected: f32, threshold: f32) -> bool {
    (current - expected).abs() <= threshold
}

/// Uniform angle, uniform radius polar sample around a center point.
pub fn random_point_in_circle(
    rng: &mut impl Rng,
    center: Vec2,
    radius: f32,
) -> Vec2 {
    let angle = rng.gen_range(0.0..TAU);
    let r = rng.gen_range(0.0..radius);
    center + vec2(r * angle.cos(), r * angle.sin())
}

/// The point `len` units out from `origin` along the bearing towards
/// `target`. Falls back to `origin` when the two points coincide.
pub fn project_towards(origin: Vec2, target: Vec2, len: f32) -> Vec2 {
    if origin == target {
        return origin;
    }
    let angle = (target.y - origin.y).atan2(target.x - origin.x);
    origin + vec2(angle.cos() * len, angle.sin() * len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    // Keep quickcheck inputs in a sane range, float extremes aren't
    // interesting here.
    fn clamp(v: f32) -> f32 {
        if v.is_finite() {
            v.clamp(-1e6, 1e6)
        } else {
            0.0
        }
    }

    #[quickcheck]
    fn scaled_dist_is_symmetric(
        ax: f32,
        ay: f32,
        bx: f32,
        by: f32,
    ) -> bool {
        let a = vec2(clamp(ax), clamp(ay));
        let b = vec2(clamp(bx), clamp(by));
        scaled_dist(a, b) == scaled_dist(b, a)
    }

    #[test]
    fn scaled_dist_doubles_vertical() {
        assert_eq!(scaled_dist(vec2(0.0, 0.0), vec2(3.0, 0.0)), 3.0);
        assert_eq!(scaled_dist(vec2(0.0, 0.0), vec2(0.0, 3.0)), 6.0);
        assert_eq!(scaled_dist(vec2(1.0, 1.0), vec2(4.0, 3.0)), 5.0);
    }

    #[test]
    fn polar_sample_stays_in_circle() {
        let mut rng = crate::srng(&"circle");
        let center = vec2(10.0, -20.0);
        for _ in 0..1000 {
            let p = random_point_in_circle(&mut rng, center, 100.0);
            assert!(dist(center, p) <= 100.0);
        }
    }

    #[test]
    fn projection_follows_bearing() {
        let p = project_towards(vec2(50.0, 50.0), vec2(100.0, 100.0), 30.0);
        assert!(dist(p, vec2(50.0, 50.0)) - 30.0 < 1e-4);
        // Bearing towards the target is preserved.
        assert!((p.y - p.x).abs() < 1e-4);

        let same = project_towards(vec2(5.0, 5.0), vec2(5.0, 5.0), 30.0);
        assert_eq!(same, vec2(5.0, 5.0));
    }
}
