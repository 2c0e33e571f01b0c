//! Destination-driven movement.
//!
//! Entities walk towards their destination point every frame. The step
//! length is scaled by the map projection so a creature covers the same
//! apparent screen distance whichever way it is heading, and a step that
//! would end inside another creature is rolled back to the last valid
//! position.

use serde::{Deserialize, Serialize};

use crate::{
    ecs::{Conditions, Destination, Facing, Kind, LastValidPos, Pos},
    prelude::*,
    ARRIVAL_THRESHOLD,
};

/// 8-way facing, named in screen terms with y growing downwards.
#[derive(
    Copy,
    Clone,
    Debug,
    Eq,
    PartialEq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "kebab-case")]
pub enum Compass {
    Up,
    UpRight,
    Right,
    DownRight,
    #[default]
    Down,
    DownLeft,
    Left,
    UpLeft,
}

impl Compass {
    /// Facing for a bearing in radians, 0 pointing right, positive turning
    /// down the screen.
    pub fn from_angle(rad: f32) -> Self {
        use Compass::*;
        let deg = rad.to_degrees();
        match deg {
            d if (-22.5..22.5).contains(&d) => Right,
            d if (22.5..67.5).contains(&d) => DownRight,
            d if (67.5..112.5).contains(&d) => Down,
            d if (112.5..157.5).contains(&d) => DownLeft,
            d if (-67.5..-22.5).contains(&d) => UpRight,
            d if (-112.5..-67.5).contains(&d) => Up,
            d if (-157.5..-112.5).contains(&d) => UpLeft,
            _ => Left,
        }
    }
}

impl Entity {
    /// One movement step towards the destination.
    pub(crate) fn move_step(&self, r: &mut impl AsMut<Runtime>, dt_ms: f32) {
        let r = r.as_mut();

        let pos = self.pos(r);
        let dest = self.destination(r);
        if pos == dest {
            return;
        }
        if self.conditions(r).contains(Conditions::ROOTED) {
            return;
        }

        let bearing = (dest.y - pos.y).atan2(dest.x - pos.x);
        self.set(r, Facing(Compass::from_angle(bearing)));

        let mut step = self.stats(r).movement_speed * dt_ms / 1000.0;
        // The projection squeezes the y axis in half, so a vertical step
        // covers less ground than a horizontal one.
        step *= 1.0 - bearing.sin().abs() / 2.0;
        step = step.min(pos.distance(dest));

        let next = pos + vec2(bearing.cos(), bearing.sin()) * step;
        self.set(r, LastValidPos(pos));

        if self.blocked_by_entity(r, next) {
            // Roll the step back; the destination stays so the entity keeps
            // trying once the blocker moves.
            return;
        }

        self.set(r, Pos(next));
        if util::within(next.x, dest.x, ARRIVAL_THRESHOLD)
            && util::within(next.y, dest.y, ARRIVAL_THRESHOLD)
        {
            self.set(r, Destination(next));
        }
    }

    /// Put the entity back on its last valid position.
    ///
    /// For the external collider to call when it reports a blocking
    /// overlap the internal step check couldn't see.
    pub fn revert_to_last_valid(&self, r: &mut impl AsMut<Runtime>) {
        let r = r.as_mut();
        let pos = self.get::<LastValidPos>(r).0;
        self.set(r, Pos(pos));
    }

    /// Whether stepping to a point would land inside another creature.
    fn blocked_by_entity(&self, r: &Runtime, at: Vec2) -> bool {
        r.roster.iter().any(|e| {
            e != self
                && matches!(e.kind(r), Kind::Player | Kind::Monster)
                && e.is_alive(r)
                && e.hit_test(r, at)
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::test_util::{sim, spawned_monster, spawned_player};

    #[test]
    fn facing_brackets() {
        use std::f32::consts::PI;
        assert_eq!(Compass::from_angle(0.0), Compass::Right);
        assert_eq!(Compass::from_angle(PI / 2.0), Compass::Down);
        assert_eq!(Compass::from_angle(-PI / 2.0), Compass::Up);
        assert_eq!(Compass::from_angle(PI), Compass::Left);
        assert_eq!(Compass::from_angle(PI / 4.0), Compass::DownRight);
        assert_eq!(Compass::from_angle(-3.0 * PI / 4.0), Compass::UpLeft);
    }

    #[test]
    fn walks_towards_destination_and_arrives() {
        let (mut r, _) = sim();
        let player = spawned_player(&mut r);
        player.place(&mut r, vec2(0.0, 0.0));
        player.set_destination(&mut r, vec2(30.0, 0.0));
        // Player speed is 150 units per second.
        r.update(100.0);
        assert_eq!(player.pos(&r), vec2(15.0, 0.0));
        assert_eq!(player.facing(&r), Compass::Right);
        r.update(100.0);
        r.update(100.0);
        assert_eq!(player.pos(&r), vec2(30.0, 0.0));
        assert_eq!(player.destination(&r), player.pos(&r));
    }

    #[test]
    fn vertical_steps_are_shorter() {
        let (mut r, _) = sim();
        let walker = spawned_player(&mut r);
        walker.place(&mut r, vec2(0.0, 0.0));
        walker.set_destination(&mut r, vec2(0.0, 1000.0));
        r.update(100.0);
        // Half the horizontal step rate when heading straight down.
        let pos = walker.pos(&r);
        assert!((pos - vec2(0.0, 7.5)).length() < 1e-4);
        assert_eq!(walker.facing(&r), Compass::Down);
    }

    #[test]
    fn external_collider_can_revert_a_step() {
        let (mut r, _) = sim();
        let player = spawned_player(&mut r);
        player.place(&mut r, vec2(0.0, 0.0));
        player.set_destination(&mut r, vec2(100.0, 0.0));
        r.update(100.0);
        let stepped = player.pos(&r);
        assert!(stepped.x > 0.0);
        player.revert_to_last_valid(&mut r);
        assert_eq!(player.pos(&r), vec2(0.0, 0.0));
    }

    #[test]
    fn blocked_step_rolls_back() {
        let (mut r, _) = sim();
        let player = spawned_player(&mut r);
        player.place(&mut r, vec2(0.0, 0.0));
        // A monster standing right in the way.
        spawned_monster(&mut r, "zombie", vec2(20.0, 0.0));
        player.set_destination(&mut r, vec2(20.0, 0.0));
        r.update(100.0);
        // The step would land inside the zombie's box, so it is undone.
        assert_eq!(player.pos(&r), vec2(0.0, 0.0));
        // Destination still stands.
        assert_eq!(player.destination(&r), vec2(20.0, 0.0));
    }
}
