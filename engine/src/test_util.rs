//! Shared scaffolding for the crate's tests.

use glam::{vec2, Vec2};
use world::{Area, TileKind};

use crate::{Bestiary, Entity, Quality, Runtime, StubAnimator};

/// A runtime on an open floor with a scripted animator.
pub fn sim() -> (Runtime, StubAnimator) {
    let stub = StubAnimator::new();
    let mut r =
        Runtime::new(Area::filled("arena", 20, TileKind::RockyFloor, 0));
    r.set_animator(Box::new(stub.clone()));
    (r, stub)
}

pub fn spawned_player(r: &mut Runtime) -> Entity {
    r.spawn_player(vec2(0.0, 0.0))
}

pub fn spawned_monster(r: &mut Runtime, code: &str, pos: Vec2) -> Entity {
    r.spawn_monster(&Bestiary::standard(), code, Quality::Normal, pos)
        .expect("test archetype missing")
}

pub fn spawned_npc(r: &mut Runtime, code: &str, pos: Vec2) -> Entity {
    r.spawn_npc(code, pos)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::prelude::*;

    // Full frame-loop scenario: a rusher spots the player, closes in,
    // swings, and the swing's contact frame draws blood.
    #[test]
    fn zombie_hunts_the_player_down() {
        let (mut r, stub) = sim();
        let player = spawned_player(&mut r);
        player.place(&mut r, vec2(400.0, 0.0));
        let zombie = spawned_monster(&mut r, "zombie", vec2(0.0, 0.0));

        // First frame: the zombie spots the player and commits.
        r.update(16.0);
        assert_eq!(zombie.behavior_state(&r), BehaviorState::Charging);
        assert_eq!(zombie.target(&r), Some(player));

        // Let it walk. Zombie speed 60 and a 300 unit gap to melee range,
        // so a few simulated seconds are plenty.
        for _ in 0..400 {
            r.update(16.0);
            if zombie.behavior_state(&r) == BehaviorState::MeleeAttacking {
                break;
            }
        }
        assert_eq!(zombie.behavior_state(&r), BehaviorState::MeleeAttacking);

        // One more frame to request the swing.
        r.update(16.0);
        let swing = stub.last_request(zombie).unwrap();
        assert!(matches!(
            swing,
            AnimState::MeleeAttack | AnimState::MeleeAttack2
        ));

        // The animation system reports the contact frame.
        let before = player.health(&r);
        r.post_anim_signal(zombie, AnimSignal::YoyoMidpoint(swing));
        r.update(16.0);
        assert!(player.health(&r) < before);
        assert!(r
            .drain_msgs()
            .iter()
            .any(|m| matches!(m, Msg::Hurt { target, .. } if *target == player)));
    }

    // Full ranged loop: a skirmisher holds its ground, the cast animation
    // reports its contact frame, and the spear crosses the gap on its own.
    #[test]
    fn goblin_spears_the_player_from_afar() {
        let (mut r, _) = sim();
        let player = spawned_player(&mut r);
        player.place(&mut r, vec2(400.0, 0.0));
        let goblin = spawned_monster(&mut r, "goblin", vec2(0.0, 0.0));

        r.update(16.0); // Spots and commits.
        r.update(16.0); // Charging resolves to ranged attacking.
        assert_eq!(goblin.behavior_state(&r), BehaviorState::RangedAttacking);

        r.update(16.0); // Attack state requests the throw animation.
        r.post_anim_signal(
            goblin,
            AnimSignal::YoyoMidpoint(AnimState::RangedAttack),
        );
        r.update(16.0); // Contact frame releases the spear.
        assert_eq!(r.monsters().len(), 1);
        assert_eq!(r.entities().count(), 3);

        let before = player.health(&r);
        // Spear speed 400 across a 400 unit gap; give it two seconds.
        for _ in 0..40 {
            r.update(50.0);
        }
        let msgs = r.drain_msgs();
        assert!(msgs
            .iter()
            .any(|m| matches!(m, Msg::SpellCast { caster, .. } if *caster == goblin)));
        // Spear base damage, with no magic behind it.
        assert!(msgs.iter().any(|m| matches!(
            m,
            Msg::Hurt { target, amount, .. } if *target == player && *amount == 10.0
        )));
        assert!(player.health(&r) < before);
    }
}
