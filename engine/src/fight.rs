//! Damage application and combat range checks.

use rand::Rng;

use crate::{
    ecs::{Conditions, LootTable},
    prelude::*,
    Pack, PackMember,
};

impl Entity {
    /// Whether the current target sits within the given scaled distance.
    pub fn is_target_in_range(
        &self,
        r: &impl AsRef<Runtime>,
        range: f32,
    ) -> bool {
        let r = r.as_ref();
        if !self.is_target_valid(r) {
            return false;
        }
        let Some(target) = self.get::<crate::ecs::TargetRef>(r).0 else {
            return false;
        };
        scaled_dist(self.pos(r), target.pos(r)) <= range
    }

    pub fn in_melee_range(&self, r: &impl AsRef<Runtime>) -> bool {
        self.is_target_in_range(r, self.stats(r).melee_range)
    }

    pub fn in_projectile_range(&self, r: &impl AsRef<Runtime>) -> bool {
        self.is_target_in_range(r, self.stats(r).projectile_range)
    }

    /// Apply incoming damage.
    ///
    /// Mitigation runs first, then health clamps at zero. Damaging an
    /// invincible or already dead entity does nothing, so repeated kill
    /// blows are harmless. Reaching zero flips the entity into its terminal
    /// death state.
    pub fn damage(
        &self,
        r: &mut impl AsMut<Runtime>,
        source: Option<Entity>,
        kind: DamageType,
        amount: f32,
    ) {
        let r = r.as_mut();

        if !self.has::<crate::DynamicStats>(r) {
            return;
        }
        if self.conditions(r).contains(Conditions::INVINCIBLE) {
            return;
        }
        if self.is_dead(r) {
            return;
        }

        let reduced = r
            .mitigation
            .reduce(amount, kind, &self.stats(r))
            .max(0.0);

        let health = self.with_mut::<crate::DynamicStats, _>(r, |d| {
            d.health = (d.health - reduced).max(0.0);
            d.health
        });

        r.push_msg(Msg::Hurt {
            target: *self,
            source,
            amount: reduced,
        });

        if health <= 0.0 {
            self.die(r);
        }
    }

    /// Health ran out: stop in place, play the death animation, drop loot
    /// and leave the corpse inert.
    fn die(&self, r: &mut Runtime) {
        let pos = self.pos(r);
        self.set_destination(r, pos);
        self.set_behavior_state(r, BehaviorState::Death);
        r.request_anim(*self, AnimState::Death);
        r.push_msg(Msg::Died(*self));

        self.drop_pack_links(r);

        let table = self.get::<LootTable>(r).0;
        if !table.is_empty() {
            let item = table[r.rng.gen_range(0..table.len())].clone();
            r.push_msg(Msg::Loot {
                source: *self,
                item,
            });
        }
    }

    /// Detach the entity from any monster pack it leads or follows.
    fn drop_pack_links(&self, r: &mut Runtime) {
        let minions = self.get::<Pack>(r).minions;
        for minion in minions {
            if minion.exists(r) {
                minion.set(r, PackMember::default());
            }
        }
        self.set(r, Pack::default());

        if let Some(leader) = self.get::<PackMember>(r).leader {
            if leader.exists(r) {
                leader.with_mut::<Pack, _>(r, |pack| {
                    pack.minions.retain(|m| m != self);
                });
            }
            self.set(r, PackMember::default());
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use quickcheck_macros::quickcheck;

    use super::*;
    use crate::{
        test_util::{sim, spawned_monster, spawned_player},
        DynamicStats,
    };

    #[test]
    fn health_clamps_and_death_is_idempotent() {
        let (mut r, stub) = sim();
        let monster = spawned_monster(&mut r, "skeleton", vec2(0.0, 0.0));
        let max = monster.stats(&r).max_health;
        assert_eq!(monster.health(&r), max);

        monster.damage(&mut r, None, DamageType::Physical, max - 1.0);
        assert_eq!(monster.health(&r), 1.0);
        assert!(monster.is_alive(&r));

        // Overkill clamps at zero and flips to death.
        monster.set_destination(&mut r, vec2(900.0, 0.0));
        monster.damage(&mut r, None, DamageType::Physical, 1000.0);
        assert_eq!(monster.health(&r), 0.0);
        assert_eq!(monster.behavior_state(&r), BehaviorState::Death);
        // Sliding stops where the creature fell.
        assert_eq!(monster.destination(&r), monster.pos(&r));
        assert_eq!(stub.last_request(monster), Some(AnimState::Death));

        // Further damage is a no-op.
        monster.damage(&mut r, None, DamageType::Physical, 50.0);
        assert_eq!(monster.health(&r), 0.0);
    }

    #[quickcheck]
    fn health_never_leaves_bounds(hits: Vec<u8>) -> bool {
        let (mut r, _) = sim();
        let monster = spawned_monster(&mut r, "zombie", vec2(0.0, 0.0));
        let max = monster.stats(&r).max_health;
        for hit in hits {
            monster.damage(
                &mut r,
                None,
                DamageType::Physical,
                hit as f32,
            );
            let h = monster.health(&r);
            if !(0.0..=max).contains(&h) {
                return false;
            }
        }
        true
    }

    #[test]
    fn invincible_entities_shrug_it_off() {
        let (mut r, _) = sim();
        let player = spawned_player(&mut r);
        player.set_condition(&mut r, Conditions::INVINCIBLE, true);
        player.damage(&mut r, None, DamageType::Fire, 1000.0);
        assert_eq!(player.health(&r), player.stats(&r).max_health);
    }

    #[test]
    fn death_emits_messages_and_loot() {
        let (mut r, _) = sim();
        let monster = spawned_monster(&mut r, "skeleton", vec2(0.0, 0.0));
        r.drain_msgs();
        monster.damage(&mut r, None, DamageType::Physical, 10_000.0);

        let msgs = r.drain_msgs();
        assert!(msgs.iter().any(|m| matches!(m, Msg::Hurt { .. })));
        assert!(msgs.contains(&Msg::Died(monster)));
        // Skeletons always carry something.
        assert!(msgs
            .iter()
            .any(|m| matches!(m, Msg::Loot { source, .. } if *source == monster)));
    }

    #[test]
    fn melee_swing_contact_frame_applies_damage() {
        let (mut r, _) = sim();
        let monster = spawned_monster(&mut r, "zombie", vec2(0.0, 0.0));
        let player = spawned_player(&mut r);
        player.place(&mut r, vec2(50.0, 0.0));
        monster.set_target(&mut r, Some(player));

        let before = player.health(&r);
        r.post_anim_signal(monster, AnimSignal::YoyoMidpoint(AnimState::MeleeAttack));
        r.update(16.0);
        let dealt = before - player.health(&r);
        assert_eq!(dealt, monster.stats(&r).physical_damage);

        // Out of range at the contact frame, the swing whiffs.
        player.place(&mut r, vec2(400.0, 0.0));
        let before = player.health(&r);
        r.post_anim_signal(
            monster,
            AnimSignal::YoyoMidpoint(AnimState::MeleeAttack2),
        );
        r.update(16.0);
        assert!(player.health(&r) >= before - 0.1);
    }

    #[test]
    fn mitigation_strategy_reduces_damage() {
        struct Halver;
        impl crate::Mitigation for Halver {
            fn reduce(
                &self,
                raw: f32,
                _kind: DamageType,
                _defender: &crate::ModifierStats,
            ) -> f32 {
                raw / 2.0
            }
        }

        let (mut r, _) = sim();
        r.set_mitigation(Box::new(Halver));
        let monster = spawned_monster(&mut r, "zombie", vec2(0.0, 0.0));
        let max = monster.stats(&r).max_health;
        monster.damage(&mut r, None, DamageType::Physical, 40.0);
        assert_eq!(monster.health(&r), max - 20.0);
    }

    #[test]
    fn widening_the_range_never_loses_the_target() {
        let (mut r, _) = sim();
        let monster = spawned_monster(&mut r, "zombie", vec2(0.0, 0.0));
        let player = spawned_player(&mut r);
        player.place(&mut r, vec2(120.0, 40.0));
        monster.set_target(&mut r, Some(player));

        let mut in_range_before = false;
        for range in [0.0, 50.0, 100.0, 144.3, 200.0, 500.0] {
            let in_range = monster.is_target_in_range(&r, range);
            // Once a radius admits the target, every wider one must too.
            assert!(in_range || !in_range_before);
            in_range_before = in_range;
        }
        assert!(in_range_before);
    }

    #[test]
    fn range_predicates_track_target_state() {
        let (mut r, _) = sim();
        let monster = spawned_monster(&mut r, "zombie", vec2(0.0, 0.0));
        assert!(!monster.in_melee_range(&r));

        let player = spawned_player(&mut r);
        player.place(&mut r, vec2(60.0, 0.0));
        monster.set_target(&mut r, Some(player));
        assert!(monster.in_melee_range(&r));
        assert!(monster.in_projectile_range(&r));

        // Dead targets fail validation, whatever the distance.
        player.with_mut::<DynamicStats, _>(&mut r, |d| d.health = 0.0);
        assert!(!monster.in_melee_range(&r));
    }
}
