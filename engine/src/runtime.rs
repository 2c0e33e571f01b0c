//! Main data container for the simulation.

use std::mem;

use rand::SeedableRng;
use util::GameRng;
use world::Area;

use crate::{
    ecs::{Depth, Ecs, Kind},
    prelude::*,
    Animator, Mitigation, NullAnimator, PassThrough,
};

/// One simulation instance: entity registry, current area and frame clock.
///
/// Passed explicitly into every operation instead of living in a global, so
/// tests can run several independent simulations side by side.
pub struct Runtime {
    now_ms: f64,
    pub(crate) ecs: Ecs,
    /// Registration-ordered roster; update order follows it.
    pub(crate) roster: Vec<Entity>,
    pub area: Area,
    pub(crate) rng: GameRng,
    pub(crate) animator: Box<dyn Animator>,
    pub(crate) mitigation: Box<dyn Mitigation>,
    anim_signals: Vec<(Entity, AnimSignal)>,
    msgs: Vec<Msg>,
    pub(crate) reap: Vec<Entity>,
}

impl AsRef<Runtime> for Runtime {
    fn as_ref(&self) -> &Runtime {
        self
    }
}

impl AsMut<Runtime> for Runtime {
    fn as_mut(&mut self) -> &mut Runtime {
        self
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Runtime {
            now_ms: 0.0,
            ecs: Default::default(),
            roster: Default::default(),
            area: Area::new("limbo"),
            rng: GameRng::seed_from_u64(0xdeadbeef),
            animator: Box::new(NullAnimator),
            mitigation: Box::new(PassThrough),
            anim_signals: Default::default(),
            msgs: Default::default(),
            reap: Default::default(),
        }
    }
}

impl Runtime {
    pub fn new(area: Area) -> Self {
        Runtime {
            area,
            ..Default::default()
        }
    }

    /// Simulation clock in milliseconds since start.
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// Swap in the real animation collaborator.
    pub fn set_animator(&mut self, animator: Box<dyn Animator>) {
        self.animator = animator;
    }

    /// Swap in a damage reduction strategy.
    pub fn set_mitigation(&mut self, mitigation: Box<dyn Mitigation>) {
        self.mitigation = mitigation;
    }

    /// Register a new entity at the end of the update roster.
    pub fn spawn(&mut self, loadout: impl hecs::DynamicBundle) -> Entity {
        let e = Entity(self.ecs.spawn(loadout));
        self.roster.push(e);
        e
    }

    /// Unregister an entity. Removing an unknown entity is a no-op.
    pub fn remove(&mut self, e: Entity) {
        let Some(i) = self.roster.iter().position(|&x| x == e) else {
            return;
        };
        self.roster.remove(i);
        let _ = self.ecs.despawn(e.0);
    }

    /// Advance the simulation by one frame.
    ///
    /// Every registered entity updates in registration order, then queued
    /// animation signals are consumed, then despawned entities are removed.
    /// The whole frame runs synchronously in this call.
    pub fn update(&mut self, dt_ms: f32) {
        self.now_ms += dt_ms as f64;

        // Snapshot so entities spawned mid-frame start on the next one.
        let roster: Vec<Entity> = self.roster.clone();
        for e in roster {
            if e.exists(self) {
                e.update(self, dt_ms);
            }
        }

        // Animation signals resolve after all movement and state decisions,
        // so damage lands in a deterministic order regardless of which
        // entity's clip fired first.
        let signals = mem::take(&mut self.anim_signals);
        for (e, signal) in signals {
            if e.exists(self) {
                e.on_anim_signal(self, signal);
            }
        }

        self.gc();
    }

    /// Report an animation event for an entity; consumed at the end of the
    /// current (or next) frame.
    pub fn post_anim_signal(&mut self, e: Entity, signal: AnimSignal) {
        self.anim_signals.push((e, signal));
    }

    /// Drain the outbound event queue.
    pub fn drain_msgs(&mut self) -> Vec<Msg> {
        mem::take(&mut self.msgs)
    }

    pub(crate) fn push_msg(&mut self, msg: Msg) {
        self.msgs.push(msg);
    }

    pub(crate) fn request_anim(&mut self, e: Entity, state: AnimState) {
        self.animator.set_state(e, state);
    }

    pub(crate) fn request_future_anim(&mut self, e: Entity, state: AnimState) {
        self.animator.set_future_state(e, state);
    }

    pub(crate) fn anim_playing(&self, e: Entity) -> bool {
        self.animator.is_non_repeating_playing(e)
    }

    /// Remove entities queued for despawning.
    fn gc(&mut self) {
        let reap = mem::take(&mut self.reap);
        for e in reap {
            self.remove(e);
        }
    }

    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.roster.iter().copied()
    }

    pub fn players(&self) -> Vec<Entity> {
        self.roster
            .iter()
            .copied()
            .filter(|e| e.kind(self) == Kind::Player)
            .collect()
    }

    pub fn monsters(&self) -> Vec<Entity> {
        self.roster
            .iter()
            .copied()
            .filter(|e| e.kind(self) == Kind::Monster)
            .collect()
    }

    /// All entities whose sprite box contains the point, in registration
    /// order.
    pub fn entities_at(&self, p: Vec2) -> Vec<Entity> {
        self.roster
            .iter()
            .copied()
            .filter(|e| e.hit_test(self, p))
            .collect()
    }

    /// The topmost entity under a point.
    ///
    /// Highest depth wins; on equal depth the last registered entity wins,
    /// so the result stays stable under roster reshuffles.
    pub fn entity_at(&self, p: Vec2) -> Option<Entity> {
        let mut top: Option<(Entity, i32)> = None;
        for e in self.entities_at(p) {
            let depth = e.get::<Depth>(self).0;
            if top.map_or(true, |(_, d)| depth >= d) {
                top = Some((e, depth));
            }
        }
        top.map(|(e, _)| e)
    }

    /// Shortest walkable tile path between two world positions in the
    /// current area. Empty when unreachable.
    pub fn find_path(&self, from: Vec2, to: Vec2) -> Vec<IVec2> {
        world::find_path(
            &self.area,
            world::tile_pos_from_unit(from),
            world::tile_pos_from_unit(to),
        )
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        ecs::{Name, Pos, SpriteSize},
        test_util::sim,
    };

    fn blob(r: &mut Runtime, name: &str, pos: Vec2, depth: i32) -> Entity {
        r.spawn((
            Name(name.into()),
            Pos(pos),
            Depth(depth),
            SpriteSize {
                width: 48.0,
                height: 96.0,
                origin_y: 0.75,
            },
        ))
    }

    #[test]
    fn remove_unknown_is_noop() {
        let (mut r, _) = sim();
        let e = blob(&mut r, "a", vec2(0.0, 0.0), 0);
        r.remove(e);
        assert_eq!(r.entities().count(), 0);
        // Again, now that it's gone.
        r.remove(e);
        assert_eq!(r.entities().count(), 0);
    }

    #[test]
    fn roster_keeps_registration_order() {
        let (mut r, _) = sim();
        let a = blob(&mut r, "a", vec2(0.0, 0.0), 0);
        let b = blob(&mut r, "b", vec2(0.0, 0.0), 0);
        let c = blob(&mut r, "c", vec2(0.0, 0.0), 0);
        r.remove(b);
        assert_eq!(r.entities().collect::<Vec<_>>(), vec![a, c]);
    }

    #[test]
    fn entity_at_prefers_depth_then_registration() {
        let (mut r, _) = sim();
        let p = vec2(100.0, 100.0);
        let low = blob(&mut r, "low", p, 0);
        let high = blob(&mut r, "high", p, 1);
        let late = blob(&mut r, "late", p, 1);

        assert_eq!(r.entities_at(p), vec![low, high, late]);
        // Ties on depth go to the latest registered entity.
        assert_eq!(r.entity_at(p), Some(late));

        r.remove(late);
        assert_eq!(r.entity_at(p), Some(high));

        assert_eq!(r.entity_at(vec2(500.0, 500.0)), None);
    }

    #[test]
    fn path_wrapper_uses_area_tiles() {
        let (r, _) = sim();
        // The test area is an open floor, so any two in-bounds points
        // connect.
        let path = r.find_path(vec2(32.0, 16.0), vec2(160.0, 16.0));
        assert!(!path.is_empty());
        assert!(r
            .find_path(vec2(32.0, 16.0), vec2(9000.0, 16.0))
            .is_empty());
    }
}
