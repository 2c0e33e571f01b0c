//! Simulation core: creature behavior, combat and the entity registry.

/// Radius of the circle a bored creature picks wander points from.
pub const ROAM_RADIUS: f32 = 100.0;

/// Base pause between wander decisions, scaled per archetype.
pub const DELAY_BETWEEN_ROAM_MS: f32 = 10_000.0;

/// Base pause between attacks, scaled per archetype.
pub const DELAY_BETWEEN_ATTACK_MS: f32 = 1_000.0;

/// How long a creature waits before walking to a lost target's last known
/// position.
pub const PURSUIT_DELAY_MS: f32 = 1_000.0;

/// Distance a pack minion keeps from its leader.
pub const MINION_RING_RADIUS: f32 = 30.0;

/// Pack minions spawn scattered up to this far from the leader.
pub const MINION_SCATTER: f32 = 50.0;

/// Default minion count for a spawned pack.
pub const DEFAULT_MINION_COUNT: usize = 5;

/// How close to the destination counts as having arrived.
pub const ARRIVAL_THRESHOLD: f32 = 1.0;

mod ai;
pub use ai::{Behavior, BehaviorFactors, BehaviorKind, BehaviorState};

mod anim;
pub use anim::{AnimSignal, AnimState, Animator, NullAnimator, StubAnimator};

mod data;
pub use data::{ArchetypeSpec, Bestiary, Quality};

pub mod ecs;

mod entity;
pub use entity::Entity;

mod fight;

mod motion;
pub use motion::Compass;

mod msg;
pub use msg::Msg;

mod pack;
pub use pack::{minion_ring_target, Pack, PackMember};

pub mod prelude;

mod projectile;
pub use projectile::{spawn_projectile, Projectile};

mod runtime;
pub use runtime::Runtime;

mod spell;
pub use spell::{Spell, SpellBook, SpellKind};

mod stats;
pub use stats::{
    ByDamageType, DamageType, DynamicStats, Mitigation, ModifierStats,
    PassThrough, StatBlock,
};

#[cfg(test)]
pub(crate) mod test_util;
