//! Entity component system storage and the generic components.
//!
//! Components follow the convention that the default value means "not
//! present": the accessor layer in `entity.rs` strips defaulted components
//! and conjures them back on read, so gameplay code never sees a missing
//! component.

use derive_more::{Deref, DerefMut};
use serde::{Deserialize, Serialize};

use crate::{prelude::*, Compass};

/// Display name of the entity.
#[derive(Clone, Debug, Eq, PartialEq, Default, Serialize, Deserialize)]
pub struct Name(pub String);

/// Archetype code the entity was built from, e.g. "goblin".
#[derive(Clone, Debug, Eq, PartialEq, Default, Serialize, Deserialize)]
pub struct Code(pub String);

/// Broad simulation role of the entity.
#[derive(
    Copy, Clone, Debug, Eq, PartialEq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum Kind {
    /// Inert pickup lying in the world.
    #[default]
    Item,
    Npc,
    Player,
    Monster,
    Projectile,
}

/// Continuous world position.
#[derive(
    Copy, Clone, Debug, PartialEq, Default, Serialize, Deserialize,
)]
pub struct Pos(pub Vec2);

/// Point the entity is walking towards. Equal to `Pos` when standing still.
#[derive(
    Copy, Clone, Debug, PartialEq, Default, Serialize, Deserialize,
)]
pub struct Destination(pub Vec2);

/// Position before the latest movement step, restored when the step runs
/// into another creature.
#[derive(
    Copy, Clone, Debug, PartialEq, Default, Serialize, Deserialize,
)]
pub struct LastValidPos(pub Vec2);

/// 8-way compass orientation, derived from the movement bearing.
#[derive(
    Copy, Clone, Debug, Eq, PartialEq, Default, Serialize, Deserialize,
)]
pub struct Facing(pub Compass);

/// Hit-test box of the entity's sprite.
///
/// The box is centered horizontally on the position; `origin_y` is the
/// fraction of the height hanging above the position, matching the sprite
/// anchor the rendering layer uses. Width and height are truncated to whole
/// units before testing.
#[derive(
    Copy, Clone, Debug, PartialEq, Default, Serialize, Deserialize,
)]
pub struct SpriteSize {
    pub width: f32,
    pub height: f32,
    pub origin_y: f32,
}

/// Draw-order depth, used to pick the topmost entity under a point.
#[derive(
    Copy, Clone, Debug, Eq, PartialEq, Default, Serialize, Deserialize,
)]
pub struct Depth(pub i32);

bitflags::bitflags! {
    /// Status flags on a creature. All clear by default.
    #[derive(
        Copy, Clone, Debug, Eq, PartialEq, Default, Serialize, Deserialize,
    )]
    pub struct Conditions: u16 {
        const INVINCIBLE = 1 << 0;
        const STUNNED = 1 << 1;
        const SILENCED = 1 << 2;
        const ROOTED = 1 << 3;
        const FEARED = 1 << 4;
        const CHARMED = 1 << 5;
        const TAUNTED = 1 << 6;
        const BLINDED = 1 << 7;
        const INVISIBLE = 1 << 8;
        const UNTARGETABLE = 1 << 9;
    }
}

/// Weak reference to the entity's current combat target.
///
/// The target may despawn or die while referenced, so every use goes
/// through `Entity::is_target_valid` first.
#[derive(
    Copy, Clone, Debug, Eq, PartialEq, Default, Serialize, Deserialize,
)]
pub struct TargetRef(pub Option<Entity>);

/// Item names a creature can drop on death.
#[derive(
    Clone,
    Debug,
    Eq,
    PartialEq,
    Default,
    Deref,
    DerefMut,
    Serialize,
    Deserialize,
)]
pub struct LootTable(pub Vec<String>);

////////////////////////////////

/// Component store for all game entities.
#[derive(Default, Deref, DerefMut)]
pub(crate) struct Ecs(pub(crate) hecs::World);

impl Ecs {
    #[allow(dead_code)]
    pub(crate) fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        (&self.0).into_iter().map(|e| Entity(e.entity()))
    }
}
