//! Layered numeric attributes for creatures.
//!
//! Combat code only ever reads the `total` layer; the base and temp layers
//! exist so gear and timed effects can stack without losing the archetype
//! defaults. `total` is recomputed whenever a layer changes and is never
//! written to directly.

use serde::{Deserialize, Serialize};

use crate::prelude::*;

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
pub enum DamageType {
    #[default]
    Physical,
    Fire,
    Ice,
    Lightning,
    Poison,
}

/// One value per damage type, used for resistances and absorptions.
#[derive(
    Copy, Clone, Debug, PartialEq, Default, Serialize, Deserialize,
)]
pub struct ByDamageType {
    pub physical: f32,
    pub fire: f32,
    pub ice: f32,
    pub lightning: f32,
    pub poison: f32,
}

impl ByDamageType {
    pub fn get(&self, kind: DamageType) -> f32 {
        match kind {
            DamageType::Physical => self.physical,
            DamageType::Fire => self.fire,
            DamageType::Ice => self.ice,
            DamageType::Lightning => self.lightning,
            DamageType::Poison => self.poison,
        }
    }
}

impl std::ops::AddAssign for ByDamageType {
    fn add_assign(&mut self, rhs: Self) {
        self.physical += rhs.physical;
        self.fire += rhs.fire;
        self.ice += rhs.ice;
        self.lightning += rhs.lightning;
        self.poison += rhs.poison;
    }
}

/// The full attribute sheet of a creature.
///
/// Ranges are in world units and checked with the scaled distance metric,
/// speeds are units per second, regens are points per second.
#[derive(
    Copy, Clone, Debug, PartialEq, Default, Serialize, Deserialize,
)]
#[serde(default)]
pub struct ModifierStats {
    pub strength: f32,
    pub dexterity: f32,
    pub vitality: f32,
    pub intelligence: f32,
    pub max_health: f32,
    pub max_mana: f32,
    pub health_regen: f32,
    pub mana_regen: f32,
    pub physical_damage: f32,
    pub magical_damage: f32,
    pub attack_speed: f32,
    pub movement_speed: f32,
    pub melee_range: f32,
    pub projectile_range: f32,
    pub sight_distance: f32,
    pub defense: f32,
    pub resistance: ByDamageType,
    pub absorption: ByDamageType,
}

impl std::ops::Add for ModifierStats {
    type Output = ModifierStats;

    fn add(mut self, rhs: Self) -> Self::Output {
        self += rhs;
        self
    }
}

impl std::ops::AddAssign for ModifierStats {
    fn add_assign(&mut self, rhs: Self) {
        self.strength += rhs.strength;
        self.dexterity += rhs.dexterity;
        self.vitality += rhs.vitality;
        self.intelligence += rhs.intelligence;
        self.max_health += rhs.max_health;
        self.max_mana += rhs.max_mana;
        self.health_regen += rhs.health_regen;
        self.mana_regen += rhs.mana_regen;
        self.physical_damage += rhs.physical_damage;
        self.magical_damage += rhs.magical_damage;
        self.attack_speed += rhs.attack_speed;
        self.movement_speed += rhs.movement_speed;
        self.melee_range += rhs.melee_range;
        self.projectile_range += rhs.projectile_range;
        self.sight_distance += rhs.sight_distance;
        self.defense += rhs.defense;
        self.resistance += rhs.resistance;
        self.absorption += rhs.absorption;
    }
}

/// Base, temp and computed stat layers of a creature.
#[derive(
    Copy, Clone, Debug, PartialEq, Default, Serialize, Deserialize,
)]
pub struct StatBlock {
    /// Archetype defaults, fixed at construction.
    pub base: ModifierStats,
    /// Additive modifiers from effects and gear.
    pub temp: ModifierStats,
    /// Computed layer, `base + temp`. Read-only for gameplay code.
    pub total: ModifierStats,
}

impl StatBlock {
    pub fn from_base(base: ModifierStats) -> Self {
        let mut block = StatBlock {
            base,
            ..Default::default()
        };
        block.recompute();
        block
    }

    /// Rebuild the total layer. Must run after any base or temp change.
    pub fn recompute(&mut self) {
        self.total = self.base + self.temp;
    }
}

/// Per-frame mutable values of a creature.
#[derive(
    Copy, Clone, Debug, PartialEq, Default, Serialize, Deserialize,
)]
pub struct DynamicStats {
    pub health: f32,
    pub mana: f32,
    pub level: i32,
    pub experience: i32,
}

/// Strategy for reducing incoming damage by the defender's stats.
///
/// The exact resistance formula is still undecided game design, so it stays
/// behind this seam. Implementations must never let more resistance lead to
/// more damage taken.
pub trait Mitigation {
    fn reduce(
        &self,
        raw: f32,
        kind: DamageType,
        defender: &ModifierStats,
    ) -> f32;
}

/// Default strategy: damage goes through unchanged.
pub struct PassThrough;

impl Mitigation for PassThrough {
    fn reduce(
        &self,
        raw: f32,
        _kind: DamageType,
        _defender: &ModifierStats,
    ) -> f32 {
        raw
    }
}

impl Entity {
    /// Current computed stats of the entity.
    ///
    /// Always query through this rather than the raw component; the raw
    /// block carries the uncombined layers.
    pub fn stats(&self, r: &impl AsRef<Runtime>) -> ModifierStats {
        self.get::<StatBlock>(r).total
    }

    pub fn health(&self, r: &impl AsRef<Runtime>) -> f32 {
        self.get::<DynamicStats>(r).health
    }

    pub fn mana(&self, r: &impl AsRef<Runtime>) -> f32 {
        self.get::<DynamicStats>(r).mana
    }

    /// Layer an additive modifier on top of the base stats.
    pub fn apply_modifier(
        &self,
        r: &mut impl AsMut<Runtime>,
        mods: ModifierStats,
    ) {
        self.with_mut::<StatBlock, _>(r, |block| {
            block.temp += mods;
            block.recompute();
        });
    }

    /// Drop all temp modifiers.
    pub fn clear_modifiers(&self, r: &mut impl AsMut<Runtime>) {
        self.with_mut::<StatBlock, _>(r, |block| {
            block.temp = Default::default();
            block.recompute();
        });
    }

    /// Per-frame stat upkeep: regeneration and spell cooldowns.
    pub(crate) fn stats_tick(&self, r: &mut impl AsMut<Runtime>, dt_ms: f32) {
        let r = r.as_mut();
        if !self.has::<DynamicStats>(r) || self.is_dead(r) {
            return;
        }
        let total = self.stats(r);
        self.with_mut::<DynamicStats, _>(r, |d| {
            d.health = (d.health + total.health_regen * dt_ms / 1000.0)
                .min(total.max_health);
            d.mana = (d.mana + total.mana_regen * dt_ms / 1000.0)
                .min(total.max_mana);
        });
        self.tick_spell_cooldowns(r, dt_ms);
    }
}
