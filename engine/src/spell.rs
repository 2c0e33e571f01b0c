//! Spells and the per-entity spellbook.
//!
//! The behavior layer only ever asks two things of a spell: whether it can
//! be cast right now, and to cast it. Casting spends mana, starts the
//! cooldown and launches a projectile at the caster's target; the damage
//! happens when the projectile connects.

use derive_more::{Deref, DerefMut};
use serde::{Deserialize, Serialize};

use crate::{ecs::Conditions, prelude::*, spawn_projectile, DynamicStats};

#[derive(
    Copy,
    Clone,
    Debug,
    Eq,
    PartialEq,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
)]
#[serde(rename_all = "kebab-case")]
pub enum SpellKind {
    #[default]
    ThrowSpear,
    Firebolt,
}

impl SpellKind {
    /// Which animation the cast plays, which in turn decides whether the
    /// behavior machine treats this as a ranged attack or a spell cast.
    pub fn anim(self) -> AnimState {
        match self {
            SpellKind::ThrowSpear => AnimState::RangedAttack,
            SpellKind::Firebolt => AnimState::CastSpell,
        }
    }

    pub fn damage_type(self) -> DamageType {
        match self {
            SpellKind::ThrowSpear => DamageType::Physical,
            SpellKind::Firebolt => DamageType::Fire,
        }
    }

    /// Whether the launched projectile flies through targets it has hit.
    pub fn pierces(self) -> bool {
        match self {
            SpellKind::ThrowSpear => true,
            SpellKind::Firebolt => false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Spell {
    pub kind: SpellKind,
    pub mana_cost: f32,
    pub cooldown_ms: f32,
    pub cooldown_left_ms: f32,
    pub base_damage: f32,
    pub projectile_speed: f32,
    pub range: f32,
}

impl Default for Spell {
    fn default() -> Self {
        Spell::throw_spear()
    }
}

impl Spell {
    pub fn throw_spear() -> Self {
        Spell {
            kind: SpellKind::ThrowSpear,
            mana_cost: 5.0,
            cooldown_ms: 3000.0,
            cooldown_left_ms: 0.0,
            base_damage: 10.0,
            projectile_speed: 400.0,
            range: 500.0,
        }
    }

    pub fn firebolt() -> Self {
        Spell {
            kind: SpellKind::Firebolt,
            mana_cost: 10.0,
            cooldown_ms: 2000.0,
            cooldown_left_ms: 0.0,
            base_damage: 15.0,
            projectile_speed: 300.0,
            range: 500.0,
        }
    }

    /// Cooldown and resource gate.
    pub fn can_cast(&self, mana: f32) -> bool {
        self.cooldown_left_ms <= 0.0 && mana >= self.mana_cost
    }
}

/// Ordered spell list of an entity. The first entry is the primary spell
/// the behavior layer leads with.
#[derive(
    Clone,
    Debug,
    PartialEq,
    Default,
    Deref,
    DerefMut,
    Serialize,
    Deserialize,
)]
pub struct SpellBook(pub Vec<Spell>);

impl Entity {
    /// Whether the primary spell could be released this instant.
    pub fn can_cast_primary(&self, r: &impl AsRef<Runtime>) -> bool {
        let r = r.as_ref();
        if self.conditions(r).contains(Conditions::SILENCED) {
            return false;
        }
        let mana = self.mana(r);
        self.with::<SpellBook, _>(r, |book| {
            book.first().map_or(false, |s| s.can_cast(mana))
        })
    }

    /// Animation the primary spell would play.
    pub fn primary_spell_anim(
        &self,
        r: &impl AsRef<Runtime>,
    ) -> Option<AnimState> {
        self.with::<SpellBook, _>(r, |book| book.first().map(|s| s.kind.anim()))
    }

    /// Release the primary spell at the current target.
    ///
    /// Spends mana, starts the cooldown and launches the projectile. Does
    /// nothing when the gate fails or there is no valid target; the cast
    /// animation has already played by then, which just means the creature
    /// fumbled the throw.
    pub(crate) fn cast_primary(&self, r: &mut impl AsMut<Runtime>) {
        let r = r.as_mut();

        if !self.can_cast_primary(r) {
            return;
        }
        let Some(target) = self.target(r) else {
            return;
        };
        let from = self.pos(r);
        let to = target.pos(r);
        if from == to {
            return;
        }

        let Some(spell) = self.with_mut::<SpellBook, _>(r, |book| {
            book.0.first_mut().map(|spell| {
                spell.cooldown_left_ms = spell.cooldown_ms;
                spell.clone()
            })
        }) else {
            return;
        };
        self.with_mut::<DynamicStats, _>(r, |d| {
            d.mana = (d.mana - spell.mana_cost).max(0.0);
        });

        let damage = spell.base_damage + self.stats(r).magical_damage;
        spawn_projectile(r, *self, from, to, &spell, damage);
        r.push_msg(Msg::SpellCast {
            caster: *self,
            kind: spell.kind,
        });
    }

    /// Wind down spell cooldowns, part of the per-frame stat upkeep.
    pub(crate) fn tick_spell_cooldowns(
        &self,
        r: &mut impl AsMut<Runtime>,
        dt_ms: f32,
    ) {
        let r = r.as_mut();
        if !self.has::<SpellBook>(r) {
            return;
        }
        self.with_mut::<SpellBook, _>(r, |book| {
            for spell in book.iter_mut() {
                spell.cooldown_left_ms = (spell.cooldown_left_ms - dt_ms).max(0.0);
            }
        });
    }
}
