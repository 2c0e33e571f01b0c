//! Monsters figuring out what to do on their own.
//!
//! Every monster carries a [`Behavior`] component: an archetype tag, a
//! tuning record and the live state machine bookkeeping. State transitions
//! are driven by distance checks against the scaled metric, per-frame
//! millisecond countdowns and animation completion signals. Damage is never
//! applied on state entry; it lands when the swing or cast animation
//! reports its contact frame (see `on_anim_signal`).

use serde::{Deserialize, Serialize};
use util::{random_point_in_circle, RngExt};

use crate::{
    ecs::{Conditions, TargetRef},
    prelude::*,
    DELAY_BETWEEN_ATTACK_MS, DELAY_BETWEEN_ROAM_MS, PURSUIT_DELAY_MS,
    ROAM_RADIUS,
};

/// The one active state of a monster's decision machine.
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
    strum::EnumIter,
)]
#[serde(rename_all = "kebab-case")]
pub enum BehaviorState {
    #[default]
    Idle,
    Roaming,
    Charging,
    MeleeAttacking,
    RangedAttacking,
    CastingSpell,
    /// Reserved, no transition logic yet.
    Blocking,
    /// Reserved, no transition logic yet.
    Hit,
    /// Terminal. Never exited.
    Death,
}

/// Which decision strategy the monster runs.
#[derive(
    Copy, Clone, Debug, Eq, PartialEq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum BehaviorKind {
    /// Closes to melee and stays there.
    #[default]
    Rusher,
    /// Prefers casting from range, backs off when it can't.
    Skirmisher,
}

/// Per-archetype tuning weights, fixed at construction.
#[derive(
    Copy, Clone, Debug, PartialEq, Serialize, Deserialize,
)]
pub struct BehaviorFactors {
    pub retreat_factor: f32,
    pub roam_factor: f32,
    pub melee_attack_factor: f32,
    pub ranged_attack_factor: f32,
    pub cast_factor: f32,
    pub attack_cooldown_factor: f32,
}

impl Default for BehaviorFactors {
    fn default() -> Self {
        BehaviorFactors::rusher()
    }
}

impl BehaviorFactors {
    pub fn rusher() -> Self {
        BehaviorFactors {
            retreat_factor: 0.0,
            roam_factor: 0.25,
            melee_attack_factor: 1.0,
            ranged_attack_factor: 0.0,
            cast_factor: 0.0,
            attack_cooldown_factor: 0.5,
        }
    }

    pub fn skirmisher() -> Self {
        BehaviorFactors {
            retreat_factor: 0.0,
            roam_factor: 0.25,
            melee_attack_factor: 1.0,
            ranged_attack_factor: 0.5,
            cast_factor: 0.0,
            attack_cooldown_factor: 0.25,
        }
    }
}

/// Live AI state of one monster.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Behavior {
    pub kind: BehaviorKind,
    pub state: BehaviorState,
    pub factors: BehaviorFactors,
    pub attack_cooldown_ms: f32,
    pub roam_cooldown_ms: f32,
    /// Countdown towards resuming pursuit of a lost target. Zero when
    /// inactive. A plain per-frame counter like every other delay here, so
    /// the machine stays in step with the simulation clock.
    pub pursuit_delay_ms: f32,
    /// Where the target was last seen, for the pursuit above.
    pub last_known_target: Option<Vec2>,
}

impl Default for Behavior {
    fn default() -> Self {
        Behavior::new(BehaviorKind::Rusher)
    }
}

impl Behavior {
    pub fn new(kind: BehaviorKind) -> Self {
        Behavior {
            kind,
            state: BehaviorState::Idle,
            factors: match kind {
                BehaviorKind::Rusher => BehaviorFactors::rusher(),
                BehaviorKind::Skirmisher => BehaviorFactors::skirmisher(),
            },
            attack_cooldown_ms: 0.0,
            roam_cooldown_ms: 0.0,
            pursuit_delay_ms: 0.0,
            last_known_target: None,
        }
    }
}

impl Entity {
    pub fn behavior_state(&self, r: &impl AsRef<Runtime>) -> BehaviorState {
        self.with::<Behavior, _>(r, |b| b.state)
    }

    /// Force a behavior state. Death is terminal and is never left.
    pub fn set_behavior_state(
        &self,
        r: &mut impl AsMut<Runtime>,
        state: BehaviorState,
    ) {
        self.with_mut::<Behavior, _>(r, |b| {
            if b.state != BehaviorState::Death {
                b.state = state;
            }
        });
    }

    /// The current target, if it still checks out.
    pub fn target(&self, r: &impl AsRef<Runtime>) -> Option<Entity> {
        let t = self.get::<TargetRef>(r).0?;
        self.is_target_valid(r).then_some(t)
    }

    pub fn set_target(
        &self,
        r: &mut impl AsMut<Runtime>,
        target: Option<Entity>,
    ) {
        self.set(r, TargetRef(target));
    }

    /// Revalidate the target reference: the entity may have despawned, died
    /// or become untargetable since it was picked.
    pub fn is_target_valid(&self, r: &impl AsRef<Runtime>) -> bool {
        let r = r.as_ref();
        match self.get::<TargetRef>(r).0 {
            Some(t) => {
                t.exists(r)
                    && !t.is_dead(r)
                    && !t.conditions(r).contains(Conditions::UNTARGETABLE)
            }
            None => false,
        }
    }

    /// Scan for a player inside sight distance.
    ///
    /// Takes the first match in registration order, not the nearest; the
    /// scan uses plain euclidean distance while the combat range gates use
    /// the scaled metric.
    pub fn select_target(&self, r: &impl AsRef<Runtime>) -> Option<Entity> {
        let r = r.as_ref();
        let sight = self.stats(r).sight_distance;
        let pos = self.pos(r);
        r.players().into_iter().find(|p| {
            p.is_alive(r)
                && !p.conditions(r).contains(Conditions::UNTARGETABLE)
                && util::dist(pos, p.pos(r)) <= sight
        })
    }

    /// One tick of the monster decision machine.
    pub(crate) fn update_behavior(
        &self,
        r: &mut impl AsMut<Runtime>,
        dt_ms: f32,
    ) {
        let r = r.as_mut();

        if self.conditions(r).contains(Conditions::STUNNED) {
            return;
        }

        let mut b: Behavior = self.get(r);
        if b.state == BehaviorState::Death {
            return;
        }

        b.attack_cooldown_ms -= dt_ms;
        b.roam_cooldown_ms -= dt_ms;

        match b.state {
            BehaviorState::Idle => {
                if b.roam_cooldown_ms <= 0.0 {
                    b.state = BehaviorState::Roaming;
                    b.roam_cooldown_ms =
                        DELAY_BETWEEN_ROAM_MS * b.factors.roam_factor;
                }
                if !self.is_target_valid(r) {
                    if let Some(target) = self.select_target(r) {
                        self.set_target(r, Some(target));
                        b.state = BehaviorState::Charging;
                    }
                }
            }
            BehaviorState::Roaming => {
                // Roaming just picks a wander point, it doesn't persist.
                let pos = self.pos(r);
                let point =
                    random_point_in_circle(&mut r.rng, pos, ROAM_RADIUS);
                self.set_destination(r, point);
                b.state = BehaviorState::Idle;
            }
            BehaviorState::Charging => {
                r.request_future_anim(*self, AnimState::Run);
                if r.anim_playing(*self) {
                    // A one-shot clip owns the entity until it finishes.
                    self.set(r, b);
                    return;
                }
                let sight = self.stats(r).sight_distance;
                if !self.is_target_valid(r)
                    || !self.is_target_in_range(r, sight)
                {
                    self.set_target(r, None);
                    b.state = BehaviorState::Idle;
                    if b.last_known_target.is_some() {
                        b.pursuit_delay_ms = PURSUIT_DELAY_MS;
                    }
                } else if !self.in_melee_range(r) {
                    self.charge_approach(r, &mut b);
                } else {
                    b.state = BehaviorState::MeleeAttacking;
                }
            }
            BehaviorState::MeleeAttacking => {
                b.attack_cooldown_ms =
                    DELAY_BETWEEN_ATTACK_MS * b.factors.attack_cooldown_factor;
                if !self.is_target_valid(r) {
                    b.state = BehaviorState::Idle;
                } else if !self.in_melee_range(r) {
                    b.state = BehaviorState::Charging;
                } else {
                    let pos = self.pos(r);
                    self.set_destination(r, pos);
                    let swing = if r.rng.coin_flip() {
                        AnimState::MeleeAttack
                    } else {
                        AnimState::MeleeAttack2
                    };
                    r.request_anim(*self, swing);
                }
            }
            BehaviorState::RangedAttacking | BehaviorState::CastingSpell => {
                b.attack_cooldown_ms =
                    DELAY_BETWEEN_ATTACK_MS * b.factors.attack_cooldown_factor;
                if !self.is_target_valid(r) {
                    b.state = BehaviorState::Idle;
                } else if !self.can_cast_primary(r) {
                    b.state = if self.in_melee_range(r) {
                        BehaviorState::MeleeAttacking
                    } else {
                        BehaviorState::Charging
                    };
                } else {
                    let pos = self.pos(r);
                    self.set_destination(r, pos);
                    let anim = if b.state == BehaviorState::CastingSpell {
                        AnimState::CastSpell
                    } else {
                        AnimState::RangedAttack
                    };
                    r.request_anim(*self, anim);
                }
            }
            // Not specified yet, must not crash the frame loop.
            BehaviorState::Blocking | BehaviorState::Hit => {}
            BehaviorState::Death => unreachable!(),
        }

        // Pursuit of a lost target counts down after the state logic, so a
        // firing countdown leaves the machine in Charging for a full tick
        // before the usual validity checks run again.
        if b.pursuit_delay_ms > 0.0 {
            b.pursuit_delay_ms -= dt_ms;
            if b.pursuit_delay_ms <= 0.0 {
                b.pursuit_delay_ms = 0.0;
                // Contact was lost a moment ago; go look where the target
                // was last seen.
                if let Some(p) = b.last_known_target.take() {
                    self.set_destination(r, p);
                    b.state = BehaviorState::Charging;
                }
            }
        }

        self.set(r, b);
    }

    /// Charging with a valid target out of melee reach.
    fn charge_approach(&self, r: &mut Runtime, b: &mut Behavior) {
        // Valid target, checked by the caller.
        let Some(target) = self.target(r) else { return };
        let pos = self.pos(r);
        let target_pos = target.pos(r);

        match b.kind {
            BehaviorKind::Rusher => {
                // Close the distance.
                self.set_destination(r, target_pos);
                b.last_known_target = Some(target_pos);
            }
            BehaviorKind::Skirmisher => {
                if self.can_cast_primary(r) {
                    b.state = match self.primary_spell_anim(r) {
                        Some(AnimState::CastSpell) => {
                            BehaviorState::CastingSpell
                        }
                        _ => BehaviorState::RangedAttacking,
                    };
                } else {
                    // Out of juice; back away along the line from the
                    // target and remember where it was.
                    let away = (pos - target_pos).normalize_or_zero()
                        * self.stats(r).sight_distance;
                    self.set_destination(r, pos + away);
                    b.last_known_target = Some(target_pos);
                }
            }
        }
    }

    /// Route an animation event to the behavior layer.
    pub(crate) fn on_anim_signal(
        &self,
        r: &mut impl AsMut<Runtime>,
        signal: AnimSignal,
    ) {
        match signal {
            AnimSignal::YoyoMidpoint(state) => self.on_yoyo_midpoint(r, state),
            AnimSignal::Ended(state) => self.on_animation_end(r, state),
        }
    }

    /// The contact frame of a yoyo clip: this is where hits land.
    fn on_yoyo_midpoint(&self, r: &mut impl AsMut<Runtime>, state: AnimState) {
        let r = r.as_mut();
        match state {
            AnimState::MeleeAttack | AnimState::MeleeAttack2 => {
                if self.is_target_valid(r) && self.in_melee_range(r) {
                    if let Some(target) = self.target(r) {
                        let damage = self.stats(r).physical_damage;
                        target.damage(
                            r,
                            Some(*self),
                            DamageType::Physical,
                            damage,
                        );
                    }
                }
            }
            AnimState::RangedAttack | AnimState::CastSpell => {
                self.cast_primary(r);
            }
            _ => {}
        }
    }

    /// A non-repeating clip finished.
    ///
    /// Attack states re-examine range and validity on their next update
    /// tick, so nothing needs to be forced here.
    fn on_animation_end(
        &self,
        _r: &mut impl AsMut<Runtime>,
        _state: AnimState,
    ) {
    }
}
