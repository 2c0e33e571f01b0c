//! Projectiles in flight.
//!
//! A projectile is an ordinary registered entity that moves itself along a
//! fixed bearing each frame and hit-tests the roster as it goes. The
//! already-hit list gives pierce semantics: one projectile can damage any
//! number of distinct targets but each of them at most once per flight.

use serde::{Deserialize, Serialize};

use crate::{
    ecs::{Kind, Pos, SpriteSize},
    prelude::*,
    Spell,
};

#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Projectile {
    pub owner: Option<Entity>,
    /// Faction of the owner at launch time; collisions against the same
    /// faction pass through.
    pub faction: Kind,
    /// Unit flight direction.
    pub dir: Vec2,
    pub speed: f32,
    pub damage: f32,
    pub damage_type: DamageType,
    pub range_left: f32,
    pub pierces: bool,
    /// Entities this projectile has already damaged.
    pub already_hit: Vec<Entity>,
}

/// Launch a spell projectile from `from` towards `towards`.
pub fn spawn_projectile(
    r: &mut Runtime,
    owner: Entity,
    from: Vec2,
    towards: Vec2,
    spell: &Spell,
    damage: f32,
) -> Entity {
    let dir = (towards - from).normalize_or_zero();
    r.spawn((
        Kind::Projectile,
        Pos(from),
        SpriteSize {
            width: 16.0,
            height: 16.0,
            origin_y: 0.5,
        },
        Projectile {
            owner: Some(owner),
            faction: owner.kind(r),
            dir,
            speed: spell.projectile_speed,
            damage,
            damage_type: spell.kind.damage_type(),
            range_left: spell.range,
            pierces: spell.kind.pierces(),
            already_hit: Vec::new(),
        },
    ))
}

impl Entity {
    /// Advance a projectile one frame and resolve its collisions.
    pub(crate) fn projectile_step(
        &self,
        r: &mut impl AsMut<Runtime>,
        dt_ms: f32,
    ) {
        let r = r.as_mut();

        let mut p: Projectile = self.get(r);
        let step = p.speed * dt_ms / 1000.0;
        let pos = self.pos(r) + p.dir * step;
        self.set(r, Pos(pos));
        p.range_left -= step;

        for e in r.roster.clone() {
            if Some(e) == p.owner || e == *self {
                continue;
            }
            // Only creatures block projectiles; items, NPCs and other
            // projectiles don't participate.
            if !matches!(e.kind(r), Kind::Player | Kind::Monster) {
                continue;
            }
            // No friendly fire within the owning faction.
            if e.kind(r) == p.faction {
                continue;
            }
            if e.is_dead(r) {
                continue;
            }
            if p.already_hit.contains(&e) {
                continue;
            }
            if !e.hit_test(r, pos) {
                continue;
            }

            p.already_hit.push(e);
            e.damage(r, p.owner, p.damage_type, p.damage);
            if !p.pierces {
                p.range_left = 0.0;
                break;
            }
        }

        let spent = p.range_left <= 0.0;
        self.set(r, p);
        if spent {
            self.despawn(r);
        }
    }
}
