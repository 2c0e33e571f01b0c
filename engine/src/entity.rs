//! Generic entity logic.
use std::{fmt, str::FromStr};

use derive_more::Deref;
use hecs::Component;
use serde_with::{DeserializeFromStr, SerializeDisplay};

use crate::{ecs::*, prelude::*, DynamicStats};

// Dummy wrapper so we can write impls for it directly instead of deriving a
// trait for hecs::Entity and writing every fn signature twice.
/// Game entity identifier datatype. All the actual contents live in the ECS.
#[derive(
    Copy,
    Clone,
    Hash,
    Eq,
    Ord,
    PartialEq,
    PartialOrd,
    Debug,
    Deref,
    SerializeDisplay,
    DeserializeFromStr,
)]
pub struct Entity(pub(crate) hecs::Entity);

impl Entity {
    pub(crate) fn get<T>(&self, r: &impl AsRef<Runtime>) -> T
    where
        T: Component + Clone + Default,
    {
        let r = r.as_ref();
        r.ecs
            .get::<&T>(**self)
            .map(|c| (*c).clone())
            .unwrap_or_default()
    }

    pub(crate) fn set<T>(&self, r: &mut impl AsMut<Runtime>, val: T)
    where
        T: Component + Default + PartialEq,
    {
        let r = r.as_mut();
        if val == T::default() {
            // Remove default values, the abstraction layer assumes
            // components are always present but defaulted.
            //
            // Will give an error if the component wasn't there to begin
            // with, just ignore that.
            let _ = r.ecs.remove_one::<T>(**self);
        } else {
            r.ecs.insert_one(**self, val).expect("Entity::set failed");
        }
    }

    /// Access a component using a closure.
    ///
    /// Use for complex components that aren't just atomic values.
    pub(crate) fn with<T: Component + Default, U>(
        &self,
        r: &impl AsRef<Runtime>,
        f: impl Fn(&T) -> U,
    ) -> U {
        let r = r.as_ref();
        let scratch = T::default();
        if let Ok(c) = r.ecs.get::<&T>(**self) {
            f(&*c)
        } else {
            f(&scratch)
        }
    }

    /// Access and mutate a component using a closure.
    ///
    /// Use for complex components that aren't just atomic values.
    pub(crate) fn with_mut<T: Component + Default + PartialEq, U>(
        &self,
        r: &mut impl AsMut<Runtime>,
        mut f: impl FnMut(&mut T) -> U,
    ) -> U {
        let r = r.as_mut();
        let mut delete = false;
        let mut insert = false;
        let ret;

        let mut scratch = T::default();
        if let Ok(query) = r.ecs.query_one_mut::<&mut T>(**self) {
            ret = f(&mut *query);
            // We created a default value once, reuse it here.
            if *query == scratch {
                delete = true;
            }
        } else {
            ret = f(&mut scratch);
            if scratch != T::default() {
                insert = true;
            }
        }

        if delete {
            // Component became default value, remove from ECS.
            let _ = r.ecs.remove_one::<T>(**self);
        } else if insert {
            // Scratch component became a valid value.
            r.ecs
                .insert_one(**self, scratch)
                .expect("Entity::with_mut failed to set component");
        }

        ret
    }

    pub(crate) fn has<T: Component>(&self, r: &impl AsRef<Runtime>) -> bool {
        r.as_ref().ecs.get::<&T>(**self).is_ok()
    }

    /// Whether the entity is still registered in the runtime.
    pub fn exists(&self, r: &impl AsRef<Runtime>) -> bool {
        r.as_ref().ecs.contains(**self)
    }

    /// Whether the entity is registered and, if it is a creature, has
    /// health left.
    pub fn is_alive(&self, r: &impl AsRef<Runtime>) -> bool {
        self.exists(r) && !self.is_dead(r)
    }

    /// Whether a creature has run out of health. False for entities with no
    /// health at all.
    pub fn is_dead(&self, r: &impl AsRef<Runtime>) -> bool {
        self.has::<DynamicStats>(r)
            && self.get::<DynamicStats>(r).health <= 0.0
    }

    pub fn name(&self, r: &impl AsRef<Runtime>) -> String {
        self.get::<Name>(r).0
    }

    pub fn code(&self, r: &impl AsRef<Runtime>) -> String {
        self.get::<Code>(r).0
    }

    pub fn kind(&self, r: &impl AsRef<Runtime>) -> Kind {
        self.get::<Kind>(r)
    }

    pub fn is_player(&self, r: &impl AsRef<Runtime>) -> bool {
        self.kind(r) == Kind::Player
    }

    pub fn is_monster(&self, r: &impl AsRef<Runtime>) -> bool {
        self.kind(r) == Kind::Monster
    }

    /// Whether the entity takes part in combat at all.
    pub fn is_combatant(&self, r: &impl AsRef<Runtime>) -> bool {
        matches!(self.kind(r), Kind::Player | Kind::Monster)
    }

    pub fn pos(&self, r: &impl AsRef<Runtime>) -> Vec2 {
        self.get::<Pos>(r).0
    }

    /// Teleport the entity, snapping the walk destination along with it.
    pub fn place(&self, r: &mut impl AsMut<Runtime>, pos: Vec2) {
        self.set(r, Pos(pos));
        self.set(r, Destination(pos));
        self.set(r, LastValidPos(pos));
    }

    pub fn destination(&self, r: &impl AsRef<Runtime>) -> Vec2 {
        self.get::<Destination>(r).0
    }

    pub fn set_destination(&self, r: &mut impl AsMut<Runtime>, dest: Vec2) {
        self.set(r, Destination(dest));
    }

    pub fn facing(&self, r: &impl AsRef<Runtime>) -> crate::Compass {
        self.get::<Facing>(r).0
    }

    pub fn conditions(&self, r: &impl AsRef<Runtime>) -> Conditions {
        self.get::<Conditions>(r)
    }

    pub fn set_condition(
        &self,
        r: &mut impl AsMut<Runtime>,
        flag: Conditions,
        on: bool,
    ) {
        self.with_mut::<Conditions, _>(r, |c| {
            if on {
                c.insert(flag);
            } else {
                c.remove(flag);
            }
        });
    }

    /// Hit-test a point against the entity's sprite box.
    pub fn hit_test(&self, r: &impl AsRef<Runtime>, p: Vec2) -> bool {
        let size = self.get::<SpriteSize>(r);
        if size.width <= 0.0 || size.height <= 0.0 {
            return false;
        }
        let pos = self.pos(r);
        let (w, h) = (size.width.trunc(), size.height.trunc());
        p.x > pos.x - w / 2.0
            && p.x < pos.x + w / 2.0
            && p.y > pos.y - h * size.origin_y
            && p.y < pos.y + h * (1.0 - size.origin_y)
    }

    /// Queue the entity for removal at the end of the frame.
    pub fn despawn(&self, r: &mut impl AsMut<Runtime>) {
        let r = r.as_mut();
        r.reap.push(*self);
    }

    /// Per-frame driver, called by the runtime in registration order.
    pub(crate) fn update(&self, r: &mut impl AsMut<Runtime>, dt_ms: f32) {
        let r = r.as_mut();

        match self.kind(r) {
            Kind::Monster => {
                self.stats_tick(r, dt_ms);
                if self.is_dead(r) {
                    return;
                }
                self.move_step(r, dt_ms);
                self.update_behavior(r, dt_ms);
                self.pack_update(r);
            }
            Kind::Player => {
                self.stats_tick(r, dt_ms);
                if !self.is_dead(r) {
                    self.move_step(r, dt_ms);
                }
            }
            Kind::Projectile => self.projectile_step(r, dt_ms),
            Kind::Item | Kind::Npc => {}
        }
    }
}

// Encode entity ids as compact opaque values, the raw u64 would be mostly
// zero bits in noisy places.

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Entities are made of two u32s, both of which start with low
        // values. Interleave the low bits to get short combined values.
        let u = self.0.to_bits().get();
        let a = util::spread_u64_by_2(u);
        let b = util::spread_u64_by_2(u >> 32) << 1;
        write!(f, "#{:x}", a | b)
    }
}

impl FromStr for Entity {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some(s) = s.strip_prefix('#') else {
            return Err("bad entity");
        };
        let v = u64::from_str_radix(s, 16).map_err(|_| "bad entity")?;
        let a = util::compact_u64_by_2(v);
        let b = util::compact_u64_by_2(v >> 1);
        let u = a | (b << 32);
        Ok(Entity(hecs::Entity::from_bits(u).ok_or("bad entity")?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::sim;

    #[test]
    fn id_string_roundtrip() {
        let (mut r, _) = sim();
        let e = r.spawn((Name("thing".into()),));
        let s = e.to_string();
        assert!(s.starts_with('#'));
        assert_eq!(s.parse::<Entity>().unwrap(), e);
    }

    #[test]
    fn hit_test_uses_sprite_box() {
        let (mut r, _) = sim();
        let e = r.spawn((
            Pos(vec2(100.0, 100.0)),
            SpriteSize {
                width: 48.0,
                height: 96.0,
                origin_y: 0.75,
            },
        ));
        // Box spans x in (76, 124), y in (28, 124).
        assert!(e.hit_test(&r, vec2(100.0, 100.0)));
        assert!(e.hit_test(&r, vec2(77.0, 29.0)));
        assert!(!e.hit_test(&r, vec2(124.5, 100.0)));
        assert!(!e.hit_test(&r, vec2(100.0, 125.0)));
        // No sprite, no hits.
        let ghost = r.spawn((Pos(vec2(0.0, 0.0)),));
        assert!(!ghost.hit_test(&r, vec2(0.0, 0.0)));
    }
}
