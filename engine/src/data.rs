//! Archetype data and the entity factory.
//!
//! The bestiary is plain serde-friendly data supplied by an external
//! source; the factory turns an archetype code plus a quality tier into a
//! fully wired entity in one call. Construction either completes whole or
//! fails with an error, never leaving a half-built entity registered.

use anyhow::{bail, Result};
use derive_more::{Deref, DerefMut};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    ecs::{
        Code, Destination, Kind, LastValidPos, LootTable, Name, Pos,
        SpriteSize,
    },
    prelude::*,
    Behavior, DynamicStats, ModifierStats, Spell, SpellBook, StatBlock,
    DEFAULT_MINION_COUNT, MINION_SCATTER,
};

/// Rarity tier of a monster archetype.
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
pub enum Quality {
    #[default]
    Normal,
    Magic,
    Elite,
    Rare,
    Unique,
    SuperUnique,
    Boss,
}

/// Everything needed to build one monster variant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArchetypeSpec {
    pub code: String,
    pub name: String,
    pub quality: Quality,
    pub stats: ModifierStats,
    pub behavior: BehaviorKind,
    pub spells: Vec<Spell>,
    pub loot: Vec<String>,
}

/// The known monster archetypes.
#[derive(
    Clone, Debug, PartialEq, Default, Deref, DerefMut, Serialize, Deserialize,
)]
pub struct Bestiary(pub Vec<ArchetypeSpec>);

fn monster_stats(
    max_health: f32,
    physical_damage: f32,
    movement_speed: f32,
) -> ModifierStats {
    ModifierStats {
        max_health,
        physical_damage,
        movement_speed,
        attack_speed: 1.0,
        melee_range: 100.0,
        projectile_range: 500.0,
        sight_distance: 500.0,
        ..Default::default()
    }
}

impl Bestiary {
    /// The stock monster roster.
    pub fn standard() -> Self {
        use BehaviorKind::*;

        Bestiary(vec![
            ArchetypeSpec {
                code: "goblin".into(),
                name: "Goblin".into(),
                quality: Quality::Normal,
                stats: ModifierStats {
                    max_mana: 30.0,
                    ..monster_stats(60.0, 8.0, 120.0)
                },
                behavior: Skirmisher,
                spells: vec![Spell::throw_spear()],
                loot: vec![
                    "Chainmail Armor".into(),
                    "Chainmail Gloves".into(),
                    "Chainmail Boots".into(),
                    "Chainmail Belt".into(),
                    "Chainmail Hood".into(),
                    "Silver Ring".into(),
                ],
            },
            ArchetypeSpec {
                code: "goblin".into(),
                name: "Goblin Warchief".into(),
                quality: Quality::Magic,
                stats: ModifierStats {
                    max_mana: 50.0,
                    ..monster_stats(120.0, 14.0, 120.0)
                },
                behavior: Skirmisher,
                spells: vec![Spell::throw_spear()],
                loot: vec!["Silver Ring".into(), "Gold Ring".into()],
            },
            ArchetypeSpec {
                code: "wyvern_composite".into(),
                name: "Wyvern".into(),
                quality: Quality::Normal,
                stats: ModifierStats {
                    max_mana: 60.0,
                    magical_damage: 12.0,
                    ..monster_stats(90.0, 10.0, 140.0)
                },
                behavior: Skirmisher,
                spells: vec![Spell::firebolt()],
                loot: vec![
                    "Golden Kopis".into(),
                    "Golden Kopis".into(),
                    "Gold Ring".into(),
                    "Talisman of Baphomet".into(),
                    "Chainmail Belt".into(),
                    "Chainmail Boots".into(),
                    "Bone Sword".into(),
                    "Bone Sword".into(),
                ],
            },
            ArchetypeSpec {
                code: "goblin_lumberjack_black".into(),
                name: "Goblin Lumberjack".into(),
                quality: Quality::Normal,
                stats: monster_stats(70.0, 12.0, 130.0),
                behavior: Rusher,
                spells: Vec::new(),
                loot: vec![
                    "Chainmail Armor".into(),
                    "Chainmail Gloves".into(),
                    "Chainmail Boots".into(),
                    "Chainmail Belt".into(),
                    "Chainmail Hood".into(),
                    "Silver Ring".into(),
                    "Dagger".into(),
                ],
            },
            ArchetypeSpec {
                code: "minotaur".into(),
                name: "Minotaur".into(),
                quality: Quality::Normal,
                stats: monster_stats(150.0, 20.0, 110.0),
                behavior: Rusher,
                spells: Vec::new(),
                loot: vec![
                    "Golden Kopis".into(),
                    "Golden Kopis".into(),
                    "Knight Helmet".into(),
                    "Wooden Shield".into(),
                    "Temple Amulet".into(),
                    "Chainmail Armor".into(),
                    "Chainmail Gloves".into(),
                    "Chainmail Hood".into(),
                ],
            },
            ArchetypeSpec {
                code: "minotaur".into(),
                name: "Minotaur Alpha".into(),
                quality: Quality::Elite,
                stats: monster_stats(220.0, 28.0, 110.0),
                behavior: Rusher,
                spells: Vec::new(),
                loot: vec!["Knight Helmet".into(), "Temple Amulet".into()],
            },
            ArchetypeSpec {
                code: "zombie".into(),
                name: "Zombie".into(),
                quality: Quality::Normal,
                stats: monster_stats(80.0, 10.0, 60.0),
                behavior: Rusher,
                spells: Vec::new(),
                loot: vec![
                    "Leather Armor".into(),
                    "Leather Gloves".into(),
                    "Leather Boots".into(),
                    "Leather Belt".into(),
                    "Leather Hood".into(),
                    "Bronze Ring".into(),
                    "Dagger".into(),
                    "Dagger".into(),
                    "Lethal Dagger".into(),
                    "Lethal Dagger".into(),
                    "Wooden Shield".into(),
                ],
            },
            ArchetypeSpec {
                code: "skeleton".into(),
                name: "Skeleton".into(),
                quality: Quality::Normal,
                stats: monster_stats(50.0, 8.0, 120.0),
                behavior: Rusher,
                spells: Vec::new(),
                loot: vec![
                    "Silver Ring".into(),
                    "Temple Amulet".into(),
                    "Dagger".into(),
                    "Dagger".into(),
                    "Lethal Dagger".into(),
                    "Lethal Dagger".into(),
                    "Bone Sword".into(),
                    "Wooden Shield".into(),
                    "Leather Hood".into(),
                    "Leather Armor".into(),
                    "Leather Gloves".into(),
                    "Leather Boots".into(),
                    "Leather Belt".into(),
                ],
            },
        ])
    }
}

impl Runtime {
    /// Build a monster from the bestiary.
    ///
    /// Filters the bestiary by code and quality, picks uniformly among ties
    /// and wires stats, behavior, spellbook and loot in one go. Errors out
    /// before touching the registry when nothing matches.
    pub fn spawn_monster(
        &mut self,
        bestiary: &Bestiary,
        code: &str,
        quality: Quality,
        pos: Vec2,
    ) -> Result<Entity> {
        let candidates: Vec<&ArchetypeSpec> = bestiary
            .iter()
            .filter(|a| a.code == code && a.quality == quality)
            .collect();
        if candidates.is_empty() {
            bail!("no archetype data for {code} ({quality})");
        }
        let spec = candidates[self.rng.gen_range(0..candidates.len())];

        let stats = StatBlock::from_base(spec.stats);
        let dynamic = DynamicStats {
            health: stats.total.max_health,
            mana: stats.total.max_mana,
            level: 1,
            experience: 0,
        };

        let e = self.spawn((
            Name(spec.name.clone()),
            Code(spec.code.clone()),
            spec.quality,
            Kind::Monster,
            Pos(pos),
            Destination(pos),
            LastValidPos(pos),
            SpriteSize {
                width: 48.0,
                height: 96.0,
                origin_y: 0.75,
            },
            stats,
            dynamic,
            Behavior::new(spec.behavior),
            SpellBook(spec.spells.clone()),
            LootTable(spec.loot.clone()),
        ));
        Ok(e)
    }

    /// Build a pack leader with its minions.
    ///
    /// Only non-normal archetype variants can lead a pack; when the
    /// requested code and quality cannot, no entities are created and the
    /// result is empty. Minions are normal-quality versions of the same
    /// code, scattered around the leader. The leader comes first in the
    /// returned list.
    pub fn spawn_monster_pack(
        &mut self,
        bestiary: &Bestiary,
        code: &str,
        quality: Option<Quality>,
        pos: Vec2,
        minions: Option<usize>,
    ) -> Result<Vec<Entity>> {
        let mut candidates: Vec<&ArchetypeSpec> =
            bestiary.iter().filter(|a| a.code == code).collect();
        if candidates.is_empty() {
            bail!("no archetype data for {code}");
        }
        candidates.retain(|a| match quality {
            Some(q) => a.quality == q,
            None => a.quality != Quality::Normal,
        });
        if candidates.is_empty() {
            // Not a pack-capable combination.
            return Ok(Vec::new());
        }
        let leader_quality =
            candidates[self.rng.gen_range(0..candidates.len())].quality;

        let leader = self.spawn_monster(bestiary, code, leader_quality, pos)?;
        let mut entities = vec![leader];
        for _ in 0..minions.unwrap_or(DEFAULT_MINION_COUNT) {
            let offset = vec2(
                self.rng.gen_range(-MINION_SCATTER..MINION_SCATTER),
                self.rng.gen_range(-MINION_SCATTER..MINION_SCATTER),
            );
            let minion = self.spawn_monster(
                bestiary,
                code,
                Quality::Normal,
                pos + offset,
            )?;
            leader.add_minion(self, minion);
            entities.push(minion);
        }
        Ok(entities)
    }

    /// Build the player entity.
    pub fn spawn_player(&mut self, pos: Vec2) -> Entity {
        let stats = StatBlock::from_base(ModifierStats {
            max_health: 100.0,
            max_mana: 100.0,
            health_regen: 2.0,
            mana_regen: 2.0,
            attack_speed: 1.0,
            movement_speed: 150.0,
            melee_range: 100.0,
            projectile_range: 500.0,
            sight_distance: 500.0,
            ..Default::default()
        });
        self.spawn((
            Name("Player".into()),
            Code("player".into()),
            Kind::Player,
            Pos(pos),
            Destination(pos),
            LastValidPos(pos),
            SpriteSize {
                width: 48.0,
                height: 96.0,
                origin_y: 0.70,
            },
            DynamicStats {
                health: stats.total.max_health,
                mana: stats.total.max_mana,
                level: 1,
                experience: 0,
            },
            stats,
        ))
    }

    /// Build a non-combat townsperson.
    pub fn spawn_npc(&mut self, code: &str, pos: Vec2) -> Entity {
        let stats = StatBlock::from_base(ModifierStats {
            max_health: 100.0,
            movement_speed: 100.0,
            sight_distance: 500.0,
            ..Default::default()
        });
        self.spawn((
            Name(code.to_owned()),
            Code(code.to_owned()),
            Kind::Npc,
            Pos(pos),
            Destination(pos),
            SpriteSize {
                width: 48.0,
                height: 96.0,
                origin_y: 0.75,
            },
            DynamicStats {
                health: stats.total.max_health,
                ..Default::default()
            },
            stats,
        ))
    }

    /// Build an inert item entity lying on the ground.
    pub fn spawn_item(&mut self, name: &str, pos: Vec2) -> Entity {
        self.spawn((
            Name(name.to_owned()),
            Kind::Item,
            Pos(pos),
            SpriteSize {
                width: 32.0,
                height: 32.0,
                origin_y: 0.5,
            },
        ))
    }

    /// Stand up monsters for every spawner placed in the current area.
    pub fn populate_spawners(
        &mut self,
        bestiary: &Bestiary,
    ) -> Result<Vec<Entity>> {
        let spawners: Vec<world::Spawner> =
            self.area.spawners().cloned().collect();
        let mut spawned = Vec::new();
        for s in spawners {
            let pos = world::unit_pos_from_tile(s.pos);
            for _ in 0..s.count {
                spawned.push(self.spawn_monster(
                    bestiary,
                    &s.monster_code,
                    Quality::Normal,
                    pos,
                )?);
            }
        }
        Ok(spawned)
    }
}

#[cfg(test)]
mod tests {
    use glam::ivec2;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::test_util::sim;

    #[test]
    fn unknown_archetype_is_an_error() {
        let (mut r, _) = sim();
        let bestiary = Bestiary::standard();
        assert!(r
            .spawn_monster(&bestiary, "deader_than_dead", Quality::Normal, Vec2::ZERO)
            .is_err());
        // Known code, unavailable quality.
        assert!(r
            .spawn_monster(&bestiary, "zombie", Quality::Boss, Vec2::ZERO)
            .is_err());
        // Failed construction registers nothing.
        assert_eq!(r.entities().count(), 0);
    }

    #[test]
    fn spawned_monster_is_fully_initialized() {
        let (mut r, _) = sim();
        let bestiary = Bestiary::standard();
        let goblin = r
            .spawn_monster(&bestiary, "goblin", Quality::Normal, vec2(5.0, 6.0))
            .unwrap();

        assert_eq!(goblin.code(&r), "goblin");
        assert_eq!(goblin.name(&r), "Goblin");
        assert!(goblin.is_monster(&r));
        assert_eq!(goblin.pos(&r), vec2(5.0, 6.0));
        assert_eq!(goblin.destination(&r), goblin.pos(&r));
        // Dynamic pools seeded from computed maxima.
        assert_eq!(goblin.health(&r), goblin.stats(&r).max_health);
        assert_eq!(goblin.mana(&r), goblin.stats(&r).max_mana);
        // Archetype wiring.
        let b: Behavior = goblin.get(&r);
        assert_eq!(b.kind, BehaviorKind::Skirmisher);
        assert_eq!(b.state, BehaviorState::Idle);
        let book: SpellBook = goblin.get(&r);
        assert_eq!(book.len(), 1);
        assert!(!goblin.get::<LootTable>(&r).is_empty());
        assert_eq!(goblin.get::<Quality>(&r), Quality::Normal);
    }

    #[test]
    fn pack_spawns_leader_and_linked_minions() {
        let (mut r, _) = sim();
        let bestiary = Bestiary::standard();
        let pack = r
            .spawn_monster_pack(
                &bestiary,
                "minotaur",
                Some(Quality::Elite),
                vec2(0.0, 0.0),
                None,
            )
            .unwrap();
        assert_eq!(pack.len(), 1 + crate::DEFAULT_MINION_COUNT);

        let leader = pack[0];
        assert_eq!(leader.get::<Quality>(&r), Quality::Elite);
        assert_eq!(leader.pack_minions(&r), pack[1..].to_vec());
        for &minion in &pack[1..] {
            assert_eq!(minion.get::<Quality>(&r), Quality::Normal);
            assert_eq!(minion.pack_leader(&r), Some(leader));
            // Scattered near the leader, never on top of it.
            assert!(util::dist(minion.pos(&r), leader.pos(&r)) <= 100.0);
        }
    }

    #[test]
    fn normal_only_archetypes_cannot_lead_packs() {
        let (mut r, _) = sim();
        let bestiary = Bestiary::standard();
        // Zombies only exist at normal quality.
        let pack = r
            .spawn_monster_pack(&bestiary, "zombie", None, Vec2::ZERO, None)
            .unwrap();
        assert!(pack.is_empty());
        assert_eq!(r.entities().count(), 0);

        // Unknown codes are still a hard error.
        assert!(r
            .spawn_monster_pack(&bestiary, "dire_badger", None, Vec2::ZERO, None)
            .is_err());
    }

    #[test]
    fn pack_without_explicit_quality_picks_a_non_normal_leader() {
        let (mut r, _) = sim();
        let bestiary = Bestiary::standard();
        let pack = r
            .spawn_monster_pack(&bestiary, "goblin", None, Vec2::ZERO, Some(2))
            .unwrap();
        assert_eq!(pack.len(), 3);
        assert_eq!(pack[0].get::<Quality>(&r), Quality::Magic);
    }

    #[test]
    fn spawners_populate_the_area() {
        let (mut r, _) = sim();
        r.area.add_object(world::GameObject::Spawner(world::Spawner {
            pos: ivec2(2, 2),
            monster_code: "skeleton".into(),
            count: 3,
        }));
        let spawned = r.populate_spawners(&Bestiary::standard()).unwrap();
        assert_eq!(spawned.len(), 3);
        assert_eq!(r.monsters().len(), 3);
        let pos = world::unit_pos_from_tile(ivec2(2, 2));
        for e in spawned {
            assert_eq!(e.pos(&r), pos);
        }
    }
}
