//! Monster pack coordination.
//!
//! A pack is one leader and a handful of minions. Minions don't flock;
//! each one independently steers for a point a fixed distance along its
//! own bearing towards the leader, which keeps the pack clustered without
//! stacking everyone on the same spot.

use serde::{Deserialize, Serialize};

use crate::{prelude::*, MINION_RING_RADIUS};

/// Leader's side of a pack: the minions following it.
#[derive(Clone, Debug, Eq, PartialEq, Default, Serialize, Deserialize)]
pub struct Pack {
    pub minions: Vec<Entity>,
}

/// Minion's back-reference to its leader. Never owns the leader; the link
/// is dropped when either side dies.
#[derive(
    Copy, Clone, Debug, Eq, PartialEq, Default, Serialize, Deserialize,
)]
pub struct PackMember {
    pub leader: Option<Entity>,
}

/// The point a minion standing at `minion` steers for, given its leader's
/// position: `MINION_RING_RADIUS` units out along the minion-to-leader
/// bearing.
pub fn minion_ring_target(minion: Vec2, leader: Vec2) -> Vec2 {
    util::project_towards(minion, leader, MINION_RING_RADIUS)
}

impl Entity {
    /// Enroll a minion under this entity's pack.
    pub fn add_minion(&self, r: &mut impl AsMut<Runtime>, minion: Entity) {
        let r = r.as_mut();
        if minion == *self {
            log::warn!("add_minion: {minion} cannot follow itself");
            return;
        }
        self.with_mut::<Pack, _>(r, |pack| {
            if !pack.minions.contains(&minion) {
                pack.minions.push(minion);
            }
        });
        minion.set(
            r,
            PackMember {
                leader: Some(*self),
            },
        );
    }

    pub fn pack_leader(&self, r: &impl AsRef<Runtime>) -> Option<Entity> {
        self.get::<PackMember>(r).leader
    }

    pub fn pack_minions(&self, r: &impl AsRef<Runtime>) -> Vec<Entity> {
        self.get::<Pack>(r).minions
    }

    /// Keep formation with the pack leader.
    ///
    /// Only idle minions reposition; a minion that has picked a fight or is
    /// mid-attack is left to its behavior. A dead or despawned leader
    /// dissolves the link.
    pub(crate) fn pack_update(&self, r: &mut impl AsMut<Runtime>) {
        let r = r.as_mut();

        let Some(leader) = self.pack_leader(r) else {
            return;
        };
        if !leader.is_alive(r) {
            log::debug!("pack_update: leader of {self} is gone");
            self.set(r, PackMember::default());
            return;
        }
        // Formation beats wandering, but never a fight in progress.
        if !matches!(
            self.behavior_state(r),
            BehaviorState::Idle | BehaviorState::Roaming
        ) || self.target(r).is_some()
        {
            return;
        }

        let pos = self.pos(r);
        let leader_pos = leader.pos(r);
        if util::dist(pos, leader_pos) > MINION_RING_RADIUS {
            self.set_destination(r, minion_ring_target(pos, leader_pos));
        }
    }
}
