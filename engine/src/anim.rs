//! Seam towards the external animation system.
//!
//! The simulation requests animation states and polls whether a
//! non-repeating clip is still running; it never blocks on playback.
//! Completion and mid-swing events come back through
//! [`Runtime::post_anim_signal`](crate::Runtime::post_anim_signal) and are
//! consumed once per frame, after every entity has updated.

use std::{cell::RefCell, rc::Rc};

use serde::{Deserialize, Serialize};

use crate::prelude::*;

/// Animation states the simulation can request.
#[derive(
    Copy,
    Clone,
    Default,
    Eq,
    PartialEq,
    Hash,
    Debug,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "kebab-case")]
pub enum AnimState {
    #[default]
    Idle,
    Run,
    MeleeAttack,
    MeleeAttack2,
    RangedAttack,
    RangedAttack2,
    CastSpell,
    Block,
    Cheer,
    Hit,
    Death,
    CriticalDeath,
}

impl AnimState {
    /// Whether the clip plays once and stops rather than looping.
    ///
    /// Non-repeating clips gate behavior decisions: a creature mid-swing
    /// does not change its mind until the swing lands or finishes.
    pub fn is_non_repeating(self) -> bool {
        !matches!(self, AnimState::Idle | AnimState::Run)
    }
}

/// Events the animation system reports back to the simulation.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum AnimSignal {
    /// A non-repeating clip finished.
    Ended(AnimState),

    /// A yoyo clip reached its middle frame, the moment a swing visually
    /// connects.
    YoyoMidpoint(AnimState),
}

/// External animation collaborator.
pub trait Animator {
    /// Play a state immediately, possibly interrupting the current clip.
    fn set_state(&mut self, e: Entity, state: AnimState);

    /// Queue a state to play once the current clip allows it.
    fn set_future_state(&mut self, e: Entity, state: AnimState);

    /// Whether a non-repeating clip is currently playing for the entity.
    fn is_non_repeating_playing(&self, e: Entity) -> bool;
}

/// Animator that accepts everything and plays nothing. The default when the
/// embedding layer hasn't wired a real one.
pub struct NullAnimator;

impl Animator for NullAnimator {
    fn set_state(&mut self, _e: Entity, _state: AnimState) {}

    fn set_future_state(&mut self, _e: Entity, _state: AnimState) {}

    fn is_non_repeating_playing(&self, _e: Entity) -> bool {
        false
    }
}

#[derive(Default)]
struct StubState {
    requests: Vec<(Entity, AnimState)>,
    playing: HashSet<Entity>,
}

/// Recording animator for tests and headless runs.
///
/// Keeps every requested state and lets the caller script which entities
/// count as mid-clip via a shared handle.
#[derive(Clone, Default)]
pub struct StubAnimator(Rc<RefCell<StubState>>);

impl StubAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// All state requests so far, oldest first.
    pub fn requests(&self) -> Vec<(Entity, AnimState)> {
        self.0.borrow().requests.clone()
    }

    pub fn last_request(&self, e: Entity) -> Option<AnimState> {
        self.0
            .borrow()
            .requests
            .iter()
            .rev()
            .find(|(e2, _)| *e2 == e)
            .map(|&(_, s)| s)
    }

    /// Script whether a non-repeating clip counts as playing for an entity.
    pub fn set_playing(&self, e: Entity, playing: bool) {
        let mut state = self.0.borrow_mut();
        if playing {
            state.playing.insert(e);
        } else {
            state.playing.remove(&e);
        }
    }
}

impl Animator for StubAnimator {
    fn set_state(&mut self, e: Entity, state: AnimState) {
        self.0.borrow_mut().requests.push((e, state));
    }

    fn set_future_state(&mut self, e: Entity, state: AnimState) {
        self.0.borrow_mut().requests.push((e, state));
    }

    fn is_non_repeating_playing(&self, e: Entity) -> bool {
        self.0.borrow().playing.contains(&e)
    }
}
