//! Outbound events for the frame loop and UI layer.

use crate::prelude::*;
use crate::SpellKind;

/// Instant gameplay events the embedding layer may want to present.
///
/// Drained from the runtime once per frame; the simulation never waits on
/// the consumer.
#[derive(Clone, Debug, PartialEq)]
pub enum Msg {
    /// Entity took damage after mitigation.
    Hurt {
        target: Entity,
        source: Option<Entity>,
        amount: f32,
    },

    /// Entity ran out of health.
    Died(Entity),

    /// A dying entity dropped an item from its loot table.
    Loot { source: Entity, item: String },

    /// Entity released a spell.
    SpellCast { caster: Entity, kind: SpellKind },
}
