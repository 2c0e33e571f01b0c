pub use crate::{
    AnimSignal, AnimState, Behavior, BehaviorKind, BehaviorState, DamageType,
    Entity, Msg, Quality, Runtime,
};
pub use glam::{ivec2, vec2, IVec2, Vec2};
pub use util::{dist, scaled_dist, HashMap, HashSet, IndexMap, IndexSet};
