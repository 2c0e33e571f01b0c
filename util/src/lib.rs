//! Unopinionated standalone utilities.

mod bits;
pub use bits::{
    compact_u64_by_2, deinterleave_u64, interleave_u32, spread_u64_by_2,
};

mod geom;
pub use geom::{
    dist, project_towards, random_point_in_circle, scaled_dist, within, DIR_4,
    DIR_8,
};

mod path;
pub use path::astar_path;

mod rng;
pub use rng::{srng, RngExt};

pub type FastHasher = rustc_hash::FxHasher;

/// Map with an efficient hash function.
pub use rustc_hash::FxHashMap as HashMap;

/// Set with an efficient hash function.
pub use rustc_hash::FxHashSet as HashSet;

type DefaultHashBuilder = std::hash::BuildHasherDefault<rustc_hash::FxHasher>;

/// Insertion order preserving map with an efficient hash function.
pub type IndexMap<K, V> = indexmap::IndexMap<K, V, DefaultHashBuilder>;

/// Insertion order preserving set with an efficient hash function.
pub type IndexSet<V> = indexmap::IndexSet<V, DefaultHashBuilder>;

/// Good default concrete rng.
pub type GameRng = rand_xorshift::XorShiftRng;
