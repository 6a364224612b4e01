//! Hash-map alias shared across the crate.

use ahash::RandomState;

pub type Map<K, V> = hashbrown::HashMap<K, V, RandomState>;
