use std::hash::BuildHasherDefault;

use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxHasher;

pub type FxIndexSet<T> = IndexSet<T, BuildHasherDefault<FxHasher>>;
pub type FxIndexMap<K, V> = IndexMap<K, V, BuildHasherDefault<FxHasher>>;

pub fn fx_index_map_with_capacity<K, V>(capacity: usize) -> FxIndexMap<K, V> {
  FxIndexMap::with_capacity_and_hasher(capacity, BuildHasherDefault::default())
}
