//! `Map<K, V>`: key-to-value container over the shared probing engine (§4.7).

use std::hash::{BuildHasher, Hash};

use crate::hash::MulBuildHasher;
use crate::raw::core::RawTable;
use crate::raw::SimdHashConfig;

/// Open-addressing hash map, `K → V`, backed by one SIMD-probed control
/// array and a paged entry array (§4). Keys and values must be `Copy` —
/// entries move by byte-copy during growth, never by running a destructor
/// or a user-supplied move (§3).
pub struct Map<K, V, S = MulBuildHasher> {
    raw: RawTable<K, V, S>,
}

impl<K, V> Map<K, V, MulBuildHasher>
where
    K: Copy + Eq + Hash,
    V: Copy,
{
    pub fn new() -> Self {
        Map {
            raw: RawTable::new(SimdHashConfig::default(), MulBuildHasher::new()),
        }
    }

    pub fn with_config(config: SimdHashConfig) -> Self {
        Map {
            raw: RawTable::new(config, MulBuildHasher::new()),
        }
    }
}

impl<K, V> Default for Map<K, V, MulBuildHasher>
where
    K: Copy + Eq + Hash,
    V: Copy,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> Map<K, V, S>
where
    K: Copy + Eq + Hash,
    V: Copy,
    S: BuildHasher,
{
    pub fn with_hasher(config: SimdHashConfig, hasher: S) -> Self {
        Map {
            raw: RawTable::new(config, hasher),
        }
    }

    /// `Map.Add` (§4.7): `true` if inserted, `false` if `k` already existed
    /// (in which case the existing value is left untouched).
    pub fn add(&mut self, key: K, value: V) -> bool {
        self.raw.insert(key, value, false)
    }

    /// `Map.AddOrUpdate` (§4.7): `true` if inserted, `false` if `k` already
    /// existed (in which case the value is overwritten).
    pub fn add_or_update(&mut self, key: K, value: V) -> bool {
        self.raw.insert(key, value, true)
    }

    /// `Map.Update` (§4.7): overwrites only if `k` is already present.
    pub fn update(&mut self, key: K, value: V) -> bool {
        self.raw.update(key, value)
    }

    /// `Map.TryGetValue`.
    pub fn try_get_value(&self, key: &K) -> Option<&V> {
        self.raw.get(key)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.raw.contains(key)
    }

    /// `Map.Remove` (§4.7): returns the removed value, if any.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.raw.remove(key)
    }

    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    pub fn load_factor(&self) -> f64 {
        self.raw.load_factor()
    }

    pub fn max_load_factor(&self) -> f64 {
        self.raw.max_load_factor()
    }

    /// `Map.Resize(requested)` (§4.7).
    pub fn resize(&mut self, requested: usize) {
        self.raw.resize_to(requested);
    }

    /// `Map.Clear`; `size_hint`, if given, also reallocates to fit it.
    pub fn clear(&mut self, size_hint: Option<usize>) {
        self.raw.clear(size_hint);
    }

    pub fn iter(&self) -> impl Iterator<Item = &(K, V)> {
        self.raw.iter()
    }
}

impl<K, V, S> Extend<(K, V)> for Map<K, V, S>
where
    K: Copy + Eq + Hash,
    V: Copy,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.add_or_update(k, v);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for Map<K, V, MulBuildHasher>
where
    K: Copy + Eq + Hash,
    V: Copy,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Map::new();
        map.extend(iter);
        map
    }
}

impl<K, V, S> std::fmt::Debug for Map<K, V, S>
where
    K: Copy + Eq + Hash,
    V: Copy,
    S: BuildHasher,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Map")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .finish()
    }
}
