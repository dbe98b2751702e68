//! `Index<K>`: key-to-dense-rank container over the shared probing engine
//! (§4.6, §4.7). No `Remove` — a removed rank would leave a hole in the
//! `0..len()` permutation the container guarantees, so the method simply
//! does not exist, rather than existing and panicking (§9).

use std::hash::{BuildHasher, Hash};

use crate::hash::MulBuildHasher;
use crate::raw::index_core::RawIndexTable;
use crate::raw::SimdHashConfig;

pub struct Index<K, S = MulBuildHasher> {
    raw: RawIndexTable<K, S>,
}

impl<K> Index<K, MulBuildHasher>
where
    K: Copy + Eq + Hash,
{
    pub fn new() -> Self {
        Index {
            raw: RawIndexTable::new(SimdHashConfig::default(), MulBuildHasher::new()),
        }
    }

    pub fn with_config(config: SimdHashConfig) -> Self {
        Index {
            raw: RawIndexTable::new(config, MulBuildHasher::new()),
        }
    }
}

impl<K> Default for Index<K, MulBuildHasher>
where
    K: Copy + Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, S> Index<K, S>
where
    K: Copy + Eq + Hash,
    S: BuildHasher,
{
    pub fn with_hasher(config: SimdHashConfig, hasher: S) -> Self {
        Index {
            raw: RawIndexTable::new(config, hasher),
        }
    }

    /// `Index.Add` (§4.7): always assigns a fresh rank, even for a key
    /// already present under an earlier rank. Returns the new rank.
    pub fn add(&mut self, key: K) -> u32 {
        self.raw.add(key)
    }

    /// `Index.TryAdd` (§4.7): `(rank, true)` if newly assigned, `(rank,
    /// false)` with the existing rank if `key` was already present.
    pub fn try_add(&mut self, key: K) -> (u32, bool) {
        self.raw.try_add(key)
    }

    /// `Index.TryGetIndex`.
    pub fn try_get_index(&self, key: &K) -> Option<u32> {
        self.raw.get_index(key)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.raw.contains(key)
    }

    /// Key at dense rank `rank`, if `rank < len()`.
    pub fn key_at(&self, rank: u32) -> Option<&K> {
        self.raw.key_at(rank)
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

    pub fn resize(&mut self, requested: usize) {
        self.raw.resize_to(requested);
    }

    pub fn clear(&mut self, size_hint: Option<usize>) {
        self.raw.clear(size_hint);
    }

    /// Keys in insertion (rank) order.
    pub fn iter(&self) -> impl Iterator<Item = &K> {
        self.raw.iter()
    }
}

impl<K, S> Extend<K> for Index<K, S>
where
    K: Copy + Eq + Hash,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for k in iter {
            self.add(k);
        }
    }
}

impl<K> FromIterator<K> for Index<K, MulBuildHasher>
where
    K: Copy + Eq + Hash,
{
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut idx = Index::new();
        idx.extend(iter);
        idx
    }
}

impl<K, S> std::fmt::Debug for Index<K, S>
where
    K: Copy + Eq + Hash,
    S: BuildHasher,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Index")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .finish()
    }
}
