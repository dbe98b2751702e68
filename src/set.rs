//! `Set<K>`: a `Map<K, ()>` specialization (§4.7).

use std::hash::{BuildHasher, Hash};

use crate::hash::MulBuildHasher;
use crate::raw::core::RawTable;
use crate::raw::SimdHashConfig;

pub struct Set<K, S = MulBuildHasher> {
    raw: RawTable<K, (), S>,
}

impl<K> Set<K, MulBuildHasher>
where
    K: Copy + Eq + Hash,
{
    pub fn new() -> Self {
        Set {
            raw: RawTable::new(SimdHashConfig::default(), MulBuildHasher::new()),
        }
    }

    pub fn with_config(config: SimdHashConfig) -> Self {
        Set {
            raw: RawTable::new(config, MulBuildHasher::new()),
        }
    }
}

impl<K> Default for Set<K, MulBuildHasher>
where
    K: Copy + Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, S> Set<K, S>
where
    K: Copy + Eq + Hash,
    S: BuildHasher,
{
    pub fn with_hasher(config: SimdHashConfig, hasher: S) -> Self {
        Set {
            raw: RawTable::new(config, hasher),
        }
    }

    /// `Set.Add` (§4.7): `true` if `key` was newly inserted.
    pub fn add(&mut self, key: K) -> bool {
        self.raw.insert(key, (), false)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.raw.contains(key)
    }

    /// `Set.Remove`: `true` if `key` was present and removed.
    pub fn remove(&mut self, key: &K) -> bool {
        self.raw.remove(key).is_some()
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

    pub fn iter(&self) -> impl Iterator<Item = &K> {
        self.raw.iter().map(|(k, _)| k)
    }
}

impl<K, S> Extend<K> for Set<K, S>
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

impl<K> FromIterator<K> for Set<K, MulBuildHasher>
where
    K: Copy + Eq + Hash,
{
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut set = Set::new();
        set.extend(iter);
        set
    }
}

impl<K, S> std::fmt::Debug for Set<K, S>
where
    K: Copy + Eq + Hash,
    S: BuildHasher,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Set")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_duplicate_add_and_contains() {
        let mut s: Set<u32> = Set::new();
        assert!(s.add(2222));
        assert!(!s.add(2222));
        assert!(!s.contains(&2002));
        assert!(s.add(2002));
        assert!(s.contains(&2002));
    }

    #[test]
    fn remove_then_contains_is_false() {
        let mut s: Set<u64> = Set::new();
        s.add(7);
        assert!(s.remove(&7));
        assert!(!s.contains(&7));
        assert!(!s.remove(&7));
    }

    #[test]
    fn iter_yields_every_member_once() {
        let s: Set<u64> = (0..50u64).collect();
        let mut seen: Vec<u64> = s.iter().copied().collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..50u64).collect::<Vec<_>>());
    }
}
