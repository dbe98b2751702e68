// Probing engine for `Index` (§4.6): keys map to a dense rank assigned in
// insertion order. Unlike `RawTable`, ranks never move once assigned —
// growth only needs to relocate control bytes and the parallel rank array,
// never renumber anything — and there is no `Remove` (§1 Non-goals, §9: an
// Index whose ranks could be removed would stop being a permutation of
// `0..len()`, which is the container's whole point).

use std::hash::{BuildHasher, Hash};

use super::capacity::{adjust_capacity, multiplier_for, CapacityMode, MAX_SIZE};
use super::entry::PagedArray;
use super::tag_array::TagArray;
use super::SimdHashConfig;
use crate::error::SimdHashError;

struct ProbeState {
    pos: usize,
    jump: usize,
}

impl ProbeState {
    fn new(initial: usize) -> Self {
        ProbeState { pos: initial, jump: 0 }
    }

    #[inline]
    fn advance(&mut self, capacity: usize, mask_reduction: bool, multiplier: u64) {
        self.jump += super::tag::GROUP;
        let target = (self.pos as u64).wrapping_add(self.jump as u64);
        self.pos = if mask_reduction {
            super::capacity::adjust_index_mask(target, capacity)
        } else {
            super::capacity::adjust_index_mul(target, capacity, multiplier)
        };
    }
}

#[inline]
fn tag_of(hash: u64) -> u8 {
    (hash >> 57) as u8
}

/// Engine behind `Index<K>`: one control array (shared slot space with the
/// keys) plus two parallel paged arrays — `dense[rank] = key` and
/// `rank_of[slot] = rank` — kept as separate arrays rather than packed into
/// one entry-per-slot struct, per §4.6's explicit preference for orthogonal
/// key/rank storage (§9).
pub(crate) struct RawIndexTable<K, S> {
    ctrl: TagArray,
    keys: PagedArray<K>,
    ranks: PagedArray<u32>,
    dense: PagedArray<K>,
    count: usize,
    multiplier: u64,
    config: SimdHashConfig,
    hasher: S,
}

impl<K, S> RawIndexTable<K, S>
where
    K: Copy + Eq + Hash,
    S: BuildHasher,
{
    pub(crate) fn new(config: SimdHashConfig, hasher: S) -> Self {
        config.validate();
        let capacity = super::capacity::MIN_SIZE;
        let ctrl = TagArray::new(capacity);
        let mut keys = PagedArray::new();
        keys.grow_to(capacity);
        let mut ranks = PagedArray::new();
        ranks.grow_to(capacity);
        let dense = PagedArray::new();
        RawIndexTable {
            ctrl,
            keys,
            ranks,
            dense,
            count: 0,
            multiplier: multiplier_for(capacity),
            config,
            hasher,
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.ctrl.capacity()
    }

    #[inline]
    pub(crate) fn max_load_factor(&self) -> f64 {
        self.config.max_load_factor
    }

    #[inline]
    pub(crate) fn load_factor(&self) -> f64 {
        self.count as f64 / self.ctrl.capacity() as f64
    }

    #[inline]
    fn threshold(&self) -> usize {
        (self.ctrl.capacity() as f64 * self.config.max_load_factor).floor() as usize
    }

    #[inline]
    fn mask_reduction(&self) -> bool {
        self.config.mode.uses_mask_reduction()
    }

    #[inline]
    fn reduce(&self, h: u64, capacity: usize, multiplier: u64) -> usize {
        if self.mask_reduction() {
            super::capacity::adjust_index_mask(h, capacity)
        } else {
            super::capacity::adjust_index_mul(h, capacity, multiplier)
        }
    }

    #[inline]
    fn hash_of(&self, key: &K) -> u64 {
        let mut h = self.hasher.build_hasher();
        key.hash(&mut h);
        h.finish()
    }

    fn find_slot(&self, hash: u64, tag: u8, key: &K) -> Option<usize> {
        let capacity = self.ctrl.capacity();
        let mut probe = ProbeState::new(self.reduce(hash, capacity, self.multiplier));
        loop {
            let group = self.ctrl.group_at(probe.pos, self.config.bfix);
            for bit in group.match_byte(tag) {
                let slot = probe.pos + bit;
                if *self.keys.get(slot) == *key {
                    return Some(slot);
                }
            }
            if group.match_empty().any() {
                return None;
            }
            probe.advance(capacity, self.mask_reduction(), self.multiplier);
        }
    }

    /// `TryGetIndex` (§4.7): the key's dense rank, if present.
    pub(crate) fn get_index(&self, key: &K) -> Option<u32> {
        let hash = self.hash_of(key);
        self.find_slot(hash, tag_of(hash), key)
            .map(|slot| *self.ranks.get(slot))
    }

    pub(crate) fn contains(&self, key: &K) -> bool {
        self.get_index(key).is_some()
    }

    /// Key at dense rank `rank`, if `rank < len()`.
    pub(crate) fn key_at(&self, rank: u32) -> Option<&K> {
        if (rank as usize) < self.count {
            Some(self.dense.get(rank as usize))
        } else {
            None
        }
    }

    /// `Add`: always assigns a fresh rank, even if `key` was already
    /// present under a previous rank — matching §4.6, where `Index` models
    /// each insertion event, not a set of keys. Returns the new rank.
    pub(crate) fn add(&mut self, key: K) -> u32 {
        let rank = self.insert_slot(key);
        rank
    }

    /// `TryAdd` (§4.7): only assigns a rank if `key` is new; returns the
    /// existing or newly assigned rank either way, plus whether it was new.
    pub(crate) fn try_add(&mut self, key: K) -> (u32, bool) {
        let hash = self.hash_of(&key);
        if let Some(slot) = self.find_slot(hash, tag_of(hash), &key) {
            return (*self.ranks.get(slot), false);
        }
        (self.insert_slot(key), true)
    }

    fn insert_slot(&mut self, key: K) -> u32 {
        let hash = self.hash_of(&key);
        let tag = tag_of(hash);
        let capacity = self.ctrl.capacity();
        let mut probe = ProbeState::new(self.reduce(hash, capacity, self.multiplier));
        let slot = loop {
            let group = self.ctrl.group_at(probe.pos, self.config.bfix);
            if let Some(bit) = group.match_empty().first_set() {
                break probe.pos + bit;
            }
            probe.advance(capacity, self.mask_reduction(), self.multiplier);
        };
        let rank = self.count as u32;
        self.ctrl.set(slot, tag);
        self.keys.write(slot, key);
        self.ranks.write(slot, rank);
        self.dense.grow_to(self.count + 1);
        self.dense.write(self.count, key);
        self.count += 1;
        self.maybe_grow();
        rank
    }

    fn maybe_grow(&mut self) {
        if self.count > self.threshold() {
            if self.config.mode == CapacityMode::ResizeOnlyEmpty {
                panic!(
                    "{}",
                    SimdHashError::FixedCapacityExceeded {
                        count: self.count,
                        threshold: self.threshold(),
                    }
                );
            }
            let requested = self.ctrl.capacity() + 1;
            self.resize_to(requested);
        }
    }

    /// `Resize` (§4.7). Because ranks are immutable once assigned, growth
    /// never needs the Map/Set in-place reshuffle: the dense `key` rebuild
    /// is a straight replay of `dense[0..count]` into fresh control bytes
    /// (§4.6), none of which alias storage still being read — no eviction
    /// chains are possible.
    pub(crate) fn resize_to(&mut self, requested: usize) {
        assert!(
            requested <= MAX_SIZE,
            "{}",
            SimdHashError::CapacityExceeded {
                requested,
                max: MAX_SIZE
            }
        );
        if self.config.mode == CapacityMode::ResizeOnlyEmpty && self.count != 0 {
            panic!(
                "{}",
                SimdHashError::ResizeOnlyEmptyViolation { count: self.count }
            );
        }
        let new_capacity = adjust_capacity(requested, self.config.mode, self.config.max_load_factor);
        if new_capacity == self.ctrl.capacity() {
            return;
        }
        tracing::trace!(
            old_capacity = self.ctrl.capacity(),
            new_capacity,
            count = self.count,
            "resizing simd-hash index"
        );
        let new_multiplier = multiplier_for(new_capacity);
        let mut new_ctrl = TagArray::new(new_capacity);
        let mut new_keys = PagedArray::new();
        new_keys.grow_to(new_capacity);
        let mut new_ranks = PagedArray::new();
        new_ranks.grow_to(new_capacity);

        let mask_reduction = self.config.mode.uses_mask_reduction();
        for rank in 0..self.count {
            let key = *self.dense.get(rank);
            let hash = self.hash_of(&key);
            let tag = tag_of(hash);
            let mut probe = ProbeState::new(if mask_reduction {
                super::capacity::adjust_index_mask(hash, new_capacity)
            } else {
                super::capacity::adjust_index_mul(hash, new_capacity, new_multiplier)
            });
            let slot = loop {
                let group = new_ctrl.group_at(probe.pos, self.config.bfix);
                if let Some(bit) = group.match_empty().first_set() {
                    break probe.pos + bit;
                }
                probe.advance(new_capacity, mask_reduction, new_multiplier);
            };
            new_ctrl.set(slot, tag);
            new_keys.write(slot, key);
            new_ranks.write(slot, rank as u32);
        }

        self.ctrl = new_ctrl;
        self.keys = new_keys;
        self.ranks = new_ranks;
        self.multiplier = new_multiplier;
    }

    /// `Clear` (§4.5): forgets every key and rank; `size_hint` behaves as in
    /// `RawTable::clear`.
    pub(crate) fn clear(&mut self, size_hint: Option<usize>) {
        let capacity = if let Some(hint) = size_hint {
            adjust_capacity(hint, self.config.mode, self.config.max_load_factor)
        } else {
            self.ctrl.capacity()
        };
        self.ctrl = TagArray::new(capacity);
        self.keys = PagedArray::new();
        self.keys.grow_to(capacity);
        self.ranks = PagedArray::new();
        self.ranks.grow_to(capacity);
        self.dense = PagedArray::new();
        self.multiplier = multiplier_for(capacity);
        self.count = 0;
    }

    pub(crate) fn iter(&self) -> super::iter::DenseIter<'_, K> {
        super::iter::DenseIter::new(&self.dense, self.count)
    }
}
