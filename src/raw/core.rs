// Probing engine for Map/Set (§4.5): Add / Find / Remove / Resize with
// in-place cuckoo-style reshuffle on growth. `Index` has its own engine in
// `index_core.rs` because its growth and storage shape differ (dense ranks
// that never move, no Remove).

use std::hash::{BuildHasher, Hash};

use super::capacity::{adjust_capacity, multiplier_for, CapacityMode, MAX_SIZE};
use super::entry::PagedArray;
use super::tag::{EMPTY, GROUP};
use super::tag_array::TagArray;
use super::SimdHashConfig;
use crate::error::SimdHashError;

/// `h & (C - 1)` or the multiplicative high-word reduction, selected by
/// `CapacityMode::uses_mask_reduction` (§4.4).
#[derive(Clone, Copy)]
enum Reducer {
    Mask,
    Mul(u64),
}

impl Reducer {
    fn for_mode(mode: CapacityMode, multiplier: u64) -> Self {
        if mode.uses_mask_reduction() {
            Reducer::Mask
        } else {
            Reducer::Mul(multiplier)
        }
    }

    #[inline]
    fn reduce(&self, h: u64, capacity: usize) -> usize {
        match self {
            Reducer::Mask => super::capacity::adjust_index_mask(h, capacity),
            Reducer::Mul(m) => super::capacity::adjust_index_mul(h, capacity, *m),
        }
    }
}

struct ProbeState {
    pos: usize,
    jump: usize,
}

impl ProbeState {
    fn new(initial: usize) -> Self {
        ProbeState { pos: initial, jump: 0 }
    }

    #[inline]
    fn advance(&mut self, capacity: usize, reducer: &Reducer) {
        self.jump += GROUP;
        self.pos = reducer.reduce((self.pos as u64).wrapping_add(self.jump as u64), capacity);
    }
}

#[inline]
fn tag_of(hash: u64) -> u8 {
    (hash >> 57) as u8
}

/// Walks groups along `hash`'s probe path in `ctrl` until one has an
/// empty-or-tombstone lane, returning the lowest such lane's slot index.
/// Shared by unique inserts and by the growth reshuffle, both of which only
/// need "first available slot", never an equality check.
fn find_empty_slot(ctrl: &TagArray, capacity: usize, reducer: &Reducer, bfix: bool, hash: u64) -> usize {
    let mut probe = ProbeState::new(reducer.reduce(hash, capacity));
    loop {
        let group = ctrl.group_at(probe.pos, bfix);
        if let Some(bit) = group.match_empty_or_tombstone().first_set() {
            return probe.pos + bit;
        }
        probe.advance(capacity, reducer);
    }
}

/// Shared engine behind `Map<K, V>` and `Set<K>` (`V = ()`): one control
/// array, one paged entry array indexed by control-slot (§4.3).
pub(crate) struct RawTable<K, V, S> {
    ctrl: TagArray,
    entries: PagedArray<(K, V)>,
    count: usize,
    multiplier: u64,
    config: SimdHashConfig,
    hasher: S,
}

impl<K, V, S> RawTable<K, V, S>
where
    K: Copy + Eq + Hash,
    V: Copy,
    S: BuildHasher,
{
    pub(crate) fn new(config: SimdHashConfig, hasher: S) -> Self {
        config.validate();
        let capacity = super::capacity::MIN_SIZE;
        let ctrl = TagArray::new(capacity);
        let mut entries = PagedArray::new();
        entries.grow_to(capacity);
        RawTable {
            ctrl,
            entries,
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
    fn reducer(&self) -> Reducer {
        Reducer::for_mode(self.config.mode, self.multiplier)
    }

    #[inline]
    fn hash_of(&self, key: &K) -> u64 {
        let mut h = self.hasher.build_hasher();
        key.hash(&mut h);
        h.finish()
    }

    fn find_slot(&self, hash: u64, tag: u8, key: &K) -> Option<usize> {
        let capacity = self.ctrl.capacity();
        let reducer = self.reducer();
        let mut probe = ProbeState::new(reducer.reduce(hash, capacity));
        loop {
            let group = self.ctrl.group_at(probe.pos, self.config.bfix);
            for bit in group.match_byte(tag) {
                let slot = probe.pos + bit;
                if self.entries.get(slot).0 == *key {
                    return Some(slot);
                }
            }
            if group.match_empty().any() {
                return None;
            }
            probe.advance(capacity, &reducer);
        }
    }

    pub(crate) fn get(&self, key: &K) -> Option<&V> {
        let hash = self.hash_of(key);
        self.find_slot(hash, tag_of(hash), key)
            .map(|slot| &self.entries.get(slot).1)
    }

    pub(crate) fn contains(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// `Add` (`overwrite_if_present = false`) / `AddOrUpdate`
    /// (`overwrite_if_present = true`), per §4.7: returns `true` iff newly
    /// inserted.
    pub(crate) fn insert(&mut self, key: K, value: V, overwrite_if_present: bool) -> bool {
        let hash = self.hash_of(&key);
        let tag = tag_of(hash);
        let capacity = self.ctrl.capacity();
        let reducer = self.reducer();
        let mut probe = ProbeState::new(reducer.reduce(hash, capacity));
        loop {
            let group = self.ctrl.group_at(probe.pos, self.config.bfix);
            for bit in group.match_byte(tag) {
                let slot = probe.pos + bit;
                if self.entries.get(slot).0 == key {
                    if overwrite_if_present {
                        self.entries.write(slot, (key, value));
                    }
                    return false;
                }
            }
            if group.match_empty().any() {
                let place = group
                    .match_empty_or_tombstone()
                    .first_set()
                    .expect("a group with an EMPTY lane always has an empty-or-tombstone lane");
                let slot = probe.pos + place;
                self.ctrl.set(slot, tag);
                self.entries.write(slot, (key, value));
                self.count += 1;
                self.maybe_grow();
                return true;
            }
            probe.advance(capacity, &reducer);
        }
    }

    /// `Update`: overwrites only if `key` is already present (§4.7).
    pub(crate) fn update(&mut self, key: K, value: V) -> bool {
        let hash = self.hash_of(&key);
        match self.find_slot(hash, tag_of(hash), &key) {
            Some(slot) => {
                self.entries.write(slot, (key, value));
                true
            }
            None => false,
        }
    }

    /// `Remove` (Map/Set only — `Index` does not support it, §1).
    pub(crate) fn remove(&mut self, key: &K) -> Option<V> {
        let hash = self.hash_of(key);
        let slot = self.find_slot(hash, tag_of(hash), key)?;
        let value = self.entries.get(slot).1;
        self.ctrl.set(slot, super::tag::TOMBSTONE);
        self.count -= 1;
        Some(value)
    }

    /// Engine-level unique insert (§4.5, §9): skips the duplicate-equality
    /// scan entirely, trusting the caller that `key` is absent. No facade
    /// operation exposes this — every `Map`/`Set`/`Index` public method
    /// must report whether the key already existed, which this path cannot
    /// do — but it is kept as the engine capability the spec describes,
    /// gated by a debug-only duplicate check per §9's open question ("debug
    /// build rather than silent corruption").
    #[allow(dead_code)]
    pub(crate) fn insert_unique_unchecked(&mut self, key: K, value: V) {
        let hash = self.hash_of(&key);
        debug_assert!(
            self.find_slot(hash, tag_of(hash), &key).is_none(),
            "{}",
            SimdHashError::DuplicateUniqueInsert
        );
        let tag = tag_of(hash);
        let capacity = self.ctrl.capacity();
        let reducer = self.reducer();
        let mut probe = ProbeState::new(reducer.reduce(hash, capacity));
        loop {
            let group = self.ctrl.group_at(probe.pos, self.config.bfix);
            if let Some(bit) = group.match_empty_or_tombstone().first_set() {
                let slot = probe.pos + bit;
                self.ctrl.set(slot, tag);
                self.entries.write(slot, (key, value));
                self.count += 1;
                self.maybe_grow();
                return;
            }
            probe.advance(capacity, &reducer);
        }
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

    /// `Resize` (§4.7): explicit capacity request. Under `ResizeOnlyEmpty`
    /// the table must be empty (§4.4), a `PreconditionViolation` otherwise.
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
            "resizing simd-hash table"
        );
        if self.count == 0 {
            self.ctrl = TagArray::new(new_capacity);
            self.entries = PagedArray::new();
            self.entries.grow_to(new_capacity);
            self.multiplier = multiplier_for(new_capacity);
            return;
        }
        self.reshuffle_grow(new_capacity);
    }

    /// In-place cuckoo-style reshuffle (§4.5): no second entry buffer.
    /// Reuses the *old* control array's own bytes as the "already consumed"
    /// marker — once an old slot's entry has been read out and relocated
    /// (or evicted into), its old-control byte is cleared to `EMPTY` — so a
    /// later collision at that same physical storage index never mistakes
    /// stale-but-unread old data for free space (§9: "the function must
    /// tolerate the partially-rebuilt state because the in-place scheme
    /// overwrites the same storage it is reading").
    fn reshuffle_grow(&mut self, new_capacity: usize) {
        let old_capacity = self.ctrl.capacity();
        debug_assert!(new_capacity > old_capacity);
        let mut old_ctrl = std::mem::replace(&mut self.ctrl, TagArray::new(new_capacity));
        self.entries.grow_to(new_capacity);
        let new_multiplier = multiplier_for(new_capacity);
        let reducer = Reducer::for_mode(self.config.mode, new_multiplier);

        for i in 0..old_capacity {
            let byte = old_ctrl.get(i);
            if byte & 0x80 != 0 {
                continue; // not live old data: never occupied, or already relocated
            }
            old_ctrl.set(i, EMPTY);
            let mut carry = self.entries.read(i);
            let mut carry_tag = byte;
            loop {
                let hash = self.hash_of(&carry.0);
                let dest = find_empty_slot(&self.ctrl, new_capacity, &reducer, self.config.bfix, hash);
                if dest < old_capacity {
                    let dest_byte = old_ctrl.get(dest);
                    if dest_byte & 0x80 == 0 {
                        // Still-unread old data occupies this storage slot —
                        // evict it before writing, then keep placing it.
                        old_ctrl.set(dest, EMPTY);
                        let displaced = self.entries.read(dest);
                        self.ctrl.set(dest, carry_tag);
                        self.entries.write(dest, carry);
                        carry = displaced;
                        carry_tag = dest_byte;
                        continue;
                    }
                }
                self.ctrl.set(dest, carry_tag);
                self.entries.write(dest, carry);
                break;
            }
        }

        self.multiplier = new_multiplier;
    }

    /// `Clear` (§4.5): refills control bytes with `EMPTY` and resets
    /// `Count`; entries are left untouched since only control bytes gate
    /// reachability. If `size_hint` differs from the current capacity, the
    /// control and entry storage is freed and reallocated at the new size
    /// instead.
    pub(crate) fn clear(&mut self, size_hint: Option<usize>) {
        if let Some(hint) = size_hint {
            let new_capacity = adjust_capacity(hint, self.config.mode, self.config.max_load_factor);
            if new_capacity != self.ctrl.capacity() {
                self.ctrl = TagArray::new(new_capacity);
                self.entries = PagedArray::new();
                self.entries.grow_to(new_capacity);
                self.multiplier = multiplier_for(new_capacity);
                self.count = 0;
                return;
            }
        }
        self.ctrl.reset();
        self.count = 0;
    }

    pub(crate) fn iter(&self) -> super::iter::SparseIter<'_, K, V> {
        super::iter::SparseIter::new(&self.ctrl, &self.entries, self.config.bfix)
    }
}
