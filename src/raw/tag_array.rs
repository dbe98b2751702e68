// Aligned control-byte storage (§4.2 TagArray).

use std::alloc::{alloc, dealloc, handle_alloc_error, Layout};
use std::ptr::NonNull;

use super::tag::{Group, EMPTY, FORBIDDEN, GROUP};

/// Alignment wide enough for any supported group width (64 bytes, per §4.2
/// and §5 "aligned allocation with 64-byte alignment").
const ALIGN: usize = 64;

/// One aligned allocation of `capacity + GROUP` control bytes: `capacity`
/// live slots followed by one group of `FORBIDDEN` sentinels, so an
/// unaligned group load at any slot index in `[0, capacity)` only ever
/// reads valid control bytes (§3 invariant 1).
pub(crate) struct TagArray {
    ptr: NonNull<u8>,
    capacity: usize,
}

// `TagArray` owns a plain byte buffer with no interior aliasing; safe to
// move across threads even though the engine itself is single-threaded.
unsafe impl Send for TagArray {}
unsafe impl Sync for TagArray {}

impl TagArray {
    fn layout(capacity: usize) -> Layout {
        Layout::from_size_align(capacity + GROUP, ALIGN).expect("control array layout overflow")
    }

    /// Allocates fresh storage for `capacity` slots, sets `[0, capacity)` to
    /// `EMPTY` and the trailing group to `FORBIDDEN`.
    pub(crate) fn new(capacity: usize) -> Self {
        let layout = Self::layout(capacity);
        let raw = unsafe { alloc(layout) };
        let ptr = match NonNull::new(raw) {
            Some(p) => p,
            None => handle_alloc_error(layout),
        };
        let array = TagArray { ptr, capacity };
        unsafe {
            std::ptr::write_bytes(array.ptr.as_ptr(), EMPTY, capacity);
            std::ptr::write_bytes(array.ptr.as_ptr().add(capacity), FORBIDDEN, GROUP);
        }
        array
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub(crate) fn as_slice(&self) -> &[u8] {
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.capacity + GROUP) }
    }

    #[inline]
    pub(crate) fn get(&self, index: usize) -> u8 {
        debug_assert!(index < self.capacity);
        unsafe { *self.ptr.as_ptr().add(index) }
    }

    #[inline]
    pub(crate) fn set(&mut self, index: usize, tag: u8) {
        debug_assert!(index < self.capacity);
        unsafe {
            *self.ptr.as_ptr().add(index) = tag;
        }
    }

    /// Loads the group of `GROUP` control bytes starting at `index`.
    #[inline]
    pub(crate) fn group_at(&self, index: usize, bfix: bool) -> Group {
        debug_assert!(index < self.capacity);
        Group::load(&self.as_slice()[index..], bfix)
    }

    /// Refills every live slot with `EMPTY`, used by `Clear` when the
    /// capacity is unchanged.
    pub(crate) fn reset(&mut self) {
        unsafe {
            std::ptr::write_bytes(self.ptr.as_ptr(), EMPTY, self.capacity);
        }
    }
}

impl Drop for TagArray {
    fn drop(&mut self) {
        let layout = Self::layout(self.capacity);
        unsafe {
            dealloc(self.ptr.as_ptr(), layout);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_initializes_empty_and_sentinel() {
        let arr = TagArray::new(32);
        assert_eq!(arr.capacity(), 32);
        for i in 0..32 {
            assert_eq!(arr.get(i), EMPTY);
        }
        let slice = arr.as_slice();
        for &b in &slice[32..32 + GROUP] {
            assert_eq!(b, FORBIDDEN);
        }
    }

    #[test]
    fn set_and_get_roundtrip() {
        let mut arr = TagArray::new(32);
        arr.set(5, 0x2A);
        assert_eq!(arr.get(5), 0x2A);
    }

    #[test]
    fn reset_restores_empty_without_touching_sentinel() {
        let mut arr = TagArray::new(32);
        arr.set(0, 0x01);
        arr.set(31, 0x02);
        arr.reset();
        for i in 0..32 {
            assert_eq!(arr.get(i), EMPTY);
        }
        assert_eq!(arr.as_slice()[32], FORBIDDEN);
    }

    #[test]
    fn unaligned_group_load_reads_into_sentinel_safely() {
        let arr = TagArray::new(20);
        // index 15 + GROUP(16) = 31, spilling into the sentinel padding at [20, 36).
        let group = arr.group_at(15, false);
        assert!(group.match_byte(FORBIDDEN).any());
    }
}
