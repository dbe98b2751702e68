// Capacity sizing policy (§4.4) and the two bucket-index reduction
// functions the probing engine selects between (§4.4, §4.5).

use super::entry::PAGE_SIZE;

/// Lower bound on capacity, in control slots (§3).
pub const MIN_SIZE: usize = 4096;
/// Upper bound on capacity (§3).
pub const MAX_SIZE: usize = 1 << 31;

const SAVE_MEMORY_THRESHOLD: usize = 16 * 1024 * 1024;

/// Growth mode, selecting among the five sizing strategies of §4.4.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CapacityMode {
    /// Next power of two; index reduction is `h & (C - 1)`.
    Fast,
    /// Same sizing as `Fast`, but reduces via the multiplicative high-word
    /// path instead of masking (useful when the caller wants a uniform
    /// reduction strategy across modes).
    FastDivMod,
    /// Finer-grained sizes above 16 MiB entries, `k = 2`.
    SaveMemoryFast,
    /// Finer-grained sizes above 16 MiB entries, `k = 4`.
    SaveMemoryOpt,
    /// Finer-grained sizes above 16 MiB entries, `k` scaling with table
    /// size once the power-of-two target exceeds 64 MiB entries.
    SaveMemoryMax,
    /// Caller-sized once, at an empty table; any subsequent growth is a
    /// precondition violation.
    ResizeOnlyEmpty,
}

impl Default for CapacityMode {
    fn default() -> Self {
        CapacityMode::Fast
    }
}

impl CapacityMode {
    /// Whether this mode reduces bucket indices via masking (`Fast`) or via
    /// the multiplicative high-word path (everything else, §4.4).
    pub(crate) fn uses_mask_reduction(self) -> bool {
        matches!(self, CapacityMode::Fast)
    }
}

/// §9 open question: the source's `RoundUpToPowerOf2` relies on a
/// high-bit-count intrinsic with undefined behavior at 0 and 1; here `0`
/// and `1` both explicitly round up to `MIN_SIZE`; asking for `0` directly
/// is not expected from a caller (callers request a capacity hint derived
/// from an element count, never a raw probe index), but the function must
/// not panic or read uninitialized intrinsic output if it happens anyway.
fn round_up_pow2(n: usize) -> usize {
    if n <= 1 {
        return MIN_SIZE;
    }
    n.next_power_of_two()
}

fn round_up_to_multiple(n: usize, multiple: usize) -> usize {
    ((n + multiple - 1) / multiple) * multiple
}

/// Searches for the smallest `P/2 + (P/2) * i / k`, `i` in `1..k`, that is
/// both `>= requested` and a multiple of the entry page size, falling back
/// to the full power-of-two target `P` if none qualifies (§4.4).
fn save_memory(requested: usize, k: usize) -> usize {
    let target = round_up_pow2(requested).max(MIN_SIZE);
    if target <= SAVE_MEMORY_THRESHOLD {
        return target.min(MAX_SIZE);
    }
    let half = target / 2;
    for i in 1..k {
        let candidate = round_up_to_multiple(half + (half * i) / k, PAGE_SIZE);
        if candidate >= requested {
            return candidate.min(MAX_SIZE);
        }
    }
    target.min(MAX_SIZE)
}

/// `k` for `SaveMemoryMax`: fixed at 8 below 64 MiB entries, scaling with
/// table size above it (§4.4: "k itself scales with P/1MiB ÷ 128 once
/// P > 64 MiB").
fn save_memory_max_k(power_of_two_target: usize) -> usize {
    const SIXTY_FOUR_MIB: usize = 64 * 1024 * 1024;
    const ONE_MIB: usize = 1024 * 1024;
    if power_of_two_target <= SIXTY_FOUR_MIB {
        8
    } else {
        ((power_of_two_target / ONE_MIB) / 128).max(8)
    }
}

/// Maps a requested element-count hint to an actual capacity under `mode`
/// (§4.4). `max_load_factor` is only consulted by `ResizeOnlyEmpty`.
///
/// # Panics
/// If `requested` would require a capacity beyond `MAX_SIZE` (fatal
/// `PreconditionViolation`, §7).
pub(crate) fn adjust_capacity(requested: usize, mode: CapacityMode, max_load_factor: f64) -> usize {
    let capacity = match mode {
        CapacityMode::Fast | CapacityMode::FastDivMod => {
            round_up_pow2(requested).max(MIN_SIZE)
        }
        CapacityMode::SaveMemoryFast => save_memory(requested, 2),
        CapacityMode::SaveMemoryOpt => save_memory(requested, 4),
        CapacityMode::SaveMemoryMax => {
            let target = round_up_pow2(requested).max(MIN_SIZE);
            save_memory(requested, save_memory_max_k(target))
        }
        CapacityMode::ResizeOnlyEmpty => {
            let raw = (requested as f64 / max_load_factor).ceil() as usize;
            round_up_to_multiple(raw.max(MIN_SIZE), PAGE_SIZE)
        }
    };
    assert!(
        capacity <= MAX_SIZE,
        "requested capacity {requested} under {mode:?} exceeds MAX_SIZE ({MAX_SIZE})"
    );
    capacity
}

/// `h & (C - 1)`, valid only when `C` is a power of two (`Fast`).
#[inline]
pub(crate) fn adjust_index_mask(h: u64, capacity: usize) -> usize {
    debug_assert!(capacity.is_power_of_two());
    (h as usize) & (capacity - 1)
}

/// `⌈2⁶⁴ / C⌉`, the multiplier the high-word reduction uses in place of a
/// division on every probe (§4.4).
#[inline]
pub(crate) fn multiplier_for(capacity: usize) -> u64 {
    let capacity = capacity as u128;
    (((1u128 << 64) + capacity - 1) / capacity) as u64
}

/// Reduces `h` into `[0, capacity)` via the high-word of `h * multiplier`,
/// where `multiplier = multiplier_for(capacity)`. Surjective onto
/// `[0, capacity)` by construction, satisfying the probe sequence's
/// full-coverage requirement (§4.5) for any capacity, not just powers of
/// two.
#[inline]
pub(crate) fn adjust_index_mul(h: u64, capacity: usize, multiplier: u64) -> usize {
    let product = (h as u128) * (multiplier as u128);
    ((product >> 64) as usize) % capacity
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fast_mode_rounds_to_power_of_two() {
        assert_eq!(adjust_capacity(4000, CapacityMode::Fast, 0.9766), 4096);
        assert_eq!(adjust_capacity(4097, CapacityMode::Fast, 0.9766), 8192);
        assert_eq!(adjust_capacity(0, CapacityMode::Fast, 0.9766), MIN_SIZE);
    }

    #[test]
    fn save_memory_below_threshold_matches_fast() {
        assert_eq!(
            adjust_capacity(4000, CapacityMode::SaveMemoryFast, 0.9766),
            4096
        );
    }

    #[test]
    fn save_memory_above_threshold_is_page_aligned_and_not_larger_than_fast() {
        let requested = 20 * 1024 * 1024;
        let fast = adjust_capacity(requested, CapacityMode::Fast, 0.9766);
        let save = adjust_capacity(requested, CapacityMode::SaveMemoryOpt, 0.9766);
        assert!(save >= requested);
        assert!(save <= fast);
        assert_eq!(save % PAGE_SIZE, 0);
    }

    #[test]
    fn resize_only_empty_respects_load_factor() {
        let cap = adjust_capacity(4000, CapacityMode::ResizeOnlyEmpty, 0.9766);
        assert!((cap as f64 * 0.9766) >= 4000.0);
        assert_eq!(cap % PAGE_SIZE, 0);
    }

    #[test]
    fn mask_reduction_covers_full_range() {
        let capacity = 4096;
        for h in [0u64, 1, u64::MAX, 0xDEAD_BEEF] {
            let idx = adjust_index_mask(h, capacity);
            assert!(idx < capacity);
        }
    }

    #[test]
    fn mul_reduction_covers_full_range_for_non_power_of_two() {
        let capacity = 4099usize; // not a power of two
        let multiplier = multiplier_for(capacity);
        for h in [0u64, 1, u64::MAX, 0xDEAD_BEEF, 12345] {
            let idx = adjust_index_mul(h, capacity, multiplier);
            assert!(idx < capacity);
        }
    }

    #[test]
    #[should_panic]
    fn over_max_size_panics() {
        adjust_capacity(MAX_SIZE + 1, CapacityMode::Fast, 0.9766);
    }
}
