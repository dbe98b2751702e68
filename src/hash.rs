// Default hash convenience (§6: "A default hash ... is provided as a
// convenience but is not part of the core contract"). The engine itself is
// generic over any `S: BuildHasher`; this module supplies one so integer
// keys work out of the box, in the multiplicative-mixing style §6 names.

use std::hash::{BuildHasher, Hasher};

/// Multiplicative-mixing hasher (splitmix64 finisher) for integer-heavy
/// keys. Quality requirement from §6: both the top 7 bits (used as the
/// occupied tag) and the low bits (used as the bucket coordinate) must be
/// well mixed — splitmix64's finisher satisfies both.
#[derive(Clone, Copy, Debug, Default)]
pub struct MulHasher(u64);

impl Hasher for MulHasher {
    #[inline]
    fn finish(&self) -> u64 {
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }

    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        for chunk in bytes.chunks(8) {
            let mut buf = [0u8; 8];
            buf[..chunk.len()].copy_from_slice(chunk);
            self.write_u64(u64::from_le_bytes(buf));
        }
    }

    #[inline]
    fn write_u64(&mut self, i: u64) {
        self.0 = self
            .0
            .rotate_left(17)
            .wrapping_add(i.wrapping_mul(0x9E37_79B9_7F4A_7C15));
    }

    #[inline]
    fn write_u32(&mut self, i: u32) {
        self.write_u64(i as u64);
    }

    #[inline]
    fn write_u8(&mut self, i: u8) {
        self.write_u64(i as u64);
    }

    #[inline]
    fn write_usize(&mut self, i: usize) {
        self.write_u64(i as u64);
    }
}

/// `BuildHasher` for [`MulHasher`]. Seeded per instance with `fastrand`
/// (matching the teacher's per-table seeding of its swiss table, see
/// `src/index/swiss_table.rs`'s `seed: fastrand::u64(..)`) so that distinct
/// tables don't share probe-sequence collision patterns.
#[derive(Clone, Debug)]
pub struct MulBuildHasher {
    seed: u64,
}

impl MulBuildHasher {
    pub fn new() -> Self {
        MulBuildHasher {
            seed: fastrand::u64(..),
        }
    }
}

impl Default for MulBuildHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl BuildHasher for MulBuildHasher {
    type Hasher = MulHasher;

    #[inline]
    fn build_hasher(&self) -> MulHasher {
        MulHasher(self.seed)
    }
}
