//! The probing engine (§4): control bytes, capacity policy, paged entry
//! storage, and the `Add`/`Find`/`Remove`/`Resize` operations the
//! `Map`/`Set`/`Index` facades are built on. Nothing here is public API —
//! `crate::map`, `crate::set` and `crate::index` are the surface.

pub(crate) mod capacity;
pub(crate) mod core;
pub(crate) mod entry;
pub(crate) mod index_core;
pub(crate) mod iter;
pub(crate) mod tag;
pub(crate) mod tag_array;

pub use capacity::CapacityMode;

/// The configuration surface §6 enumerates: growth mode, the software
/// trailing-zero-count fallback switch, and the growth threshold.
#[derive(Clone, Copy, Debug)]
pub struct SimdHashConfig {
    pub mode: CapacityMode,
    /// Selects the software trailing-zero-count cascade over the hardware
    /// instruction; for targets without a TZCNT-equivalent.
    pub bfix: bool,
    /// Growth trigger threshold, `N reaches ⌊C · max_load_factor⌋` (§3).
    /// Must lie in `[0.75, 0.99]`.
    pub max_load_factor: f64,
}

impl Default for SimdHashConfig {
    fn default() -> Self {
        SimdHashConfig {
            mode: CapacityMode::Fast,
            bfix: false,
            max_load_factor: 0.9766,
        }
    }
}

impl SimdHashConfig {
    pub(crate) fn validate(&self) {
        assert!(
            (0.75..=0.99).contains(&self.max_load_factor),
            "max_load_factor {} out of range [0.75, 0.99]",
            self.max_load_factor
        );
    }
}
