// Fatal-condition taxonomy (§7).
//
// Lookup misses and duplicate inserts are *not* represented here — per §7
// they are recoverable and signaled exclusively by `bool`/`Option` return
// values from `Map`/`Set`/`Index`. `SimdHashError` exists only to give the
// two genuinely fatal conditions (`PreconditionViolation`,
// `AllocationFailure`) a named payload for the panic that aborts on them,
// rather than an ad hoc string; allocation failure itself is raised by
// `std::alloc::handle_alloc_error` and never reaches this enum.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimdHashError {
    #[error("requested capacity {requested} exceeds MAX_SIZE ({max})")]
    CapacityExceeded { requested: usize, max: usize },

    #[error("Resize called on a non-empty table under ResizeOnlyEmpty mode ({count} entries present)")]
    ResizeOnlyEmptyViolation { count: usize },

    #[error(
        "insert under ResizeOnlyEmpty mode would exceed the fixed capacity's load-factor threshold ({count} entries, threshold {threshold})"
    )]
    FixedCapacityExceeded { count: usize, threshold: usize },

    #[error("unique insert path found the key already present, violating its no-duplicates precondition")]
    DuplicateUniqueInsert,
}
