//! Debug assertion macros for queue invariants.
//!
//! Only active in debug builds (`debug_assert!`), so release builds pay
//! nothing for them.

/// Assert that an index addresses a slot inside the storage.
///
/// **Invariant**: `0 ≤ index < capacity`
///
/// Used in: `push_entry()` for head, `pop_entry()` for tail
macro_rules! debug_assert_index_in_bounds {
    ($name:literal, $index:expr, $capacity:expr) => {
        debug_assert!(
            $index < $capacity,
            "{} index {} out of bounds for capacity {}",
            $name,
            $index,
            $capacity
        )
    };
}

/// Assert that the geometry divides the storage into whole slots.
///
/// **Invariant**: `storage_len == entry_size * capacity`, `capacity ≥ 1`
///
/// Used in: `MemQueue::init()` after validation
macro_rules! debug_assert_geometry {
    ($entry_size:expr, $capacity:expr, $storage_len:expr) => {
        debug_assert!(
            $capacity >= 1 && $entry_size * $capacity == $storage_len,
            "geometry violated: {} slots of {} bytes in {} bytes of storage",
            $capacity,
            $entry_size,
            $storage_len
        )
    };
}

/// Assert that a publish moves an index exactly one slot forward.
///
/// **Invariant**: `next == (index + 1) mod capacity`
///
/// Used in: `push_entry()` and `pop_entry()` before the Release store
macro_rules! debug_assert_single_step {
    ($name:literal, $index:expr, $next:expr, $capacity:expr) => {
        debug_assert!(
            $next == ($index + 1) % $capacity,
            "{} stepped from {} to {} with capacity {}",
            $name,
            $index,
            $next,
            $capacity
        )
    };
}

pub(crate) use debug_assert_geometry;
pub(crate) use debug_assert_index_in_bounds;
pub(crate) use debug_assert_single_step;
