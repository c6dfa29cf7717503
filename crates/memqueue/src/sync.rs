//! Atomic types used for the queue indices, and slot access tracking.
//!
//! Under the `loom` feature the indices resolve to loom's model-checked
//! atomics, and every slot copy runs inside a loom `UnsafeCell` access for
//! that slot. Loom then checks that each read of a slot happens-after the
//! write it observes (and each overwrite happens-after the previous read),
//! which is exactly what the head/tail Release/Acquire pairs must provide.
//! Without the feature, `SlotAccess` is zero-sized and just runs the copy.

#[cfg(feature = "loom")]
pub(crate) use loom::sync::atomic::{AtomicUsize, Ordering};

#[cfg(not(feature = "loom"))]
pub(crate) use std::sync::atomic::{AtomicUsize, Ordering};

/// Per-slot access tracking for loom models.
#[cfg(feature = "loom")]
pub(crate) struct SlotAccess {
    cells: Box<[loom::cell::UnsafeCell<()>]>,
}

#[cfg(feature = "loom")]
impl SlotAccess {
    pub(crate) fn new(slots: usize) -> Self {
        Self {
            cells: (0..slots).map(|_| loom::cell::UnsafeCell::new(())).collect(),
        }
    }

    /// Runs the producer's copy into `slot` as a tracked mutable access.
    #[inline]
    pub(crate) fn write<R>(&self, slot: usize, copy: impl FnOnce() -> R) -> R {
        self.cells[slot].with_mut(|_| copy())
    }

    /// Runs the consumer's copy out of `slot` as a tracked shared access.
    #[inline]
    pub(crate) fn read<R>(&self, slot: usize, copy: impl FnOnce() -> R) -> R {
        self.cells[slot].with(|_| copy())
    }
}

#[cfg(not(feature = "loom"))]
pub(crate) struct SlotAccess;

#[cfg(not(feature = "loom"))]
impl SlotAccess {
    #[inline]
    pub(crate) fn new(_slots: usize) -> Self {
        Self
    }

    #[inline(always)]
    pub(crate) fn write<R>(&self, _slot: usize, copy: impl FnOnce() -> R) -> R {
        copy()
    }

    #[inline(always)]
    pub(crate) fn read<R>(&self, _slot: usize, copy: impl FnOnce() -> R) -> R {
        copy()
    }
}
