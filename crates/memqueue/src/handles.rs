//! Producer and consumer halves of a split [`MemQueue`].
//!
//! Each half owns exactly one index: the [`Producer`] is the only code that
//! ever advances `head`, the [`Consumer`] the only code that advances `tail`.
//! Neither half is `Clone`, and both borrow the queue mutably through
//! [`MemQueue::split`], so a second producer or consumer cannot exist.

use crate::{MemQueue, QueueError, ReadStatus};
use bytemuck::Pod;

/// Write half of a [`MemQueue`]. Send it to the producer thread.
#[derive(Debug)]
pub struct Producer<'q, 'a> {
    queue: &'q MemQueue<'a>,
}

impl<'q, 'a> Producer<'q, 'a> {
    pub(crate) fn new(queue: &'q MemQueue<'a>) -> Self {
        Self { queue }
    }

    /// Copies one entry into the queue.
    ///
    /// See [`MemQueue::write`]. Returns [`QueueError::Full`] immediately if
    /// there is no free slot; retrying is up to the caller.
    #[inline]
    pub fn write<'e>(&mut self, entry: impl Into<Option<&'e [u8]>>) -> Result<(), QueueError> {
        // SAFETY: this handle is the only producer; `split` hands out one.
        unsafe { self.queue.push_entry(entry.into()) }
    }

    /// Copies `value` into the queue as one entry.
    #[inline]
    pub fn write_value<T: Pod>(&mut self, value: &T) -> Result<(), QueueError> {
        self.write(bytemuck::bytes_of(value))
    }

    /// Returns true if the next write would be rejected.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.queue.is_full()
    }

    /// Snapshot of the number of queued entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Snapshot of whether the queue is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Returns the entry size in bytes.
    #[inline]
    pub fn entry_size(&self) -> usize {
        self.queue.entry_size()
    }
}

/// Read half of a [`MemQueue`]. Send it to the consumer thread.
#[derive(Debug)]
pub struct Consumer<'q, 'a> {
    queue: &'q MemQueue<'a>,
}

impl<'q, 'a> Consumer<'q, 'a> {
    pub(crate) fn new(queue: &'q MemQueue<'a>) -> Self {
        Self { queue }
    }

    /// Copies the oldest entry into `output`.
    ///
    /// See [`MemQueue::read`]. `Ok(ReadStatus::Empty)` means nothing was
    /// available and `output` was left untouched.
    #[inline]
    pub fn read<'o>(
        &mut self,
        output: impl Into<Option<&'o mut [u8]>>,
    ) -> Result<ReadStatus, QueueError> {
        // SAFETY: this handle is the only consumer; `split` hands out one.
        unsafe { self.queue.pop_entry(output.into()) }
    }

    /// Reads the oldest entry as a `T`, or `None` if the queue is empty.
    #[inline]
    pub fn read_value<T: Pod>(&mut self) -> Result<Option<T>, QueueError> {
        // SAFETY: this handle is the only consumer; `split` hands out one.
        unsafe { self.queue.pop_value() }
    }

    /// Snapshot of whether the queue is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Snapshot of the number of queued entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns the entry size in bytes.
    #[inline]
    pub fn entry_size(&self) -> usize {
        self.queue.entry_size()
    }
}
