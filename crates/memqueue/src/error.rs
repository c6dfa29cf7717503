//! Error and status types for queue operations.

use thiserror::Error;

/// Outcome of a successful [`read`](crate::MemQueue::read).
///
/// Reading an empty queue is not an error: it is a defined no-op that leaves
/// both the queue and the output buffer untouched.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReadStatus {
    /// The queue was empty. Nothing was copied.
    Empty,
    /// One entry was copied into the output buffer.
    Data,
}

impl ReadStatus {
    /// Returns `true` if an entry was copied out.
    #[inline]
    pub fn is_data(&self) -> bool {
        matches!(self, Self::Data)
    }

    /// Integer status code (`0` for empty, `1` for data).
    pub const fn code(&self) -> i32 {
        match self {
            Self::Empty => 0,
            Self::Data => 1,
        }
    }
}

/// Errors that can occur in queue operations.
///
/// A rejected operation never changes the queue: indices and storage are
/// exactly as they were before the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum QueueError {
    /// A required buffer (storage, entry, or output) was not provided.
    #[error("required buffer was not provided")]
    NullInput,

    /// The storage cannot be divided into a whole, non-zero number of entries.
    #[error("storage of {storage_len} bytes does not hold a whole number of {entry_size}-byte entries")]
    InvalidLength {
        entry_size: usize,
        storage_len: usize,
    },

    /// An entry or output buffer does not match the queue's entry size.
    #[error("buffer of {actual} bytes does not fit {expected}-byte entries")]
    EntryLength { expected: usize, actual: usize },

    /// The queue has no free slot.
    #[error("queue is full")]
    Full,
}

impl QueueError {
    /// Returns `true` if the operation may succeed when retried later.
    #[inline]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Full)
    }

    /// Integer status code, negative for every error.
    pub const fn code(&self) -> i32 {
        match self {
            Self::Full => -1,
            Self::InvalidLength { .. } | Self::EntryLength { .. } => -2,
            Self::NullInput => -3,
        }
    }
}
