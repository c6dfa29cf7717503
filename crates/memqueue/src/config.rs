use crate::QueueError;

/// Entry geometry for a [`MemQueue`](crate::MemQueue).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Bytes per entry (must be > 0)
    pub entry_size: usize,
}

impl Config {
    /// Creates a configuration for entries of `entry_size` bytes.
    pub const fn new(entry_size: usize) -> Self {
        Self { entry_size }
    }

    /// Creates a configuration whose entries hold exactly one `T`.
    pub const fn for_type<T>() -> Self {
        Self::new(std::mem::size_of::<T>())
    }

    /// Returns the storage length in bytes needed for `slots` slots.
    ///
    /// Remember that one slot is always kept free: `slots` slots hold
    /// `slots - 1` entries.
    ///
    /// The product is not checked: it panics on overflow in debug builds and
    /// wraps in release builds. Use [`checked_storage_len`](Self::checked_storage_len)
    /// when `slots` comes from untrusted input.
    #[inline]
    pub const fn storage_len(&self, slots: usize) -> usize {
        self.entry_size * slots
    }

    /// Like [`storage_len`](Self::storage_len), but returns `None` if the
    /// byte count does not fit in a `usize`.
    #[inline]
    pub const fn checked_storage_len(&self, slots: usize) -> Option<usize> {
        self.entry_size.checked_mul(slots)
    }

    /// Returns the number of slots `storage_len` bytes provide.
    pub fn slots(&self, storage_len: usize) -> Result<usize, QueueError> {
        if self.entry_size == 0 || storage_len == 0 || storage_len % self.entry_size != 0 {
            return Err(QueueError::InvalidLength {
                entry_size: self.entry_size,
                storage_len,
            });
        }
        Ok(storage_len / self.entry_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_type() {
        assert_eq!(Config::for_type::<u32>().entry_size, 4);
        assert_eq!(Config::for_type::<[u64; 3]>().entry_size, 24);
    }

    #[test]
    fn test_storage_len_and_slots_agree() {
        let config = Config::new(12);
        let len = config.storage_len(16);
        assert_eq!(len, 192);
        assert_eq!(config.slots(len), Ok(16));
    }

    #[test]
    fn test_checked_storage_len_overflow() {
        assert_eq!(Config::new(4).checked_storage_len(16), Some(64));
        assert_eq!(Config::new(usize::MAX).checked_storage_len(1), Some(usize::MAX));
        assert_eq!(Config::new(usize::MAX).checked_storage_len(2), None);
        assert_eq!(Config::new(usize::MAX / 2 + 1).checked_storage_len(2), None);
    }

    #[test]
    fn test_slots_rejects_bad_geometry() {
        let bad = |entry_size, storage_len| QueueError::InvalidLength {
            entry_size,
            storage_len,
        };
        assert_eq!(Config::new(4).slots(0), Err(bad(4, 0)));
        assert_eq!(Config::new(4).slots(65), Err(bad(4, 65)));
        assert_eq!(Config::new(0).slots(64), Err(bad(0, 64)));
        assert_eq!(Config::new(1).slots(1), Ok(1));
    }
}
