use crate::handles::{Consumer, Producer};
use crate::invariants::{
    debug_assert_geometry, debug_assert_index_in_bounds, debug_assert_single_step,
};
use crate::sync::{AtomicUsize, Ordering, SlotAccess};
use crate::{Config, QueueError, ReadStatus};
use bytemuck::Pod;
use crossbeam_utils::CachePadded;
use std::fmt;
use std::marker::PhantomData;
use std::ptr;

// =============================================================================
// MEMORY ORDERING & SYNCHRONIZATION STRATEGY
// =============================================================================
//
// `head` and `tail` are slot indices in `0..capacity`, wrapped with modulo on
// every advance. One slot is always left free, so:
//   - empty ⟺ head == tail
//   - full  ⟺ (head + 1) % capacity == tail
//
// **Producer (write path):**
// 1. Load `head` with Relaxed (only the producer stores head)
// 2. Load `tail` with Acquire (the consumer has finished copying out any
//    slot it released, so it is safe to overwrite)
// 3. Reject if full - nothing has been touched yet
// 4. Copy the entry into slot `head`
// 5. Store `head + 1` with Release (publishes the entry bytes)
//
// **Consumer (read path):**
// 1. Load `tail` with Relaxed (only the consumer stores tail)
// 2. Load `head` with Acquire (synchronizes with the producer's Release, so
//    the entry bytes are visible)
// 3. Return Empty if head == tail - nothing has been touched
// 4. Copy slot `tail` into the output buffer
// 5. Store `tail + 1` with Release (hands the slot back to the producer)
//
// The entry copy always completes before the index store that publishes it,
// and the full/empty check always precedes the copy.
//
// =============================================================================

/// Fixed-entry SPSC queue over caller-supplied storage.
///
/// The queue exclusively borrows its storage for `'a`; the caller reclaims it
/// when the queue (and any handles from [`split`](Self::split)) are dropped.
///
/// With `&mut self` the queue can be driven directly from one thread. To use
/// it from two threads, [`split`](Self::split) it into a [`Producer`] and a
/// [`Consumer`].
#[repr(C)]
pub struct MemQueue<'a> {
    /// Next slot to write (stored by producer, loaded by consumer)
    head: CachePadded<AtomicUsize>,
    /// Next slot to read (stored by consumer, loaded by producer)
    tail: CachePadded<AtomicUsize>,

    entry_size: usize,
    capacity: usize,

    storage: *mut u8,
    storage_len: usize,
    _storage: PhantomData<&'a mut [u8]>,

    /// Slot access tracking (zero-sized unless model checking)
    slots: SlotAccess,
}

// Safety: the only `&self` methods that touch storage or store an index are
// the crate-private `push_entry`/`pop_entry`, which are reached either through
// `&mut self` or through the single Producer/Consumer pair handed out by
// `split(&mut self)`. Each slot is owned by exactly one side at a time and
// ownership changes hands via the Release/Acquire index protocol above.
unsafe impl Send for MemQueue<'_> {}
unsafe impl Sync for MemQueue<'_> {}

impl<'a> MemQueue<'a> {
    /// Initializes a queue over `storage` with `entry_size`-byte entries.
    ///
    /// Fails with [`QueueError::NullInput`] if `storage` is absent and with
    /// [`QueueError::InvalidLength`] if its length is zero or not a multiple
    /// of `entry_size`. Storage contents are not touched.
    pub fn init(entry_size: usize, storage: Option<&'a mut [u8]>) -> Result<Self, QueueError> {
        let storage = storage.ok_or(QueueError::NullInput)?;
        let storage_len = storage.len();
        let capacity = Config::new(entry_size).slots(storage_len)?;

        debug_assert_geometry!(entry_size, capacity, storage_len);

        log::debug!(
            "memqueue initialized: {} slots of {} bytes ({} usable)",
            capacity,
            entry_size,
            capacity - 1
        );

        Ok(Self {
            head: CachePadded::new(AtomicUsize::new(0)),
            tail: CachePadded::new(AtomicUsize::new(0)),
            entry_size,
            capacity,
            storage: storage.as_mut_ptr(),
            storage_len,
            _storage: PhantomData,
            slots: SlotAccess::new(capacity),
        })
    }

    /// Initializes a queue over `storage` with `entry_size`-byte entries.
    pub fn new(entry_size: usize, storage: &'a mut [u8]) -> Result<Self, QueueError> {
        Self::init(entry_size, Some(storage))
    }

    /// Initializes a queue over `storage` using the geometry in `config`.
    pub fn with_config(config: Config, storage: &'a mut [u8]) -> Result<Self, QueueError> {
        Self::init(config.entry_size, Some(storage))
    }

    // ---------------------------------------------------------------------
    // GEOMETRY & STATUS
    // ---------------------------------------------------------------------

    /// Returns the configuration this queue was built with.
    #[inline]
    pub fn config(&self) -> Config {
        Config::new(self.entry_size)
    }

    /// Returns the entry size in bytes.
    #[inline]
    pub fn entry_size(&self) -> usize {
        self.entry_size
    }

    /// Returns the number of slots (one more than the usable capacity).
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the maximum number of entries the queue can hold at once.
    #[inline]
    pub fn usable_capacity(&self) -> usize {
        self.capacity - 1
    }

    /// Returns the length of the backing storage in bytes.
    #[inline]
    pub fn storage_len(&self) -> usize {
        self.storage_len
    }

    /// Returns the number of entries currently queued.
    ///
    /// While the two halves are running concurrently this is a snapshot.
    #[inline]
    pub fn len(&self) -> usize {
        let head = self.head.load(Ordering::Acquire);
        let tail = self.tail.load(Ordering::Acquire);
        (head + self.capacity - tail) % self.capacity
    }

    /// Returns true if the queue holds no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.head.load(Ordering::Acquire) == self.tail.load(Ordering::Acquire)
    }

    /// Returns true if the next write would be rejected with [`QueueError::Full`].
    #[inline]
    pub fn is_full(&self) -> bool {
        let head = self.head.load(Ordering::Acquire);
        self.next_index(head) == self.tail.load(Ordering::Acquire)
    }

    #[inline]
    fn next_index(&self, index: usize) -> usize {
        (index + 1) % self.capacity
    }

    /// Pointer to the first byte of slot `index`.
    ///
    /// # Safety
    ///
    /// `index` must be `< capacity`.
    #[inline]
    unsafe fn slot_ptr(&self, index: usize) -> *mut u8 {
        self.storage.add(index * self.entry_size)
    }

    // ---------------------------------------------------------------------
    // SINGLE-THREADED API
    // ---------------------------------------------------------------------

    /// Copies one entry into the queue.
    ///
    /// `entry` must be exactly [`entry_size`](Self::entry_size) bytes.
    /// Returns [`QueueError::Full`] without copying anything if no slot is
    /// free.
    pub fn write<'e>(&mut self, entry: impl Into<Option<&'e [u8]>>) -> Result<(), QueueError> {
        // SAFETY: `&mut self` rules out any live Producer or Consumer.
        unsafe { self.push_entry(entry.into()) }
    }

    /// Copies the oldest entry into `output`.
    ///
    /// `output` must hold at least [`entry_size`](Self::entry_size) bytes;
    /// only that prefix is written. Returns `Ok(ReadStatus::Empty)` and leaves
    /// `output` untouched if the queue is empty.
    pub fn read<'o>(
        &mut self,
        output: impl Into<Option<&'o mut [u8]>>,
    ) -> Result<ReadStatus, QueueError> {
        // SAFETY: `&mut self` rules out any live Producer or Consumer.
        unsafe { self.pop_entry(output.into()) }
    }

    /// Copies `value` into the queue as one entry.
    ///
    /// `size_of::<T>()` must equal the entry size.
    pub fn write_value<T: Pod>(&mut self, value: &T) -> Result<(), QueueError> {
        self.write(bytemuck::bytes_of(value))
    }

    /// Reads the oldest entry as a `T`, or `None` if the queue is empty.
    ///
    /// `size_of::<T>()` must equal the entry size.
    pub fn read_value<T: Pod>(&mut self) -> Result<Option<T>, QueueError> {
        // SAFETY: `&mut self` rules out any live Producer or Consumer.
        unsafe { self.pop_value() }
    }

    /// Splits the queue into its producer and consumer halves.
    ///
    /// The halves borrow the queue mutably, so no other access is possible
    /// until both are dropped.
    pub fn split(&mut self) -> (Producer<'_, 'a>, Consumer<'_, 'a>) {
        let queue: &Self = self;
        (Producer::new(queue), Consumer::new(queue))
    }

    // ---------------------------------------------------------------------
    // PROTOCOL (shared by the queue and its handles)
    // ---------------------------------------------------------------------

    /// Producer side of the protocol.
    ///
    /// # Safety
    ///
    /// The caller must be the only producer: no other `push_entry` call may
    /// run concurrently on this queue.
    pub(crate) unsafe fn push_entry(&self, entry: Option<&[u8]>) -> Result<(), QueueError> {
        let entry = entry.ok_or(QueueError::NullInput)?;
        if entry.len() != self.entry_size {
            return Err(QueueError::EntryLength {
                expected: self.entry_size,
                actual: entry.len(),
            });
        }

        let head = self.head.load(Ordering::Relaxed);
        let next = self.next_index(head);
        if next == self.tail.load(Ordering::Acquire) {
            return Err(QueueError::Full);
        }

        debug_assert_index_in_bounds!("head", head, self.capacity);

        // SAFETY:
        // 1. head < capacity, so the slot lies inside storage
        // 2. the slot is outside [tail, head), so the consumer is not reading it
        // 3. `entry` cannot alias storage, which is exclusively borrowed by the queue
        self.slots.write(head, || {
            ptr::copy_nonoverlapping(entry.as_ptr(), self.slot_ptr(head), self.entry_size);
        });

        debug_assert_single_step!("head", head, next, self.capacity);
        self.head.store(next, Ordering::Release);
        Ok(())
    }

    /// Consumer side of the protocol.
    ///
    /// # Safety
    ///
    /// The caller must be the only consumer: no other `pop_entry` call may
    /// run concurrently on this queue.
    pub(crate) unsafe fn pop_entry(
        &self,
        output: Option<&mut [u8]>,
    ) -> Result<ReadStatus, QueueError> {
        let output = output.ok_or(QueueError::NullInput)?;
        if output.len() < self.entry_size {
            return Err(QueueError::EntryLength {
                expected: self.entry_size,
                actual: output.len(),
            });
        }

        let tail = self.tail.load(Ordering::Relaxed);
        if tail == self.head.load(Ordering::Acquire) {
            return Ok(ReadStatus::Empty);
        }

        debug_assert_index_in_bounds!("tail", tail, self.capacity);

        // SAFETY:
        // 1. tail < capacity, so the slot lies inside storage
        // 2. the slot is inside [tail, head), fully written and published by
        //    the producer's Release store that our Acquire load observed
        // 3. the producer will not touch it until tail advances past it
        self.slots.read(tail, || {
            ptr::copy_nonoverlapping(self.slot_ptr(tail), output.as_mut_ptr(), self.entry_size);
        });

        let next = self.next_index(tail);
        debug_assert_single_step!("tail", tail, next, self.capacity);
        self.tail.store(next, Ordering::Release);
        Ok(ReadStatus::Data)
    }

    /// Typed consumer read.
    ///
    /// # Safety
    ///
    /// Same contract as [`pop_entry`](Self::pop_entry).
    pub(crate) unsafe fn pop_value<T: Pod>(&self) -> Result<Option<T>, QueueError> {
        let size = std::mem::size_of::<T>();
        if size != self.entry_size {
            return Err(QueueError::EntryLength {
                expected: self.entry_size,
                actual: size,
            });
        }

        let mut value: T = bytemuck::Zeroable::zeroed();
        match self.pop_entry(Some(bytemuck::bytes_of_mut(&mut value)))? {
            ReadStatus::Data => Ok(Some(value)),
            ReadStatus::Empty => Ok(None),
        }
    }
}

impl fmt::Debug for MemQueue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemQueue")
            .field("entry_size", &self.entry_size)
            .field("capacity", &self.capacity)
            .field("head", &self.head.load(Ordering::Relaxed))
            .field("tail", &self.tail.load(Ordering::Relaxed))
            .finish()
    }
}
