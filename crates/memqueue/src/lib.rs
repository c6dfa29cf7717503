//! memqueue - Fixed-Entry SPSC Memory Queue
//!
//! A circular queue of fixed-size byte entries living in a single region of
//! caller-supplied storage. It replaces the memory-pool-plus-queue pairing
//! common in firmware: one producer thread copies entries in, one consumer
//! thread copies them out, and neither ever takes a lock or blocks.
//!
//! # Key Features
//!
//! - No allocation: the queue borrows the storage it is given
//! - O(1) non-blocking `write`/`read` returning an explicit status
//! - Release/acquire index publication (entries are never observed torn)
//! - Producer/consumer handles that encode the SPSC contract in the type system
//!
//! One slot is always kept free so that `head == tail` means empty without a
//! separate counter: a queue of `N` slots holds at most `N - 1` entries.
//!
//! # Example
//!
//! ```
//! use memqueue::{Config, MemQueue, QueueError, ReadStatus};
//!
//! let config = Config::for_type::<u32>();
//! let mut storage = [0u8; Config::for_type::<u32>().storage_len(16)];
//! let mut queue = MemQueue::with_config(config, &mut storage).unwrap();
//!
//! queue.write_value(&7u32).unwrap();
//! assert_eq!(queue.read_value::<u32>().unwrap(), Some(7));
//!
//! // Byte-level API with explicit read status
//! queue.write(&[1u8, 2, 3, 4][..]).unwrap();
//! let mut out = [0u8; 4];
//! assert_eq!(queue.read(&mut out[..]), Ok(ReadStatus::Data));
//! assert_eq!(queue.read(&mut out[..]), Ok(ReadStatus::Empty));
//! assert_eq!(queue.write(None), Err(QueueError::NullInput));
//!
//! // Split into the two halves for use from separate threads
//! let (mut producer, mut consumer) = queue.split();
//! std::thread::scope(|s| {
//!     s.spawn(move || while producer.write_value(&42u32).is_err() {});
//!     s.spawn(move || while consumer.read_value::<u32>().unwrap().is_none() {});
//! });
//! ```

mod config;
mod error;
mod handles;
mod invariants;
mod queue;
mod sync;

pub use config::Config;
pub use error::{QueueError, ReadStatus};
pub use handles::{Consumer, Producer};
pub use queue::MemQueue;
