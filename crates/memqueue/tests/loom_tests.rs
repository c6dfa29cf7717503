//! Loom-based concurrency tests for memqueue.
//!
//! Run with: `cargo test --features loom --test loom_tests --release`
//!
//! With the `loom` feature the queue's head/tail indices are loom atomics and
//! every slot copy is a tracked access to a per-slot loom `UnsafeCell`. These
//! models therefore explore every interleaving of the real producer and
//! consumer paths, and loom fails a model with a causality violation if a slot
//! is read without happening-after its write (head publish too weak) or
//! overwritten without happening-after its read (tail publish too weak).

#![cfg(feature = "loom")]

use loom::sync::atomic::{AtomicUsize, Ordering};
use loom::sync::Arc;
use loom::thread;
use memqueue::{Consumer, MemQueue, Producer, QueueError};

/// Builds a queue with `'static` halves so they can move into loom threads.
///
/// The storage and queue are leaked; loom models are short-lived and small.
fn split_static(
    entry_size: usize,
    slots: usize,
) -> (Producer<'static, 'static>, Consumer<'static, 'static>) {
    let storage: &'static mut [u8] = Box::leak(vec![0u8; entry_size * slots].into_boxed_slice());
    let queue: &'static mut MemQueue<'static> =
        Box::leak(Box::new(MemQueue::new(entry_size, storage).unwrap()));
    queue.split()
}

/// Values written by the producer are read in FIFO order.
#[test]
fn loom_spsc_fifo() {
    loom::model(|| {
        let (mut producer, mut consumer) = split_static(8, 4);

        let p = thread::spawn(move || {
            for value in 1..=2u64 {
                while producer.write_value(&value).is_err() {
                    thread::yield_now();
                }
            }
        });

        let c = thread::spawn(move || {
            let mut received = Vec::new();
            while received.len() < 2 {
                match consumer.read_value::<u64>().unwrap() {
                    Some(value) => received.push(value),
                    None => thread::yield_now(),
                }
            }
            received
        });

        p.join().unwrap();
        let received = c.join().unwrap();
        assert_eq!(received, vec![1, 2]);
    });
}

/// A consumer that observes an entry observes all of its bytes.
///
/// The consumer's copy out of the slot must happen-after the producer's copy
/// in; with a Relaxed head store or load loom reports the slot access as a
/// causality violation.
#[test]
fn loom_entry_visible_before_index() {
    loom::model(|| {
        let (mut producer, mut consumer) = split_static(8, 2);

        let p = thread::spawn(move || {
            producer.write_value(&[0xABu32, 0xCDu32]).unwrap();
        });

        let c = thread::spawn(move || {
            if let Some(entry) = consumer.read_value::<[u32; 2]>().unwrap() {
                assert_eq!(entry, [0xAB, 0xCD]);
            }
        });

        p.join().unwrap();
        c.join().unwrap();
    });
}

/// The producer may only reuse a slot after the consumer's copy out of it.
///
/// Two slots (one usable) force the third write back into slot 0, so the
/// tail Release/Acquire pair is what orders the overwrite after the read.
#[test]
fn loom_slot_reuse_after_read() {
    loom::model(|| {
        let (mut producer, mut consumer) = split_static(8, 2);

        let p = thread::spawn(move || {
            for value in 1..=3u64 {
                while producer.write_value(&value).is_err() {
                    thread::yield_now();
                }
            }
        });

        let c = thread::spawn(move || {
            let mut received = Vec::new();
            while received.len() < 3 {
                match consumer.read_value::<u64>().unwrap() {
                    Some(value) => received.push(value),
                    None => thread::yield_now(),
                }
            }
            received
        });

        p.join().unwrap();
        assert_eq!(c.join().unwrap(), vec![1, 2, 3]);
    });
}

/// A full queue rejects the write; once the consumer frees a slot the
/// producer can write again, and nothing is overwritten before it is read.
#[test]
fn loom_full_then_release() {
    loom::model(|| {
        // 3 slots, 2 usable
        let (mut producer, mut consumer) = split_static(8, 3);
        producer.write_value(&1u64).unwrap();
        producer.write_value(&2u64).unwrap();
        assert_eq!(producer.write_value(&3u64), Err(QueueError::Full));

        let c = thread::spawn(move || {
            let first = consumer.read_value::<u64>().unwrap();
            (first, consumer)
        });

        let p = thread::spawn(move || {
            let ok = producer.write_value(&3u64).is_ok();
            (ok, producer)
        });

        let (first, mut consumer) = c.join().unwrap();
        let (wrote_third, _producer) = p.join().unwrap();
        assert_eq!(first, Some(1));

        let mut rest = Vec::new();
        while let Some(value) = consumer.read_value::<u64>().unwrap() {
            rest.push(value);
        }
        if wrote_third {
            assert_eq!(rest, vec![2, 3]);
        } else {
            assert_eq!(rest, vec![2]);
        }
    });
}

/// The consumer never receives more entries than the producer wrote.
#[test]
fn loom_received_never_exceeds_sent() {
    loom::model(|| {
        let (mut producer, mut consumer) = split_static(8, 2);
        let sent = Arc::new(AtomicUsize::new(0));
        let received = Arc::new(AtomicUsize::new(0));

        let sent_p = Arc::clone(&sent);
        let p = thread::spawn(move || {
            for value in 0..2u64 {
                if producer.write_value(&value).is_ok() {
                    sent_p.fetch_add(1, Ordering::SeqCst);
                }
            }
        });

        let received_c = Arc::clone(&received);
        let c = thread::spawn(move || {
            for _ in 0..2 {
                if consumer.read_value::<u64>().unwrap().is_some() {
                    received_c.fetch_add(1, Ordering::SeqCst);
                }
            }
        });

        p.join().unwrap();
        c.join().unwrap();

        let s = sent.load(Ordering::SeqCst);
        let r = received.load(Ordering::SeqCst);
        assert!(r <= s, "received {} but only sent {}", r, s);
    });
}
