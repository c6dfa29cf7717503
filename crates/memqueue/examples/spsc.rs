//! Sensor-sample pipeline over a stack buffer.
//!
//! A producer thread pushes fixed-size samples into a queue living in a
//! caller-owned buffer; the consumer drains and aggregates them. The producer
//! retries on `Full` with a crossbeam `Backoff` - the queue itself never waits.
//!
//! Run with: RUST_LOG=debug cargo run --release --example spsc

use crossbeam_utils::Backoff;
use memqueue::{Config, MemQueue, QueueError};
use std::thread;
use std::time::Instant;

#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
struct Sample {
    seq: u32,
    channel: u16,
    reading: u16,
}

const SLOTS: usize = 64;
const CONFIG: Config = Config::for_type::<Sample>();
const SAMPLES: u32 = 1_000_000;

fn main() -> Result<(), QueueError> {
    env_logger::init();

    let mut storage = [0u8; CONFIG.storage_len(SLOTS)];
    let mut queue = MemQueue::with_config(CONFIG, &mut storage)?;
    log::info!(
        "queue ready: {} slots of {} bytes",
        queue.capacity(),
        queue.entry_size()
    );

    let (mut producer, mut consumer) = queue.split();
    let start = Instant::now();

    let (full_retries, (count, total)) = thread::scope(|s| {
        let p = s.spawn(move || {
            let backoff = Backoff::new();
            let mut retries = 0u64;
            for seq in 0..SAMPLES {
                let sample = Sample {
                    seq,
                    channel: (seq % 4) as u16,
                    reading: (seq % 1024) as u16,
                };
                loop {
                    match producer.write_value(&sample) {
                        Ok(()) => break,
                        Err(err) if err.is_recoverable() => {
                            retries += 1;
                            backoff.snooze();
                        }
                        Err(err) => return Err(err),
                    }
                }
                backoff.reset();
            }
            Ok(retries)
        });

        let c = s.spawn(move || {
            let backoff = Backoff::new();
            let mut count = 0u32;
            let mut total = 0u64;
            while count < SAMPLES {
                match consumer.read_value::<Sample>()? {
                    Some(sample) => {
                        debug_assert_eq!(sample.seq, count);
                        total += u64::from(sample.reading);
                        count += 1;
                        backoff.reset();
                    }
                    None => backoff.snooze(),
                }
            }
            Ok::<_, QueueError>((count, total))
        });

        let retries = p.join().expect("producer panicked")?;
        let consumed = c.join().expect("consumer panicked")?;
        Ok::<_, QueueError>((retries, consumed))
    })?;

    let elapsed = start.elapsed();
    log::info!(
        "transferred {} samples in {:?} ({:.1} M samples/s), {} full retries, reading sum {}",
        count,
        elapsed,
        f64::from(count) / elapsed.as_secs_f64() / 1e6,
        full_retries,
        total
    );
    Ok(())
}
