//! Stress harness: one producer and one consumer hammering a single ring,
//! with order, integrity, and latency accounting.

use std::thread;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use sluice::records::{MarketTick, UpdateKind};
use sluice::{channel, LatencySnapshot, LatencyTracker};

use crate::verify::{SealedTick, SequenceChecker};

/// Configuration for an SPSC stress run
#[derive(Debug, Clone)]
pub struct StressConfig {
    /// Total records to move through the ring
    pub messages: u64,
    /// Allocated ring capacity
    pub capacity: usize,
    /// RNG seed for reproducible payloads
    pub seed: u64,
    /// Consumer sleeps briefly every N records (0 = never); forces the ring
    /// to fill and exercises the full/backpressure path
    pub consumer_pause_every: u64,
}

impl StressConfig {
    pub fn new(messages: u64, capacity: usize) -> Self {
        Self {
            messages,
            capacity,
            seed: 0xC0FF_EE00,
            consumer_pause_every: 0,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_consumer_pause_every(mut self, every: u64) -> Self {
        self.consumer_pause_every = every;
        self
    }
}

/// Outcome of a stress run
#[derive(Debug)]
pub struct StressReport {
    pub produced: u64,
    pub consumed: u64,
    /// Records observed out of FIFO order
    pub ordering_errors: u64,
    /// Records whose checksum no longer matched after crossing the ring
    pub corrupt_records: u64,
    pub duration: Duration,
    /// Ingress-to-egress latency over the whole run
    pub latency: LatencySnapshot,
}

impl StressReport {
    pub fn throughput_per_sec(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.consumed as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }
}

fn synth_tick(rng: &mut StdRng, update_id: u64) -> MarketTick {
    let symbol = if update_id % 2 == 0 { "BTCUSDT" } else { "ETHUSDT" };
    let kind = match rng.gen_range(0..3u8) {
        0 => UpdateKind::Trade,
        1 => UpdateKind::Bid,
        _ => UpdateKind::Ask,
    };

    let base = if update_id % 2 == 0 { 50_000.0 } else { 3_000.0 };
    let mut tick = MarketTick::new(symbol, kind);
    tick.update_id = update_id;
    tick.price = base + rng.gen_range(-50.0..50.0);
    tick.quantity = rng.gen_range(0.1..10.0);
    tick.exchange_ts = update_id;
    tick
}

/// Run one producer and one consumer over a fresh ring and report what the
/// consumer actually saw.
///
/// The producer spins on full, the consumer on empty, so every record is
/// delivered exactly once; the report says whether order and payload bytes
/// survived the trip. Latency samples stream back over a crossbeam channel
/// and are folded into a [`LatencyTracker`] on the calling thread while the
/// workers run.
pub fn run_spsc_stress(config: StressConfig) -> StressReport {
    let (mut tx, mut rx) = channel::<(Instant, SealedTick)>(config.capacity)
        .expect("stress config must carry a valid capacity");

    let (sample_tx, sample_rx) = crossbeam_channel::unbounded::<u64>();

    let messages = config.messages;
    let seed = config.seed;
    let pause_every = config.consumer_pause_every;

    let start = Instant::now();

    let producer = thread::spawn(move || {
        let mut rng = StdRng::seed_from_u64(seed);
        for update_id in 0..messages {
            let sealed = SealedTick::seal(synth_tick(&mut rng, update_id));
            let mut item = (Instant::now(), sealed);
            loop {
                match tx.try_push(item) {
                    Ok(()) => break,
                    Err(full) => {
                        item = full.into_inner();
                        thread::yield_now();
                    }
                }
            }
        }
        messages
    });

    let consumer = thread::spawn(move || {
        let mut checker = SequenceChecker::new();
        let mut corrupt = 0u64;
        let mut consumed = 0u64;

        while consumed < messages {
            match rx.try_pop() {
                Some((ingress, sealed)) => {
                    consumed += 1;
                    if !sealed.is_intact() {
                        corrupt += 1;
                    }
                    checker.observe(sealed.tick.update_id);
                    let _ = sample_tx.send(ingress.elapsed().as_nanos() as u64);

                    if pause_every != 0 && consumed % pause_every == 0 {
                        thread::sleep(Duration::from_micros(10));
                    }
                }
                None => thread::yield_now(),
            }
        }
        (consumed, checker.errors(), corrupt)
    });

    // Aggregate latency samples while the workers run; the stream ends when
    // the consumer drops its sender.
    let mut tracker = LatencyTracker::new().expect("histogram creation cannot fail at 3 sigfigs");
    for nanos in sample_rx {
        tracker.record_nanos(nanos);
    }

    let produced = producer.join().expect("producer thread panicked");
    let (consumed, ordering_errors, corrupt_records) =
        consumer.join().expect("consumer thread panicked");

    StressReport {
        produced,
        consumed,
        ordering_errors,
        corrupt_records,
        duration: start.elapsed(),
        latency: tracker.snapshot(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_run_is_clean() {
        let report = run_spsc_stress(StressConfig::new(1_000, 16));
        assert_eq!(report.produced, 1_000);
        assert_eq!(report.consumed, 1_000);
        assert_eq!(report.ordering_errors, 0);
        assert_eq!(report.corrupt_records, 0);
        assert!(report.throughput_per_sec() > 0.0);
    }
}
