//! Two-stage market data pipeline on SPSC rings.
//!
//! Synthetic feed thread -> raw ring -> normalizer thread -> normalized
//! ring -> book thread, each stage pinned to its own core, with per-stage
//! latency reported at the end. The feed is synthetic; swap the generator
//! for a real exchange client callback and nothing downstream changes.

use std::thread;
use std::time::Instant;

use sluice::cpu::pin_to_core;
use sluice::records::{MarketTick, UpdateKind};
use sluice::{channel, BusySpin, LatencyTracker, METRICS};

const TICKS: u64 = 200_000;
const CAPACITY: usize = 4096;

/// A tick plus the instant it entered the pipeline.
type Stamped = (Instant, MarketTick);

fn main() -> sluice::Result<()> {
    let (mut raw_tx, mut raw_rx) = channel::<Stamped>(CAPACITY)?;
    let (mut norm_tx, mut norm_rx) = channel::<Stamped>(CAPACITY)?;

    let stage_tracker = LatencyTracker::new()?;
    let end_to_end_tracker = LatencyTracker::new()?;

    // Feed thread: synthesize ticks the way an exchange callback would
    // deliver them.
    let feed = thread::spawn(move || {
        let _ = pin_to_core(0);
        let mut state = 0x2545_F491_4F6C_DD1Du64;
        for update_id in 0..TICKS {
            // xorshift64 keeps the generator allocation-free
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;

            let symbol = if update_id % 2 == 0 { "BTCUSDT" } else { "ETHUSDT" };
            let mut tick = MarketTick::new(symbol, UpdateKind::Trade);
            tick.update_id = update_id;
            tick.price = 50_000.0 + ((state % 1_000) as f64 - 500.0) / 10.0;
            tick.quantity = 0.1 + ((state >> 10) % 100) as f64 / 10.0;

            raw_tx.push_spinning((Instant::now(), tick), &BusySpin);
        }
    });

    // Normalizer: stamp receive time, measure queue latency, forward.
    let normalize = thread::spawn(move || {
        let _ = pin_to_core(1);
        let mut tracker = stage_tracker;
        for _ in 0..TICKS {
            let (ingress, mut tick) = raw_rx.pop_spinning(&BusySpin);
            tracker.record(ingress.elapsed());
            tick.received_ts = ingress.elapsed().as_nanos() as u64;
            norm_tx.push_spinning((ingress, tick), &BusySpin);
        }
        tracker
    });

    // Book thread: consume normalized updates.
    let book = thread::spawn(move || {
        let _ = pin_to_core(2);
        let mut tracker = end_to_end_tracker;
        let mut notional = 0.0f64;
        for _ in 0..TICKS {
            let (ingress, tick) = norm_rx.pop_spinning(&BusySpin);
            tracker.record(ingress.elapsed());
            notional += tick.price * tick.quantity;
        }
        (tracker, notional)
    });

    feed.join().expect("feed thread panicked");
    let stage = normalize.join().expect("normalizer thread panicked");
    let (end_to_end, notional) = book.join().expect("book thread panicked");

    println!("ticks:           {TICKS}");
    println!("raw->norm:       {}", stage.snapshot());
    println!("end-to-end:      {}", end_to_end.snapshot());
    println!("traded notional: {notional:.2}");
    println!("ring metrics:    {}", METRICS.snapshot());

    Ok(())
}
