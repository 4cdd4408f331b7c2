//! # sluice
//!
//! Lock-free single-producer/single-consumer ring buffer for moving
//! fixed-size market data records between two threads without locks,
//! blocking, or hot-path allocation.
//!
//! ## What's inside
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`spsc`] | The ring: `channel()` returning split producer/consumer handles |
//! | [`records`] | Cache-line-sized POD market records |
//! | [`latency`] | HdrHistogram-backed stage latency tracking |
//! | [`metrics`] | Relaxed counters for backpressure/starvation visibility |
//! | [`cpu`] | Thread-to-core pinning |
//!
//! ## Example
//!
//! ```
//! use sluice::{channel, BusySpin};
//! use std::thread;
//!
//! let (mut tx, mut rx) = channel::<u64>(256)?;
//!
//! let feed = thread::spawn(move || {
//!     for seq in 0..10_000u64 {
//!         tx.push_spinning(seq, &BusySpin);
//!     }
//! });
//!
//! let mut expected = 0u64;
//! while expected < 10_000 {
//!     let seq = rx.pop_spinning(&BusySpin);
//!     assert_eq!(seq, expected);
//!     expected += 1;
//! }
//! feed.join().unwrap();
//! # Ok::<(), sluice::SluiceError>(())
//! ```
//!
//! ## Contract
//!
//! Exactly one producer thread and one consumer thread, enforced by the
//! handle types: they are unique, not `Clone`, and mutate through
//! `&mut self`. The ring is strict FIFO between the pair, holds
//! `capacity - 1` values, and `try_push`/`try_pop` fail fast instead of
//! waiting. Synchronization is two cache-line-isolated cursors with
//! acquire/release pairing and nothing else; under `--cfg loom` the whole
//! protocol is model-checked (`tests/loom.rs`).
//!
//! ## Feature flags
//!
//! - `tracing`: emit backpressure/starvation/pinning events through
//!   [`tracing`](https://docs.rs/tracing); off by default and fully
//!   compiled out when disabled.

pub mod constants;
pub mod cpu;
pub mod error;
pub mod latency;
pub mod metrics;
pub mod records;
pub mod spsc;

mod observe;
pub(crate) mod sync;

pub use error::{Full, Result, SluiceError};
pub use latency::{LatencySnapshot, LatencyTracker};
pub use metrics::{Metrics, MetricsSnapshot, METRICS};
pub use records::{MarketTick, UpdateKind, SYMBOL_LEN};
pub use spsc::wait::{BusySpin, Sleeping, WaitStrategy, Yielding};
pub use spsc::{channel, channel_with, Allocation, Consumer, Producer, RingConfig};
