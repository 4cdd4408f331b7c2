//! Single-producer/single-consumer lock-free channel.
//!
//! A fixed-capacity circular buffer with two cache-line-isolated atomic
//! cursors, split at the type level into a [`Producer`] and a [`Consumer`]
//! handle so each role's cursor can only ever be advanced by the thread
//! holding that handle.
//!
//! ## Guarantees
//!
//! - Strict FIFO between the one producer and the one consumer
//! - `try_push`/`try_pop` never block, never allocate, O(1)
//! - Full ring: push fails fast and hands the value back
//! - Empty ring: pop fails fast with `None`
//! - Lock-free: no locks exist, so neither thread can ever hold up the other
//!
//! ## Usage
//!
//! ```
//! use sluice::spsc;
//!
//! let (mut tx, mut rx) = spsc::channel::<u64>(8)?;
//!
//! tx.try_push(1).unwrap();
//! tx.try_push(2).unwrap();
//! assert_eq!(rx.try_pop(), Some(1));
//! assert_eq!(rx.try_pop(), Some(2));
//! assert_eq!(rx.try_pop(), None);
//! # Ok::<(), sluice::SluiceError>(())
//! ```
//!
//! Waiting is the caller's business; see [`wait`] for the spin/yield/sleep
//! strategies used by `push_spinning`/`pop_spinning`.

pub mod consumer;
pub mod producer;
pub mod wait;

mod ring_buffer;

pub use consumer::Consumer;
pub use producer::Producer;

use crate::constants::{DEFAULT_CAPACITY, MIN_CAPACITY};
use crate::error::{Result, SluiceError};
use crate::observe;
use crate::sync::Arc;
use self::ring_buffer::RingBuffer;

/// Backing storage for the slot array, chosen at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Allocation {
    /// Plain heap allocation
    #[default]
    Heap,
    /// `mmap` + `mlock` backing (Unix only): pages stay resident, so a cold
    /// slot never page-faults mid-push
    Mapped,
}

/// Configuration for an SPSC channel.
///
/// Capacity is the allocated slot count; one slot is reserved, so
/// `capacity - 1` values can be in flight. Nothing is reconfigurable after
/// construction.
#[derive(Debug, Clone)]
pub struct RingConfig {
    /// Allocated slot count (must be at least 2)
    pub capacity: usize,
    /// Backing storage strategy
    pub allocation: Allocation,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            allocation: Allocation::Heap,
        }
    }
}

impl RingConfig {
    /// Create a new configuration with the specified capacity
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity < MIN_CAPACITY {
            return Err(SluiceError::config(format!(
                "ring capacity must be at least {MIN_CAPACITY}, got {capacity}"
            )));
        }
        Ok(Self {
            capacity,
            ..Default::default()
        })
    }

    /// Set the backing storage strategy
    pub fn with_allocation(mut self, allocation: Allocation) -> Self {
        self.allocation = allocation;
        self
    }
}

/// Create a heap-backed SPSC channel with the given slot count.
///
/// Returns the unique producer/consumer handle pair. The ring stays alive
/// until both handles are dropped; any values still inside are dropped with
/// it.
pub fn channel<T>(capacity: usize) -> Result<(Producer<T>, Consumer<T>)> {
    channel_with(RingConfig::new(capacity)?)
}

/// Create an SPSC channel from a full configuration.
pub fn channel_with<T>(config: RingConfig) -> Result<(Producer<T>, Consumer<T>)> {
    let ring = match config.allocation {
        Allocation::Heap => RingBuffer::with_capacity(config.capacity)?,
        #[cfg(unix)]
        Allocation::Mapped => RingBuffer::with_capacity_mapped(config.capacity)?,
        #[cfg(not(unix))]
        Allocation::Mapped => {
            return Err(SluiceError::config(
                "mapped allocation requires a Unix target",
            ));
        }
    };

    observe::ring_created(config.capacity);

    let ring = Arc::new(ring);
    Ok((Producer::new(Arc::clone(&ring)), Consumer::new(ring)))
}
