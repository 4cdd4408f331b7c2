//! Data integrity verification for stress tests.
//!
//! A bare counter can miss a buffer that delivers the right number of wrong
//! bytes. Every record carries a CRC32 over its payload, and a
//! [`SequenceChecker`] tracks FIFO order on the consumer side.

use bytemuck::bytes_of;
use sluice::records::MarketTick;

/// A market tick sealed with a CRC32 of its bytes.
#[derive(Debug, Clone, Copy)]
pub struct SealedTick {
    pub tick: MarketTick,
    pub crc: u32,
}

impl SealedTick {
    /// Seal a tick; any later mutation of `tick` invalidates the seal.
    pub fn seal(tick: MarketTick) -> Self {
        Self {
            tick,
            crc: checksum(&tick),
        }
    }

    /// Whether the tick still matches its seal
    pub fn is_intact(&self) -> bool {
        checksum(&self.tick) == self.crc
    }
}

/// CRC32 over the raw record bytes
pub fn checksum(tick: &MarketTick) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(bytes_of(tick));
    hasher.finalize()
}

/// Tracks that observed sequence numbers are exactly 0, 1, 2, ...
#[derive(Debug, Default)]
pub struct SequenceChecker {
    next: u64,
    errors: u64,
}

impl SequenceChecker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next observed sequence number; returns whether it was the
    /// expected one.
    pub fn observe(&mut self, seq: u64) -> bool {
        let ok = seq == self.next;
        if !ok {
            self.errors += 1;
        }
        // Resync on the observed value so one gap does not cascade.
        self.next = seq + 1;
        ok
    }

    pub fn observed(&self) -> u64 {
        self.next
    }

    pub fn errors(&self) -> u64 {
        self.errors
    }
}
