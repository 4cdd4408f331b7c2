//! Wait strategies for the spin-retry loops around `try_push`/`try_pop`.
//!
//! The ring itself never waits; these run in the calling thread between
//! failed attempts and trade latency against CPU burn. A strategy needing a
//! deadline belongs to the caller too: track elapsed time outside the loop
//! and stop polling.

use std::thread;
use std::time::Duration;

/// Decides what a retry loop does after a failed attempt.
pub trait WaitStrategy {
    /// Called after each failed attempt; `attempt` counts consecutive
    /// failures since the last success and resets on success.
    fn idle(&self, attempt: u32);
}

/// Busy spin - lowest latency, burns a full core while waiting.
/// Use when the paired thread is pinned to its own core and latency is
/// everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct BusySpin;

impl WaitStrategy for BusySpin {
    #[inline]
    fn idle(&self, _attempt: u32) {
        std::hint::spin_loop();
    }
}

/// Spin briefly, then yield to the scheduler.
/// The reasonable default when producer and consumer share cores with other
/// work.
#[derive(Debug, Clone, Copy)]
pub struct Yielding {
    /// Attempts spent spinning before the first yield
    pub spin_tries: u32,
}

impl Yielding {
    pub fn new(spin_tries: u32) -> Self {
        Self { spin_tries }
    }
}

impl Default for Yielding {
    fn default() -> Self {
        Self { spin_tries: 100 }
    }
}

impl WaitStrategy for Yielding {
    #[inline]
    fn idle(&self, attempt: u32) {
        if attempt < self.spin_tries {
            std::hint::spin_loop();
        } else {
            thread::yield_now();
        }
    }
}

/// Three-phase ladder: spin, then yield, then sleep.
/// Lowest CPU usage; latency degrades to the sleep granularity once a stall
/// lasts long enough to reach the third phase.
#[derive(Debug, Clone, Copy)]
pub struct Sleeping {
    /// Attempts spent spinning
    pub spin_tries: u32,
    /// Attempts spent yielding after the spin phase
    pub yield_tries: u32,
    /// Sleep duration once both phases are exhausted
    pub sleep: Duration,
}

impl Sleeping {
    pub fn new(spin_tries: u32, yield_tries: u32, sleep: Duration) -> Self {
        Self {
            spin_tries,
            yield_tries,
            sleep,
        }
    }
}

impl Default for Sleeping {
    fn default() -> Self {
        Self {
            spin_tries: 100,
            yield_tries: 10,
            sleep: Duration::from_micros(100),
        }
    }
}

impl WaitStrategy for Sleeping {
    #[inline]
    fn idle(&self, attempt: u32) {
        if attempt < self.spin_tries {
            std::hint::spin_loop();
        } else if attempt < self.spin_tries + self.yield_tries {
            thread::yield_now();
        } else {
            thread::sleep(self.sleep);
        }
    }
}
