//! Lightweight counters for observability.
//!
//! Recorded by the spinning convenience loops, never by the raw
//! `try_push`/`try_pop` hot path. All counters are relaxed: they are
//! monotonic tallies, not synchronization.

use std::sync::atomic::{AtomicU64, Ordering};

/// Global metrics counters
pub struct Metrics {
    pub pushes: AtomicU64,
    pub pops: AtomicU64,
    /// Times a push attempt first found the ring full
    pub backpressure_events: AtomicU64,
    /// Times a pop attempt first found the ring empty
    pub starvation_events: AtomicU64,
}

impl Metrics {
    pub const fn new() -> Self {
        Self {
            pushes: AtomicU64::new(0),
            pops: AtomicU64::new(0),
            backpressure_events: AtomicU64::new(0),
            starvation_events: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn record_push(&self) {
        self.pushes.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_pop(&self) {
        self.pops.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_backpressure(&self) {
        self.backpressure_events.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_starvation(&self) {
        self.starvation_events.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            pushes: self.pushes.load(Ordering::Relaxed),
            pops: self.pops.load(Ordering::Relaxed),
            backpressure_events: self.backpressure_events.load(Ordering::Relaxed),
            starvation_events: self.starvation_events.load(Ordering::Relaxed),
        }
    }

    pub fn reset(&self) {
        self.pushes.store(0, Ordering::Relaxed);
        self.pops.store(0, Ordering::Relaxed);
        self.backpressure_events.store(0, Ordering::Relaxed);
        self.starvation_events.store(0, Ordering::Relaxed);
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct MetricsSnapshot {
    pub pushes: u64,
    pub pops: u64,
    pub backpressure_events: u64,
    pub starvation_events: u64,
}

impl std::fmt::Display for MetricsSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "pushes={} pops={} backpressure={} starvation={}",
            self.pushes, self.pops, self.backpressure_events, self.starvation_events
        )
    }
}

/// Global metrics instance
pub static METRICS: Metrics = Metrics::new();

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics() {
        let m = Metrics::new();
        m.record_push();
        m.record_push();
        m.record_pop();
        m.record_backpressure();

        let s = m.snapshot();
        assert_eq!(s.pushes, 2);
        assert_eq!(s.pops, 1);
        assert_eq!(s.backpressure_events, 1);
        assert_eq!(s.starvation_events, 0);
    }

    #[test]
    fn test_reset() {
        let m = Metrics::new();
        m.record_starvation();
        m.reset();
        assert_eq!(m.snapshot().starvation_events, 0);
    }

    #[test]
    fn test_snapshot_display() {
        let m = Metrics::new();
        m.record_push();
        let rendered = m.snapshot().to_string();
        assert!(rendered.contains("pushes=1"));
    }
}
