//! Latency tracking for pipeline stages.
//!
//! Timestamps are taken by the caller before push and after pop; the ring
//! itself never looks at the clock. Backed by HdrHistogram, so percentiles
//! stay accurate across the nanosecond-to-second range without storing
//! samples.

use std::fmt;
use std::time::Duration;

use hdrhistogram::Histogram;

use crate::error::{Result, SluiceError};

/// Records stage latencies and reports min/avg/max/percentiles.
///
/// Single-threaded by design: one tracker per consuming thread, aggregated
/// out of band.
pub struct LatencyTracker {
    histogram: Histogram<u64>,
}

impl LatencyTracker {
    /// Create a tracker with three significant digits of resolution
    pub fn new() -> Result<Self> {
        let histogram = Histogram::new(3)
            .map_err(|e| SluiceError::metrics(format!("histogram creation failed: {e}")))?;
        Ok(Self { histogram })
    }

    /// Record one latency sample
    pub fn record(&mut self, latency: Duration) {
        let nanos = u64::try_from(latency.as_nanos()).unwrap_or(u64::MAX);
        self.histogram.saturating_record(nanos);
    }

    /// Record one latency sample given directly in nanoseconds
    pub fn record_nanos(&mut self, nanos: u64) {
        self.histogram.saturating_record(nanos);
    }

    pub fn count(&self) -> u64 {
        self.histogram.len()
    }

    pub fn min_nanos(&self) -> u64 {
        self.histogram.min()
    }

    pub fn max_nanos(&self) -> u64 {
        self.histogram.max()
    }

    pub fn mean_nanos(&self) -> f64 {
        self.histogram.mean()
    }

    /// Latency at the given quantile in `[0.0, 1.0]`
    pub fn percentile_nanos(&self, quantile: f64) -> u64 {
        self.histogram.value_at_quantile(quantile)
    }

    /// Point-in-time summary for reporting
    pub fn snapshot(&self) -> LatencySnapshot {
        LatencySnapshot {
            count: self.count(),
            min_nanos: self.min_nanos(),
            mean_nanos: self.mean_nanos(),
            p50_nanos: self.percentile_nanos(0.50),
            p99_nanos: self.percentile_nanos(0.99),
            max_nanos: self.max_nanos(),
        }
    }

    pub fn reset(&mut self) {
        self.histogram.reset();
    }
}

/// Summary of a [`LatencyTracker`] at one point in time
#[derive(Debug, Clone, Copy)]
pub struct LatencySnapshot {
    pub count: u64,
    pub min_nanos: u64,
    pub mean_nanos: f64,
    pub p50_nanos: u64,
    pub p99_nanos: u64,
    pub max_nanos: u64,
}

impl fmt::Display for LatencySnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "n={} min={}ns avg={:.0}ns p50={}ns p99={}ns max={}ns",
            self.count,
            self.min_nanos,
            self.mean_nanos,
            self.p50_nanos,
            self.p99_nanos,
            self.max_nanos
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_tracker() {
        let tracker = LatencyTracker::new().unwrap();
        let snapshot = tracker.snapshot();
        assert_eq!(snapshot.count, 0);
    }

    #[test]
    fn test_stats_ordering() {
        let mut tracker = LatencyTracker::new().unwrap();
        for nanos in [100, 200, 300, 400, 10_000] {
            tracker.record_nanos(nanos);
        }

        assert_eq!(tracker.count(), 5);
        assert!(tracker.min_nanos() <= tracker.percentile_nanos(0.50));
        assert!(tracker.percentile_nanos(0.50) <= tracker.percentile_nanos(0.99));
        assert!((tracker.mean_nanos() as u64) <= tracker.max_nanos());
        assert!(tracker.max_nanos() >= 10_000 * 99 / 100);
    }

    #[test]
    fn test_record_duration() {
        let mut tracker = LatencyTracker::new().unwrap();
        tracker.record(Duration::from_micros(5));
        assert_eq!(tracker.count(), 1);
        assert!(tracker.min_nanos() >= 4_900);
    }

    #[test]
    fn test_snapshot_display() {
        let mut tracker = LatencyTracker::new().unwrap();
        tracker.record_nanos(1_000);
        let rendered = tracker.snapshot().to_string();
        assert!(rendered.contains("n=1"));
        assert!(rendered.contains("p99="));
    }

    #[test]
    fn test_reset() {
        let mut tracker = LatencyTracker::new().unwrap();
        tracker.record_nanos(42);
        tracker.reset();
        assert_eq!(tracker.count(), 0);
    }
}
