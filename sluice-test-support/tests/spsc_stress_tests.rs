//! Ordering and liveness tests for the SPSC ring under real threads.
//!
//! The unit tests prove the sequential contract; these prove the concurrent
//! one: with a producer spinning on full and a consumer spinning on empty,
//! every record arrives exactly once, in order, with its bytes intact.

use sluice_test_support::{run_spsc_stress, StressConfig};

fn assert_clean(report: &sluice_test_support::StressReport, messages: u64) {
    assert_eq!(report.produced, messages);
    assert_eq!(report.consumed, messages, "records lost or duplicated");
    assert_eq!(report.ordering_errors, 0, "FIFO order violated");
    assert_eq!(report.corrupt_records, 0, "payload bytes corrupted in flight");
}

#[test]
fn liveness_through_mid_sized_ring() {
    let messages = 100_000;
    let report = run_spsc_stress(StressConfig::new(messages, 512));

    assert_clean(&report, messages);
    assert_eq!(report.latency.count, messages);
    assert!(report.latency.min_nanos <= report.latency.p99_nanos);
}

#[test]
fn torture_smallest_ring() {
    // One usable slot: every push/pop pair crosses the wrap and the
    // full/empty boundary.
    let messages = 10_000;
    let report = run_spsc_stress(StressConfig::new(messages, 2));
    assert_clean(&report, messages);
}

#[test]
fn non_power_of_two_capacity() {
    let messages = 50_000;
    let report = run_spsc_stress(StressConfig::new(messages, 300));
    assert_clean(&report, messages);
}

#[test]
fn slow_consumer_forces_backpressure() {
    // Pausing the consumer fills the ring, so the producer's full-path and
    // the wrap get exercised continuously rather than incidentally.
    let messages = 20_000;
    let report = run_spsc_stress(
        StressConfig::new(messages, 64)
            .with_seed(7)
            .with_consumer_pause_every(256),
    );
    assert_clean(&report, messages);
}
