//! # sluice-test-support
//!
//! Testing infrastructure for the sluice ring buffer.
//!
//! ## Components
//!
//! - **verify** - checksummed records and sequence checking, so a torn or
//!   reordered payload is caught, not just a wrong count
//! - **stress** - producer/consumer harness with latency aggregation for
//!   long-running tests

pub mod stress;
pub mod verify;

pub use stress::{run_spsc_stress, StressConfig, StressReport};
pub use verify::{SealedTick, SequenceChecker};
