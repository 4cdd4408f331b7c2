//! Feature-gated tracing hooks. Zero-cost no-ops unless the `tracing`
//! feature is enabled.
//!
//! ```toml
//! sluice = { version = "0.1", features = ["tracing"] }
//! ```
//! then install any subscriber (e.g. `tracing_subscriber::fmt::init()`).

#[cfg(feature = "tracing")]
#[inline]
pub(crate) fn ring_created(capacity: usize) {
    tracing::debug!(target: "sluice", capacity, "spsc ring created");
}

#[cfg(not(feature = "tracing"))]
#[inline(always)]
pub(crate) fn ring_created(_capacity: usize) {}

/// A push attempt first found the ring full
#[cfg(feature = "tracing")]
#[inline]
pub(crate) fn backpressure() {
    tracing::trace!(target: "sluice", "ring full, producer backing off");
}

#[cfg(not(feature = "tracing"))]
#[inline(always)]
pub(crate) fn backpressure() {}

/// A pop attempt first found the ring empty
#[cfg(feature = "tracing")]
#[inline]
pub(crate) fn starvation() {
    tracing::trace!(target: "sluice", "ring empty, consumer waiting");
}

#[cfg(not(feature = "tracing"))]
#[inline(always)]
pub(crate) fn starvation() {}

#[cfg(feature = "tracing")]
#[inline]
pub(crate) fn pinned(core_id: usize) {
    tracing::debug!(target: "sluice", core_id, "thread pinned");
}

#[cfg(not(feature = "tracing"))]
#[inline(always)]
pub(crate) fn pinned(_core_id: usize) {}
