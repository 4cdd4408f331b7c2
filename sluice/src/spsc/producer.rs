//! Producer handle for the SPSC ring.

use std::fmt;

use crate::error::Full;
use crate::metrics::METRICS;
use crate::observe;
use crate::spsc::ring_buffer::RingBuffer;
use crate::spsc::wait::WaitStrategy;
use crate::sync::Arc;

/// The write half of an SPSC channel.
///
/// Exactly one exists per ring: [`channel`](crate::spsc::channel) is the only
/// constructor, the type is not `Clone`, and pushing takes `&mut self`. That
/// makes "at most one producer thread" a compile-time property instead of a
/// documented precondition.
pub struct Producer<T> {
    ring: Arc<RingBuffer<T>>,
}

impl<T> Producer<T> {
    pub(crate) fn new(ring: Arc<RingBuffer<T>>) -> Self {
        Self { ring }
    }

    /// Push a value, failing fast if the ring is full.
    ///
    /// Never blocks, never allocates; on failure the value comes back inside
    /// [`Full`] and the ring is unchanged. Retry policy belongs to the
    /// caller.
    #[inline]
    pub fn try_push(&mut self, value: T) -> Result<(), Full<T>> {
        self.ring.try_push(value)
    }

    /// Push, spinning with `wait` until a slot frees up.
    ///
    /// This is the feed-thread loop: retry around [`try_push`] with a
    /// caller-chosen idle action. It never returns until the value is in the
    /// ring, so the consumer must stay alive. Records a backpressure event
    /// the first time a push attempt finds the ring full.
    ///
    /// [`try_push`]: Producer::try_push
    pub fn push_spinning<W: WaitStrategy>(&mut self, value: T, wait: &W) {
        let mut value = value;
        let mut attempt = 0u32;
        loop {
            match self.ring.try_push(value) {
                Ok(()) => {
                    METRICS.record_push();
                    return;
                }
                Err(full) => {
                    if attempt == 0 {
                        METRICS.record_backpressure();
                        observe::backpressure();
                    }
                    value = full.into_inner();
                    wait.idle(attempt);
                    attempt = attempt.saturating_add(1);
                }
            }
        }
    }

    /// Slots still free from this producer's point of view.
    ///
    /// Exact with respect to our own writes; the consumer may free more
    /// slots concurrently, so the true value can only be larger.
    #[inline]
    pub fn free_slots(&self) -> usize {
        self.ring.free_from_producer()
    }

    /// Whether the next [`try_push`](Producer::try_push) would fail right now
    #[inline]
    pub fn is_full(&self) -> bool {
        self.ring.free_from_producer() == 0
    }

    /// Usable capacity of the ring (one slot less than allocated)
    #[inline]
    pub fn capacity(&self) -> usize {
        self.ring.usable_capacity()
    }
}

impl<T> fmt::Debug for Producer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Producer")
            .field("capacity", &self.capacity())
            .field("free_slots", &self.free_slots())
            .finish()
    }
}
