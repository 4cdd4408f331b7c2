//! Core SPSC ring buffer.
//!
//! Fixed-capacity circular buffer moving values between exactly one producer
//! thread and one consumer thread with two atomic cursors and nothing else.
//!
//! ## Protocol
//!
//! Each cursor ranges over `[0, capacity)` and wraps by modular increment.
//! The write cursor is mutated only by the producer, the read cursor only by
//! the consumer; each side reads the other's cursor but never writes it.
//! One slot stays permanently reserved, so usable capacity is `capacity - 1`:
//! the ring is empty iff `read == write` and full iff
//! `advance(write) == read`.
//!
//! A push loads its own cursor relaxed, loads the peer cursor with acquire to
//! decide full/empty, writes the payload with a plain (non-atomic) slot
//! access, and publishes the advanced cursor with release. A pop mirrors it.
//! The release store on one side pairs with the acquire load on the other,
//! which gives the two happens-before edges the slot accesses need:
//! a consumer that observes the advanced write cursor sees the payload the
//! producer wrote, and a producer that observes the advanced read cursor
//! knows the consumer has finished with the slot it is about to overwrite.
//!
//! Both operations are a bounded number of steps with no retry loop: lock
//! free, never blocking, never allocating.

use std::mem::MaybeUninit;
use std::ptr;

use crate::constants::MIN_CAPACITY;
use crate::error::{Full, Result, SluiceError};
use crate::sync::{AtomicUsize, Ordering, UnsafeCell};

pub(crate) type Slot<T> = UnsafeCell<MaybeUninit<T>>;

/// A cursor alone on its cache line.
///
/// The producer publishes the write cursor on every push; if the read cursor
/// shared that line, each publish would invalidate it on the consumer's core
/// and vice versa. `align(64)` rounds the struct up to a full line, which is
/// the same layout as an explicit `[u8; 64 - 8]` tail pad.
#[repr(align(64))]
pub(crate) struct PaddedCursor {
    index: AtomicUsize,
}

impl PaddedCursor {
    fn new(index: usize) -> Self {
        Self {
            index: AtomicUsize::new(index),
        }
    }
}

#[cfg(not(loom))]
mod layout_checks {
    use super::PaddedCursor;
    use crate::constants::CACHE_LINE_SIZE;

    static_assertions::const_assert_eq!(std::mem::size_of::<PaddedCursor>(), CACHE_LINE_SIZE);
    static_assertions::const_assert_eq!(std::mem::align_of::<PaddedCursor>(), CACHE_LINE_SIZE);
}

/// Fixed-capacity SPSC ring buffer.
///
/// Not exposed directly; [`channel`](crate::spsc::channel) wraps one in an
/// `Arc` and hands out the producer and consumer halves. All methods that
/// touch a cursor are `pub(crate)` and reachable only through the handle
/// that owns the corresponding role.
pub(crate) struct RingBuffer<T> {
    /// Direct pointer to the slot array (heap or mmap)
    buffer: *mut Slot<T>,
    capacity: usize,
    /// Advanced only by the producer
    write_cursor: PaddedCursor,
    /// Advanced only by the consumer
    read_cursor: PaddedCursor,
    is_mapped: bool,
}

impl<T> RingBuffer<T> {
    /// Create with heap allocation.
    pub(crate) fn with_capacity(capacity: usize) -> Result<Self> {
        Self::validate(capacity)?;

        let slots: Box<[Slot<T>]> = (0..capacity)
            .map(|_| UnsafeCell::new(MaybeUninit::uninit()))
            .collect::<Vec<_>>()
            .into_boxed_slice();

        Ok(Self {
            buffer: Box::into_raw(slots) as *mut Slot<T>,
            capacity,
            write_cursor: PaddedCursor::new(0),
            read_cursor: PaddedCursor::new(0),
            is_mapped: false,
        })
    }

    /// Create with memory-mapped allocation (mmap + mlock).
    ///
    /// Locking the backing pages keeps them resident, so a cold slot never
    /// takes a page fault in the middle of a push.
    #[cfg(unix)]
    pub(crate) fn with_capacity_mapped(capacity: usize) -> Result<Self> {
        Self::validate(capacity)?;

        let bytes = capacity
            .checked_mul(std::mem::size_of::<Slot<T>>())
            .ok_or_else(|| SluiceError::config("mapped ring size overflows"))?;
        if bytes == 0 {
            return Err(SluiceError::config(
                "zero-sized element types require heap allocation",
            ));
        }
        if std::mem::align_of::<Slot<T>>() > crate::constants::PAGE_SIZE {
            return Err(SluiceError::config(
                "element alignment exceeds page alignment",
            ));
        }

        let buffer = unsafe {
            let p = libc::mmap(
                ptr::null_mut(),
                bytes,
                libc::PROT_READ | libc::PROT_WRITE,
                libc::MAP_PRIVATE | libc::MAP_ANONYMOUS,
                -1,
                0,
            );
            if p == libc::MAP_FAILED {
                return Err(SluiceError::system_resource("mmap failed"));
            }

            // Best effort: without CAP_IPC_LOCK the rlimit may refuse large
            // rings, and an unlocked mapping still works.
            let _ = libc::mlock(p, bytes);

            let slots = p as *mut Slot<T>;
            for i in 0..capacity {
                ptr::write(slots.add(i), UnsafeCell::new(MaybeUninit::uninit()));
            }
            slots
        };

        Ok(Self {
            buffer,
            capacity,
            write_cursor: PaddedCursor::new(0),
            read_cursor: PaddedCursor::new(0),
            is_mapped: true,
        })
    }

    fn validate(capacity: usize) -> Result<()> {
        if capacity < MIN_CAPACITY {
            return Err(SluiceError::config(format!(
                "ring capacity must be at least {MIN_CAPACITY}, got {capacity}"
            )));
        }
        Ok(())
    }

    #[inline(always)]
    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    /// Slots that can hold live elements (one is reserved for full detection)
    #[inline(always)]
    pub(crate) fn usable_capacity(&self) -> usize {
        self.capacity - 1
    }

    #[inline(always)]
    fn slot(&self, index: usize) -> &Slot<T> {
        debug_assert!(index < self.capacity);
        unsafe { &*self.buffer.add(index) }
    }

    /// Next cursor position. Capacity need not be a power of two, so this is
    /// a wrap branch rather than a mask.
    #[inline(always)]
    fn advance(&self, index: usize) -> usize {
        let next = index + 1;
        if next == self.capacity {
            0
        } else {
            next
        }
    }

    /// Producer role only.
    #[inline]
    pub(crate) fn try_push(&self, value: T) -> std::result::Result<(), Full<T>> {
        // Own cursor: relaxed, nobody else writes it.
        let write = self.write_cursor.index.load(Ordering::Relaxed);
        let next = self.advance(write);

        // Acquire pairs with the consumer's release in `try_pop`: once the
        // target slot reads as free here, the consumer's read of it has
        // completed and overwriting is safe.
        if next == self.read_cursor.index.load(Ordering::Acquire) {
            return Err(Full(value));
        }

        self.slot(write).with_mut(|p| unsafe {
            (*p).write(value);
        });

        // Release publishes the slot write above to the consumer's acquire.
        self.write_cursor.index.store(next, Ordering::Release);
        Ok(())
    }

    /// Consumer role only.
    #[inline]
    pub(crate) fn try_pop(&self) -> Option<T> {
        let read = self.read_cursor.index.load(Ordering::Relaxed);

        // Acquire pairs with the producer's release in `try_push`; observing
        // the advanced write cursor makes the slot contents visible.
        if read == self.write_cursor.index.load(Ordering::Acquire) {
            return None;
        }

        let value = self.slot(read).with(|p| unsafe { (*p).assume_init_read() });

        // Release hands the now-empty slot back to the producer.
        self.read_cursor.index.store(self.advance(read), Ordering::Release);
        Some(value)
    }

    /// Occupied slot count as seen from the consumer. Exact for the reader's
    /// own progress; the producer may append concurrently.
    #[inline]
    pub(crate) fn occupied_from_consumer(&self) -> usize {
        let read = self.read_cursor.index.load(Ordering::Relaxed);
        let write = self.write_cursor.index.load(Ordering::Acquire);
        if write >= read {
            write - read
        } else {
            self.capacity - read + write
        }
    }

    /// Free slot count as seen from the producer. Exact for the writer's own
    /// progress; the consumer may drain concurrently.
    #[inline]
    pub(crate) fn free_from_producer(&self) -> usize {
        let write = self.write_cursor.index.load(Ordering::Relaxed);
        let read = self.read_cursor.index.load(Ordering::Acquire);
        let occupied = if write >= read {
            write - read
        } else {
            self.capacity - read + write
        };
        self.usable_capacity() - occupied
    }

    #[cfg(unix)]
    fn release_mapped(&mut self) {
        let bytes = self.capacity * std::mem::size_of::<Slot<T>>();
        unsafe {
            for i in 0..self.capacity {
                ptr::drop_in_place(self.buffer.add(i));
            }
            libc::munmap(self.buffer as *mut libc::c_void, bytes);
        }
    }

    #[cfg(not(unix))]
    fn release_mapped(&mut self) {
        debug_assert!(!self.is_mapped);
    }
}

impl<T> Drop for RingBuffer<T> {
    fn drop(&mut self) {
        // The last Arc clone is gone, so both handles are too; plain loads
        // are enough and no slot is concurrently accessed.
        if std::mem::needs_drop::<T>() {
            let mut read = self.read_cursor.index.load(Ordering::Relaxed);
            let write = self.write_cursor.index.load(Ordering::Relaxed);
            while read != write {
                self.slot(read).with_mut(|p| unsafe {
                    ptr::drop_in_place((*p).as_mut_ptr());
                });
                read = self.advance(read);
            }
        }

        if self.is_mapped {
            self.release_mapped();
        } else {
            drop(unsafe {
                Box::from_raw(ptr::slice_from_raw_parts_mut(self.buffer, self.capacity))
            });
        }
    }
}

// Values only ever move across the channel, so `T: Send` is the whole
// requirement; the cursor protocol partitions slot access between the roles.
unsafe impl<T: Send> Send for RingBuffer<T> {}
unsafe impl<T: Send> Sync for RingBuffer<T> {}

#[cfg(all(test, not(loom)))]
mod tests {
    use super::*;
    use crate::constants::CACHE_LINE_SIZE;
    use std::rc::Rc;

    #[test]
    fn test_pop_on_fresh_ring_fails() {
        let ring = RingBuffer::<u64>::with_capacity(4).unwrap();
        assert_eq!(ring.try_pop(), None);
    }

    #[test]
    fn test_capacity_bound_is_n_minus_one() {
        let ring = RingBuffer::<u64>::with_capacity(4).unwrap();
        assert_eq!(ring.usable_capacity(), 3);

        assert!(ring.try_push(1).is_ok());
        assert!(ring.try_push(2).is_ok());
        assert!(ring.try_push(3).is_ok());

        let Err(Full(rejected)) = ring.try_push(4) else {
            panic!("push into a full ring must fail");
        };
        assert_eq!(rejected, 4);
    }

    #[test]
    fn test_fifo_order() {
        let ring = RingBuffer::<String>::with_capacity(8).unwrap();
        for word in ["alpha", "beta", "gamma"] {
            ring.try_push(word.to_owned()).unwrap();
        }
        assert_eq!(ring.try_pop().as_deref(), Some("alpha"));
        assert_eq!(ring.try_pop().as_deref(), Some("beta"));
        assert_eq!(ring.try_pop().as_deref(), Some("gamma"));
        assert_eq!(ring.try_pop(), None);
    }

    /// Capacity 4 walk-through: fill, overflow, partial drain, refill,
    /// overflow again, full drain.
    #[test]
    fn test_full_empty_round_trip() {
        let ring = RingBuffer::<char>::with_capacity(4).unwrap();

        assert!(ring.try_push('A').is_ok());
        assert!(ring.try_push('B').is_ok());
        assert!(ring.try_push('C').is_ok());
        assert!(ring.try_push('D').is_err());

        assert_eq!(ring.try_pop(), Some('A'));
        assert_eq!(ring.try_pop(), Some('B'));

        assert!(ring.try_push('D').is_ok());
        assert!(ring.try_push('E').is_ok());
        assert!(ring.try_push('F').is_err());

        assert_eq!(ring.try_pop(), Some('C'));
        assert_eq!(ring.try_pop(), Some('D'));
        assert_eq!(ring.try_pop(), Some('E'));
        assert_eq!(ring.try_pop(), None);
    }

    #[test]
    fn test_min_capacity_holds_one_element() {
        let ring = RingBuffer::<u8>::with_capacity(2).unwrap();
        assert!(ring.try_push(1).is_ok());
        assert!(ring.try_push(2).is_err());
        assert_eq!(ring.try_pop(), Some(1));
        assert!(ring.try_push(2).is_ok());
        assert_eq!(ring.try_pop(), Some(2));
        assert_eq!(ring.try_pop(), None);
    }

    #[test]
    fn test_wraparound_non_power_of_two() {
        // Capacity 5 forces the modular wrap rather than any mask trick.
        let ring = RingBuffer::<usize>::with_capacity(5).unwrap();
        for i in 0..1000 {
            ring.try_push(i).unwrap();
            assert_eq!(ring.try_pop(), Some(i));
        }
        assert_eq!(ring.try_pop(), None);
    }

    #[test]
    fn test_occupancy_observers() {
        let ring = RingBuffer::<u32>::with_capacity(4).unwrap();
        assert_eq!(ring.occupied_from_consumer(), 0);
        assert_eq!(ring.free_from_producer(), 3);

        ring.try_push(1).unwrap();
        ring.try_push(2).unwrap();
        assert_eq!(ring.occupied_from_consumer(), 2);
        assert_eq!(ring.free_from_producer(), 1);

        ring.try_pop().unwrap();
        assert_eq!(ring.occupied_from_consumer(), 1);
        assert_eq!(ring.free_from_producer(), 2);
    }

    #[test]
    fn test_invalid_capacity() {
        assert!(RingBuffer::<u64>::with_capacity(0).is_err());
        assert!(RingBuffer::<u64>::with_capacity(1).is_err());
        assert!(RingBuffer::<u64>::with_capacity(2).is_ok());
    }

    #[test]
    fn test_zero_sized_elements() {
        let ring = RingBuffer::<()>::with_capacity(3).unwrap();
        assert!(ring.try_push(()).is_ok());
        assert!(ring.try_push(()).is_ok());
        assert!(ring.try_push(()).is_err());
        assert_eq!(ring.try_pop(), Some(()));
    }

    #[test]
    fn test_drop_releases_live_elements_once() {
        let token = Rc::new(());

        let ring = RingBuffer::<Rc<()>>::with_capacity(8).unwrap();
        for _ in 0..5 {
            ring.try_push(Rc::clone(&token)).unwrap();
        }
        // Pop two; the ring still holds three live clones.
        drop(ring.try_pop());
        drop(ring.try_pop());
        assert_eq!(Rc::strong_count(&token), 4);

        drop(ring);
        assert_eq!(Rc::strong_count(&token), 1);
    }

    #[test]
    fn test_cursors_on_distinct_cache_lines() {
        let ring = RingBuffer::<u64>::with_capacity(8).unwrap();
        let write = &ring.write_cursor as *const _ as usize;
        let read = &ring.read_cursor as *const _ as usize;

        assert_eq!(write % CACHE_LINE_SIZE, 0);
        assert_eq!(read % CACHE_LINE_SIZE, 0);
        assert!(write.abs_diff(read) >= CACHE_LINE_SIZE);
    }

    #[cfg(unix)]
    #[test]
    fn test_mapped_allocation() {
        let ring = RingBuffer::<u64>::with_capacity_mapped(1024).unwrap();
        assert_eq!(ring.capacity(), 1024);
        ring.try_push(42).unwrap();
        assert_eq!(ring.try_pop(), Some(42));
    }

    #[cfg(unix)]
    #[test]
    fn test_mapped_drop_with_live_elements() {
        let token = Rc::new(());
        let ring = RingBuffer::<Rc<()>>::with_capacity_mapped(16).unwrap();
        for _ in 0..10 {
            ring.try_push(Rc::clone(&token)).unwrap();
        }
        drop(ring);
        assert_eq!(Rc::strong_count(&token), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_mapped_rejects_zero_sized_elements() {
        assert!(RingBuffer::<()>::with_capacity_mapped(16).is_err());
    }
}
