//! Core constants used by the ring buffer implementation.

/// Cache line size for alignment (64 bytes on most CPUs)
pub const CACHE_LINE_SIZE: usize = 64;

/// Smallest valid ring capacity.
///
/// One slot is permanently reserved to tell "empty" from "full", so a
/// capacity below 2 could never hold an element.
pub const MIN_CAPACITY: usize = 2;

/// Default ring capacity for feed pipelines
pub const DEFAULT_CAPACITY: usize = 4096;

/// Page size for memory-mapped allocation
pub const PAGE_SIZE: usize = 4096;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_line_size_is_power_of_two() {
        assert!(CACHE_LINE_SIZE.is_power_of_two());
    }

    #[test]
    fn test_page_size_is_power_of_two() {
        assert!(PAGE_SIZE.is_power_of_two());
    }

    #[test]
    fn test_capacity_bounds() {
        assert!(MIN_CAPACITY >= 2);
        assert!(DEFAULT_CAPACITY >= MIN_CAPACITY);
    }
}
