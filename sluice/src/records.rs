//! Fixed-size market data records.
//!
//! Payloads for the ring are ordinary owned values; these are the canonical
//! ones for feed pipelines. [`MarketTick`] is exactly one cache line and
//! plain-old-data, so a push is a single 64-byte copy with no pointer
//! chasing on the consumer side.

use bytemuck::{Pod, Zeroable};

/// Bytes reserved for the instrument symbol inside a record
pub const SYMBOL_LEN: usize = 16;

/// What a normalized update describes
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateKind {
    Trade = 0,
    Bid = 1,
    Ask = 2,
}

impl UpdateKind {
    /// Decode from the wire byte; `None` for anything unassigned
    pub fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::Trade),
            1 => Some(Self::Bid),
            2 => Some(Self::Ask),
            _ => None,
        }
    }
}

/// 64-byte normalized market update - one full cache line.
///
/// Timestamps are nanoseconds; `exchange_ts` is the venue's clock,
/// `received_ts` the local receive clock, and their difference is the feed
/// latency the pipeline exists to keep small.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct MarketTick {
    /// Venue timestamp (ns)
    pub exchange_ts: u64,
    /// Local receive timestamp (ns)
    pub received_ts: u64,
    pub price: f64,
    pub quantity: f64,
    /// Venue-assigned sequence number
    pub update_id: u64,
    /// NUL-padded instrument symbol
    pub symbol: [u8; SYMBOL_LEN],
    kind: u8,
    _pad: [u8; 7],
}

impl MarketTick {
    /// Create a zeroed tick for the given instrument and kind
    pub fn new(symbol: &str, kind: UpdateKind) -> Self {
        let mut tick = Self::zeroed();
        tick.symbol = encode_symbol(symbol);
        tick.kind = kind as u8;
        tick
    }

    /// Update kind, if the raw byte is a known discriminant
    pub fn kind(&self) -> Option<UpdateKind> {
        UpdateKind::from_raw(self.kind)
    }

    pub fn set_kind(&mut self, kind: UpdateKind) {
        self.kind = kind as u8;
    }

    /// Symbol with NUL padding stripped; empty if the bytes are not UTF-8
    pub fn symbol_str(&self) -> &str {
        let end = self
            .symbol
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(SYMBOL_LEN);
        std::str::from_utf8(&self.symbol[..end]).unwrap_or("")
    }
}

/// Encode a symbol into its fixed field, truncating past [`SYMBOL_LEN`]
/// bytes.
pub fn encode_symbol(symbol: &str) -> [u8; SYMBOL_LEN] {
    let mut field = [0u8; SYMBOL_LEN];
    let bytes = symbol.as_bytes();
    let len = bytes.len().min(SYMBOL_LEN);
    field[..len].copy_from_slice(&bytes[..len]);
    field
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_is_one_cache_line() {
        assert_eq!(std::mem::size_of::<MarketTick>(), 64);
        assert_eq!(std::mem::align_of::<MarketTick>(), 8);
    }

    #[test]
    fn test_tick_is_pod() {
        let mut tick = MarketTick::new("BTCUSDT", UpdateKind::Bid);
        tick.price = 50_000.5;
        tick.update_id = 42;

        let bytes = bytemuck::bytes_of(&tick);
        assert_eq!(bytes.len(), 64);

        let restored: MarketTick = bytemuck::pod_read_unaligned(bytes);
        assert_eq!(restored, tick);
    }

    #[test]
    fn test_kind_round_trip() {
        let mut tick = MarketTick::new("ETHUSDT", UpdateKind::Trade);
        assert_eq!(tick.kind(), Some(UpdateKind::Trade));

        tick.set_kind(UpdateKind::Ask);
        assert_eq!(tick.kind(), Some(UpdateKind::Ask));

        assert_eq!(UpdateKind::from_raw(7), None);
    }

    #[test]
    fn test_symbol_round_trip_and_truncation() {
        let tick = MarketTick::new("BTCUSDT", UpdateKind::Trade);
        assert_eq!(tick.symbol_str(), "BTCUSDT");

        let long = MarketTick::new("AVERYLONGSYMBOLNAME", UpdateKind::Trade);
        assert_eq!(long.symbol_str().len(), SYMBOL_LEN);
        assert_eq!(long.symbol_str(), "AVERYLONGSYMBOLN");
    }

    #[test]
    fn test_zeroed_tick_is_valid() {
        let tick = MarketTick::zeroed();
        assert_eq!(tick.kind(), Some(UpdateKind::Trade));
        assert_eq!(tick.symbol_str(), "");
        assert_eq!(tick.update_id, 0);
    }
}
