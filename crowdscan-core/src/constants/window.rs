//! Sliding Window Sizing
//!
//! Slot count of the reference configuration.

/// Number of slots in the reference sliding window.
///
/// With one slot per advance period, this is also the horizon in minutes:
/// - 9 slots × 60 s = 9 minute horizon
/// - Each slot holds two device sets and two histograms
/// - Rotation reuses the oldest slot, so memory never grows with uptime
///
/// Source: reference sniffer firmware (`BUFFER_SIZE`)
pub const WINDOW_CAPACITY: usize = 9;

