//! Time-Related Constants
//!
//! Unit conversions and the reference advance/report periods of the
//! sliding window.

use super::window::WINDOW_CAPACITY;

// ===== TIME UNIT CONVERSIONS =====

/// Milliseconds per second.
pub const MS_PER_SECOND: u64 = 1000;

/// Seconds per minute.
pub const SECONDS_PER_MINUTE: u64 = 60;

/// Milliseconds per minute.
pub const MS_PER_MINUTE: u64 = MS_PER_SECOND * SECONDS_PER_MINUTE;

// ===== WINDOW SCHEDULING =====

/// Period between two window advances (milliseconds).
///
/// Each slot accumulates one minute of sightings. Short enough that the
/// horizon slides smoothly, long enough that a slot holds a meaningful
/// sample of nearby devices.
///
/// Source: reference sniffer firmware (rotation every 60 s)
pub const ADVANCE_INTERVAL_MS: u64 = MS_PER_MINUTE;

/// Period between two reports (milliseconds).
///
/// One full horizon: every report covers data no other report has seen
/// in full, and nothing older than the horizon.
///
/// 9 slots × 60 s = 9 minutes
pub const REPORT_INTERVAL_MS: u64 = WINDOW_CAPACITY as u64 * ADVANCE_INTERVAL_MS;

