//! Constants for CrowdScan Core
//!
//! Reference configuration of the aggregator, in one place. The three values
//! that shape memory use (`WINDOW_CAPACITY`, `RSSI_BIN_COUNT` and the
//! `RSSI_MIN_DBM`/`RSSI_MAX_DBM` range) are compile-time constants; the
//! generic types in this crate take them as const parameters so other
//! configurations can be built alongside the reference one.
//!
//! ## Organization
//!
//! - **Window**: slot count
//! - **Rssi**: histogram range and resolution
//! - **Time**: advance and report periods

/// Slot count.
pub mod window;

/// RSSI histogram range and resolution.
pub mod rssi;

/// Advance/report periods and unit conversions.
pub mod time;

pub use window::WINDOW_CAPACITY;

pub use rssi::{RSSI_BIN_COUNT, RSSI_MAX_DBM, RSSI_MIN_DBM};

pub use time::{ADVANCE_INTERVAL_MS, REPORT_INTERVAL_MS, MS_PER_MINUTE};
