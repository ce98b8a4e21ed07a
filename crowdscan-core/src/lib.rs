//! Core aggregation engine for CrowdScan
//!
//! Turns a stream of wireless device sightings into rolling statistics over
//! a fixed time horizon: how many distinct stable and randomized identifiers
//! were seen, and how their signal strengths were distributed.
//!
//! Designed for the sniffer itself, not the collector:
//! - Fixed number of slots, oldest reused on every advance
//! - No allocation besides the per-slot device sets
//! - Safe to feed from a receive callback while the main loop rotates
//!
//! ```no_run
//! use crowdscan_core::{ReferenceGateway, Sighting, WindowSchedule};
//! use crowdscan_core::time::SystemTime;
//! # fn next_sighting() -> Option<Sighting> { None }
//!
//! let gateway = ReferenceGateway::default();
//! let clock = SystemTime;
//! let mut schedule = WindowSchedule::reference(crowdscan_core::time::TimeSource::now(&clock));
//!
//! loop {
//!     while let Some(sighting) = next_sighting() {
//!         gateway.ingest_sighting(&sighting);
//!     }
//!     if let Some(snapshot) = gateway.tick(&mut schedule, &clock) {
//!         let summary = snapshot.summary();
//!         // hand `summary` to the uploader
//!         # let _ = summary;
//!     }
//! }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

extern crate alloc;

#[macro_use]
mod macros;

pub mod aggregate;
pub mod constants;
pub mod device;
pub mod errors;
pub mod gateway;
pub mod histogram;
pub mod schedule;
pub mod slot;
pub mod time;
pub mod window;

// Public API
pub use aggregate::{AggregateSnapshot, Aggregator, WindowSummary};
pub use device::{DeviceId, Sighting, SightingCategory};
pub use errors::{CensusError, CensusResult};
pub use gateway::{IngestGateway, StatsSnapshot};
pub use histogram::{bin_index, RssiHistogram, RssiRange};
pub use schedule::{ScheduleTick, WindowSchedule};
pub use slot::Slot;
pub use window::SlidingWindow;

use constants::{RSSI_BIN_COUNT, WINDOW_CAPACITY};

/// Window in the reference configuration: 9 slots, 40 bins
pub type ReferenceWindow = SlidingWindow<WINDOW_CAPACITY, RSSI_BIN_COUNT>;

/// Gateway over a [`ReferenceWindow`]
pub type ReferenceGateway = IngestGateway<WINDOW_CAPACITY, RSSI_BIN_COUNT>;

/// Snapshot of a [`ReferenceWindow`]
pub type ReferenceSnapshot = AggregateSnapshot<RSSI_BIN_COUNT>;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
