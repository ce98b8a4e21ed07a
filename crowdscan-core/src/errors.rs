//! Error Types for Configuration and Parsing
//!
//! ## Design Philosophy
//!
//! The aggregation hot path has no error surface at all. Recording a sighting,
//! rotating the window and taking a snapshot are infallible:
//!
//! - Device identifiers are opaque tokens, any 6 bytes are valid.
//! - Out-of-range signal strengths are clamped into an edge bin, not rejected.
//! - Inserting a device that is already present is a defined no-op.
//!
//! Errors therefore only appear where a value is *constructed* from untrusted
//! input: an RSSI range, a textual device identifier, a schedule period.
//!
//! Like every error on a constrained target, `CensusError` is small and `Copy`,
//! with `&'static str` reasons instead of owned strings.
//!
//! ## Invariant Violations
//!
//! A broken internal invariant (an active index outside the window, merging
//! histograms built over different ranges) is a logic defect. Those are
//! `assert!`ed and panic; they are never returned as a `CensusError`.
//!
//! ```rust
//! use crowdscan_core::{CensusError, histogram::RssiRange};
//!
//! match RssiRange::new(-40, -120) {
//!     Ok(_) => unreachable!(),
//!     Err(CensusError::InvalidRssiRange { min, max }) => {
//!         assert_eq!((min, max), (-40, -120));
//!     }
//!     Err(_) => unreachable!(),
//! }
//! ```

use thiserror_no_std::Error;

/// Result type for construction and parsing
pub type CensusResult<T> = Result<T, CensusError>;

/// Configuration and parsing errors
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CensusError {
    /// Histogram range is empty or inverted
    #[error("RSSI range [{min}, {max}] is empty")]
    InvalidRssiRange {
        /// Requested lower bound (dBm)
        min: i32,
        /// Requested upper bound (dBm)
        max: i32,
    },

    /// Textual device identifier could not be parsed
    #[error("Invalid device identifier: {reason}")]
    InvalidDeviceId {
        reason: &'static str,
    },

    /// Schedule period is unusable
    #[error("Invalid interval: {reason}")]
    InvalidInterval {
        reason: &'static str,
    },
}

#[cfg(feature = "defmt")]
impl defmt::Format for CensusError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::InvalidRssiRange { min, max } =>
                defmt::write!(fmt, "RSSI range [{}, {}] is empty", min, max),
            Self::InvalidDeviceId { reason } =>
                defmt::write!(fmt, "Invalid device id: {}", reason),
            Self::InvalidInterval { reason } =>
                defmt::write!(fmt, "Invalid interval: {}", reason),
        }
    }
}
