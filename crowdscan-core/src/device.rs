//! Device Identifiers and Sightings
//!
//! A sighting is what the radio layer hands to the aggregator: who was seen,
//! whether their identifier is known to be randomized, and how loud they were.
//!
//! `DeviceId` is an opaque 6-byte token. Equality and hashing are on the raw
//! bytes; the textual `AA:BB:CC:DD:EE:01` form exists for logs and tests only
//! and nothing in the aggregation path depends on it.

use core::fmt;
use core::str::FromStr;

use crate::errors::{CensusError, CensusResult};

/// Length of a device identifier in bytes
pub const DEVICE_ID_LEN: usize = 6;

/// Opaque identifier of an observed device
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeviceId([u8; DEVICE_ID_LEN]);

impl DeviceId {
    /// Wrap raw identifier bytes
    pub const fn new(bytes: [u8; DEVICE_ID_LEN]) -> Self {
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; DEVICE_ID_LEN] {
        &self.0
    }
}

impl From<[u8; DEVICE_ID_LEN]> for DeviceId {
    fn from(bytes: [u8; DEVICE_ID_LEN]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, byte) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(":")?;
            }
            write!(f, "{:02X}", byte)?;
        }
        Ok(())
    }
}

impl FromStr for DeviceId {
    type Err = CensusError;

    /// Parse `AA:BB:CC:DD:EE:01` or `aa-bb-cc-dd-ee-01`
    fn from_str(s: &str) -> CensusResult<Self> {
        let mut bytes = [0u8; DEVICE_ID_LEN];
        let mut groups = s.split(|c| c == ':' || c == '-');

        for byte in bytes.iter_mut() {
            let group = groups.next().ok_or(CensusError::InvalidDeviceId {
                reason: "expected 6 octets",
            })?;
            if group.len() != 2 || !group.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(CensusError::InvalidDeviceId {
                    reason: "octet must be two hex digits",
                });
            }
            *byte = u8::from_str_radix(group, 16).map_err(|_| CensusError::InvalidDeviceId {
                reason: "octet must be two hex digits",
            })?;
        }

        if groups.next().is_some() {
            return Err(CensusError::InvalidDeviceId {
                reason: "expected 6 octets",
            });
        }

        Ok(Self(bytes))
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for DeviceId {
    fn format(&self, fmt: defmt::Formatter) {
        let b = &self.0;
        defmt::write!(
            fmt,
            "{=u8:02X}:{=u8:02X}:{=u8:02X}:{=u8:02X}:{=u8:02X}:{=u8:02X}",
            b[0], b[1], b[2], b[3], b[4], b[5]
        )
    }
}

/// Classification of a sighting, supplied by the external classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum SightingCategory {
    /// Identifier persists across sessions
    Stable = 0,
    /// Identifier is intentionally randomized for privacy
    Randomized = 1,
}

impl SightingCategory {
    /// Map the classifier's "is randomized" flag onto a category
    pub const fn from_randomized(is_randomized: bool) -> Self {
        if is_randomized {
            Self::Randomized
        } else {
            Self::Stable
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Stable => "stable",
            Self::Randomized => "randomized",
        }
    }
}

impl From<bool> for SightingCategory {
    fn from(is_randomized: bool) -> Self {
        Self::from_randomized(is_randomized)
    }
}

/// One observed device event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Sighting {
    /// Who was seen
    pub device: DeviceId,
    /// Stable or randomized identifier
    pub category: SightingCategory,
    /// Received signal strength (dBm)
    pub rssi: i32,
}

impl Sighting {
    pub const fn new(device: DeviceId, category: SightingCategory, rssi: i32) -> Self {
        Self { device, category, rssi }
    }

    /// Build a sighting straight from the radio callback's tuple
    pub const fn from_radio(device: DeviceId, is_randomized: bool, rssi: i32) -> Self {
        Self::new(device, SightingCategory::from_randomized(is_randomized), rssi)
    }
}
