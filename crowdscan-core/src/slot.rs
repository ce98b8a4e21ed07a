//! One time-bounded accumulation unit of the sliding window
//!
//! A slot collects everything seen during one advance period: the distinct
//! stable identifiers, the distinct randomized identifiers, and one RSSI
//! histogram per category. Sets de-duplicate, histograms do not; a device
//! seen ten times is one set entry and ten histogram counts.

use alloc::collections::BTreeSet;

use crate::device::{DeviceId, Sighting, SightingCategory};
use crate::histogram::{RssiHistogram, RssiRange};

/// Sightings accumulated during one advance period
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot<const BINS: usize> {
    stable_devices: BTreeSet<DeviceId>,
    random_devices: BTreeSet<DeviceId>,
    stable_histogram: RssiHistogram<BINS>,
    random_histogram: RssiHistogram<BINS>,
}

impl<const BINS: usize> Slot<BINS> {
    /// Create an empty slot whose histograms cover `range`
    pub const fn new(range: RssiRange) -> Self {
        Self {
            stable_devices: BTreeSet::new(),
            random_devices: BTreeSet::new(),
            stable_histogram: RssiHistogram::new(range),
            random_histogram: RssiHistogram::new(range),
        }
    }

    /// Record one sighting
    ///
    /// Re-inserting a device already in the slot leaves the set unchanged
    /// but still counts the reading in the histogram.
    pub fn record_sighting(&mut self, device: DeviceId, category: SightingCategory, rssi: i32) {
        let (devices, histogram) = match category {
            SightingCategory::Stable => (&mut self.stable_devices, &mut self.stable_histogram),
            SightingCategory::Randomized => (&mut self.random_devices, &mut self.random_histogram),
        };

        devices.insert(device);
        histogram.record_value(rssi);
    }

    /// Convenience wrapper for a whole [`Sighting`]
    pub fn record(&mut self, sighting: &Sighting) {
        self.record_sighting(sighting.device, sighting.category, sighting.rssi);
    }

    /// Clear both sets and both histograms
    ///
    /// Callers hold exclusive access (`&mut self`), so no reader ever sees a
    /// half-cleared slot.
    pub fn reset(&mut self) {
        self.stable_devices.clear();
        self.random_devices.clear();
        self.stable_histogram.reset();
        self.random_histogram.reset();
    }

    pub fn stable_devices(&self) -> &BTreeSet<DeviceId> {
        &self.stable_devices
    }

    pub fn random_devices(&self) -> &BTreeSet<DeviceId> {
        &self.random_devices
    }

    pub fn stable_histogram(&self) -> &RssiHistogram<BINS> {
        &self.stable_histogram
    }

    pub fn random_histogram(&self) -> &RssiHistogram<BINS> {
        &self.random_histogram
    }

    /// Device set for one category
    pub fn devices(&self, category: SightingCategory) -> &BTreeSet<DeviceId> {
        match category {
            SightingCategory::Stable => &self.stable_devices,
            SightingCategory::Randomized => &self.random_devices,
        }
    }

    /// Histogram for one category
    pub fn histogram(&self, category: SightingCategory) -> &RssiHistogram<BINS> {
        match category {
            SightingCategory::Stable => &self.stable_histogram,
            SightingCategory::Randomized => &self.random_histogram,
        }
    }

    /// Distinct devices held by this slot, both categories
    pub fn device_count(&self) -> usize {
        self.stable_devices.len() + self.random_devices.len()
    }

    /// True when nothing has been recorded since creation or the last reset
    pub fn is_empty(&self) -> bool {
        self.stable_devices.is_empty()
            && self.random_devices.is_empty()
            && self.stable_histogram.is_empty()
            && self.random_histogram.is_empty()
    }

    pub fn range(&self) -> RssiRange {
        self.stable_histogram.range()
    }
}

impl<const BINS: usize> Default for Slot<BINS> {
    fn default() -> Self {
        Self::new(RssiRange::REFERENCE)
    }
}
