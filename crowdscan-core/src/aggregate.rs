//! Aggregation of a Sliding Window into a Snapshot
//!
//! ## Overview
//!
//! A snapshot folds every slot of a window into one value:
//!
//! ```text
//! uniqueStable    = ⋃ slot.stableDevices        (set union)
//! uniqueRandom    = ⋃ slot.randomDevices
//! histogramStable = Σ slot.stableHistogram      (elementwise sum)
//! histogramRandom = Σ slot.randomHistogram
//! ```
//!
//! Union and elementwise sum are both commutative and associative, so the
//! result does not depend on the order slots are visited in. The fold starts
//! from storage order for convenience; nothing downstream relies on it.
//!
//! A snapshot is an owned value. It does not borrow the window and does not
//! follow later writes or rotations.
//!
//! ## Report Payload
//!
//! Collectors do not need the identifiers themselves, only how many there
//! were. [`WindowSummary`] is the compact, serializable form: two counts and
//! the two histograms, sized for the upload that follows each report period.

use alloc::collections::BTreeSet;

use crate::device::DeviceId;
use crate::histogram::{RssiHistogram, RssiRange};
use crate::slot::Slot;
use crate::window::SlidingWindow;

/// Union of device sets and sum of histograms over a set of slots
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateSnapshot<const BINS: usize> {
    unique_stable: BTreeSet<DeviceId>,
    unique_random: BTreeSet<DeviceId>,
    histogram_stable: RssiHistogram<BINS>,
    histogram_random: RssiHistogram<BINS>,
}

impl<const BINS: usize> AggregateSnapshot<BINS> {
    /// Snapshot with no devices and zeroed histograms
    pub const fn empty(range: RssiRange) -> Self {
        Self {
            unique_stable: BTreeSet::new(),
            unique_random: BTreeSet::new(),
            histogram_stable: RssiHistogram::new(range),
            histogram_random: RssiHistogram::new(range),
        }
    }

    /// Fold any collection of slots, in any order
    pub fn from_slots<'a, I>(range: RssiRange, slots: I) -> Self
    where
        I: IntoIterator<Item = &'a Slot<BINS>>,
    {
        slots.into_iter().fold(Self::empty(range), |mut acc, slot| {
            acc.absorb(slot);
            acc
        })
    }

    /// Add one slot's contents
    pub fn absorb(&mut self, slot: &Slot<BINS>) {
        self.unique_stable.extend(slot.stable_devices().iter().copied());
        self.unique_random.extend(slot.random_devices().iter().copied());
        self.histogram_stable.merge_from(slot.stable_histogram());
        self.histogram_random.merge_from(slot.random_histogram());
    }

    /// Combine two snapshots
    pub fn merge(mut self, other: &Self) -> Self {
        self.unique_stable.extend(other.unique_stable.iter().copied());
        self.unique_random.extend(other.unique_random.iter().copied());
        self.histogram_stable.merge_from(&other.histogram_stable);
        self.histogram_random.merge_from(&other.histogram_random);
        self
    }

    pub fn unique_stable(&self) -> &BTreeSet<DeviceId> {
        &self.unique_stable
    }

    pub fn unique_random(&self) -> &BTreeSet<DeviceId> {
        &self.unique_random
    }

    pub fn histogram_stable(&self) -> &[u32; BINS] {
        self.histogram_stable.counts()
    }

    pub fn histogram_random(&self) -> &[u32; BINS] {
        self.histogram_random.counts()
    }

    /// Sightings counted across both histograms
    pub fn total_sightings(&self) -> u64 {
        self.histogram_stable.total() + self.histogram_random.total()
    }

    /// No devices and no readings
    ///
    /// A window that has not warmed up and a window over an empty room look
    /// the same here.
    pub fn is_empty(&self) -> bool {
        self.unique_stable.is_empty()
            && self.unique_random.is_empty()
            && self.histogram_stable.is_empty()
            && self.histogram_random.is_empty()
    }

    pub fn range(&self) -> RssiRange {
        self.histogram_stable.range()
    }

    /// Compact payload for the reporting collaborator
    pub fn summary(&self) -> WindowSummary<BINS> {
        WindowSummary {
            unique_stable: saturating_u32(self.unique_stable.len()),
            unique_random: saturating_u32(self.unique_random.len()),
            histogram_stable: self.histogram_stable().iter().copied().collect(),
            histogram_random: self.histogram_random().iter().copied().collect(),
        }
    }
}

fn saturating_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

/// Read-only fold of a window into a snapshot
#[derive(Debug, Clone, Copy, Default)]
pub struct Aggregator;

impl Aggregator {
    /// Merge every slot of `window`
    ///
    /// Pure: the window is only read.
    pub fn snapshot<const CAPACITY: usize, const BINS: usize>(
        window: &SlidingWindow<CAPACITY, BINS>,
    ) -> AggregateSnapshot<BINS> {
        let snapshot = AggregateSnapshot::from_slots(window.range(), window.slots().iter());

        log_debug!(
            "snapshot: {} stable, {} randomized, {} sightings",
            snapshot.unique_stable().len(),
            snapshot.unique_random().len(),
            snapshot.total_sightings()
        );

        snapshot
    }
}

/// Counts and histograms of one snapshot, as uploaded
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WindowSummary<const BINS: usize> {
    /// Distinct stable identifiers in the window
    pub unique_stable: u32,
    /// Distinct randomized identifiers in the window
    pub unique_random: u32,
    /// Per-bin count of stable sightings
    pub histogram_stable: heapless::Vec<u32, BINS>,
    /// Per-bin count of randomized sightings
    pub histogram_random: heapless::Vec<u32, BINS>,
}

impl<const BINS: usize> WindowSummary<BINS> {
    pub fn unique_total(&self) -> u32 {
        self.unique_stable.saturating_add(self.unique_random)
    }
}
