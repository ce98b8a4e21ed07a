//! Fixed-Size RSSI Histogram
//!
//! ## Overview
//!
//! Each slot keeps a distribution of received signal strengths per sighting
//! category. The distribution is a fixed array of `BINS` counters; the bin a
//! reading lands in is a pure function of the reading and the configured
//! range, so it can be tested on its own and reproduced by the collector.
//!
//! ## Bin Mapping
//!
//! ```text
//! bin = clamp(floor((value - min) / (max - min) × BINS), 0, BINS - 1)
//!
//! Reference range [-120, -40] dBm, 40 bins (2 dB per bin):
//!
//!   ≤ -120 ──► 0      -80 ──► 20      ≥ -42 ──► 39
//! ```
//!
//! Readings outside the range saturate into the nearest edge bin. A radio
//! that reports a nonsense value (a driver bug, a corrupted frame header)
//! skews one edge bin slightly instead of being rejected or panicking.
//!
//! The mapping is computed in integer arithmetic. `div_euclid` floors toward
//! negative infinity, so readings below the range produce a negative bin
//! before clamping rather than rounding up to bin 0 by accident.
//!
//! ## Memory Layout
//!
//! ```text
//! RssiHistogram<40>
//! ├── range: 8 bytes (two i32)
//! └── counts: 40 × 4 = 160 bytes
//! Total: 168 bytes, no heap
//! ```

use crate::constants::rssi::{RSSI_MAX_DBM, RSSI_MIN_DBM};
use crate::errors::{CensusError, CensusResult};

/// Signal-strength range covered by a histogram, in dBm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RssiRange {
    min: i32,
    max: i32,
}

impl RssiRange {
    /// Reference range: -120 dBm to -40 dBm
    pub const REFERENCE: Self = Self {
        min: RSSI_MIN_DBM,
        max: RSSI_MAX_DBM,
    };

    /// Create a range, rejecting empty or inverted bounds
    pub const fn new(min: i32, max: i32) -> CensusResult<Self> {
        if min >= max {
            return Err(CensusError::InvalidRssiRange { min, max });
        }
        Ok(Self { min, max })
    }

    pub const fn min(&self) -> i32 {
        self.min
    }

    pub const fn max(&self) -> i32 {
        self.max
    }

    /// Width of the range in dB
    ///
    /// Unsigned so that `[i32::MIN, i32::MAX]` has a width too.
    pub const fn span(&self) -> u32 {
        self.max.abs_diff(self.min)
    }

    /// Whether a reading falls inside `[min, max]` without clamping
    pub const fn contains(&self, value: i32) -> bool {
        value >= self.min && value <= self.max
    }
}

impl Default for RssiRange {
    fn default() -> Self {
        Self::REFERENCE
    }
}

/// Map a signal strength onto a bin in `[0, BINS - 1]`
///
/// Pure and total: every `i32` maps to a valid bin.
///
/// ```rust
/// use crowdscan_core::histogram::{bin_index, RssiRange};
///
/// let range = RssiRange::REFERENCE;
/// assert_eq!(bin_index::<40>(range, -120), 0);
/// assert_eq!(bin_index::<40>(range, -80), 20);
/// assert_eq!(bin_index::<40>(range, -40), 39);
/// assert_eq!(bin_index::<40>(range, 10), 39);
/// ```
pub const fn bin_index<const BINS: usize>(range: RssiRange, value: i32) -> usize {
    if BINS == 0 {
        return 0;
    }

    // i64 so that extreme i32 readings cannot overflow the product
    let offset = value as i64 - range.min as i64;
    let scaled = offset.saturating_mul(BINS as i64);
    let bin = scaled.div_euclid(range.span() as i64);

    if bin < 0 {
        0
    } else if bin >= BINS as i64 {
        BINS - 1
    } else {
        bin as usize
    }
}

/// Distribution of signal strengths over a fixed number of bins
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RssiHistogram<const BINS: usize> {
    range: RssiRange,
    counts: [u32; BINS],
}

impl<const BINS: usize> RssiHistogram<BINS> {
    const NONZERO_BINS: () = assert!(BINS > 0, "histogram needs at least one bin");

    /// Create an empty histogram over `range`
    pub const fn new(range: RssiRange) -> Self {
        let () = Self::NONZERO_BINS;
        Self {
            range,
            counts: [0; BINS],
        }
    }

    /// Count one reading
    ///
    /// Never fails. Out-of-range readings are counted in the nearest edge bin.
    pub fn record_value(&mut self, value: i32) {
        if !self.range.contains(value) {
            log_trace!(
                "RSSI {} outside [{}, {}], clamping to edge bin",
                value,
                self.range.min(),
                self.range.max()
            );
        }

        let bin = bin_index::<BINS>(self.range, value);
        self.counts[bin] = self.counts[bin].saturating_add(1);
    }

    /// Zero every bin
    pub fn reset(&mut self) {
        self.counts = [0; BINS];
    }

    /// Elementwise sum of two histograms
    ///
    /// Neither input is modified. Both must cover the same range; merging
    /// histograms with different bin edges is a logic error and panics.
    pub fn merge(&self, other: &Self) -> Self {
        let mut combined = self.clone();
        combined.merge_from(other);
        combined
    }

    /// In-place form of [`merge`](Self::merge), used by the aggregator fold
    pub(crate) fn merge_from(&mut self, other: &Self) {
        assert_eq!(
            self.range, other.range,
            "cannot merge histograms over different RSSI ranges"
        );

        for (acc, &count) in self.counts.iter_mut().zip(other.counts.iter()) {
            *acc = acc.saturating_add(count);
        }
    }

    /// Counter of one bin, `None` past the last bin
    pub fn count(&self, bin: usize) -> Option<u32> {
        self.counts.get(bin).copied()
    }

    pub fn counts(&self) -> &[u32; BINS] {
        &self.counts
    }

    /// Sum of all counters
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| c as u64).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }

    pub fn range(&self) -> RssiRange {
        self.range
    }

    pub const fn bin_count(&self) -> usize {
        BINS
    }
}

impl<const BINS: usize> Default for RssiHistogram<BINS> {
    fn default() -> Self {
        Self::new(RssiRange::REFERENCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::RSSI_BIN_COUNT;
    use proptest::prelude::*;

    type Hist = RssiHistogram<RSSI_BIN_COUNT>;

    fn hist_from(values: &[i32]) -> Hist {
        let mut h = Hist::default();
        for &v in values {
            h.record_value(v);
        }
        h
    }

    #[test]
    fn range_rejects_inverted_bounds() {
        assert!(RssiRange::new(-40, -120).is_err());
        assert!(RssiRange::new(-40, -40).is_err());
        assert_eq!(RssiRange::new(-120, -40).unwrap(), RssiRange::REFERENCE);
    }

    #[test]
    fn edges_map_to_edge_bins() {
        let r = RssiRange::REFERENCE;
        assert_eq!(bin_index::<40>(r, -120), 0);
        assert_eq!(bin_index::<40>(r, -40), 39);
        assert_eq!(bin_index::<40>(r, -121), 0);
        assert_eq!(bin_index::<40>(r, -39), 39);
        assert_eq!(bin_index::<40>(r, i32::MIN), 0);
        assert_eq!(bin_index::<40>(r, i32::MAX), 39);
    }

    #[test]
    fn interior_values() {
        let r = RssiRange::REFERENCE;
        // 2 dB per bin
        assert_eq!(bin_index::<40>(r, -80), 20);
        assert_eq!(bin_index::<40>(r, -119), 0);
        assert_eq!(bin_index::<40>(r, -118), 1);
        assert_eq!(bin_index::<40>(r, -42), 39);
        assert_eq!(bin_index::<40>(r, -43), 38);
    }

    #[test]
    fn uneven_span() {
        // 10 dB over 3 bins: edges at 3.33 and 6.66
        let r = RssiRange::new(0, 10).unwrap();
        assert_eq!(bin_index::<3>(r, 3), 0);
        assert_eq!(bin_index::<3>(r, 4), 1);
        assert_eq!(bin_index::<3>(r, 6), 1);
        assert_eq!(bin_index::<3>(r, 7), 2);
    }

    #[test]
    fn widest_range_maps_without_overflow() {
        let r = RssiRange::new(i32::MIN, i32::MAX).unwrap();
        assert_eq!(r.span(), u32::MAX);
        assert_eq!(bin_index::<40>(r, i32::MIN), 0);
        assert_eq!(bin_index::<40>(r, 0), 20);
        assert_eq!(bin_index::<40>(r, i32::MAX), 39);

        let mut h = RssiHistogram::<40>::new(r);
        h.record_value(-80);
        h.record_value(i32::MIN);
        assert_eq!(h.count(19), Some(1));
        assert_eq!(h.count(0), Some(1));
    }

    #[test]
    fn record_and_reset() {
        let mut h = hist_from(&[-120, -80, -80, -40, 0, -200]);
        assert_eq!(h.count(0), Some(2));
        assert_eq!(h.count(20), Some(2));
        assert_eq!(h.count(39), Some(2));
        assert_eq!(h.count(40), None);
        assert_eq!(h.total(), 6);

        h.reset();
        assert!(h.is_empty());
        assert_eq!(h, Hist::default());
    }

    #[test]
    fn merge_leaves_inputs_untouched() {
        let a = hist_from(&[-100, -60]);
        let b = hist_from(&[-60]);
        let merged = a.merge(&b);

        assert_eq!(merged.count(bin_index::<40>(RssiRange::REFERENCE, -60)), Some(2));
        assert_eq!(merged.total(), 3);
        assert_eq!(a.total(), 2);
        assert_eq!(b.total(), 1);
    }

    #[test]
    #[should_panic(expected = "different RSSI ranges")]
    fn merge_rejects_mismatched_ranges() {
        let a = Hist::default();
        let b = Hist::new(RssiRange::new(-100, -20).unwrap());
        let _ = a.merge(&b);
    }

    proptest! {
        #[test]
        fn prop_bin_always_in_bounds(value in any::<i32>(), a in any::<i32>(), b in any::<i32>()) {
            prop_assume!(a != b);
            let range = RssiRange::new(a.min(b), a.max(b)).unwrap();
            prop_assert!(bin_index::<RSSI_BIN_COUNT>(range, value) < RSSI_BIN_COUNT);
            prop_assert!(bin_index::<1>(range, value) == 0);
        }

        #[test]
        fn prop_bin_is_monotonic(a in -300i32..100, b in -300i32..100) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let r = RssiRange::REFERENCE;
            prop_assert!(bin_index::<RSSI_BIN_COUNT>(r, lo) <= bin_index::<RSSI_BIN_COUNT>(r, hi));
        }

        #[test]
        fn prop_merge_commutative(
            a in proptest::collection::vec(-130i32..-30, 0..50),
            b in proptest::collection::vec(-130i32..-30, 0..50),
        ) {
            let (ha, hb) = (hist_from(&a), hist_from(&b));
            prop_assert_eq!(ha.merge(&hb), hb.merge(&ha));
        }

        #[test]
        fn prop_merge_associative(
            a in proptest::collection::vec(-130i32..-30, 0..30),
            b in proptest::collection::vec(-130i32..-30, 0..30),
            c in proptest::collection::vec(-130i32..-30, 0..30),
        ) {
            let (ha, hb, hc) = (hist_from(&a), hist_from(&b), hist_from(&c));
            prop_assert_eq!(ha.merge(&hb).merge(&hc), ha.merge(&hb.merge(&hc)));
        }

        #[test]
        fn prop_total_counts_every_reading(values in proptest::collection::vec(any::<i32>(), 0..100)) {
            prop_assert_eq!(hist_from(&values).total(), values.len() as u64);
        }
    }
}
