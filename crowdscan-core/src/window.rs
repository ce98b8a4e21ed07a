//! Fixed-Capacity Sliding Window of Slots
//!
//! ## Overview
//!
//! The window is a ring of `CAPACITY` slots with exactly one *active* slot.
//! Sightings are written to the active slot only. Every advance period the
//! ring rotates: the active pointer moves one step and the slot it lands on,
//! which is always the least recently active one, is cleared and reused.
//!
//! ```text
//! CAPACITY = 4, after 5 rotations:
//!
//! ┌──────┬──────┬──────┬──────┐
//! │ t-3  │ t-0  │ t-2  │ t-1  │   slots (t-0 = current period)
//! └──────┴──────┴──────┴──────┘
//!           ↑
//!        active = 1   next rotate() clears slot 2 (t-2 → oldest)
//! ```
//!
//! Rotation is the only operation that destroys data. There is no eviction
//! by timestamp; the round-robin order alone guarantees that nothing older
//! than `CAPACITY` periods is reachable, and memory never grows with uptime.
//!
//! ## Warm-Up
//!
//! A new window starts with every slot empty. Snapshots taken before
//! `CAPACITY` periods have elapsed cover less real time; the window does not
//! track or report this.
//!
//! ## Thread Safety
//!
//! Like [`Slot`], the window is plain data driven through `&mut self`.
//! Sharing it between the radio callback and the main loop goes through
//! [`IngestGateway`](crate::gateway::IngestGateway).

use core::array;

use crate::device::Sighting;
use crate::histogram::RssiRange;
use crate::slot::Slot;

/// Ring of `CAPACITY` slots with one active slot
#[derive(Debug, Clone)]
pub struct SlidingWindow<const CAPACITY: usize, const BINS: usize> {
    slots: [Slot<BINS>; CAPACITY],
    /// Always `< CAPACITY`
    active: usize,
}

impl<const CAPACITY: usize, const BINS: usize> SlidingWindow<CAPACITY, BINS> {
    const NONZERO_CAPACITY: () = assert!(CAPACITY > 0, "window needs at least one slot");

    /// Create a window of empty slots with slot 0 active
    pub fn new(range: RssiRange) -> Self {
        let () = Self::NONZERO_CAPACITY;
        Self {
            slots: array::from_fn(|_| Slot::new(range)),
            active: 0,
        }
    }

    /// Index of the slot currently accumulating sightings
    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active_slot(&self) -> &Slot<BINS> {
        &self.slots[self.active]
    }

    /// Mutable handle to the active slot, for the ingest path
    pub fn active_slot_mut(&mut self) -> &mut Slot<BINS> {
        &mut self.slots[self.active]
    }

    /// Record a sighting into the active slot
    pub fn record(&mut self, sighting: &Sighting) {
        self.active_slot_mut().record(sighting);
    }

    /// Advance to the next slot, clearing it
    ///
    /// The cleared slot held the oldest data in the window.
    pub fn rotate(&mut self) {
        assert!(self.active < CAPACITY, "active slot index out of range");

        self.active = (self.active + 1) % CAPACITY;
        self.slots[self.active].reset();

        log_debug!("window rotated, active slot {}", self.active);
    }

    /// All slots in storage order
    ///
    /// Storage order is not chronological; see [`iter_chronological`](Self::iter_chronological).
    pub fn slots(&self) -> &[Slot<BINS>; CAPACITY] {
        &self.slots
    }

    /// Slots from oldest to the active one
    pub fn iter_chronological(&self) -> impl Iterator<Item = &Slot<BINS>> + '_ {
        let start = (self.active + 1) % CAPACITY;
        (0..CAPACITY).map(move |offset| &self.slots[(start + offset) % CAPACITY])
    }

    pub const fn capacity(&self) -> usize {
        CAPACITY
    }

    pub fn range(&self) -> RssiRange {
        self.slots[0].range()
    }

    /// Device entries held across all slots
    ///
    /// A device present in several slots is counted once per slot; this is
    /// a memory figure, not a unique-device count.
    pub fn live_device_entries(&self) -> usize {
        self.slots.iter().map(Slot::device_count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Slot::is_empty)
    }
}

impl<const CAPACITY: usize, const BINS: usize> Default for SlidingWindow<CAPACITY, BINS> {
    fn default() -> Self {
        Self::new(RssiRange::REFERENCE)
    }
}
