//! Synchronized Entry Point for Sightings, Rotation and Snapshots
//!
//! ## Overview
//!
//! Sightings arrive from the radio driver's receive callback, which can fire
//! at any moment relative to the main loop that rotates the window and
//! takes snapshots. Without synchronization a rotation could clear the
//! active slot while a sighting is half written into it: a lost histogram
//! increment, or a device present in the set but missing from the counts.
//!
//! ```text
//!  radio callback ──► ingest() ─────────┐
//!                                        ▼
//!  main loop ───────► advance_window() ─► RwLock<SlidingWindow>
//!                                        ▲
//!  reporter ────────► take_snapshot() ───┘ (read lock)
//! ```
//!
//! ## Locking Discipline
//!
//! The window, including its active index and every slot, is one critical
//! section behind a `spin::RwLock`:
//!
//! | Operation          | Lock  | Work inside the lock                      |
//! |--------------------|-------|-------------------------------------------|
//! | `ingest`           | write | one set insert, one histogram increment   |
//! | `advance_window`   | write | one index step, one slot clear            |
//! | `take_snapshot`    | read  | fold of `CAPACITY` slots                  |
//! | `tick`             | write | up to `CAPACITY + 1` rotations + one fold |
//!
//! Every critical section is bounded, so the callback never waits longer
//! than one of them. Concurrent snapshots share the read lock; none of them
//! overlaps a writer.
//!
//! A spin lock works without an OS and from any thread. On a single core,
//! a callback running in interrupt context that preempts a lock holder
//! would spin forever. With the `embedded` feature every critical section
//! runs inside `critical_section::with`, so the interrupt cannot fire while
//! the lock is held. Without it, an interrupt-context producer should use
//! [`IngestGateway::try_ingest`] and queue what comes back.
//!
//! ## Statistics
//!
//! Counters are atomics updated with `Relaxed` ordering outside any
//! correctness path. They saturate at `u32::MAX` like the histogram bins.
//! `ingested` lets a host check that nothing was dropped: between two
//! rotations of a fresh gateway, the snapshot's total sightings equals the
//! number of ingests, as long as neither has saturated.

use core::sync::atomic::{AtomicU32, Ordering};

use spin::RwLock;

use crate::aggregate::{AggregateSnapshot, Aggregator};
use crate::device::{DeviceId, Sighting, SightingCategory};
use crate::histogram::RssiRange;
use crate::schedule::{ScheduleTick, WindowSchedule};
use crate::time::TimeSource;
use crate::window::SlidingWindow;

/// Gateway activity counters
#[derive(Debug, Default)]
pub(crate) struct GatewayStats {
    ingested: AtomicU32,
    rotations: AtomicU32,
    snapshots: AtomicU32,
}

impl GatewayStats {
    const fn new() -> Self {
        Self {
            ingested: AtomicU32::new(0),
            rotations: AtomicU32::new(0),
            snapshots: AtomicU32::new(0),
        }
    }

    fn bump(counter: &AtomicU32, by: u32) {
        // The closure never returns None, so this cannot fail
        let _ = counter.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| {
            Some(n.saturating_add(by))
        });
    }

    fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            ingested: self.ingested.load(Ordering::Relaxed),
            rotations: self.rotations.load(Ordering::Relaxed),
            snapshots: self.snapshots.load(Ordering::Relaxed),
        }
    }
}

/// Gateway activity counters at one point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatsSnapshot {
    /// Sightings recorded
    pub ingested: u32,
    /// Window advances performed
    pub rotations: u32,
    /// Snapshots produced
    pub snapshots: u32,
}

/// Run `f` with interrupts masked
#[cfg(feature = "embedded")]
fn masked<R>(f: impl FnOnce() -> R) -> R {
    critical_section::with(|_| f())
}

#[cfg(not(feature = "embedded"))]
#[inline(always)]
fn masked<R>(f: impl FnOnce() -> R) -> R {
    f()
}

/// The only way the rest of the system touches a sliding window
///
/// ## Example
///
/// ```rust
/// use crowdscan_core::{ReferenceGateway, DeviceId, SightingCategory};
///
/// let gateway = ReferenceGateway::default();
/// let phone: DeviceId = "AA:BB:CC:DD:EE:01".parse().unwrap();
///
/// // Radio callback
/// gateway.ingest(phone, SightingCategory::Stable, -80);
///
/// // Main loop, once a minute
/// gateway.advance_window();
///
/// // Reporter, once per horizon
/// let snapshot = gateway.take_snapshot();
/// assert!(snapshot.unique_stable().contains(&phone));
/// ```
pub struct IngestGateway<const CAPACITY: usize, const BINS: usize> {
    window: RwLock<SlidingWindow<CAPACITY, BINS>>,
    stats: GatewayStats,
}

impl<const CAPACITY: usize, const BINS: usize> IngestGateway<CAPACITY, BINS> {
    /// Gateway over a fresh window whose histograms cover `range`
    pub fn new(range: RssiRange) -> Self {
        Self::from_window(SlidingWindow::new(range))
    }

    /// Take ownership of an existing window
    pub fn from_window(window: SlidingWindow<CAPACITY, BINS>) -> Self {
        Self {
            window: RwLock::new(window),
            stats: GatewayStats::new(),
        }
    }

    /// Record one sighting into the active slot
    ///
    /// Spins while another context holds the lock. Without the `embedded`
    /// feature, do not call this from an interrupt that can preempt the
    /// main loop on the same core; use [`try_ingest`](Self::try_ingest).
    pub fn ingest(&self, device: DeviceId, category: SightingCategory, rssi: i32) {
        masked(|| {
            self.window
                .write()
                .active_slot_mut()
                .record_sighting(device, category, rssi);
        });

        GatewayStats::bump(&self.stats.ingested, 1);
    }

    /// Record one sighting unless the window is locked right now
    ///
    /// Hands the sighting back instead of waiting, so a caller in interrupt
    /// context can queue it and retry from the main loop.
    pub fn try_ingest(&self, sighting: Sighting) -> Result<(), Sighting> {
        match self.window.try_write() {
            Some(mut window) => {
                window.active_slot_mut().record(&sighting);
                drop(window);
                GatewayStats::bump(&self.stats.ingested, 1);
                Ok(())
            }
            None => Err(sighting),
        }
    }

    pub fn ingest_sighting(&self, sighting: &Sighting) {
        self.ingest(sighting.device, sighting.category, sighting.rssi);
    }

    /// Rotate the window, evicting its oldest slot
    pub fn advance_window(&self) {
        masked(|| self.window.write().rotate());
        GatewayStats::bump(&self.stats.rotations, 1);
    }

    /// Aggregate every slot into an owned snapshot
    pub fn take_snapshot(&self) -> AggregateSnapshot<BINS> {
        let snapshot = masked(|| Aggregator::snapshot(&*self.window.read()));
        GatewayStats::bump(&self.stats.snapshots, 1);
        snapshot
    }

    /// Apply whatever the schedule says is due at the clock's current time
    ///
    /// When a report is due together with one or more advances, the
    /// snapshot is taken just before the last advance: it covers the
    /// `CAPACITY` periods that have just closed, and the fresh slot opened
    /// by the final rotation starts the next report period. Snapshotting
    /// after the last rotation would report one empty slot and drop the
    /// oldest closed period from every report.
    pub fn tick<T: TimeSource>(
        &self,
        schedule: &mut WindowSchedule,
        clock: &T,
    ) -> Option<AggregateSnapshot<BINS>> {
        let tick = schedule.poll(clock.now(), CAPACITY + 1);
        if tick.is_idle() {
            return None;
        }

        let snapshot = masked(|| self.apply(tick));

        if snapshot.is_some() {
            GatewayStats::bump(&self.stats.snapshots, 1);
        }
        let advances = u32::try_from(tick.advances).unwrap_or(u32::MAX);
        GatewayStats::bump(&self.stats.rotations, advances);

        snapshot
    }

    /// Rotations and snapshot for one tick, under one write lock
    fn apply(&self, tick: ScheduleTick) -> Option<AggregateSnapshot<BINS>> {
        let mut window = self.window.write();

        let before_report = if tick.report {
            tick.advances.saturating_sub(1)
        } else {
            tick.advances
        };
        for _ in 0..before_report {
            window.rotate();
        }

        if !tick.report {
            return None;
        }
        let snapshot = Aggregator::snapshot(&*window);
        if tick.advances > 0 {
            window.rotate();
        }
        Some(snapshot)
    }

    /// Read-only access to the window for diagnostics
    pub fn with_window<R>(&self, f: impl FnOnce(&SlidingWindow<CAPACITY, BINS>) -> R) -> R {
        masked(|| f(&*self.window.read()))
    }

    /// Current activity counters
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Release the window
    pub fn into_window(self) -> SlidingWindow<CAPACITY, BINS> {
        self.window.into_inner()
    }
}

impl<const CAPACITY: usize, const BINS: usize> Default for IngestGateway<CAPACITY, BINS> {
    fn default() -> Self {
        Self::new(RssiRange::REFERENCE)
    }
}
