//! Advance and Report Scheduling
//!
//! ## Overview
//!
//! The window has two periodic drivers: one advances it every
//! `advance_ms`, the other takes a snapshot every `report_ms`. The main loop
//! of a sniffer polls far more often than either period, so this module
//! turns "what time is it now" into "how many advances are due, and is a
//! report due".
//!
//! ```text
//! advance_ms = 60 s, report_ms = 540 s
//!
//!  0      60     120    ...    480    540
//!  |──────|──────|──── ... ────|──────|
//!         ▲      ▲             ▲      ▲ advance + report
//! ```
//!
//! ## Drift
//!
//! Deadlines advance by whole periods from the start time, not from the
//! moment a poll happened to notice them. A loop that polls late by a few
//! milliseconds every period does not slowly shift the window boundaries.
//!
//! ## Stalls and Clock Jumps
//!
//! If the loop stalls for several periods, every missed advance is reported
//! at once (capped by the caller, since rotating a window more times than it
//! has slots only clears slots that are already empty). Missed reports are
//! collapsed into one. A clock that moves backwards re-anchors both
//! deadlines at the new time instead of waiting for the old time to return.

use crate::constants::time::{ADVANCE_INTERVAL_MS, REPORT_INTERVAL_MS};
use crate::errors::{CensusError, CensusResult};
use crate::time::Timestamp;

/// What a poll found due
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScheduleTick {
    /// Window advances due since the previous poll
    pub advances: usize,
    /// Whether a report period closed since the previous report
    pub report: bool,
}

impl ScheduleTick {
    /// Nothing to do
    pub fn is_idle(&self) -> bool {
        self.advances == 0 && !self.report
    }
}

/// Deadlines for window advances and reports
#[derive(Debug, Clone)]
pub struct WindowSchedule {
    advance_ms: u64,
    report_ms: u64,
    last_advance: Timestamp,
    last_report: Timestamp,
}

impl WindowSchedule {
    /// Create a schedule whose first periods start at `start`
    pub fn new(advance_ms: u64, report_ms: u64, start: Timestamp) -> CensusResult<Self> {
        if advance_ms == 0 {
            return Err(CensusError::InvalidInterval {
                reason: "advance interval must be non-zero",
            });
        }
        if report_ms == 0 {
            return Err(CensusError::InvalidInterval {
                reason: "report interval must be non-zero",
            });
        }

        Ok(Self {
            advance_ms,
            report_ms,
            last_advance: start,
            last_report: start,
        })
    }

    /// Reference schedule: advance every minute, report every full horizon
    pub fn reference(start: Timestamp) -> Self {
        Self {
            advance_ms: ADVANCE_INTERVAL_MS,
            report_ms: REPORT_INTERVAL_MS,
            last_advance: start,
            last_report: start,
        }
    }

    /// Work due at `now`
    ///
    /// `max_advances` bounds how many advances a single poll returns.
    pub fn poll(&mut self, now: Timestamp, max_advances: usize) -> ScheduleTick {
        if now < self.last_advance || now < self.last_report {
            log_warn!("clock moved backwards to {}, re-anchoring schedule", now);
            self.last_advance = now;
            self.last_report = now;
            return ScheduleTick::default();
        }

        let due = (now - self.last_advance) / self.advance_ms;
        self.last_advance += due * self.advance_ms;

        let advances = usize::try_from(due).unwrap_or(usize::MAX);
        let advances = if advances > max_advances {
            log_warn!(
                "main loop stalled for {} advance periods, applying {}",
                due,
                max_advances
            );
            max_advances
        } else {
            advances
        };

        let reports_due = (now - self.last_report) / self.report_ms;
        self.last_report += reports_due * self.report_ms;

        ScheduleTick {
            advances,
            report: reports_due > 0,
        }
    }

    /// Earliest time at which a poll can find something due
    pub fn next_deadline(&self) -> Timestamp {
        let advance = self.last_advance.saturating_add(self.advance_ms);
        let report = self.last_report.saturating_add(self.report_ms);
        advance.min(report)
    }

    /// Advance period in milliseconds
    pub fn advance_interval_ms(&self) -> u64 {
        self.advance_ms
    }

    pub fn report_interval_ms(&self) -> u64 {
        self.report_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_intervals() {
        assert!(WindowSchedule::new(0, 10, 0).is_err());
        assert!(WindowSchedule::new(10, 0, 0).is_err());
        assert!(WindowSchedule::new(10, 10, 0).is_ok());
    }

    #[test]
    fn nothing_due_before_first_period() {
        let mut schedule = WindowSchedule::reference(1_000);
        assert!(schedule.poll(1_000, 9).is_idle());
        assert!(schedule.poll(60_999, 9).is_idle());
        assert_eq!(schedule.next_deadline(), 61_000);
    }

    #[test]
    fn one_advance_per_period() {
        let mut schedule = WindowSchedule::reference(0);
        let tick = schedule.poll(60_000, 9);
        assert_eq!(tick, ScheduleTick { advances: 1, report: false });

        // Polled again inside the same period
        assert!(schedule.poll(119_999, 9).is_idle());
        assert_eq!(schedule.poll(120_000, 9).advances, 1);
    }

    #[test]
    fn late_polls_do_not_drift() {
        let mut schedule = WindowSchedule::new(100, 1_000, 0).unwrap();
        assert_eq!(schedule.poll(130, 9).advances, 1);
        // Next boundary is still 200, not 230
        assert_eq!(schedule.poll(200, 9).advances, 1);
        assert_eq!(schedule.next_deadline(), 300);
    }

    #[test]
    fn report_after_full_horizon() {
        let mut schedule = WindowSchedule::reference(0);
        for minute in 1..9u64 {
            let tick = schedule.poll(minute * 60_000, 9);
            assert_eq!(tick.advances, 1);
            assert!(!tick.report);
        }
        let tick = schedule.poll(9 * 60_000, 9);
        assert_eq!(tick, ScheduleTick { advances: 1, report: true });
    }

    #[test]
    fn stall_is_capped_and_reports_collapse() {
        let mut schedule = WindowSchedule::new(10, 30, 0).unwrap();
        let tick = schedule.poll(1_005, 4);
        assert_eq!(tick.advances, 4);
        assert!(tick.report);

        // Remaining missed periods were consumed, not queued
        assert!(schedule.poll(1_009, 4).is_idle());
        assert_eq!(schedule.poll(1_010, 4).advances, 1);
    }

    #[test]
    fn backwards_clock_reanchors() {
        let mut schedule = WindowSchedule::new(10, 100, 500).unwrap();
        assert!(schedule.poll(200, 9).is_idle());
        assert_eq!(schedule.next_deadline(), 210);
        assert_eq!(schedule.poll(210, 9).advances, 1);
    }
}
