//! Integration tests for schedule-driven operation
//!
//! Simulates the sniffer main loop with a fixed clock: sightings arrive
//! between polls, the schedule decides when to advance and when to report.

mod common;

use crowdscan_core::{
    constants::{ADVANCE_INTERVAL_MS, REPORT_INTERVAL_MS},
    time::{FixedTime, TimeSource},
    ReferenceGateway, SightingCategory, WindowSchedule,
};

use common::{device, PopulationGenerator};

/// Poll once per second for `minutes`, feeding one minute of sightings
/// spread over the first poll of each minute
fn run(
    gateway: &ReferenceGateway,
    schedule: &mut WindowSchedule,
    clock: &mut FixedTime,
    population: &mut PopulationGenerator,
    minutes: u32,
) -> Vec<(u64, crowdscan_core::ReferenceSnapshot)> {
    let mut reports = Vec::new();
    for _ in 0..minutes {
        for sighting in population.minute() {
            gateway.ingest_sighting(&sighting);
        }
        for _ in 0..60 {
            clock.advance(1_000);
            if let Some(snapshot) = gateway.tick(schedule, &*clock) {
                reports.push((clock.now(), snapshot));
            }
        }
    }
    reports
}

#[test]
fn reports_every_horizon() {
    let gateway = ReferenceGateway::default();
    let mut clock = FixedTime::new(0);
    let mut schedule = WindowSchedule::reference(clock.now());
    let mut population = PopulationGenerator::new(3, 6, 2);

    let reports = run(&gateway, &mut schedule, &mut clock, &mut population, 27);

    let times: Vec<u64> = reports.iter().map(|(t, _)| *t).collect();
    assert_eq!(times, vec![REPORT_INTERVAL_MS, 2 * REPORT_INTERVAL_MS, 3 * REPORT_INTERVAL_MS]);

    for (_, snapshot) in &reports {
        // 9 full minutes of rotating ids, 2 per minute
        assert_eq!(snapshot.unique_random().len(), 18);
        assert!(snapshot.unique_stable().len() >= 6);
    }

    assert_eq!(u64::from(gateway.stats().rotations), 27 * 60_000 / ADVANCE_INTERVAL_MS);
    assert_eq!(gateway.stats().snapshots, 3);
}

#[test]
fn stalled_loop_does_not_report_stale_devices() {
    let gateway = ReferenceGateway::default();
    let mut clock = FixedTime::new(0);
    let mut schedule = WindowSchedule::reference(clock.now());

    gateway.ingest(device(1), SightingCategory::Stable, -60);

    // Main loop blocked for an hour
    clock.advance(60 * 60_000);
    let snapshot = gateway.tick(&mut schedule, &clock).expect("report is overdue");
    assert!(snapshot.is_empty());

    // Back to normal: a sighting now shows up in the next report
    gateway.ingest(device(2), SightingCategory::Stable, -60);
    clock.advance(REPORT_INTERVAL_MS);
    let snapshot = gateway.tick(&mut schedule, &clock).expect("report due");
    assert_eq!(snapshot.unique_stable().len(), 1);
    assert!(snapshot.unique_stable().contains(&device(2)));
}
