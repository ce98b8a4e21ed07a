//! Simulated Census Example
//!
//! Runs the sniffer main loop against a simulated clock and a synthetic
//! crowd, printing each report the way an uploader would receive it.
//!
//! - 20 minutes of simulated time, one poll per second
//! - A few stable phones that stay all along
//! - Phones with randomized identifiers that change every couple of minutes
//! - A crowd that arrives at minute 10 and leaves at minute 14
//!
//! Run with: cargo run --example simulated_census

use crowdscan_core::{
    time::{FixedTime, TimeSource},
    DeviceId, ReferenceGateway, Sighting, WindowSchedule,
};

/// Xorshift, enough for a demo
struct Rng(u32);

impl Rng {
    fn next(&mut self) -> u32 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 17;
        self.0 ^= self.0 << 5;
        self.0
    }

    fn rssi(&mut self, near: bool) -> i32 {
        let spread = (self.next() % 20) as i32;
        if near { -55 - spread } else { -85 - spread }
    }
}

fn phone(group: u8, n: u16) -> DeviceId {
    let [hi, lo] = n.to_be_bytes();
    DeviceId::new([0x3C, 0x22, 0xFB, group, hi, lo])
}

fn main() {
    let gateway = ReferenceGateway::default();
    let mut clock = FixedTime::new(0);
    let mut schedule = WindowSchedule::reference(clock.now());
    let mut rng = Rng(0x2545_F491);

    for second in 0..20 * 60u64 {
        let minute = second / 60;

        // Radio callback: a handful of probes every few seconds
        if second % 5 == 0 {
            for n in 0..4 {
                gateway.ingest_sighting(&Sighting::from_radio(phone(0, n), false, rng.rssi(true)));
            }
            for n in 0..3u16 {
                // New randomized address every two minutes
                let id = phone(1, (minute / 2) as u16 * 16 + n);
                gateway.ingest_sighting(&Sighting::from_radio(id, true, rng.rssi(false)));
            }
            if (10..14).contains(&minute) {
                for n in 0..25 {
                    let randomized = n % 2 == 0;
                    gateway.ingest_sighting(&Sighting::from_radio(phone(2, n), randomized, rng.rssi(n < 10)));
                }
            }
        }

        clock.advance(1_000);
        if let Some(snapshot) = gateway.tick(&mut schedule, &clock) {
            let summary = snapshot.summary();
            println!(
                "t={:>4}s stable={:>3} random={:>3} sightings={}",
                clock.now() / 1_000,
                summary.unique_stable,
                summary.unique_random,
                snapshot.total_sightings()
            );
            println!("  stable  {:?}", &summary.histogram_stable[..]);
            println!("  random  {:?}", &summary.histogram_random[..]);
        }
    }

    let stats = gateway.stats();
    println!(
        "ingested {} sightings, {} rotations, {} reports",
        stats.ingested, stats.rotations, stats.snapshots
    );
}
