//! Common test utilities and sighting generators for integration tests
//!
//! This module provides:
//! - A deterministic RNG so failures reproduce
//! - Generators for realistic device populations (stable phones, devices
//!   rotating randomized identifiers, passers-by)
//! - Small helpers for building identifiers

#![allow(dead_code)]

use crowdscan_core::{DeviceId, Sighting, SightingCategory};

/// Xorshift RNG, deterministic across platforms
pub struct TestRng {
    state: u32,
}

impl TestRng {
    pub fn new(seed: u32) -> Self {
        // Xorshift never leaves the all-zero state
        Self { state: seed.max(1) }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 17;
        self.state ^= self.state << 5;
        self.state
    }

    /// Uniform integer in `[min, max)`
    pub fn gen_range(&mut self, min: i32, max: i32) -> i32 {
        let span = (max - min) as u32;
        min + (self.next_u32() % span) as i32
    }

    pub fn gen_bool(&mut self, p_true: f32) -> bool {
        ((self.next_u32() >> 8) as f32 / 16_777_216.0) < p_true
    }
}

/// Identifier with a fixed vendor prefix and a 16-bit serial
pub fn device(serial: u16) -> DeviceId {
    let [hi, lo] = serial.to_be_bytes();
    DeviceId::new([0x3C, 0x22, 0xFB, 0x00, hi, lo])
}

/// Randomized identifier: locally administered bit set in the first octet
pub fn randomized_device(serial: u16) -> DeviceId {
    let [hi, lo] = serial.to_be_bytes();
    DeviceId::new([0xDA, 0xA1, 0x19, 0x00, hi, lo])
}

pub fn parse(id: &str) -> DeviceId {
    id.parse().expect("test identifier must parse")
}

/// Simulated room of devices
///
/// - `residents` stable phones, always present, seen every minute
/// - `rotating` devices that pick a fresh randomized identifier each minute
/// - occasional passers-by seen once
pub struct PopulationGenerator {
    rng: TestRng,
    residents: u16,
    rotating: u16,
    minute: u16,
    next_passerby: u16,
}

impl PopulationGenerator {
    pub fn new(seed: u32, residents: u16, rotating: u16) -> Self {
        Self {
            rng: TestRng::new(seed),
            residents,
            rotating,
            minute: 0,
            next_passerby: 10_000,
        }
    }

    /// Sightings for one minute, probes repeated a few times per device
    pub fn minute(&mut self) -> Vec<Sighting> {
        let mut sightings = Vec::new();

        for r in 0..self.residents {
            let probes = 1 + self.rng.gen_range(0, 4);
            for _ in 0..probes {
                let rssi = self.rng.gen_range(-85, -45);
                sightings.push(Sighting::new(device(r), SightingCategory::Stable, rssi));
            }
        }

        for r in 0..self.rotating {
            let id = randomized_device(self.minute.wrapping_mul(256).wrapping_add(r));
            let rssi = self.rng.gen_range(-100, -55);
            sightings.push(Sighting::new(id, SightingCategory::Randomized, rssi));
        }

        if self.rng.gen_bool(0.3) {
            let rssi = self.rng.gen_range(-125, -90);
            sightings.push(Sighting::new(device(self.next_passerby), SightingCategory::Stable, rssi));
            self.next_passerby += 1;
        }

        self.minute += 1;
        sightings
    }
}
