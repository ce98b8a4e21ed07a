//! Time sources for the window schedule
//!
//! The aggregator never reads a clock itself. The schedule asks a
//! `TimeSource` for the current time so the same logic runs against:
//! - A hardware millisecond counter (embedded main loop)
//! - The system clock (host builds)
//! - A fixed, manually advanced clock (tests and replay)

/// Timestamp in milliseconds since epoch (or device boot for monotonic)
pub type Timestamp = u64;

/// Source of time for the system
pub trait TimeSource {
    /// Get current timestamp in milliseconds
    fn now(&self) -> Timestamp;
}

/// System time source (requires std)
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTime;

#[cfg(feature = "std")]
impl TimeSource for SystemTime {
    fn now(&self) -> Timestamp {
        use std::time::{SystemTime as StdSystemTime, UNIX_EPOCH};

        StdSystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as Timestamp
    }
}

/// Manually driven time source for testing and replay
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedTime {
    timestamp: Timestamp,
}

impl FixedTime {
    pub fn new(timestamp: Timestamp) -> Self {
        Self { timestamp }
    }

    pub fn set(&mut self, timestamp: Timestamp) {
        self.timestamp = timestamp;
    }

    pub fn advance(&mut self, ms: u64) {
        self.timestamp = self.timestamp.saturating_add(ms);
    }
}

impl TimeSource for FixedTime {
    fn now(&self) -> Timestamp {
        self.timestamp
    }
}
