//! Host clock adapter.
//!
//! Implements [`ClockPort`] with `std::time::Instant`, one tick per
//! microsecond since the adapter was created.

use std::time::Instant;

use crate::app::ports::ClockPort;

/// Monotonic microsecond clock for host runs.
pub struct HostClock {
    start: Instant,
}

impl Default for HostClock {
    fn default() -> Self {
        Self::new()
    }
}

impl HostClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl ClockPort for HostClock {
    fn now_ticks(&self) -> u64 {
        self.start.elapsed().as_micros() as u64
    }
}
