//! Sensor range supervision.
//!
//! Each sensor task owns one [`RangeMonitor`] per seat and feeds it every
//! reading together with the seat's current `fault_active` flag. The monitor
//! reports edges only:
//!
//! 1. A reading leaves the valid range while no fault is active:
//!    [`RangeEdge::Raised`] with the fault direction. The caller queues one
//!    record and signals the diagnostic task.
//! 2. Further out-of-range readings: [`RangeEdge::Steady`]. No new record.
//! 3. A reading back inside the range while a fault is active:
//!    [`RangeEdge::Cleared`].
//!
//! A single excursion therefore produces at most one record no matter how
//! long it lasts.

use log::{error, info};

use crate::config::ControllerConfig;
use crate::diagnostics::FaultCode;
use crate::seat::{Celsius, SeatId};

/// Outcome of evaluating one reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeEdge {
    /// Reading left the valid range.
    Raised(FaultCode),
    /// Reading returned to the valid range.
    Cleared,
    /// No change in fault status.
    Steady,
}

/// Inclusive `[min, max]` range check with edge detection.
#[derive(Debug, Clone, Copy)]
pub struct RangeMonitor {
    seat: SeatId,
    min_c: Celsius,
    max_c: Celsius,
}

impl RangeMonitor {
    pub fn new(seat: SeatId, config: &ControllerConfig) -> Self {
        Self {
            seat,
            min_c: config.min_valid_temperature_c,
            max_c: config.max_valid_temperature_c,
        }
    }

    /// Fault direction for a reading, `None` when inside the range.
    pub fn classify(&self, reading: Celsius) -> Option<FaultCode> {
        if reading > self.max_c {
            Some(FaultCode::OverRange)
        } else if reading < self.min_c {
            Some(FaultCode::UnderRange)
        } else {
            None
        }
    }

    /// Compare a reading against the latched fault flag.
    pub fn evaluate(&self, fault_active: bool, reading: Celsius) -> RangeEdge {
        match (self.classify(reading), fault_active) {
            (Some(code), false) => {
                error!(
                    "SEAT FAULT SET: {} {} (0x{:02X}/0x{:02X}) at {}\u{00b0}C",
                    self.seat,
                    code,
                    code.code(),
                    self.seat.code(),
                    reading
                );
                RangeEdge::Raised(code)
            }
            (None, true) => {
                info!("SEAT FAULT CLEARED: {} at {}\u{00b0}C", self.seat, reading);
                RangeEdge::Cleared
            }
            _ => RangeEdge::Steady,
        }
    }
}
