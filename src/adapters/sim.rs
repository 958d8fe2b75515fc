//! Host simulation adapters.
//!
//! Stand-ins for the board collaborators so the full task set can run on a
//! development machine:
//!
//! - [`SimTemperature`]: per-seat readings injected through atomics.
//! - [`SimPin`]: an `embedded-hal` output pin that only remembers its level.
//! - [`SimInterrupts`]: records armed edge interrupts and fires them on
//!   demand from a stimulus thread.

use core::convert::Infallible;
use core::sync::atomic::{AtomicI16, Ordering};

use embedded_hal::digital::{ErrorType, OutputPin, StatefulOutputPin};
use log::{info, warn};

use crate::app::ports::{
    EdgeHandler, EdgeInterruptPort, InterruptSource, IsrOutcome, PinMask, TemperaturePort,
};
use crate::seat::{Celsius, SeatId};

// ── Temperature ──────────────────────────────────────────────

/// Injectable per-seat temperature readings.
pub struct SimTemperature {
    readings: [AtomicI16; 2],
}

impl SimTemperature {
    /// Both seats start at `initial_c`.
    pub const fn new(initial_c: Celsius) -> Self {
        Self {
            readings: [AtomicI16::new(initial_c), AtomicI16::new(initial_c)],
        }
    }

    /// Set the value the next read returns for `seat`.
    pub fn set(&self, seat: SeatId, celsius: Celsius) {
        self.readings[seat.index()].store(celsius, Ordering::Relaxed);
    }
}

impl TemperaturePort for SimTemperature {
    fn read_temperature(&self, seat: SeatId) -> Celsius {
        self.readings[seat.index()].load(Ordering::Relaxed)
    }
}

// ── Output pin ───────────────────────────────────────────────

/// Output pin that keeps its level in memory.
#[derive(Debug, Default)]
pub struct SimPin {
    high: bool,
}

impl ErrorType for SimPin {
    type Error = Infallible;
}

impl OutputPin for SimPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.high = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.high = true;
        Ok(())
    }
}

impl StatefulOutputPin for SimPin {
    fn is_set_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.high)
    }

    fn is_set_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.high)
    }
}

// ── Edge interrupts ──────────────────────────────────────────

struct ArmedLine {
    source: InterruptSource,
    pins: PinMask,
    handler: EdgeHandler,
}

/// Software interrupt controller.
#[derive(Default)]
pub struct SimInterrupts {
    lines: Vec<ArmedLine>,
}

impl SimInterrupts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise an edge on `pins` of `source`. Pins that were never armed are
    /// masked off. Returns `None` if nothing is armed on `source`.
    pub fn fire(&self, source: InterruptSource, pins: PinMask) -> Option<IsrOutcome> {
        let line = self.lines.iter().find(|l| l.source == source)?;
        let pending = pins & line.pins;
        if pending == 0 {
            return None;
        }
        let outcome = (line.handler)(pending);
        if outcome.cleared != pending {
            warn!("SimIrq: {:?} left 0b{:08b} pending", source, pending & !outcome.cleared);
        }
        Some(outcome)
    }
}

impl EdgeInterruptPort for SimInterrupts {
    fn configure_edge_interrupt(&mut self, source: InterruptSource, pins: PinMask, handler: EdgeHandler) {
        info!("SimIrq: armed {:?} pins 0b{:08b}", source, pins);
        self.lines.retain(|l| l.source != source);
        self.lines.push(ArmedLine {
            source,
            pins,
            handler,
        });
    }
}
