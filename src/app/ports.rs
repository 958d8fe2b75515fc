//! Port traits: the boundary between the control core and the board.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ControllerContext (tasks)
//! ```
//!
//! Board adapters (ADC, indicator GPIO, UART, timers, port interrupts)
//! implement these traits. The [`ControllerContext`](super::context::ControllerContext)
//! holds them by value and the tasks reach them through it, so the core never
//! touches registers directly.
//!
//! ## Contract notes
//!
//! - Every port except [`TextSink`] is called through `&self` from several
//!   tasks, so implementations use interior mutability that never blocks.
//! - [`TextSink`] is only reached through the display-output lock and may be
//!   slow.
//! - None of these operations can fail from the core's point of view.

use crate::seat::{Celsius, SeatId};

// ───────────────────────────────────────────────────────────────
// Temperature port (board → core)
// ───────────────────────────────────────────────────────────────

/// Unconditional, non-blocking temperature read.
pub trait TemperaturePort {
    /// Integer degrees for one seat. Out-of-range values are returned as-is.
    fn read_temperature(&self, seat: SeatId) -> Celsius;
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Monotonic time source for fault timestamps and load accounting.
pub trait ClockPort {
    /// Ticks since boot. Never decreases.
    fn now_ticks(&self) -> u64;
}

// ───────────────────────────────────────────────────────────────
// Indicator port (core → board)
// ───────────────────────────────────────────────────────────────

/// Per-seat indicator role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorKind {
    /// Lit while a diagnostic fault is being reported.
    Fault,
    /// Intensity indicator A (Low, High).
    LevelA,
    /// Intensity indicator B (Medium, High).
    LevelB,
}

/// One physical indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Indicator {
    pub seat: SeatId,
    pub kind: IndicatorKind,
}

impl Indicator {
    pub const fn new(seat: SeatId, kind: IndicatorKind) -> Self {
        Self { seat, kind }
    }

    pub const fn fault(seat: SeatId) -> Self {
        Self::new(seat, IndicatorKind::Fault)
    }

    /// Dense index in `0..Indicator::COUNT`.
    pub const fn index(self) -> usize {
        let kind = match self.kind {
            IndicatorKind::Fault => 0,
            IndicatorKind::LevelA => 1,
            IndicatorKind::LevelB => 2,
        };
        self.seat.index() * 3 + kind
    }

    pub const COUNT: usize = 6;
}

/// Non-blocking indicator output.
pub trait IndicatorPort {
    fn set_indicator(&self, indicator: Indicator, on: bool);
}

// ───────────────────────────────────────────────────────────────
// Text sink (core → console)
// ───────────────────────────────────────────────────────────────

/// Line-oriented human-readable output. May be slow; never fails.
pub trait TextSink {
    fn write_line(&mut self, line: &str);
}

// ───────────────────────────────────────────────────────────────
// Edge interrupt port (setup only)
// ───────────────────────────────────────────────────────────────

/// Interrupt-capable GPIO port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InterruptSource {
    /// Carries the driver (pin 4) and passenger (pin 0) buttons.
    PortF,
    /// Carries the second driver button (pin 1).
    PortB,
}

/// Bit mask of pins on one port.
pub type PinMask = u8;

/// What a handler did with the pending edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IsrOutcome {
    /// Edge bits the handler acknowledged.
    pub cleared: PinMask,
    /// A task blocked on an event group was woken.
    pub reschedule: bool,
}

/// Handler invoked from interrupt context with the pending pin mask.
pub type EdgeHandler = Box<dyn Fn(PinMask) -> IsrOutcome + Send + Sync>;

/// Configures edge-triggered interrupts at start-up.
pub trait EdgeInterruptPort {
    /// Arm falling-edge interrupts for `pins` on `source` and route them to
    /// `handler`.
    fn configure_edge_interrupt(&mut self, source: InterruptSource, pins: PinMask, handler: EdgeHandler);
}
