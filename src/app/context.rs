//! Controller context: everything the tasks and interrupt handlers share.
//!
//! Built once at start-up and then only ever borrowed. There are no
//! globals; the binary leaks one context to `'static` and hands the
//! reference to every task and handler.
//!
//! ```text
//!            ┌──────────────────── ControllerContext ────────────────────┐
//!  ISR ─────▶│ seats[2]        button_flags[2]                           │
//!  Sensor ──▶│ fault_queues[2] fault_signals[2] ──▶ archive (shared)     │
//!  Heater ──▶│ temperature     clock            indicators               │
//!  Display ─▶│ display (output lock)            accounting               │
//!            └───────────────────────────────────────────────────────────┘
//! ```

use core::cell::RefCell;

use embassy_sync::blocking_mutex::Mutex as BlockingMutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

use super::ports::{ClockPort, IndicatorPort, TemperaturePort, TextSink};
use crate::config::{ConfigError, ControllerConfig};
use crate::control::heater::HeaterBands;
use crate::diagnostics::{DiagnosticArchive, FaultQueue};
use crate::seat::{FieldLock, SeatId, SeatState};
use crate::sync::{CountingSignal, EventFlags, WaitBound};
use crate::tasks::accounting::TaskAccounting;

/// Shared state and collaborators for both seats.
pub struct ControllerContext<T, C, I, S> {
    config: ControllerConfig,
    seats: [SeatState; 2],
    button_flags: [EventFlags; 2],
    fault_queues: [FaultQueue; 2],
    fault_signals: [CountingSignal; 2],
    /// Short critical sections only: appends and snapshots.
    archive: BlockingMutex<CriticalSectionRawMutex, RefCell<DiagnosticArchive>>,
    accounting: TaskAccounting,
    pub temperature: T,
    pub clock: C,
    pub indicators: I,
    /// Display-output lock shared by the display and runtime tasks.
    pub display: FieldLock<S>,
}

impl<T, C, I, S> ControllerContext<T, C, I, S>
where
    T: TemperaturePort,
    C: ClockPort,
    I: IndicatorPort,
    S: TextSink,
{
    /// Validate `config` and build zeroed state around the given ports.
    pub fn new(
        config: ControllerConfig,
        temperature: T,
        clock: C,
        indicators: I,
        display: S,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let archive = DiagnosticArchive::new(config.archive_policy);
        Ok(Self {
            config,
            seats: [SeatState::new(SeatId::Driver), SeatState::new(SeatId::Passenger)],
            button_flags: [EventFlags::new(), EventFlags::new()],
            fault_queues: [FaultQueue::new(), FaultQueue::new()],
            fault_signals: [CountingSignal::new(), CountingSignal::new()],
            archive: BlockingMutex::new(RefCell::new(archive)),
            accounting: TaskAccounting::new(),
            temperature,
            clock,
            indicators,
            display: FieldLock::new(display),
        })
    }
}

impl<T, C, I, S> ControllerContext<T, C, I, S> {
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn seat(&self, id: SeatId) -> &SeatState {
        &self.seats[id.index()]
    }

    /// Event-flag group the seat's button task waits on.
    pub fn button_flags(&self, id: SeatId) -> &EventFlags {
        &self.button_flags[id.index()]
    }

    pub fn fault_queue(&self, id: SeatId) -> &FaultQueue {
        &self.fault_queues[id.index()]
    }

    pub fn fault_signal(&self, id: SeatId) -> &CountingSignal {
        &self.fault_signals[id.index()]
    }

    pub fn accounting(&self) -> &TaskAccounting {
        &self.accounting
    }

    pub fn heater_bands(&self) -> HeaterBands {
        HeaterBands::from_config(&self.config)
    }

    /// Bound on a sensor task pushing into a full fault queue.
    pub fn push_bound(&self) -> WaitBound {
        WaitBound::from_millis(self.config.fault_push_timeout_ms)
    }

    /// Bound on a diagnostic task popping after a signal.
    pub fn pop_bound(&self) -> WaitBound {
        WaitBound::from_millis(self.config.fault_pop_timeout_ms)
    }

    /// Run `f` with exclusive access to the archive.
    pub fn with_archive<R>(&self, f: impl FnOnce(&mut DiagnosticArchive) -> R) -> R {
        self.archive.lock(|cell| f(&mut cell.borrow_mut()))
    }
}
