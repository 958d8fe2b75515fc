//! Per-seat shared state.
//!
//! Each [`SeatState`] is built once at startup and borrowed by every task
//! for the life of the process. Fields touched by more than one task sit
//! behind their own async mutex so the sensor, button, heater and display
//! tasks never contend on a seat-wide lock.
//!
//! | Field                 | Writer(s)                 | Guard          |
//! |-----------------------|---------------------------|----------------|
//! | `heating_level`       | interrupt handler         | atomic         |
//! | `desired_temperature` | button task               | mutex          |
//! | `current_temperature` | sensor task               | mutex          |
//! | `heater_state`        | heater + diagnostic tasks | mutex          |
//! | `fault_active`        | sensor task               | atomic         |
//!
//! Multi-field readers take the mutexes in one fixed order, identical on
//! both seats: desired temperature → heater state → current temperature.
//! The heating level is read between the heater-state and current-temperature
//! acquisitions, where its lock used to sit. No guard is ever held across a
//! period delay, event wait, semaphore wait or queue wait.

use core::fmt;
use core::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use serde::{Deserialize, Serialize};

/// Integer degrees Celsius, as delivered by the temperature collaborator.
pub type Celsius = i16;

/// Async mutex used for every shared seat field.
pub type FieldLock<T> = Mutex<CriticalSectionRawMutex, T>;

// ═══════════════════════════════════════════════════════════════
//  Identifiers and levels
// ═══════════════════════════════════════════════════════════════

/// One of the two independent control zones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeatId {
    Driver,
    Passenger,
}

impl SeatId {
    pub const ALL: [SeatId; 2] = [SeatId::Driver, SeatId::Passenger];

    /// Array index used by the controller context.
    pub const fn index(self) -> usize {
        match self {
            Self::Driver => 0,
            Self::Passenger => 1,
        }
    }

    /// Seat code carried in fault log lines.
    pub const fn code(self) -> u8 {
        match self {
            Self::Driver => 0x66,
            Self::Passenger => 0x77,
        }
    }

    /// Capitalised name used by the display renderer.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Driver => "Driver",
            Self::Passenger => "Passenger",
        }
    }
}

impl fmt::Display for SeatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Driver => write!(f, "driver"),
            Self::Passenger => write!(f, "passenger"),
        }
    }
}

/// User-selected heating intent. Advanced one step per button edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum HeatingLevel {
    #[default]
    Off = 0,
    Low = 1,
    Medium = 2,
    High = 3,
}

impl HeatingLevel {
    /// Number of discrete levels; the interrupt handler advances modulo this.
    pub const COUNT: u8 = 4;

    pub const fn from_u8(raw: u8) -> Self {
        match raw % Self::COUNT {
            0 => Self::Off,
            1 => Self::Low,
            2 => Self::Medium,
            _ => Self::High,
        }
    }

    /// The level one button press later (High wraps to Off).
    pub const fn next(self) -> Self {
        Self::from_u8(self as u8 + 1)
    }

    /// Fixed setpoint lookup.
    pub const fn target_temperature_c(self) -> Celsius {
        match self {
            Self::Off => 0,
            Self::Low => 25,
            Self::Medium => 30,
            Self::High => 35,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Off => "Off",
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

/// Actuation intensity derived every heater cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum HeaterState {
    #[default]
    Off = 0,
    Low = 1,
    Medium = 2,
    High = 3,
}

impl HeaterState {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Off => "Off",
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

// ═══════════════════════════════════════════════════════════════
//  Shared seat state
// ═══════════════════════════════════════════════════════════════

/// Mutable state of one seat, shared by reference between tasks and ISRs.
pub struct SeatState {
    id: SeatId,
    /// Written from interrupt context, so lock-free.
    heating_level: AtomicU8,
    /// Single writer (sensor task), read by heater and display tasks.
    fault_active: AtomicBool,
    pub desired_temperature: FieldLock<Celsius>,
    pub heater_state: FieldLock<HeaterState>,
    pub current_temperature: FieldLock<Celsius>,
}

impl SeatState {
    /// All fields zeroed / Off.
    pub const fn new(id: SeatId) -> Self {
        Self {
            id,
            heating_level: AtomicU8::new(HeatingLevel::Off as u8),
            fault_active: AtomicBool::new(false),
            desired_temperature: Mutex::new(0),
            heater_state: Mutex::new(HeaterState::Off),
            current_temperature: Mutex::new(0),
        }
    }

    pub fn id(&self) -> SeatId {
        self.id
    }

    pub fn heating_level(&self) -> HeatingLevel {
        HeatingLevel::from_u8(self.heating_level.load(Ordering::Acquire))
    }

    /// Advance the heating level one step modulo 4 and return the new level.
    ///
    /// A single atomic read-modify-write: safe from interrupt context and
    /// never observed half-done by the button task.
    pub fn advance_heating_level(&self) -> HeatingLevel {
        let prev = self
            .heating_level
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |raw| {
                Some(HeatingLevel::from_u8(raw).next() as u8)
            })
            .unwrap_or_else(|raw| raw);
        HeatingLevel::from_u8(prev).next()
    }

    pub fn fault_active(&self) -> bool {
        self.fault_active.load(Ordering::Acquire)
    }

    pub(crate) fn set_fault_active(&self, active: bool) {
        self.fault_active.store(active, Ordering::Release);
    }

    /// Consistent copy of every field, taken under the standard lock order.
    pub async fn snapshot(&self) -> SeatSnapshot {
        let desired = self.desired_temperature.lock().await;
        let heater = self.heater_state.lock().await;
        let level = self.heating_level();
        let current = self.current_temperature.lock().await;
        SeatSnapshot {
            heating_level: level,
            desired_temperature_c: *desired,
            current_temperature_c: *current,
            heater_state: *heater,
            fault_active: self.fault_active(),
        }
    }
}

/// Point-in-time copy of a [`SeatState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeatSnapshot {
    pub heating_level: HeatingLevel,
    pub desired_temperature_c: Celsius,
    pub current_temperature_c: Celsius,
    pub heater_state: HeaterState,
    pub fault_active: bool,
}
