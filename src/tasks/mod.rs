//! Controller tasks.
//!
//! Ten long-lived tasks, two per seat for each control role plus the two
//! observers. Each task is an endless async loop around a `*_step` function;
//! the step does one unit of work and is what tests drive directly.
//!
//! | Task        | Per seat | Priority | Trigger                      |
//! |-------------|----------|----------|------------------------------|
//! | Sensor      | yes      | 4        | drift-free period            |
//! | Button      | yes      | 3        | event-flag wait              |
//! | Diagnostic  | yes      | 2        | fault signal                 |
//! | Heater      | yes      | 1        | drift-free period            |
//! | Display     | no       | 1        | drift-free period            |
//! | Runtime     | no       | 1        | countdown delay              |
//!
//! The executor is cooperative, so priority decides spawn order (and with
//! it the order tasks are first polled) rather than preemption. Every await
//! point is a scheduling point.

pub mod accounting;
pub mod button;
pub mod diagnostic;
pub mod display;
pub mod heater;
pub mod runtime;
pub mod sensor;

use core::fmt;

use log::info;

use crate::app::context::ControllerContext;
use crate::app::ports::{ClockPort, IndicatorPort, TemperaturePort, TextSink};
use crate::seat::SeatId;

/// Identity of one task, with its priority and accounting tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskId {
    Sensor(SeatId),
    Button(SeatId),
    Diagnostic(SeatId),
    Heater(SeatId),
    Display,
    Runtime,
}

impl TaskId {
    pub const COUNT: usize = 10;

    /// Every task, highest priority first.
    pub const ALL: [TaskId; Self::COUNT] = [
        TaskId::Sensor(SeatId::Driver),
        TaskId::Sensor(SeatId::Passenger),
        TaskId::Button(SeatId::Driver),
        TaskId::Button(SeatId::Passenger),
        TaskId::Diagnostic(SeatId::Driver),
        TaskId::Diagnostic(SeatId::Passenger),
        TaskId::Heater(SeatId::Driver),
        TaskId::Heater(SeatId::Passenger),
        TaskId::Display,
        TaskId::Runtime,
    ];

    /// Accounting tag, `1..=10`.
    pub const fn tag(self) -> u8 {
        match self {
            Self::Sensor(s) => 1 + s.index() as u8,
            Self::Button(s) => 3 + s.index() as u8,
            Self::Diagnostic(s) => 5 + s.index() as u8,
            Self::Heater(s) => 7 + s.index() as u8,
            Self::Display => 9,
            Self::Runtime => 10,
        }
    }

    pub const fn index(self) -> usize {
        self.tag() as usize - 1
    }

    /// Higher runs first.
    pub const fn priority(self) -> u8 {
        match self {
            Self::Sensor(_) => 4,
            Self::Button(_) => 3,
            Self::Diagnostic(_) => 2,
            Self::Heater(_) | Self::Display | Self::Runtime => 1,
        }
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(s) => write!(f, "{} Sensor", s.label()),
            Self::Button(s) => write!(f, "{} Button", s.label()),
            Self::Diagnostic(s) => write!(f, "{} Diagnostic", s.label()),
            Self::Heater(s) => write!(f, "{} Heater", s.label()),
            Self::Display => write!(f, "Display Screen"),
            Self::Runtime => write!(f, "Run Time"),
        }
    }
}

/// Spawn all ten tasks on `executor`, highest priority first.
pub fn spawn_all<'a, T, C, I, S, const N: usize>(
    executor: &edge_executor::LocalExecutor<'a, N>,
    ctx: &'a ControllerContext<T, C, I, S>,
) where
    T: TemperaturePort,
    C: ClockPort,
    I: IndicatorPort,
    S: TextSink,
{
    for task in TaskId::ALL {
        info!("Spawning task '{}' (priority {}, tag {})", task, task.priority(), task.tag());
        match task {
            TaskId::Sensor(seat) => executor.spawn(sensor::sensor_task(ctx, seat)).detach(),
            TaskId::Button(seat) => executor.spawn(button::button_task(ctx, seat)).detach(),
            TaskId::Diagnostic(seat) => {
                executor.spawn(diagnostic::diagnostic_task(ctx, seat)).detach();
            }
            TaskId::Heater(seat) => executor.spawn(heater::heater_task(ctx, seat)).detach(),
            TaskId::Display => executor.spawn(display::display_task(ctx)).detach(),
            TaskId::Runtime => executor.spawn(runtime::runtime_task(ctx)).detach(),
        }
    }
}
