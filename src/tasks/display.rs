//! Display task: render seat state to the text sink when it changes.
//!
//! The task keeps a private shadow of the six watched values (heating level,
//! temperature and heater state for both seats). A cycle where none of them
//! changed writes nothing. Blocks are written under the display-output lock
//! so they never interleave with the runtime report.

use core::fmt::Write;

use embassy_time::{Duration, Ticker};
use log::info;

use super::TaskId;
use crate::app::context::ControllerContext;
use crate::app::ports::{ClockPort, TextSink};
use crate::seat::{Celsius, HeaterState, HeatingLevel, SeatId};

pub const SEPARATOR: &str = "------------------------------------------------------------";

/// Longest rendered line, with headroom.
pub const LINE_CAPACITY: usize = 64;

/// The three watched values of one seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeatView {
    pub heating_level: HeatingLevel,
    pub temperature_c: Celsius,
    pub heater_state: HeaterState,
}

/// Last rendered values. Empty until the first render.
#[derive(Debug, Default)]
pub struct DisplayShadow {
    last: Option<[SeatView; 2]>,
}

impl DisplayShadow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `views` and report whether they differ from the last render.
    fn update(&mut self, views: [SeatView; 2]) -> bool {
        if self.last == Some(views) {
            return false;
        }
        self.last = Some(views);
        true
    }
}

/// Write one seat block: temperature, level, heater state, blank line.
fn render_seat<S: TextSink>(sink: &mut S, seat: SeatId, view: &SeatView) {
    let mut line: heapless::String<LINE_CAPACITY> = heapless::String::new();
    let _ = write!(line, "{} Current Temperature: {}\u{00b0}C", seat.label(), view.temperature_c);
    sink.write_line(&line);

    line.clear();
    let _ = write!(line, "{} Heating Level: {}", seat.label(), view.heating_level.label());
    sink.write_line(&line);

    line.clear();
    let _ = write!(line, "{} Heater State: {}", seat.label(), view.heater_state.label());
    sink.write_line(&line);

    sink.write_line("");
}

/// One display cycle. Returns `true` if a block was written.
pub async fn display_step<T, C, I, S>(ctx: &ControllerContext<T, C, I, S>, shadow: &mut DisplayShadow) -> bool
where
    S: TextSink,
{
    let mut views = [SeatView {
        heating_level: HeatingLevel::Off,
        temperature_c: 0,
        heater_state: HeaterState::Off,
    }; 2];
    for seat in SeatId::ALL {
        let snap = ctx.seat(seat).snapshot().await;
        views[seat.index()] = SeatView {
            heating_level: snap.heating_level,
            temperature_c: snap.current_temperature_c,
            heater_state: snap.heater_state,
        };
    }

    if !shadow.update(views) {
        return false;
    }

    let mut sink = ctx.display.lock().await;
    sink.write_line(SEPARATOR);
    for seat in SeatId::ALL {
        render_seat(&mut *sink, seat, &views[seat.index()]);
    }
    true
}

/// Display task body. Never returns.
pub async fn display_task<T, C, I, S>(ctx: &ControllerContext<T, C, I, S>)
where
    C: ClockPort,
    S: TextSink,
{
    let mut shadow = DisplayShadow::new();
    let mut ticker = Ticker::every(Duration::from_millis(ctx.config().display_period_ms));
    info!("Display: started ({} ms)", ctx.config().display_period_ms);
    loop {
        ctx.accounting()
            .track(TaskId::Display, &ctx.clock, display_step(ctx, &mut shadow))
            .await;
        ticker.next().await;
    }
}
