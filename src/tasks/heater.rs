//! Heater task: derive intensity and drive the level indicators.
//!
//! Every `heater_period_ms` the task takes the seat locks in the standard
//! order, computes the new heater state and stores it. Indicator writes
//! happen after the locks are released and are skipped when the state
//! matches what was last applied, except while a fault is active.

use embassy_time::{Duration, Ticker};
use log::{debug, info};

use super::TaskId;
use crate::app::context::ControllerContext;
use crate::app::ports::{ClockPort, Indicator, IndicatorKind, IndicatorPort};
use crate::control::heater::{HeaterBands, HeaterInputs, IndicatorPattern, heater_intensity};
use crate::seat::{HeaterState, SeatId};

/// Per-task memory of the last pattern written to the indicators.
#[derive(Debug, Default)]
pub struct HeaterActuation {
    /// `None` until the first cycle, so the first state is always applied.
    last_applied: Option<HeaterState>,
}

impl HeaterActuation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_applied(&self) -> Option<HeaterState> {
        self.last_applied
    }
}

/// Outcome of one heater cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaterCycle {
    pub state: HeaterState,
    /// Indicators were written this cycle.
    pub applied: bool,
}

/// One heater cycle for `seat`.
pub async fn heater_step<T, C, I, S>(
    ctx: &ControllerContext<T, C, I, S>,
    bands: &HeaterBands,
    actuation: &mut HeaterActuation,
    seat: SeatId,
) -> HeaterCycle
where
    I: IndicatorPort,
{
    let state = ctx.seat(seat);
    let (next, fault_active) = {
        let desired = state.desired_temperature.lock().await;
        let mut heater = state.heater_state.lock().await;
        let heating_level = state.heating_level();
        let current = state.current_temperature.lock().await;
        let fault_active = state.fault_active();
        let next = heater_intensity(
            HeaterInputs {
                heating_level,
                desired_c: *desired,
                current_c: *current,
                fault_active,
                previous: *heater,
            },
            bands,
        );
        *heater = next;
        (next, fault_active)
    };

    let applied = fault_active || actuation.last_applied != Some(next);
    if applied {
        let pattern = IndicatorPattern::for_state(next);
        ctx.indicators
            .set_indicator(Indicator::new(seat, IndicatorKind::LevelA), pattern.a);
        ctx.indicators
            .set_indicator(Indicator::new(seat, IndicatorKind::LevelB), pattern.b);
        if actuation.last_applied != Some(next) {
            debug!("Heater[{}]: {}", seat, next.label());
        }
        actuation.last_applied = Some(next);
    }
    HeaterCycle {
        state: next,
        applied,
    }
}

/// Heater task body. Never returns.
pub async fn heater_task<T, C, I, S>(ctx: &ControllerContext<T, C, I, S>, seat: SeatId)
where
    C: ClockPort,
    I: IndicatorPort,
{
    let bands = ctx.heater_bands();
    let mut actuation = HeaterActuation::new();
    let mut ticker = Ticker::every(Duration::from_millis(ctx.config().heater_period_ms));
    info!("Heater[{}]: started ({} ms)", seat, ctx.config().heater_period_ms);
    loop {
        ctx.accounting()
            .track(TaskId::Heater(seat), &ctx.clock, heater_step(ctx, &bands, &mut actuation, seat))
            .await;
        ticker.next().await;
    }
}
