//! Sensor task: sample, store, supervise range.
//!
//! Runs every `sensor_period_ms` on a drift-free ticker. On the rising edge
//! of an excursion it queues exactly one [`FaultRecord`], latches
//! `fault_active` and posts one permit to the seat's fault signal, in that
//! order. When the reading comes back it clears the latch and the seat's
//! fault indicator.

use embassy_time::{Duration, Ticker};
use log::{info, warn};

use super::TaskId;
use crate::app::context::ControllerContext;
use crate::app::ports::{ClockPort, Indicator, IndicatorPort, TemperaturePort};
use crate::diagnostics::FaultRecord;
use crate::error::{Result, WaitError};
use crate::safety::{RangeEdge, RangeMonitor};
use crate::seat::{Celsius, SeatId};
use crate::sync::bounded;

/// Result of one sensor cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorSample {
    pub reading: Celsius,
    pub edge: RangeEdge,
}

/// One sensor cycle for `seat`.
pub async fn sensor_step<T, C, I, S>(
    ctx: &ControllerContext<T, C, I, S>,
    monitor: &RangeMonitor,
    seat: SeatId,
) -> Result<SensorSample>
where
    T: TemperaturePort,
    C: ClockPort,
    I: IndicatorPort,
{
    let state = ctx.seat(seat);
    let reading = {
        let mut current = state.current_temperature.lock().await;
        let reading = ctx.temperature.read_temperature(seat);
        *current = reading;
        reading
    };

    let edge = monitor.evaluate(state.fault_active(), reading);
    match edge {
        RangeEdge::Raised(fault_code) => {
            let record = FaultRecord {
                timestamp: ctx.clock.now_ticks(),
                fault_code,
                seat_id: seat,
                heating_level_at_fault: state.heating_level(),
            };
            let queued = bounded(ctx.push_bound(), ctx.fault_queue(seat).send(record)).await;
            // Latch even on a dropped record so the excursion is not re-reported.
            state.set_fault_active(true);
            if queued.is_err() {
                warn!("Sensor[{}]: fault queue full, record dropped", seat);
                return Err(WaitError::QueuePush(seat).into());
            }
            ctx.fault_signal(seat).signal();
        }
        RangeEdge::Cleared => {
            state.set_fault_active(false);
            ctx.indicators.set_indicator(Indicator::fault(seat), false);
        }
        RangeEdge::Steady => {}
    }
    Ok(SensorSample { reading, edge })
}

/// Sensor task body. Never returns.
pub async fn sensor_task<T, C, I, S>(ctx: &ControllerContext<T, C, I, S>, seat: SeatId)
where
    T: TemperaturePort,
    C: ClockPort,
    I: IndicatorPort,
{
    let monitor = RangeMonitor::new(seat, ctx.config());
    let mut ticker = Ticker::every(Duration::from_millis(ctx.config().sensor_period_ms));
    info!("Sensor[{}]: started ({} ms)", seat, ctx.config().sensor_period_ms);
    loop {
        let step = sensor_step(ctx, &monitor, seat);
        if let Err(e) = ctx.accounting().track(TaskId::Sensor(seat), &ctx.clock, step).await {
            warn!("Sensor[{}]: {}", seat, e);
        }
        ticker.next().await;
    }
}
