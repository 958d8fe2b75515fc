//! Diagnostic task: react to a seat fault.
//!
//! Woken once per queued fault record. Forces the heater off, moves the
//! oldest record from the seat's queue into the shared archive and lights
//! the seat's fault indicator. The indicator is lit even when the archive
//! refuses the record; the fault itself is real.

use log::{error, info, warn};

use super::TaskId;
use crate::app::context::ControllerContext;
use crate::app::ports::{ClockPort, Indicator, IndicatorPort};
use crate::diagnostics::{ArchiveSlot, FaultRecord};
use crate::error::{Error, Result, WaitError};
use crate::seat::{HeaterState, SeatId};
use crate::sync::bounded;

/// Handle one fault after the signal has been consumed.
pub async fn handle_fault<T, C, I, S>(ctx: &ControllerContext<T, C, I, S>, seat: SeatId) -> Result<(FaultRecord, ArchiveSlot)>
where
    I: IndicatorPort,
{
    *ctx.seat(seat).heater_state.lock().await = HeaterState::Off;

    let record = bounded(ctx.pop_bound(), ctx.fault_queue(seat).receive())
        .await
        .map_err(|_| WaitError::QueuePop(seat))?;

    let archived = ctx.with_archive(|archive| archive.append(record));
    ctx.indicators.set_indicator(Indicator::fault(seat), true);

    let slot = archived?;
    error!(
        "Diagnostic[{}]: fault 0x{:02X} seat 0x{:02X} level {} at {} archived in slot {} (#{})",
        seat,
        record.fault_code.code(),
        record.seat_id.code(),
        record.heating_level_at_fault.label(),
        record.timestamp,
        slot.index,
        slot.sequence
    );
    if let Some(old) = slot.evicted {
        warn!(
            "Diagnostic[{}]: archive wrapped, dropped {} record from t={}",
            seat, old.fault_code, old.timestamp
        );
    }
    Ok((record, slot))
}

/// Wait for the seat's fault signal, then handle one fault.
pub async fn diagnostic_step<T, C, I, S>(ctx: &ControllerContext<T, C, I, S>, seat: SeatId) -> Result<(FaultRecord, ArchiveSlot)>
where
    I: IndicatorPort,
{
    ctx.fault_signal(seat).wait().await;
    handle_fault(ctx, seat).await
}

/// Diagnostic task body. Never returns.
pub async fn diagnostic_task<T, C, I, S>(ctx: &ControllerContext<T, C, I, S>, seat: SeatId)
where
    C: ClockPort,
    I: IndicatorPort,
{
    info!("Diagnostic[{}]: waiting for faults", seat);
    loop {
        ctx.fault_signal(seat).wait().await;
        let handled = handle_fault(ctx, seat);
        match ctx.accounting().track(TaskId::Diagnostic(seat), &ctx.clock, handled).await {
            Ok(_) => {}
            Err(Error::Archive(e)) => warn!("Diagnostic[{}]: record not archived: {}", seat, e),
            Err(e) => warn!("Diagnostic[{}]: {}", seat, e),
        }
    }
}
