//! Button interrupt handlers.
//!
//! ```text
//!  PF0 ──┐                      ┌─ passenger level += 1 ─ PASSENGER_BIT ─▶ Button[passenger]
//!        ├─ on_port_f(pending) ─┤
//!  PF4 ──┘                      └─ driver level += 1 ──── DRIVER_PRIMARY_BIT ─┐
//!  PB1 ──── on_port_b(pending) ─── driver level += 1 ──── DRIVER_SECONDARY_BIT ┴▶ Button[driver]
//! ```
//!
//! Handlers run in interrupt context: they only touch atomics and the
//! event-flag groups, never a task lock, and never block.

use crate::app::context::ControllerContext;
use crate::app::ports::{EdgeInterruptPort, InterruptSource, IsrOutcome, PinMask};
use crate::seat::SeatId;
use crate::sync::EventBits;
use crate::tasks::button::{DRIVER_PRIMARY_BIT, DRIVER_SECONDARY_BIT, PASSENGER_BIT};

/// Port F pin 0: passenger button.
pub const PF0: PinMask = 1 << 0;
/// Port F pin 4: driver button.
pub const PF4: PinMask = 1 << 4;
/// Port B pin 1: second driver button.
pub const PB1: PinMask = 1 << 1;

/// One recognised edge: advance the seat's level, then notify its task.
fn button_edge<T, C, I, S>(ctx: &ControllerContext<T, C, I, S>, seat: SeatId, bit: EventBits) -> bool {
    ctx.seat(seat).advance_heating_level();
    ctx.button_flags(seat).set_from_isr(bit)
}

/// Port F handler.
pub fn on_port_f<T, C, I, S>(ctx: &ControllerContext<T, C, I, S>, pending: PinMask) -> IsrOutcome {
    let mut outcome = IsrOutcome::default();
    if pending & PF0 != 0 {
        outcome.reschedule |= button_edge(ctx, SeatId::Passenger, PASSENGER_BIT);
        outcome.cleared |= PF0;
    }
    if pending & PF4 != 0 {
        outcome.reschedule |= button_edge(ctx, SeatId::Driver, DRIVER_PRIMARY_BIT);
        outcome.cleared |= PF4;
    }
    outcome
}

/// Port B handler.
pub fn on_port_b<T, C, I, S>(ctx: &ControllerContext<T, C, I, S>, pending: PinMask) -> IsrOutcome {
    let mut outcome = IsrOutcome::default();
    if pending & PB1 != 0 {
        outcome.reschedule |= button_edge(ctx, SeatId::Driver, DRIVER_SECONDARY_BIT);
        outcome.cleared |= PB1;
    }
    outcome
}

/// Arm both ports and route them to the handlers above.
pub fn install<T, C, I, S, P>(ctx: &'static ControllerContext<T, C, I, S>, port: &mut P)
where
    T: 'static,
    C: 'static,
    I: 'static,
    S: 'static,
    ControllerContext<T, C, I, S>: Sync,
    P: EdgeInterruptPort,
{
    port.configure_edge_interrupt(
        InterruptSource::PortF,
        PF0 | PF4,
        Box::new(move |pending| on_port_f(ctx, pending)),
    );
    port.configure_edge_interrupt(
        InterruptSource::PortB,
        PB1,
        Box::new(move |pending| on_port_b(ctx, pending)),
    );
}
