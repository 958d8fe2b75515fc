//! Button task: turn heating-level changes into a desired temperature.
//!
//! The interrupt handler has already advanced the level; this task only
//! refreshes the setpoint. The driver seat has two buttons on two ports,
//! each with its own event bit, and one task waiting on either.

use log::{debug, info};

use super::TaskId;
use crate::app::context::ControllerContext;
use crate::app::ports::ClockPort;
use crate::seat::{Celsius, SeatId};
use crate::sync::EventBits;

/// Driver button on port F, pin 4.
pub const DRIVER_PRIMARY_BIT: EventBits = 1 << 0;
/// Driver button on port B, pin 1.
pub const DRIVER_SECONDARY_BIT: EventBits = 1 << 1;
/// Passenger button on port F, pin 0.
pub const PASSENGER_BIT: EventBits = 1 << 0;

/// Bits the seat's button task waits on.
pub const fn button_mask(seat: SeatId) -> EventBits {
    match seat {
        SeatId::Driver => DRIVER_PRIMARY_BIT | DRIVER_SECONDARY_BIT,
        SeatId::Passenger => PASSENGER_BIT,
    }
}

/// Store the setpoint for the seat's current heating level.
pub async fn apply_heating_level<T, C, I, S>(ctx: &ControllerContext<T, C, I, S>, seat: SeatId) -> Celsius {
    let state = ctx.seat(seat);
    let level = state.heating_level();
    let target = level.target_temperature_c();
    *state.desired_temperature.lock().await = target;
    debug!("Button[{}]: level {} -> desired {}\u{00b0}C", seat, level.label(), target);
    target
}

/// Block until one of the seat's button bits is set. The bits are cleared.
pub async fn wait_for_press<T, C, I, S>(ctx: &ControllerContext<T, C, I, S>, seat: SeatId) -> EventBits {
    ctx.button_flags(seat).wait_any(button_mask(seat)).await
}

/// Button task body. Never returns.
pub async fn button_task<T, C: ClockPort, I, S>(ctx: &ControllerContext<T, C, I, S>, seat: SeatId) {
    info!("Button[{}]: waiting on mask 0b{:02b}", seat, button_mask(seat));
    loop {
        let bits = wait_for_press(ctx, seat).await;
        debug!("Button[{}]: woke on 0b{:02b}", seat, bits);
        ctx.accounting()
            .track(TaskId::Button(seat), &ctx.clock, apply_heating_level(ctx, seat))
            .await;
    }
}
