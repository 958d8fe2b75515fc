//! Integration tests for the interrupt → button → heater path and the
//! sensor → diagnostic fault path, driven one step at a time.

use futures_lite::future::{block_on, poll_once};

use crate::mock_hw::{TestContext, make_ctx};
use seatheat::app::ports::Indicator;
use seatheat::control::heater::HeaterBands;
use seatheat::diagnostics::FaultCode;
use seatheat::isr::{self, PB1, PF0, PF4};
use seatheat::safety::{RangeEdge, RangeMonitor};
use seatheat::seat::{HeaterState, HeatingLevel, SeatId, SeatSnapshot};
use seatheat::tasks::button::{DRIVER_PRIMARY_BIT, DRIVER_SECONDARY_BIT, apply_heating_level, wait_for_press};
use seatheat::tasks::diagnostic::diagnostic_step;
use seatheat::tasks::heater::{HeaterActuation, heater_step};
use seatheat::tasks::sensor::sensor_step;

fn press_and_apply(ctx: &TestContext, seat: SeatId) -> i16 {
    block_on(async {
        wait_for_press(ctx, seat).await;
        apply_heating_level(ctx, seat).await
    })
}

fn sense(ctx: &TestContext, seat: SeatId) -> RangeEdge {
    let monitor = RangeMonitor::new(seat, ctx.config());
    block_on(sensor_step(ctx, &monitor, seat))
        .expect("unbounded push cannot time out")
        .edge
}

// ── Full driver scenario ──────────────────────────────────────

#[test]
fn press_heat_then_over_range_fault_is_archived() {
    let ctx = make_ctx();
    let bands = HeaterBands::default();
    let mut actuation = HeaterActuation::new();
    let seat = SeatId::Driver;

    // Off / 0 / 0 at start.
    assert_eq!(block_on(ctx.seat(seat).snapshot()), SeatSnapshot::default());

    // One driver edge on port F.
    let outcome = isr::on_port_f(&ctx, PF4);
    assert_eq!(outcome.cleared, PF4);
    assert_eq!(ctx.seat(seat).heating_level(), HeatingLevel::Low);
    assert_eq!(press_and_apply(&ctx, seat), 25);

    // Seat at 20 °C: delta 5 → Medium, indicator B only.
    ctx.temperature.set(seat, 20);
    assert_eq!(sense(&ctx, seat), RangeEdge::Steady);
    let cycle = block_on(heater_step(&ctx, &bands, &mut actuation, seat));
    assert_eq!(cycle.state, HeaterState::Medium);
    assert!(cycle.applied);
    assert_eq!(ctx.indicators.level_pattern(seat), (false, true));

    // 42 °C: exactly one OverRange record queued and signalled.
    ctx.temperature.set(seat, 42);
    assert_eq!(sense(&ctx, seat), RangeEdge::Raised(FaultCode::OverRange));
    assert!(ctx.seat(seat).fault_active());
    assert_eq!(ctx.fault_queue(seat).len(), 1);
    assert_eq!(ctx.fault_signal(seat).pending(), 1);

    // Diagnostic: heater forced off, record archived, fault LED lit.
    let (record, slot) = block_on(diagnostic_step(&ctx, seat)).expect("record archived");
    assert_eq!(record.fault_code, FaultCode::OverRange);
    assert_eq!(record.seat_id, seat);
    assert_eq!(record.heating_level_at_fault, HeatingLevel::Low);
    assert_eq!(slot.index, 0);
    assert_eq!(*block_on(ctx.seat(seat).heater_state.lock()), HeaterState::Off);
    assert_eq!(ctx.with_archive(|a| a.len()), 1);
    assert!(ctx.indicators.is_on(Indicator::fault(seat)));
    assert!(ctx.fault_queue(seat).is_empty());

    // Heater keeps it off while the fault lasts, and clears the level LEDs.
    let cycle = block_on(heater_step(&ctx, &bands, &mut actuation, seat));
    assert_eq!(cycle.state, HeaterState::Off);
    assert_eq!(ctx.indicators.level_pattern(seat), (false, false));
}

// ── Interrupt handling ────────────────────────────────────────

#[test]
fn four_edges_return_to_off() {
    let ctx = make_ctx();
    for _ in 0..4 {
        isr::on_port_f(&ctx, PF0);
    }
    assert_eq!(ctx.seat(SeatId::Passenger).heating_level(), HeatingLevel::Off);
    assert_eq!(press_and_apply(&ctx, SeatId::Passenger), 0);
    // The driver seat is untouched.
    assert_eq!(ctx.seat(SeatId::Driver).heating_level(), HeatingLevel::Off);
}

#[test]
fn driver_has_two_sources_one_task() {
    let ctx = make_ctx();
    isr::on_port_b(&ctx, PB1);
    let bits = block_on(wait_for_press(&ctx, SeatId::Driver));
    assert_eq!(bits, DRIVER_SECONDARY_BIT);

    // Both sources before the task runs: one wake, both bits, two steps.
    isr::on_port_f(&ctx, PF4);
    isr::on_port_b(&ctx, PB1);
    let bits = block_on(wait_for_press(&ctx, SeatId::Driver));
    assert_eq!(bits, DRIVER_PRIMARY_BIT | DRIVER_SECONDARY_BIT);
    assert_eq!(ctx.seat(SeatId::Driver).heating_level(), HeatingLevel::High);
    assert_eq!(block_on(apply_heating_level(&ctx, SeatId::Driver)), 35);
    assert_eq!(ctx.button_flags(SeatId::Driver).get(), 0);
}

#[test]
fn shared_port_handles_both_pins() {
    let ctx = make_ctx();
    let outcome = isr::on_port_f(&ctx, PF0 | PF4);
    assert_eq!(outcome.cleared, PF0 | PF4);
    assert_eq!(ctx.seat(SeatId::Driver).heating_level(), HeatingLevel::Low);
    assert_eq!(ctx.seat(SeatId::Passenger).heating_level(), HeatingLevel::Low);
}

#[test]
fn unrelated_pins_are_not_cleared() {
    let ctx = make_ctx();
    let outcome = isr::on_port_b(&ctx, 0b0000_0001);
    assert_eq!(outcome.cleared, 0);
    assert_eq!(ctx.seat(SeatId::Driver).heating_level(), HeatingLevel::Off);
}

#[test]
fn waking_a_parked_button_task_requests_reschedule() {
    let ctx = make_ctx();
    let mut wait = Box::pin(wait_for_press(&ctx, SeatId::Passenger));
    assert!(block_on(poll_once(wait.as_mut())).is_none());

    let outcome = isr::on_port_f(&ctx, PF0);
    assert!(outcome.reschedule);
    block_on(wait);

    // Nobody parked now.
    assert!(!isr::on_port_f(&ctx, PF0).reschedule);
}

// ── Sensor supervision ────────────────────────────────────────

#[test]
fn one_record_per_excursion() {
    let ctx = make_ctx();
    let seat = SeatId::Passenger;
    ctx.temperature.set(seat, 2);
    assert_eq!(sense(&ctx, seat), RangeEdge::Raised(FaultCode::UnderRange));
    for _ in 0..10 {
        assert_eq!(sense(&ctx, seat), RangeEdge::Steady);
    }
    assert_eq!(ctx.fault_queue(seat).len(), 1);
    assert_eq!(ctx.fault_signal(seat).pending(), 1);
}

#[test]
fn return_to_range_clears_fault_and_indicator() {
    let ctx = make_ctx();
    let seat = SeatId::Driver;
    ctx.temperature.set(seat, 55);
    sense(&ctx, seat);
    block_on(diagnostic_step(&ctx, seat)).expect("archived");
    assert!(ctx.indicators.is_on(Indicator::fault(seat)));

    ctx.temperature.set(seat, 40);
    assert_eq!(sense(&ctx, seat), RangeEdge::Cleared);
    assert!(!ctx.seat(seat).fault_active());
    assert!(!ctx.indicators.is_on(Indicator::fault(seat)));

    // A second excursion is a new record.
    ctx.temperature.set(seat, 41);
    assert_eq!(sense(&ctx, seat), RangeEdge::Raised(FaultCode::OverRange));
    assert_eq!(ctx.fault_signal(seat).pending(), 1);
}

#[test]
fn record_carries_clock_timestamp() {
    let ctx = make_ctx();
    ctx.clock.set(123_456);
    ctx.temperature.set(SeatId::Driver, 60);
    sense(&ctx, SeatId::Driver);
    let (record, _) = block_on(diagnostic_step(&ctx, SeatId::Driver)).expect("archived");
    assert_eq!(record.timestamp, 123_456);
}

#[test]
fn seats_are_independent() {
    let ctx = make_ctx();
    ctx.temperature.set(SeatId::Driver, 80);
    sense(&ctx, SeatId::Driver);
    sense(&ctx, SeatId::Passenger);
    assert!(ctx.seat(SeatId::Driver).fault_active());
    assert!(!ctx.seat(SeatId::Passenger).fault_active());
    assert!(ctx.fault_queue(SeatId::Passenger).is_empty());
}

// ── Heater actuation ──────────────────────────────────────────

#[test]
fn unchanged_state_skips_indicator_writes() {
    let ctx = make_ctx();
    let bands = HeaterBands::default();
    let mut actuation = HeaterActuation::new();
    let seat = SeatId::Passenger;

    // First cycle always applies, even Off.
    assert!(block_on(heater_step(&ctx, &bands, &mut actuation, seat)).applied);
    let writes = ctx.indicators.call_count();
    assert!(!block_on(heater_step(&ctx, &bands, &mut actuation, seat)).applied);
    assert_eq!(ctx.indicators.call_count(), writes);
}

#[test]
fn active_fault_always_reapplies() {
    let ctx = make_ctx();
    let bands = HeaterBands::default();
    let mut actuation = HeaterActuation::new();
    let seat = SeatId::Driver;
    ctx.temperature.set(seat, 99);
    sense(&ctx, seat);

    for _ in 0..3 {
        let cycle = block_on(heater_step(&ctx, &bands, &mut actuation, seat));
        assert_eq!(cycle.state, HeaterState::Off);
        assert!(cycle.applied);
    }
}

#[test]
fn level_off_keeps_heater_off() {
    let ctx = make_ctx();
    let bands = HeaterBands::default();
    let mut actuation = HeaterActuation::new();
    ctx.temperature.set(SeatId::Driver, 5);
    sense(&ctx, SeatId::Driver);
    let cycle = block_on(heater_step(&ctx, &bands, &mut actuation, SeatId::Driver));
    assert_eq!(cycle.state, HeaterState::Off);
}

#[test]
fn high_level_cold_seat_lights_both() {
    let ctx = make_ctx();
    let bands = HeaterBands::default();
    let mut actuation = HeaterActuation::new();
    let seat = SeatId::Driver;
    for _ in 0..3 {
        isr::on_port_f(&ctx, PF4);
    }
    press_and_apply(&ctx, seat);
    ctx.temperature.set(seat, 10);
    sense(&ctx, seat);
    let cycle = block_on(heater_step(&ctx, &bands, &mut actuation, seat));
    assert_eq!(cycle.state, HeaterState::High);
    assert_eq!(ctx.indicators.level_pattern(seat), (true, true));
}
