//! Integration tests for the display and runtime observers and for the full
//! task set running on the executor.

use embassy_time::{Duration, Timer};
use futures_lite::future::block_on;

use crate::mock_hw::{display_lines, make_ctx};
use seatheat::isr::{self, PF0};
use seatheat::safety::RangeMonitor;
use seatheat::seat::{HeatingLevel, SeatId};
use seatheat::tasks::display::{DisplayShadow, SEPARATOR, display_step};
use seatheat::tasks::runtime::runtime_step;
use seatheat::tasks::sensor::sensor_step;
use seatheat::tasks::{self, TaskId};

// ── Display ───────────────────────────────────────────────────

#[test]
fn display_renders_once_until_state_changes() {
    let ctx = make_ctx();
    let mut shadow = DisplayShadow::new();

    assert!(block_on(display_step(&ctx, &mut shadow)));
    let first = display_lines(&ctx);
    assert_eq!(first.len(), 9);
    assert_eq!(first[0], SEPARATOR);
    assert_eq!(first[1], "Driver Current Temperature: 0\u{00b0}C");
    assert_eq!(first[2], "Driver Heating Level: Off");
    assert_eq!(first[3], "Driver Heater State: Off");
    assert_eq!(first[4], "");
    assert_eq!(first[5], "Passenger Current Temperature: 0\u{00b0}C");

    // Nothing changed: no output.
    assert!(!block_on(display_step(&ctx, &mut shadow)));
    assert_eq!(display_lines(&ctx).len(), 9);

    // A new reading is a change.
    let monitor = RangeMonitor::new(SeatId::Passenger, ctx.config());
    ctx.temperature.set(SeatId::Passenger, 31);
    block_on(sensor_step(&ctx, &monitor, SeatId::Passenger)).expect("in range");
    assert!(block_on(display_step(&ctx, &mut shadow)));
    let lines = display_lines(&ctx);
    assert_eq!(lines.len(), 18);
    assert_eq!(lines[14], "Passenger Current Temperature: 31\u{00b0}C");
}

#[test]
fn desired_temperature_alone_is_not_watched() {
    let ctx = make_ctx();
    let mut shadow = DisplayShadow::new();
    block_on(display_step(&ctx, &mut shadow));

    *block_on(ctx.seat(SeatId::Driver).desired_temperature.lock()) = 30;
    assert!(!block_on(display_step(&ctx, &mut shadow)));

    // A level change is.
    isr::on_port_f(&ctx, PF0);
    assert!(block_on(display_step(&ctx, &mut shadow)));
    assert!(display_lines(&ctx).contains(&"Passenger Heating Level: Low".to_owned()));
}

// ── Runtime ───────────────────────────────────────────────────

#[test]
fn runtime_reports_integer_load() {
    let ctx = make_ctx();
    ctx.accounting().switched_in(TaskId::Display, 0);
    ctx.accounting().switched_out(TaskId::Display, 150);
    ctx.accounting().switched_in(TaskId::Sensor(SeatId::Driver), 400);
    ctx.accounting().switched_out(TaskId::Sensor(SeatId::Driver), 500);
    ctx.clock.set(1000);

    assert_eq!(block_on(runtime_step(&ctx)), 25);
    let lines = display_lines(&ctx);
    assert_eq!(lines.last().map(String::as_str), Some("CPU Load is 25% "));
    assert_eq!(lines.first().map(String::as_str), Some(SEPARATOR));
}

#[test]
fn runtime_load_is_zero_at_boot() {
    let ctx = make_ctx();
    assert_eq!(block_on(runtime_step(&ctx)), 0);
}

// ── Whole system on the executor ──────────────────────────────

#[test]
fn spawned_tasks_sample_render_and_apply_presses() {
    let ctx = make_ctx();
    ctx.temperature.set(SeatId::Driver, 24);
    isr::on_port_f(&ctx, PF0);

    let executor: edge_executor::LocalExecutor<'_, 16> = edge_executor::LocalExecutor::new();
    tasks::spawn_all(&executor, &ctx);
    block_on(executor.run(Timer::after(Duration::from_millis(600))));

    assert_eq!(*block_on(ctx.seat(SeatId::Driver).current_temperature.lock()), 24);
    assert_eq!(ctx.seat(SeatId::Passenger).heating_level(), HeatingLevel::Low);
    assert_eq!(*block_on(ctx.seat(SeatId::Passenger).desired_temperature.lock()), 25);
    assert!(display_lines(&ctx).contains(&"Driver Current Temperature: 24\u{00b0}C".to_owned()));
}
