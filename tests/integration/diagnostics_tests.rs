//! Integration tests for the fault queue, the archive policies and the
//! optional wait bounds.

use futures_lite::future::{block_on, poll_once};

use crate::mock_hw::{TestContext, make_ctx, make_ctx_with};
use seatheat::app::ports::{ClockPort, Indicator};
use seatheat::config::{ArchivePolicy, ControllerConfig};
use seatheat::diagnostics::{FAULT_QUEUE_DEPTH, FaultCode};
use seatheat::error::{ArchiveError, Error, WaitError};
use seatheat::safety::{RangeEdge, RangeMonitor};
use seatheat::seat::{HeaterState, SeatId};
use seatheat::tasks::TaskId;
use seatheat::tasks::diagnostic::diagnostic_step;
use seatheat::tasks::sensor::sensor_step;

/// Drive one out-of-range excursion and its return, without draining.
fn excursion(ctx: &TestContext, seat: SeatId, reading: i16) -> seatheat::Result<()> {
    let monitor = RangeMonitor::new(seat, ctx.config());
    ctx.temperature.set(seat, reading);
    let raised = block_on(sensor_step(ctx, &monitor, seat));
    ctx.temperature.set(seat, 20);
    block_on(sensor_step(ctx, &monitor, seat))?;
    raised.map(|_| ())
}

#[test]
fn sixth_record_overwrites_oldest_by_default() {
    let ctx = make_ctx();
    for i in 0..6 {
        ctx.clock.set(i * 100);
        let seat = if i % 2 == 0 { SeatId::Driver } else { SeatId::Passenger };
        excursion(&ctx, seat, 45).expect("queued");
        block_on(diagnostic_step(&ctx, seat)).expect("ring accepts every record");
    }
    ctx.with_archive(|a| {
        assert_eq!(a.len(), 5);
        assert_eq!(a.cursor(), 6);
        let stamps: Vec<u64> = a.records().map(|r| r.timestamp).collect();
        assert_eq!(stamps, vec![100, 200, 300, 400, 500]);
        // Records from both seats share the archive in arrival order.
        assert_eq!(a.latest().map(|r| r.seat_id), Some(SeatId::Passenger));
    });
}

#[test]
fn sixth_record_rejected_under_reject_policy() {
    let ctx = make_ctx_with(ControllerConfig {
        archive_policy: ArchivePolicy::Reject,
        ..ControllerConfig::default()
    });
    let seat = SeatId::Driver;
    for _ in 0..5 {
        excursion(&ctx, seat, 45).expect("queued");
        block_on(diagnostic_step(&ctx, seat)).expect("room left");
    }
    excursion(&ctx, seat, 45).expect("queued");
    let err = block_on(diagnostic_step(&ctx, seat)).unwrap_err();
    assert_eq!(err, Error::Archive(ArchiveError::Full { capacity: 5 }));

    // The fault is still handled locally.
    assert!(ctx.indicators.is_on(Indicator::fault(seat)));
    assert_eq!(*block_on(ctx.seat(seat).heater_state.lock()), HeaterState::Off);
    ctx.with_archive(|a| {
        assert_eq!(a.len(), 5);
        assert_eq!(a.cursor(), 5);
        assert_eq!(a.rejected(), 1);
    });
}

#[test]
fn queue_holds_three_pending_records_per_seat() {
    let ctx = make_ctx();
    let seat = SeatId::Passenger;
    for _ in 0..FAULT_QUEUE_DEPTH {
        excursion(&ctx, seat, 1).expect("queued");
    }
    assert!(ctx.fault_queue(seat).is_full());
    assert_eq!(ctx.fault_signal(seat).pending(), 3);

    // Drained oldest first, one record per signal permit.
    for _ in 0..FAULT_QUEUE_DEPTH {
        block_on(diagnostic_step(&ctx, seat)).expect("archived");
    }
    assert!(ctx.fault_queue(seat).is_empty());
    assert_eq!(ctx.fault_signal(seat).pending(), 0);
    assert_eq!(ctx.with_archive(|a| a.len()), 3);
}

#[test]
fn bounded_push_reports_drop_and_stays_latched() {
    let ctx = make_ctx_with(ControllerConfig {
        fault_push_timeout_ms: Some(20),
        ..ControllerConfig::default()
    });
    let seat = SeatId::Driver;
    for _ in 0..FAULT_QUEUE_DEPTH {
        excursion(&ctx, seat, 50).expect("queued");
    }

    let monitor = RangeMonitor::new(seat, ctx.config());
    ctx.temperature.set(seat, 50);
    let err = block_on(sensor_step(&ctx, &monitor, seat)).unwrap_err();
    assert_eq!(err, Error::Wait(WaitError::QueuePush(seat)));
    assert!(ctx.seat(seat).fault_active());
    // No permit for a record that was never queued.
    assert_eq!(ctx.fault_signal(seat).pending(), 3);

    // Same excursion: no retry.
    assert!(block_on(sensor_step(&ctx, &monitor, seat)).is_ok());
}

#[test]
fn unbounded_push_waits_for_room_by_default() {
    let ctx = make_ctx();
    let seat = SeatId::Driver;
    for _ in 0..FAULT_QUEUE_DEPTH {
        excursion(&ctx, seat, 50).expect("queued");
    }

    let monitor = RangeMonitor::new(seat, ctx.config());
    ctx.temperature.set(seat, 50);
    let mut step = Box::pin(sensor_step(&ctx, &monitor, seat));
    assert!(block_on(poll_once(step.as_mut())).is_none());
    assert!(block_on(poll_once(step.as_mut())).is_none());

    // Parked before the record is queued: nothing latched, no extra permit.
    assert!(!ctx.seat(seat).fault_active());
    assert_eq!(ctx.fault_signal(seat).pending(), 3);

    // Draining one record lets the push through.
    block_on(diagnostic_step(&ctx, seat)).expect("archived");
    let sample = block_on(step).expect("push completes");
    assert_eq!(sample.edge, RangeEdge::Raised(FaultCode::OverRange));
    assert!(ctx.seat(seat).fault_active());
    assert!(ctx.fault_queue(seat).is_full());
    assert_eq!(ctx.fault_signal(seat).pending(), 3);
}

#[test]
fn sensor_parked_on_full_queue_is_not_busy() {
    let ctx = make_ctx();
    let seat = SeatId::Driver;
    let task = TaskId::Sensor(seat);
    for _ in 0..FAULT_QUEUE_DEPTH {
        excursion(&ctx, seat, 50).expect("queued");
    }

    let monitor = RangeMonitor::new(seat, ctx.config());
    ctx.temperature.set(seat, 50);
    let mut step = Box::pin(ctx.accounting().track(task, &ctx.clock, sensor_step(&ctx, &monitor, seat)));
    assert!(block_on(poll_once(step.as_mut())).is_none());

    // A long stall while the queue stays full.
    ctx.clock.advance(300_000);
    assert!(block_on(poll_once(step.as_mut())).is_none());
    ctx.clock.advance(300_000);

    block_on(diagnostic_step(&ctx, seat)).expect("archived");
    block_on(step).expect("push completes");

    // The clock never moved inside a poll.
    assert_eq!(ctx.accounting().busy_ticks(task), 0);
    assert_eq!(ctx.accounting().cpu_load_percent(ctx.clock.now_ticks()), 0);
}

#[test]
fn bounded_pop_reports_missing_record() {
    let ctx = make_ctx_with(ControllerConfig {
        fault_pop_timeout_ms: Some(20),
        ..ControllerConfig::default()
    });
    let seat = SeatId::Passenger;
    ctx.fault_signal(seat).signal();
    let err = block_on(diagnostic_step(&ctx, seat)).unwrap_err();
    assert_eq!(err, Error::Wait(WaitError::QueuePop(seat)));
    assert!(ctx.with_archive(|a| a.is_empty()));
}

#[test]
fn invalid_config_is_rejected_at_construction() {
    use seatheat::config::ConfigError;
    let result = seatheat::app::context::ControllerContext::new(
        ControllerConfig {
            min_valid_temperature_c: 50,
            ..ControllerConfig::default()
        },
        crate::mock_hw::MockTemperature::new(20),
        crate::mock_hw::MockClock::new(),
        crate::mock_hw::MockIndicators::new(),
        crate::mock_hw::RecordingSink::new(),
    );
    assert!(matches!(result, Err(ConfigError::ValidationFailed(_))));
}
