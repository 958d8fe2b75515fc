//! Runtime task: periodic CPU load report.
//!
//! Uses a plain countdown between reports rather than a drift-free period,
//! so its phase slips by the time spent rendering. The report shares the
//! display-output lock with the display task.

use core::fmt::Write;

use embassy_time::{Duration, Timer};
use log::info;

use super::TaskId;
use super::display::{LINE_CAPACITY, SEPARATOR};
use crate::app::context::ControllerContext;
use crate::app::ports::{ClockPort, TextSink};

/// Compute the load and write one report block. Returns the percentage.
pub async fn runtime_step<T, C, I, S>(ctx: &ControllerContext<T, C, I, S>) -> u64
where
    C: ClockPort,
    S: TextSink,
{
    let load = ctx.accounting().cpu_load_percent(ctx.clock.now_ticks());
    let mut line: heapless::String<LINE_CAPACITY> = heapless::String::new();
    let _ = write!(line, "CPU Load is {}% ", load);
    let mut sink = ctx.display.lock().await;
    sink.write_line(SEPARATOR);
    sink.write_line("");
    sink.write_line(&line);
    load
}

/// Runtime task body. Never returns.
pub async fn runtime_task<T, C, I, S>(ctx: &ControllerContext<T, C, I, S>)
where
    C: ClockPort,
    S: TextSink,
{
    let period = Duration::from_millis(ctx.config().runtime_report_ms);
    info!("Runtime: reporting every {} ms", ctx.config().runtime_report_ms);
    loop {
        Timer::after(period).await;
        ctx.accounting().track(TaskId::Runtime, &ctx.clock, runtime_step(ctx)).await;
    }
}
