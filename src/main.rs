//! SeatHeat: host simulation entry point.
//!
//! Runs the full ten-task controller against simulated collaborators.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                     │
//! │                                                              │
//! │  SimTemperature   PinIndicators<SimPin>   StdoutSink         │
//! │  (Temperature)    (Indicator)             (TextSink)         │
//! │  HostClock        SimInterrupts           ConsoleLogger      │
//! │  (Clock)          (EdgeInterrupt)         (log backend)      │
//! │                                                              │
//! │  ─────────────── Port Trait Boundary ────────────────        │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │  ControllerContext (seats · queues · archive)          │  │
//! │  │  Sensor×2 · Button×2 · Diagnostic×2 · Heater×2         │  │
//! │  │  Display · Runtime     on edge_executor::LocalExecutor │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! │                                                              │
//! │  Stimulus thread: button edges + temperature script          │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Usage: `seatheat [config.json]`. Without a path the defaults are used.
#![deny(unused_must_use)]

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use log::{LevelFilter, info};

use seatheat::adapters::indicator::PinIndicators;
use seatheat::adapters::log_sink::{ConsoleLogger, StdoutSink};
use seatheat::adapters::sim::{SimInterrupts, SimPin, SimTemperature};
use seatheat::adapters::time::HostClock;
use seatheat::app::context::ControllerContext;
use seatheat::app::ports::{InterruptSource, PinMask};
use seatheat::config::ControllerConfig;
use seatheat::isr::{self, PB1, PF0, PF4};
use seatheat::seat::{Celsius, SeatId};
use seatheat::tasks;

type SimContext = ControllerContext<SimTemperature, HostClock, PinIndicators<SimPin>, StdoutSink>;

/// Ambient cabin temperature both seats start at.
const AMBIENT_C: Celsius = 18;

// ── Stimulus script ───────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
enum Stimulus {
    Press(InterruptSource, PinMask),
    Temperature(SeatId, Celsius),
}

/// Replayed forever: each step waits, then applies its stimulus.
const SCRIPT: &[(u64, Stimulus)] = &[
    (1000, Stimulus::Press(InterruptSource::PortF, PF4)),
    (500, Stimulus::Temperature(SeatId::Driver, 20)),
    (1000, Stimulus::Press(InterruptSource::PortB, PB1)),
    (1000, Stimulus::Press(InterruptSource::PortF, PF0)),
    (1000, Stimulus::Temperature(SeatId::Passenger, 21)),
    (2000, Stimulus::Temperature(SeatId::Driver, 27)),
    (2000, Stimulus::Temperature(SeatId::Driver, 42)),
    (2000, Stimulus::Temperature(SeatId::Driver, 29)),
    (1500, Stimulus::Temperature(SeatId::Passenger, 3)),
    (2000, Stimulus::Temperature(SeatId::Passenger, 24)),
    (1000, Stimulus::Press(InterruptSource::PortF, PF0 | PF4)),
    (1000, Stimulus::Press(InterruptSource::PortF, PF0)),
    (1000, Stimulus::Press(InterruptSource::PortF, PF0)),
    (2000, Stimulus::Temperature(SeatId::Driver, AMBIENT_C)),
    (0, Stimulus::Temperature(SeatId::Passenger, AMBIENT_C)),
];

fn run_stimulus(ctx: &'static SimContext, irq: &SimInterrupts) {
    loop {
        for &(delay_ms, stimulus) in SCRIPT {
            std::thread::sleep(Duration::from_millis(delay_ms));
            match stimulus {
                Stimulus::Press(source, pins) => {
                    if let Some(outcome) = irq.fire(source, pins) {
                        info!("Stimulus: {:?} edge 0b{:08b} -> {:?}", source, pins, outcome);
                    }
                }
                Stimulus::Temperature(seat, celsius) => {
                    info!("Stimulus: {} seat at {}\u{00b0}C", seat, celsius);
                    ctx.temperature.set(seat, celsius);
                }
            }
        }
        let archived = ctx.with_archive(|a| (a.len(), a.cursor()));
        info!("Stimulus: script pass done, archive {} held / {} total", archived.0, archived.1);
    }
}

// ── Configuration ─────────────────────────────────────────────

fn load_config() -> Result<ControllerConfig> {
    let Some(path) = std::env::args().nth(1) else {
        info!("Config: defaults");
        return Ok(ControllerConfig::default());
    };
    let text = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
    let config: ControllerConfig =
        serde_json::from_str(&text).with_context(|| format!("parsing {path}"))?;
    config.validate().with_context(|| format!("validating {path}"))?;
    info!("Config: loaded from {}", path);
    Ok(config)
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    ConsoleLogger::install(LevelFilter::Info).map_err(|e| anyhow!("logger: {e}"))?;

    info!("╔══════════════════════════════════════╗");
    info!("║  SeatHeat v{}                     ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    let config = load_config()?;

    // ── Context: built once, shared by reference forever ──────
    let ctx: &'static SimContext = Box::leak(Box::new(ControllerContext::new(
        config,
        SimTemperature::new(AMBIENT_C),
        HostClock::new(),
        PinIndicators::new(Default::default()),
        StdoutSink::new(),
    )?));

    // ── Interrupts + stimulus thread ──────────────────────────
    let mut irq = SimInterrupts::new();
    isr::install(ctx, &mut irq);
    std::thread::Builder::new()
        .name("stimulus".into())
        .spawn(move || run_stimulus(ctx, &irq))
        .context("spawning stimulus thread")?;

    // ── Tasks ─────────────────────────────────────────────────
    let executor: edge_executor::LocalExecutor<'_, 16> = edge_executor::LocalExecutor::new();
    tasks::spawn_all(&executor, ctx);

    info!("System ready. Entering executor.");
    futures_lite::future::block_on(executor.run(core::future::pending::<()>()));
    Ok(())
}
