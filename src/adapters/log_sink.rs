//! Console adapters.
//!
//! [`StdoutSink`] implements [`TextSink`] for the display and runtime
//! reports. [`ConsoleLogger`] is the `log` backend installed by the host
//! binary; the library itself only ever uses the facade.

use std::io::Write;

use log::{LevelFilter, Log, Metadata, Record};

use crate::app::ports::TextSink;

/// Writes each line to stdout with a CRLF terminator, like the UART console.
#[derive(Default)]
pub struct StdoutSink;

impl StdoutSink {
    pub fn new() -> Self {
        Self
    }
}

impl TextSink for StdoutSink {
    fn write_line(&mut self, line: &str) {
        let mut out = std::io::stdout().lock();
        // Console output is best effort; a closed stdout is not a controller fault.
        let _ = write!(out, "{line}\r\n");
        let _ = out.flush();
    }
}

/// Minimal stderr logger: `[LEVEL target] message`.
pub struct ConsoleLogger {
    level: LevelFilter,
}

impl ConsoleLogger {
    pub const fn new(level: LevelFilter) -> Self {
        Self { level }
    }

    /// Install as the global `log` backend. Fails if one is already set.
    pub fn install(level: LevelFilter) -> Result<(), log::SetLoggerError> {
        let logger: &'static Self = Box::leak(Box::new(Self::new(level)));
        log::set_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }
}

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            eprintln!("[{:<5} {}] {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}
