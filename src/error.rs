//! Unified error types for the seat heater control core.
//!
//! A single `Error` enum that every subsystem converts into. Nothing in the
//! control loop has a caller to return to, so these errors surface only where
//! a task chose a bounded wait or where the archive rejects a record; the task
//! logs them and carries on. All variants are `Copy`.

use core::fmt;

use crate::seat::SeatId;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A bounded wait expired before its condition was met.
    Wait(WaitError),
    /// The diagnostic archive refused a record.
    Archive(ArchiveError),
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wait(e) => write!(f, "wait: {e}"),
            Self::Archive(e) => write!(f, "archive: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Wait errors
// ---------------------------------------------------------------------------

/// Which blocking point gave up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitError {
    /// Pushing a fault record into a full seat queue timed out.
    QueuePush(SeatId),
    /// Popping a fault record from an empty seat queue timed out.
    QueuePop(SeatId),
}

impl fmt::Display for WaitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::QueuePush(seat) => write!(f, "{seat} fault queue push timed out"),
            Self::QueuePop(seat) => write!(f, "{seat} fault queue pop timed out"),
        }
    }
}

impl From<WaitError> for Error {
    fn from(e: WaitError) -> Self {
        Self::Wait(e)
    }
}

// ---------------------------------------------------------------------------
// Archive errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveError {
    /// Every slot is written and the policy forbids overwriting.
    Full { capacity: usize },
}

impl fmt::Display for ArchiveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full { capacity } => write!(f, "full ({capacity} records)"),
        }
    }
}

impl From<ArchiveError> for Error {
    fn from(e: ArchiveError) -> Self {
        Self::Archive(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
