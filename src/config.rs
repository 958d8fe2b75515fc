//! Controller configuration parameters
//!
//! All tunable parameters for the seat heater core. Defaults are the
//! reference values; the host binary can override them from a JSON file.

use serde::{Deserialize, Serialize};

use crate::seat::Celsius;

/// What the archive does with a record once every slot is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArchivePolicy {
    /// Ring buffer: the oldest record is overwritten.
    OverwriteOldest,
    /// The record is rejected with `ArchiveError::Full` and logged.
    Reject,
}

/// Heater output when `0 <= desired - current < low_delta_c`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeadbandPolicy {
    /// Keep whatever heater state the seat already has.
    HoldPrevious,
    /// Switch the heater off.
    Off,
}

/// Core controller configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControllerConfig {
    // --- Timing ---
    /// Sensor task period (milliseconds)
    pub sensor_period_ms: u64,
    /// Heater task period (milliseconds)
    pub heater_period_ms: u64,
    /// Display task period (milliseconds)
    pub display_period_ms: u64,
    /// Runtime load report countdown (milliseconds)
    pub runtime_report_ms: u64,

    // --- Valid sensor range (inclusive) ---
    pub min_valid_temperature_c: Celsius,
    pub max_valid_temperature_c: Celsius,

    // --- Heater bands (desired - current) ---
    pub low_delta_c: Celsius,
    pub medium_delta_c: Celsius,
    pub high_delta_c: Celsius,
    pub deadband: DeadbandPolicy,

    // --- Diagnostics ---
    pub archive_policy: ArchivePolicy,

    // --- Wait bounds (None = wait forever) ---
    /// Bound on a sensor task pushing into a full fault queue.
    pub fault_push_timeout_ms: Option<u64>,
    /// Bound on a diagnostic task popping its fault queue after a signal.
    pub fault_pop_timeout_ms: Option<u64>,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            // Timing
            sensor_period_ms: 100,
            heater_period_ms: 250,
            display_period_ms: 500,
            runtime_report_ms: 5000,

            // Valid range
            min_valid_temperature_c: 5,
            max_valid_temperature_c: 40,

            // Heater bands
            low_delta_c: 2,
            medium_delta_c: 5,
            high_delta_c: 10,
            deadband: DeadbandPolicy::HoldPrevious,

            // Diagnostics
            archive_policy: ArchivePolicy::OverwriteOldest,

            // Unbounded, like the reference system
            fault_push_timeout_ms: None,
            fault_pop_timeout_ms: None,
        }
    }
}

impl ControllerConfig {
    /// Reject values that would make the control loop meaningless.
    /// Invalid ranges are rejected, never clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sensor_period_ms == 0
            || self.heater_period_ms == 0
            || self.display_period_ms == 0
            || self.runtime_report_ms == 0
        {
            return Err(ConfigError::ValidationFailed("task periods must be non-zero"));
        }
        if self.min_valid_temperature_c > self.max_valid_temperature_c {
            return Err(ConfigError::ValidationFailed(
                "min_valid_temperature_c above max_valid_temperature_c",
            ));
        }
        if !(0 < self.low_delta_c
            && self.low_delta_c < self.medium_delta_c
            && self.medium_delta_c < self.high_delta_c)
        {
            return Err(ConfigError::ValidationFailed(
                "heater bands must satisfy 0 < low < medium < high",
            ));
        }
        if self.fault_push_timeout_ms == Some(0) || self.fault_pop_timeout_ms == Some(0) {
            return Err(ConfigError::ValidationFailed("wait bounds must be non-zero"));
        }
        Ok(())
    }
}

/// Errors from configuration validation or loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

impl core::error::Error for ConfigError {}

impl From<ConfigError> for crate::error::Error {
    fn from(e: ConfigError) -> Self {
        match e {
            ConfigError::ValidationFailed(msg) => Self::Config(msg),
        }
    }
}
