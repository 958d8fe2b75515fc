//! Heater intensity from temperature error
//!
//! Band controller for one seat:
//!
//! | Condition                         | Heater state          |
//! |-----------------------------------|-----------------------|
//! | level Off or fault active         | Off                   |
//! | desired < current                 | Off                   |
//! | 0 <= delta < low                  | deadband policy       |
//! | low <= delta < medium             | Low                   |
//! | medium <= delta < high            | Medium                |
//! | delta >= high                     | High                  |
//!
//! with `delta = desired - current`.

use crate::config::{ControllerConfig, DeadbandPolicy};
use crate::seat::{Celsius, HeaterState, HeatingLevel};

/// Band thresholds and deadband behaviour, copied out of the config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaterBands {
    pub low_delta_c: Celsius,
    pub medium_delta_c: Celsius,
    pub high_delta_c: Celsius,
    pub deadband: DeadbandPolicy,
}

impl HeaterBands {
    pub fn from_config(config: &ControllerConfig) -> Self {
        Self {
            low_delta_c: config.low_delta_c,
            medium_delta_c: config.medium_delta_c,
            high_delta_c: config.high_delta_c,
            deadband: config.deadband,
        }
    }
}

impl Default for HeaterBands {
    fn default() -> Self {
        Self::from_config(&ControllerConfig::default())
    }
}

/// Inputs to one heater decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaterInputs {
    pub heating_level: HeatingLevel,
    pub desired_c: Celsius,
    pub current_c: Celsius,
    pub fault_active: bool,
    /// State the seat held before this cycle.
    pub previous: HeaterState,
}

/// Compute the heater state for one cycle.
pub fn heater_intensity(inputs: HeaterInputs, bands: &HeaterBands) -> HeaterState {
    if inputs.fault_active || inputs.heating_level == HeatingLevel::Off {
        return HeaterState::Off;
    }
    if inputs.desired_c < inputs.current_c {
        return HeaterState::Off;
    }
    // Widen before subtracting: readings are raw sensor integers.
    let delta = i32::from(inputs.desired_c) - i32::from(inputs.current_c);
    if delta >= i32::from(bands.high_delta_c) {
        HeaterState::High
    } else if delta >= i32::from(bands.medium_delta_c) {
        HeaterState::Medium
    } else if delta >= i32::from(bands.low_delta_c) {
        HeaterState::Low
    } else {
        match bands.deadband {
            DeadbandPolicy::HoldPrevious => inputs.previous,
            DeadbandPolicy::Off => HeaterState::Off,
        }
    }
}

/// Which of the two intensity indicators are lit for a heater state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IndicatorPattern {
    pub a: bool,
    pub b: bool,
}

impl IndicatorPattern {
    pub const fn for_state(state: HeaterState) -> Self {
        match state {
            HeaterState::Off => Self { a: false, b: false },
            HeaterState::Low => Self { a: true, b: false },
            HeaterState::Medium => Self { a: false, b: true },
            HeaterState::High => Self { a: true, b: true },
        }
    }
}
