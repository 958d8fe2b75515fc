//! Adapters: concrete implementations of the port traits.
//!
//! | Adapter      | Implements          | Connects to                  |
//! |--------------|---------------------|------------------------------|
//! | `indicator`  | IndicatorPort       | `embedded-hal` output pins   |
//! | `log_sink`   | TextSink            | stdout console               |
//! |              | `log::Log`          | stderr                       |
//! | `sim`        | TemperaturePort     | injected readings            |
//! |              | EdgeInterruptPort   | software interrupt lines     |
//! | `time`       | ClockPort           | `std::time::Instant`         |

pub mod indicator;
pub mod log_sink;
pub mod sim;
pub mod time;
