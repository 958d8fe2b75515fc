//! Control laws
//!
//! Pure functions with no shared state; the heater task feeds them a
//! snapshot taken under the seat lock order.

pub mod heater;
