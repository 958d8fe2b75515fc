//! Application core: shared controller state behind port traits.
//!
//! The tasks in [`crate::tasks`] and the handlers in [`crate::isr`] reach
//! the board only through the traits in [`ports`], held by the
//! [`context::ControllerContext`]. This keeps the whole control core
//! testable without real peripherals.

pub mod context;
pub mod ports;
