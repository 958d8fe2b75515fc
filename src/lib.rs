//! SeatHeat control core library.
//!
//! Exposes the controller context, tasks and interrupt handlers for the
//! host binary and for integration testing. Board access goes through the
//! port traits in [`app::ports`].

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod control;
pub mod diagnostics;
pub mod error;
pub mod isr;
pub mod safety;
pub mod seat;
pub mod sync;
pub mod tasks;

pub use error::{Error, Result};
