//! Wait/signal primitives shared by tasks and interrupt handlers.
//!
//! `embassy-sync` provides the mutexes and the bounded fault queues; the two
//! primitives it lacks (an event-flag group and a counting semaphore) are
//! built here on its [`AtomicWaker`](embassy_sync::waitqueue::AtomicWaker).
//! Every blocking point can be wrapped in a [`WaitBound`].

pub mod event_flags;
pub mod signal;
pub mod wait;

pub use event_flags::{EventBits, EventFlags};
pub use signal::CountingSignal;
pub use wait::{WaitBound, bounded};
