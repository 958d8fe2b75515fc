//! Event-flag group with an ISR-safe setter.
//!
//! ```text
//! ┌──────────────┐ set_from_isr(bit) ┌─────────────┐ wait_any(mask) ┌─────────────┐
//! │ Port ISR     │──────────────────▶│ EventFlags  │───────────────▶│ Button Task │
//! │ (no locks)   │                   │ AtomicU32   │  bits cleared  │ (one waiter)│
//! └──────────────┘                   └─────────────┘  on wake       └─────────────┘
//! ```
//!
//! A group has a single waiting task. Setting bits never blocks and never
//! takes a task-level lock, so it is safe from interrupt context.

use core::future::poll_fn;
use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use core::task::Poll;

use embassy_sync::waitqueue::AtomicWaker;

/// Bit mask within one event-flag group.
pub type EventBits = u32;

pub struct EventFlags {
    bits: AtomicU32,
    /// True while the waiter is parked on this group.
    parked: AtomicBool,
    waker: AtomicWaker,
}

impl Default for EventFlags {
    fn default() -> Self {
        Self::new()
    }
}

impl EventFlags {
    pub const fn new() -> Self {
        Self {
            bits: AtomicU32::new(0),
            parked: AtomicBool::new(false),
            waker: AtomicWaker::new(),
        }
    }

    /// OR `mask` into the group and wake the waiter.
    ///
    /// Returns `true` if a task was parked on the group, i.e. the caller
    /// should request a reschedule on interrupt exit.
    pub fn set_from_isr(&self, mask: EventBits) -> bool {
        self.bits.fetch_or(mask, Ordering::AcqRel);
        let woke = self.parked.swap(false, Ordering::AcqRel);
        self.waker.wake();
        woke
    }

    /// Currently set bits, without clearing.
    pub fn get(&self) -> EventBits {
        self.bits.load(Ordering::Acquire)
    }

    /// Wait until any bit in `mask` is set. The matched bits are cleared
    /// before returning (clear-on-exit) and reported to the caller.
    ///
    /// Dropping the future while parked (e.g. under a timeout) leaves the
    /// group with no waiter.
    pub async fn wait_any(&self, mask: EventBits) -> EventBits {
        let _unpark = Unpark(&self.parked);
        poll_fn(|cx| {
            // Register first so a set between the check and the return
            // still wakes us.
            self.waker.register(cx.waker());
            let matched = self.bits.fetch_and(!mask, Ordering::AcqRel) & mask;
            if matched != 0 {
                self.parked.store(false, Ordering::Release);
                Poll::Ready(matched)
            } else {
                self.parked.store(true, Ordering::Release);
                Poll::Pending
            }
        })
        .await
    }
}

/// Clears the parked marker when a wait finishes or is abandoned.
struct Unpark<'a>(&'a AtomicBool);

impl Drop for Unpark<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
