//! Counting semaphore for the sensor → diagnostic fault handoff.
//!
//! Each `signal()` is one permit; each completed `wait()` consumes one.
//! Permits are never coalesced, so a diagnostic task wakes exactly once per
//! queued fault record even if it was not scheduled between two faults.
//! One waiting task per signal.

use core::future::poll_fn;
use core::sync::atomic::{AtomicU32, Ordering};
use core::task::Poll;

use embassy_sync::waitqueue::AtomicWaker;

pub struct CountingSignal {
    permits: AtomicU32,
    waker: AtomicWaker,
}

impl Default for CountingSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl CountingSignal {
    pub const fn new() -> Self {
        Self {
            permits: AtomicU32::new(0),
            waker: AtomicWaker::new(),
        }
    }

    /// Add one permit and wake the waiter. Never blocks.
    pub fn signal(&self) {
        self.permits.fetch_add(1, Ordering::AcqRel);
        self.waker.wake();
    }

    /// Permits not yet consumed.
    pub fn pending(&self) -> u32 {
        self.permits.load(Ordering::Acquire)
    }

    /// Consume one permit, waiting until one is available.
    pub async fn wait(&self) {
        poll_fn(|cx| {
            self.waker.register(cx.waker());
            let taken = self
                .permits
                .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1));
            if taken.is_ok() {
                Poll::Ready(())
            } else {
                Poll::Pending
            }
        })
        .await;
    }
}
