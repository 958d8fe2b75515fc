//! Per-task busy-time accounting.
//!
//! Every task slot records the tick it was last switched in and the total
//! ticks it has spent busy. Tasks run their active work through
//! [`TaskAccounting::track`], which switches the task in for each poll and
//! out again when the poll returns. Time spent parked on a lock, queue or
//! timer is therefore never counted. Nothing here blocks, so the hooks are
//! safe from any context.
//!
//! ```text
//!  poll: switched_in(t0) ── run ── switched_out(t1)   total += t1 - t0
//!  Pending ······························ (parked, not counted)
//!  poll: switched_in(t2) ── run ── switched_out(t3)   total += t3 - t2
//!  load% = Σ total × 100 / now
//! ```

use core::future::{Future, poll_fn};
use core::pin::pin;
use core::sync::atomic::{AtomicU64, Ordering};

use super::TaskId;
use crate::app::ports::ClockPort;

#[derive(Default)]
struct TaskSlot {
    switched_in: AtomicU64,
    switched_out: AtomicU64,
    total: AtomicU64,
}

/// Busy-time counters for all [`TaskId`]s.
#[derive(Default)]
pub struct TaskAccounting {
    slots: [TaskSlot; TaskId::COUNT],
}

impl TaskAccounting {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scheduler hook: `task` starts running at `now`.
    pub fn switched_in(&self, task: TaskId, now: u64) {
        self.slots[task.index()].switched_in.store(now, Ordering::Release);
    }

    /// Scheduler hook: `task` stops running at `now`.
    pub fn switched_out(&self, task: TaskId, now: u64) {
        let slot = &self.slots[task.index()];
        slot.switched_out.store(now, Ordering::Release);
        let started = slot.switched_in.load(Ordering::Acquire);
        slot.total
            .fetch_add(now.saturating_sub(started), Ordering::AcqRel);
    }

    /// Accumulated busy ticks of one task.
    pub fn busy_ticks(&self, task: TaskId) -> u64 {
        self.slots[task.index()].total.load(Ordering::Acquire)
    }

    /// Accumulated busy ticks of every task.
    pub fn total_busy_ticks(&self) -> u64 {
        self.slots
            .iter()
            .map(|s| s.total.load(Ordering::Acquire))
            .fold(0u64, u64::saturating_add)
    }

    /// Integer CPU load since boot. `0` before the first tick.
    pub fn cpu_load_percent(&self, now: u64) -> u64 {
        if now == 0 {
            return 0;
        }
        let busy = u128::from(self.total_busy_ticks());
        (busy * 100 / u128::from(now)) as u64
    }

    /// Drive `work` to completion, charging only the time spent inside
    /// its polls to `task`.
    pub async fn track<C, F>(&self, task: TaskId, clock: &C, work: F) -> F::Output
    where
        C: ClockPort,
        F: Future,
    {
        let mut work = pin!(work);
        poll_fn(|cx| {
            self.switched_in(task, clock.now_ticks());
            let poll = work.as_mut().poll(cx);
            self.switched_out(task, clock.now_ticks());
            poll
        })
        .await
    }
}
