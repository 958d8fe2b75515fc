//! Fault records, per-seat fault queues and the diagnostic archive.
//!
//! ```text
//!  Sensor Task ──push──▶ FaultQueue (depth 3) ──pop──▶ Diagnostic Task ──append──▶ Archive
//!       │                                                   ▲
//!       └──────────── CountingSignal (one permit per record)┘
//! ```
//!
//! The archive keeps up to [`ARCHIVE_CAPACITY`] records for both seats in
//! arrival order. Its write cursor counts every accepted append and is never
//! reset; the slot written is `cursor % capacity`. What happens once every
//! slot is used is the [`ArchivePolicy`]: overwrite the oldest (ring buffer)
//! or reject the record.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use log::warn;

use crate::config::ArchivePolicy;
use crate::error::ArchiveError;
use crate::seat::{HeatingLevel, SeatId};

/// Fault records a seat can have queued before its sensor task waits.
pub const FAULT_QUEUE_DEPTH: usize = 3;

/// Records retained by the shared archive.
pub const ARCHIVE_CAPACITY: usize = 5;

/// Bounded FIFO of fault records for one seat.
pub type FaultQueue = Channel<CriticalSectionRawMutex, FaultRecord, FAULT_QUEUE_DEPTH>;

/// Direction of an out-of-range reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum FaultCode {
    OverRange = 0x44,
    UnderRange = 0x55,
}

impl FaultCode {
    pub const fn code(self) -> u8 {
        self as u8
    }
}

impl core::fmt::Display for FaultCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::OverRange => write!(f, "over range"),
            Self::UnderRange => write!(f, "under range"),
        }
    }
}

/// Immutable record of one fault excursion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaultRecord {
    /// Monotonic clock ticks at detection.
    pub timestamp: u64,
    pub fault_code: FaultCode,
    pub seat_id: SeatId,
    pub heating_level_at_fault: HeatingLevel,
}

/// Where an accepted record landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveSlot {
    /// Slot index in `0..capacity`.
    pub index: usize,
    /// Cursor value this append consumed.
    pub sequence: u64,
    /// Record that was overwritten, if the archive had wrapped.
    pub evicted: Option<FaultRecord>,
}

/// Fixed-capacity archive shared by both diagnostic tasks.
pub struct DiagnosticArchive<const N: usize = ARCHIVE_CAPACITY> {
    slots: heapless::Vec<FaultRecord, N>,
    /// Total accepted appends. Never reset.
    cursor: u64,
    policy: ArchivePolicy,
    rejected: u32,
}

impl<const N: usize> DiagnosticArchive<N> {
    pub const fn new(policy: ArchivePolicy) -> Self {
        Self {
            slots: heapless::Vec::new(),
            cursor: 0,
            policy,
            rejected: 0,
        }
    }

    /// Append a record at the write cursor according to the policy.
    pub fn append(&mut self, record: FaultRecord) -> Result<ArchiveSlot, ArchiveError> {
        let index = (self.cursor % N as u64) as usize;
        let evicted = if self.slots.len() < N {
            // Not yet full: the cursor always equals the length here.
            if self.slots.push(record).is_err() {
                unreachable!("archive length checked below capacity");
            }
            None
        } else {
            match self.policy {
                ArchivePolicy::OverwriteOldest => {
                    let old = core::mem::replace(&mut self.slots[index], record);
                    Some(old)
                }
                ArchivePolicy::Reject => {
                    self.rejected = self.rejected.saturating_add(1);
                    warn!(
                        "Archive: full, rejected {} record from seat 0x{:02X}",
                        record.fault_code, record.seat_id.code()
                    );
                    return Err(ArchiveError::Full { capacity: N });
                }
            }
        };
        let sequence = self.cursor;
        self.cursor += 1;
        Ok(ArchiveSlot {
            index,
            sequence,
            evicted,
        })
    }

    /// Number of records held (at most `N`).
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Total accepted appends since startup.
    pub fn cursor(&self) -> u64 {
        self.cursor
    }

    /// Records refused under [`ArchivePolicy::Reject`].
    pub fn rejected(&self) -> u32 {
        self.rejected
    }

    /// Records oldest first.
    pub fn records(&self) -> impl Iterator<Item = &FaultRecord> {
        // Once wrapped, the oldest record sits at the next write slot.
        let start = if self.slots.len() == N {
            (self.cursor % N as u64) as usize
        } else {
            0
        };
        let (tail, head) = self.slots.split_at(start);
        head.iter().chain(tail.iter())
    }

    /// Most recently accepted record.
    pub fn latest(&self) -> Option<&FaultRecord> {
        if self.cursor == 0 {
            return None;
        }
        let idx = ((self.cursor - 1) % N as u64) as usize;
        self.slots.get(idx)
    }
}
