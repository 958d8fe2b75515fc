//! Fuzz target: `DiagnosticArchive`
//!
//! Drives arbitrary append sequences under both policies and verifies:
//! - No panics for any input
//! - The archive never holds more than `ARCHIVE_CAPACITY` records
//! - The cursor counts accepted appends and never goes backwards
//! - `records()` is oldest first and ends with `latest()`
//!
//! cargo fuzz run fuzz_archive

#![no_main]

use libfuzzer_sys::fuzz_target;
use seatheat::config::ArchivePolicy;
use seatheat::diagnostics::{ARCHIVE_CAPACITY, DiagnosticArchive, FaultCode, FaultRecord};
use seatheat::seat::{HeatingLevel, SeatId};

fuzz_target!(|data: &[u8]| {
    let Some((&first, rest)) = data.split_first() else {
        return;
    };
    let policy = if first & 1 == 0 {
        ArchivePolicy::OverwriteOldest
    } else {
        ArchivePolicy::Reject
    };
    let mut archive: DiagnosticArchive = DiagnosticArchive::new(policy);

    let mut accepted = 0u64;
    for (i, byte) in rest.iter().enumerate() {
        let record = FaultRecord {
            timestamp: i as u64,
            fault_code: if byte & 1 == 0 { FaultCode::OverRange } else { FaultCode::UnderRange },
            seat_id: if byte & 2 == 0 { SeatId::Driver } else { SeatId::Passenger },
            heating_level_at_fault: HeatingLevel::from_u8(byte >> 2),
        };
        let before = archive.cursor();
        if archive.append(record).is_ok() {
            accepted += 1;
            assert_eq!(archive.latest(), Some(&record));
        }
        assert!(archive.cursor() >= before, "cursor went backwards");
        assert!(archive.len() <= ARCHIVE_CAPACITY);
    }

    assert_eq!(archive.cursor(), accepted);
    let stamps: Vec<u64> = archive.records().map(|r| r.timestamp).collect();
    assert!(stamps.windows(2).all(|w| w[0] < w[1]), "records out of order");
    if let Some(latest) = archive.latest() {
        assert_eq!(stamps.last(), Some(&latest.timestamp));
    }
});
