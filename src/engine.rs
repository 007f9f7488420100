//! # Standings Engine
//! Pure, testable core: raw records → normalized → scored → ranked snapshot.
//! No I/O, no state between calls.
//!
//! Policy: an empty normalized set is not an error; it yields the fallback
//! snapshot (one "No data available" row, `fetchedAt = "fallback"`).

use crate::analyze::score_and_rank;
use crate::ingest::normalize::normalize_records;
use crate::ingest::types::RawRecord;
use crate::standings::{StandingEntry, StandingsSnapshot};

/// Normalize, score and rank. Output order is by weighted score, source order
/// breaking exact ties.
pub fn build_standings(records: &[RawRecord]) -> Vec<StandingEntry> {
    score_and_rank(normalize_records(records))
}

/// Full snapshot for a set of raw records, falling back when there are none.
pub fn snapshot_from_records(records: &[RawRecord]) -> StandingsSnapshot {
    let medals = build_standings(records);
    if medals.is_empty() {
        return StandingsSnapshot::fallback();
    }
    StandingsSnapshot::live(medals)
}
