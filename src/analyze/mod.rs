// src/analyze/mod.rs
//! Pure standings math: weighted scoring and competition ranking.
//! No I/O here; everything is deterministic for identical input.

pub mod ranking;
pub mod scoring;

pub use crate::analyze::ranking::{gap_in_medals, rank_entries};
pub use crate::analyze::scoring::{score_entry, weighted_score, BRONZE_POINTS, GOLD_POINTS, SILVER_POINTS};

use crate::standings::StandingEntry;

/// Score every entry, then sort and rank. Input order is the tie-break.
pub fn score_and_rank(mut entries: Vec<StandingEntry>) -> Vec<StandingEntry> {
    for e in entries.iter_mut() {
        score_entry(e);
    }
    rank_entries(entries)
}
