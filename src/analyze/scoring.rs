//! Weighted medal score.
//!
//! A gold is worth 4 points, a silver 2, a bronze 1. The weighting is a fixed
//! ranking rule and applies identically to every source adapter.

use crate::standings::StandingEntry;

pub const GOLD_POINTS: u64 = 4;
pub const SILVER_POINTS: u64 = 2;
pub const BRONZE_POINTS: u64 = 1;

/// `gold*4 + silver*2 + bronze`.
pub fn weighted_score(gold: u32, silver: u32, bronze: u32) -> u64 {
    u64::from(gold) * GOLD_POINTS + u64::from(silver) * SILVER_POINTS + u64::from(bronze) * BRONZE_POINTS
}

/// Fill `weighted_score` from the entry's own counts.
pub fn score_entry(entry: &mut StandingEntry) {
    entry.weighted_score = weighted_score(entry.gold, entry.silver, entry.bronze);
}
