//! Competition ranking ("1224") over weighted scores.
//!
//! - Sort descending by `weighted_score`; the sort is stable, so entries with
//!   exactly equal scores keep the order the source delivered them in.
//! - First entry gets rank 1; each later entry shares the previous rank on an
//!   equal score, otherwise takes its 1-based position.
//! - `gap_from_leader` is the deficit to the first entry in gold-medal units
//!   (4 points), rounded up. Tied leaders all get 0.

use crate::analyze::scoring::GOLD_POINTS;
use crate::standings::StandingEntry;

/// Medal-equivalent units between two scores, rounded up.
pub fn gap_in_medals(leader_score: u64, score: u64) -> u64 {
    leader_score.saturating_sub(score).div_ceil(GOLD_POINTS)
}

/// Sort by score and assign `rank` and `gap_from_leader`.
/// Expects `weighted_score` to be filled in already.
pub fn rank_entries(mut entries: Vec<StandingEntry>) -> Vec<StandingEntry> {
    entries.sort_by(|a, b| b.weighted_score.cmp(&a.weighted_score));

    let leader_score = match entries.first() {
        Some(e) => e.weighted_score,
        None => return entries,
    };

    let mut prev: Option<(u64, u32)> = None;
    for (idx, e) in entries.iter_mut().enumerate() {
        let rank = match prev {
            Some((score, rank)) if score == e.weighted_score => rank,
            _ => u32::try_from(idx + 1).unwrap_or(u32::MAX),
        };
        e.rank = rank;
        e.gap_from_leader = gap_in_medals(leader_score, e.weighted_score);
        prev = Some((e.weighted_score, rank));
    }

    entries
}
