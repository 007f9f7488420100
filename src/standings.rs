//! # Standings model
//! Canonical per-country record, the snapshot handed to presentation layers,
//! and the fallback sentinel used when no live data can be obtained.
//!
//! Serialized shape (consumed as-is by page/image renderers):
//! `{"fetchedAt": "2024-08-11T12:00:00.000Z" | "fallback", "medals": [...]}`

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Country name of the single placeholder row.
pub const FALLBACK_COUNTRY: &str = "No data available";
/// Wire value of `fetchedAt` for fallback snapshots.
pub const FALLBACK_MARKER: &str = "fallback";
/// Country name used when the source provides none.
pub const UNKNOWN_COUNTRY: &str = "Unknown";

/// One country's row in the standings table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingEntry {
    pub country: String,
    pub flag_url: String,
    pub gold: u32,
    pub silver: u32,
    pub bronze: u32,
    /// Total as reported by the source (or g+s+b when it reports none).
    pub raw_total: u32,
    pub weighted_score: u64,
    pub rank: u32,
    pub gap_from_leader: u64,
}

impl StandingEntry {
    /// Counts only; derived fields stay at zero until scored and ranked.
    pub fn new(country: impl Into<String>, gold: u32, silver: u32, bronze: u32) -> Self {
        Self {
            country: country.into(),
            flag_url: String::new(),
            gold,
            silver,
            bronze,
            raw_total: gold.saturating_add(silver).saturating_add(bronze),
            weighted_score: 0,
            rank: 0,
            gap_from_leader: 0,
        }
    }

    /// The placeholder row: all counts zero, rank 1.
    pub fn fallback() -> Self {
        Self {
            rank: 1,
            ..Self::new(FALLBACK_COUNTRY, 0, 0, 0)
        }
    }
}

/// When the snapshot was produced, or the fallback marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FetchedAt {
    At(DateTime<Utc>),
    Fallback,
}

impl FetchedAt {
    pub fn now() -> Self {
        FetchedAt::At(Utc::now())
    }
}

impl From<FetchedAt> for String {
    fn from(v: FetchedAt) -> Self {
        match v {
            FetchedAt::At(ts) => ts.to_rfc3339_opts(SecondsFormat::Millis, true),
            FetchedAt::Fallback => FALLBACK_MARKER.to_string(),
        }
    }
}

impl TryFrom<String> for FetchedAt {
    type Error = chrono::ParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        if s == FALLBACK_MARKER {
            return Ok(FetchedAt::Fallback);
        }
        let ts = DateTime::parse_from_rfc3339(&s)?;
        Ok(FetchedAt::At(ts.with_timezone(&Utc)))
    }
}

/// Result of one pipeline invocation. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingsSnapshot {
    pub fetched_at: FetchedAt,
    pub medals: Vec<StandingEntry>,
}

impl StandingsSnapshot {
    pub fn live(medals: Vec<StandingEntry>) -> Self {
        Self {
            fetched_at: FetchedAt::now(),
            medals,
        }
    }

    pub fn fallback() -> Self {
        Self {
            fetched_at: FetchedAt::Fallback,
            medals: vec![StandingEntry::fallback()],
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.fetched_at == FetchedAt::Fallback
    }

    /// First row of the table (top weighted score).
    pub fn leader(&self) -> Option<&StandingEntry> {
        self.medals.first()
    }
}
