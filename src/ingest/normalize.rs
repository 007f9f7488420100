//! # Record normalization
//!
//! Maps a `RawRecord` with source-specific key names onto a `StandingEntry`.
//!
//! - Each canonical field has an ordered alias list; the first alias that is
//!   present (not missing, not `null`, not a blank string) wins.
//! - Counts that are present but not numeric become 0; the record is kept.
//! - `raw_total` falls back to `gold + silver + bronze` when no total is given.
//! - `weighted_score`, `rank` and `gap_from_leader` stay 0 (filled by `analyze`).
//!
//! Supporting a new source shape is a matter of extending the tables below.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::ingest::types::RawRecord;
use crate::standings::{StandingEntry, UNKNOWN_COUNTRY};

pub const COUNTRY_KEYS: &[&str] = &["country_name", "country", "name"];
pub const FLAG_KEYS: &[&str] = &["flag_url", "flag"];
pub const GOLD_KEYS: &[&str] = &["gold", "gold_medals"];
pub const SILVER_KEYS: &[&str] = &["silver", "silver_medals"];
pub const BRONZE_KEYS: &[&str] = &["bronze", "bronze_medals"];
pub const TOTAL_KEYS: &[&str] = &["total", "total_medals"];

static RE_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("static regex"));

/// First value among `aliases` that carries something.
pub fn first_present<'a>(rec: &'a RawRecord, aliases: &[&str]) -> Option<&'a Value> {
    aliases.iter().filter_map(|k| rec.get(*k)).find(|v| match v {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        _ => true,
    })
}

/// Collapse inner whitespace and trim.
pub fn clean_text(s: &str) -> String {
    RE_WS.replace_all(s.trim(), " ").into_owned()
}

fn text_field(rec: &RawRecord, aliases: &[&str]) -> Option<String> {
    match first_present(rec, aliases)? {
        Value::String(s) => Some(clean_text(s)),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Parse a count cell/value. Negative, fractional or non-numeric input is `None`.
pub fn parse_count_str(s: &str) -> Option<u32> {
    let t: String = s.trim().chars().filter(|c| *c != ',').collect();
    if t.is_empty() {
        return None;
    }
    if let Ok(n) = t.parse::<u32>() {
        return Some(n);
    }
    t.parse::<f64>().ok().and_then(count_from_f64)
}

fn count_from_f64(f: f64) -> Option<u32> {
    (f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= f64::from(u32::MAX)).then_some(f as u32)
}

/// Numeric reading of a JSON value, `None` if it is not a usable count.
pub fn count_value(v: &Value) -> Option<u32> {
    match v {
        Value::Number(n) => match n.as_u64() {
            Some(u) => Some(u32::try_from(u).unwrap_or(u32::MAX)),
            None => n.as_f64().and_then(count_from_f64),
        },
        Value::String(s) => parse_count_str(s),
        _ => None,
    }
}

fn count_field(rec: &RawRecord, aliases: &[&str]) -> Option<u32> {
    first_present(rec, aliases).map(|v| count_value(v).unwrap_or(0))
}

/// Canonical entry for one raw record. Never fails.
pub fn normalize_record(rec: &RawRecord) -> StandingEntry {
    let country = text_field(rec, COUNTRY_KEYS).unwrap_or_else(|| UNKNOWN_COUNTRY.to_string());
    let flag_url = text_field(rec, FLAG_KEYS).unwrap_or_default();
    let gold = count_field(rec, GOLD_KEYS).unwrap_or(0);
    let silver = count_field(rec, SILVER_KEYS).unwrap_or(0);
    let bronze = count_field(rec, BRONZE_KEYS).unwrap_or(0);

    let mut entry = StandingEntry::new(country, gold, silver, bronze);
    entry.flag_url = flag_url;
    if let Some(total) = count_field(rec, TOTAL_KEYS) {
        entry.raw_total = total;
    }
    entry
}

/// Normalize a batch, preserving source order.
pub fn normalize_records(records: &[RawRecord]) -> Vec<StandingEntry> {
    records.iter().map(normalize_record).collect()
}
