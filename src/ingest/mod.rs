// src/ingest/mod.rs
pub mod normalize;
pub mod providers;
pub mod types;

use crate::engine::snapshot_from_records;
use crate::ingest::types::{failure_kind, SourceAdapter};
use crate::standings::StandingsSnapshot;
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use once_cell::sync::OnceCell;

/// One-time metrics registration (so series show up on /metrics).
pub(crate) fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("standings_fetch_total", "Pipeline invocations.");
        describe_counter!(
            "standings_fallback_total",
            "Invocations that returned the fallback snapshot, by reason."
        );
        describe_counter!(
            "standings_rows_skipped_total",
            "HTML rows skipped for having too few cells."
        );
        describe_histogram!("standings_fetch_ms", "Adapter fetch time in milliseconds.");
        describe_histogram!("standings_parse_ms", "Response parse time in milliseconds.");
        describe_gauge!("standings_entries", "Countries in the last snapshot.");
        describe_gauge!(
            "standings_last_fetch_ts",
            "Unix ts when the pipeline last ran."
        );
    });
}

/// Fetch from `adapter` and build today's standings.
///
/// Never fails: adapter errors and empty results are logged, counted and
/// turned into the fallback snapshot.
pub async fn run_once(adapter: &dyn SourceAdapter) -> StandingsSnapshot {
    ensure_metrics_described();
    counter!("standings_fetch_total").increment(1);
    gauge!("standings_last_fetch_ts").set(chrono::Utc::now().timestamp() as f64);

    let t0 = std::time::Instant::now();
    let fetched = adapter.fetch_records().await;
    histogram!("standings_fetch_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);

    let records = match fetched {
        Ok(v) => v,
        Err(e) => {
            let reason = failure_kind(&e);
            tracing::error!(
                target: "standings",
                adapter = adapter.name(),
                reason,
                error = %e,
                "failed to fetch medals; serving fallback"
            );
            counter!("standings_fallback_total", "reason" => reason).increment(1);
            return StandingsSnapshot::fallback();
        }
    };

    let snapshot = snapshot_from_records(&records);
    if snapshot.is_fallback() {
        tracing::error!(
            target: "standings",
            adapter = adapter.name(),
            "source returned no medal entries; response shape may have changed"
        );
        counter!("standings_fallback_total", "reason" => "empty").increment(1);
        return snapshot;
    }

    gauge!("standings_entries").set(snapshot.medals.len() as f64);
    tracing::info!(
        target: "standings",
        adapter = adapter.name(),
        countries = snapshot.medals.len(),
        leader = snapshot.leader().map(|e| e.country.as_str()).unwrap_or_default(),
        "standings refreshed"
    );
    snapshot
}
