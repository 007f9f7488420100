// src/lib.rs
// Public library surface for integration tests (and the binaries).

pub mod analyze;
pub mod api;
pub mod cache;
pub mod config;
pub mod engine;
pub mod ingest;
pub mod metrics;
pub mod standings;

// ---- Re-exports for stable public API ----
pub use crate::api::router;
pub use crate::cache::StandingsCache;
pub use crate::config::{SourceConfig, SourceKind};
pub use crate::ingest::types::{RawRecord, SourceAdapter, SourceError};
pub use crate::standings::{FetchedAt, StandingEntry, StandingsSnapshot};

use axum::Router;
use tracing::info;

/// Fetch today's standings once from the configured source, without caching.
/// Never fails for upstream problems; see `ingest::run_once`.
pub async fn fetch_standings(cfg: &SourceConfig) -> anyhow::Result<StandingsSnapshot> {
    let adapter = ingest::providers::build_adapter(cfg)?;
    Ok(ingest::run_once(adapter.as_ref()).await)
}

/// Build the HTTP router (without `/metrics`) for a given configuration.
pub fn app_from_config(cfg: &SourceConfig) -> anyhow::Result<Router> {
    let adapter = ingest::providers::build_adapter(cfg)?;
    let cache = StandingsCache::new(adapter, cfg.cache_ttl(), cfg.fallback_ttl());
    info!(
        cache_ttl_secs = cfg.cache_ttl_secs,
        fallback_ttl_secs = cfg.fallback_ttl().as_secs(),
        "standings router ready"
    );
    Ok(router(api::AppState::new(cache)))
}
