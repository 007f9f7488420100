//! # Standings Cache
//! Caller-side memoization of the whole snapshot.
//!
//! - A stored snapshot is valid until `stored_at + ttl`; fallback snapshots
//!   use the (shorter) fallback TTL so recovery is picked up sooner.
//! - The first call after expiry recomputes; concurrent callers arriving while
//!   that runs wait for it and share its result (one upstream fetch).
//! - `invalidate()` forces the next call to recompute. A recompute that was
//!   already in flight when `invalidate()` ran still answers its callers but
//!   is not stored.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use metrics::{counter, describe_counter};
use once_cell::sync::OnceCell;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::ingest::{run_once, types::SourceAdapter};
use crate::standings::StandingsSnapshot;

#[derive(Debug, Clone)]
struct Cached {
    snapshot: Arc<StandingsSnapshot>,
    valid_until: Instant,
}

/// Time-bucketed, single-flight cache around `ingest::run_once`.
pub struct StandingsCache {
    adapter: Arc<dyn SourceAdapter>,
    ttl: Duration,
    fallback_ttl: Duration,
    current: RwLock<Option<Cached>>,
    refresh: Mutex<()>,
    /// Bumped by `invalidate`.
    generation: AtomicU64,
}

fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("standings_cache_hits_total", "Snapshots served from cache.");
        describe_counter!(
            "standings_cache_misses_total",
            "Snapshots recomputed from the source."
        );
    });
}

impl StandingsCache {
    pub fn new(adapter: Arc<dyn SourceAdapter>, ttl: Duration, fallback_ttl: Duration) -> Self {
        ensure_metrics_described();
        Self {
            adapter,
            ttl,
            fallback_ttl: fallback_ttl.min(ttl),
            current: RwLock::new(None),
            refresh: Mutex::new(()),
            generation: AtomicU64::new(0),
        }
    }

    /// Current snapshot, recomputing it if expired.
    pub async fn get(&self) -> Arc<StandingsSnapshot> {
        if let Some(s) = self.fresh() {
            counter!("standings_cache_hits_total").increment(1);
            return s;
        }

        let _flight = self.refresh.lock().await;
        // Someone else may have refreshed while we waited.
        if let Some(s) = self.fresh() {
            counter!("standings_cache_hits_total").increment(1);
            return s;
        }

        counter!("standings_cache_misses_total").increment(1);
        let generation = self.generation.load(Ordering::SeqCst);
        let snapshot = Arc::new(run_once(self.adapter.as_ref()).await);
        let ttl = if snapshot.is_fallback() {
            self.fallback_ttl
        } else {
            self.ttl
        };
        if !self.store_if_current(
            generation,
            Cached {
                snapshot: Arc::clone(&snapshot),
                valid_until: Instant::now() + ttl,
            },
        ) {
            tracing::debug!(
                target: "standings::cache",
                "cache invalidated during refresh; snapshot not stored"
            );
            return snapshot;
        }
        tracing::debug!(
            target: "standings::cache",
            ttl_secs = ttl.as_secs(),
            fallback = snapshot.is_fallback(),
            "snapshot cached"
        );
        snapshot
    }

    /// Drop the cached snapshot; the next `get` refetches.
    pub fn invalidate(&self) {
        let mut w = match self.current.write() {
            Ok(g) => g,
            Err(poison) => poison.into_inner(),
        };
        self.generation.fetch_add(1, Ordering::SeqCst);
        *w = None;
        tracing::info!(target: "standings::cache", "standings cache invalidated");
    }

    /// Snapshot currently held, regardless of expiry.
    pub fn peek(&self) -> Option<Arc<StandingsSnapshot>> {
        self.read().as_ref().map(|c| Arc::clone(&c.snapshot))
    }

    fn fresh(&self) -> Option<Arc<StandingsSnapshot>> {
        let now = Instant::now();
        self.read()
            .as_ref()
            .filter(|c| now < c.valid_until)
            .map(|c| Arc::clone(&c.snapshot))
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Option<Cached>> {
        match self.current.read() {
            Ok(g) => g,
            Err(poison) => poison.into_inner(),
        }
    }

    /// Store `c` unless `invalidate` ran since `generation` was read.
    fn store_if_current(&self, generation: u64, c: Cached) -> bool {
        let mut w = match self.current.write() {
            Ok(g) => g,
            Err(poison) => poison.into_inner(),
        };
        if self.generation.load(Ordering::SeqCst) != generation {
            return false;
        }
        *w = Some(c);
        true
    }
}
