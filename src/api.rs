use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::CorsLayer;

use crate::cache::StandingsCache;
use crate::standings::StandingsSnapshot;

#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<StandingsCache>,
}

impl AppState {
    pub fn new(cache: StandingsCache) -> Self {
        Self {
            cache: Arc::new(cache),
        }
    }
}

/// Router consumed by page/image renderers. They read `/standings` as-is and
/// never recompute rank or score.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/standings", get(standings))
        .route("/revalidate", post(revalidate))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

async fn standings(State(state): State<AppState>) -> Json<StandingsSnapshot> {
    let snap = state.cache.get().await;
    Json(StandingsSnapshot::clone(&snap))
}

#[derive(Serialize)]
struct RevalidateResp {
    revalidated: bool,
    now: i64,
}

async fn revalidate(State(state): State<AppState>) -> Json<RevalidateResp> {
    state.cache.invalidate();
    Json(RevalidateResp {
        revalidated: true,
        now: chrono::Utc::now().timestamp_millis(),
    })
}
