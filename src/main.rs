//! Medal Standings Service — Binary Entrypoint
//! Boots the Axum HTTP server serving the weighted standings snapshot.

use medal_standings::{app_from_config, metrics::Metrics, SourceConfig};
use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Compact tracing logs; `RUST_LOG` overrides the default filter.
/// The runtime may already have installed a subscriber, in which case this is a no-op.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("standings=info,warn"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .try_init();
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    init_tracing();

    let cfg = SourceConfig::load()?;
    let metrics = Metrics::init(cfg.cache_ttl_secs)?;
    let router = app_from_config(&cfg)?.merge(metrics.router());

    Ok(router.into())
}
