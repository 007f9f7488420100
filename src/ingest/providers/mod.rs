// src/ingest/providers/mod.rs
//! Concrete source adapters plus the bits they share (HTTP client, error mapping).

pub mod html_table;
pub mod rapidapi;

use anyhow::{Context, Result};
use std::sync::Arc;

use crate::config::{SourceConfig, SourceKind};
use crate::ingest::types::{SourceAdapter, SourceError};

pub use html_table::HtmlTableAdapter;
pub use rapidapi::RapidApiAdapter;

/// Max characters of an error body kept for diagnostics.
pub const PREVIEW_CHARS: usize = 200;

/// HTTP client with the configured timeouts and user agent.
pub(crate) fn http_client(cfg: &SourceConfig, user_agent: &str) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(user_agent)
        .connect_timeout(cfg.connect_timeout())
        .timeout(cfg.timeout())
        .build()
        .context("building reqwest client")
}

/// Wrap a reqwest failure as a classified transport error.
pub(crate) fn transport_error(e: reqwest::Error) -> anyhow::Error {
    let msg = if e.is_timeout() {
        format!("request timed out: {e}")
    } else {
        e.to_string()
    };
    SourceError::Transport(msg).into()
}

/// The adapter selected by `cfg.source`.
pub fn build_adapter(cfg: &SourceConfig) -> Result<Arc<dyn SourceAdapter>> {
    let adapter: Arc<dyn SourceAdapter> = match cfg.source {
        SourceKind::Api => Arc::new(RapidApiAdapter::from_config(cfg)?),
        SourceKind::Html => Arc::new(HtmlTableAdapter::from_config(cfg)?),
    };
    tracing::info!(
        target: "standings",
        adapter = adapter.name(),
        key_len = cfg.api_key.as_deref().map(str::len).unwrap_or(0),
        timeout_secs = cfg.timeout_secs,
        "standings source configured"
    );
    Ok(adapter)
}
