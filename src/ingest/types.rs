// src/ingest/types.rs
use anyhow::Result;
use std::fmt;

/// Untyped per-country record as extracted from a source. Key names vary by
/// source (`gold` vs `gold_medals`, ...); see `ingest::normalize`.
pub type RawRecord = serde_json::Map<String, serde_json::Value>;

/// One upstream standings source. Exactly one is active per deployment.
///
/// `Ok(vec![])` means the source answered but carried no usable rows;
/// `Err` means the fetch itself failed. Both end in the fallback snapshot.
#[async_trait::async_trait]
pub trait SourceAdapter: Send + Sync {
    async fn fetch_records(&self) -> Result<Vec<RawRecord>>;
    fn name(&self) -> &'static str;
}

/// Classified adapter failures. Carried inside `anyhow::Error` so callers can
/// `downcast_ref` for logging/metrics labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// Deployment is missing something it needs (e.g. the API key).
    Configuration(String),
    /// Connection, TLS, timeout or body read failure.
    Transport(String),
    /// Upstream answered with a non-2xx status.
    Http { status: u16, preview: String },
    /// Response shape is not what we know how to read.
    Schema(String),
}

impl SourceError {
    /// Short label used for the `reason` metric dimension.
    pub fn kind(&self) -> &'static str {
        match self {
            SourceError::Configuration(_) => "configuration",
            SourceError::Transport(_) => "transport",
            SourceError::Http { .. } => "http",
            SourceError::Schema(_) => "schema",
        }
    }
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::Configuration(m) => write!(f, "configuration error: {m}"),
            SourceError::Transport(m) => write!(f, "transport error: {m}"),
            SourceError::Http { status, preview } => {
                write!(f, "upstream returned HTTP {status}: {preview}")
            }
            SourceError::Schema(m) => write!(f, "unexpected response shape: {m}"),
        }
    }
}

impl std::error::Error for SourceError {}

/// Classify any adapter error; unclassified errors count as transport failures.
pub fn failure_kind(err: &anyhow::Error) -> &'static str {
    err.chain()
        .find_map(|e| e.downcast_ref::<SourceError>())
        .map(SourceError::kind)
        .unwrap_or("transport")
}

/// First `max_chars` characters of an upstream body, for diagnostics.
pub fn body_preview(body: &str, max_chars: usize) -> String {
    let mut out: String = body.chars().take(max_chars).collect();
    if body.chars().count() > max_chars {
        out.push('…');
    }
    out
}
