// src/ingest/providers/rapidapi.rs
use anyhow::Result;
use async_trait::async_trait;
use metrics::histogram;
use serde_json::Value;

use super::{http_client, transport_error, PREVIEW_CHARS};
use crate::config::SourceConfig;
use crate::ingest::types::{body_preview, RawRecord, SourceAdapter, SourceError};

const NAME: &str = "RapidApi";

/// Keys under which the API has been seen nesting the country array.
pub const ARRAY_KEYS: &[&str] = &["results", "medals", "data", "countries"];

/// Keyed JSON medals API (RapidAPI "olympic-sports-api").
pub struct RapidApiAdapter {
    http: reqwest::Client,
    url: String,
    host: String,
    api_key: Option<String>,
}

impl RapidApiAdapter {
    pub fn from_config(cfg: &SourceConfig) -> Result<Self> {
        let http = http_client(cfg, "medal-standings/0.1")?;
        Ok(Self {
            http,
            url: cfg.api_url(),
            host: cfg.api_host.clone(),
            api_key: cfg.api_key.clone(),
        })
    }

    /// Parse a response body into raw records.
    /// Invalid JSON is a schema error; a valid body without an array is `Ok(vec![])`.
    pub fn parse_body(body: &str) -> Result<Vec<RawRecord>> {
        let t0 = std::time::Instant::now();
        let value: Value = serde_json::from_str(body)
            .map_err(|e| SourceError::Schema(format!("response is not JSON: {e}")))?;
        let out = extract_entries(&value);
        histogram!("standings_parse_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
        Ok(out)
    }
}

/// The country array: either the body itself or the first conventional key
/// holding an array. Non-object elements are dropped.
pub fn extract_entries(body: &Value) -> Vec<RawRecord> {
    let items = match body {
        Value::Array(a) => Some(a),
        Value::Object(m) => ARRAY_KEYS
            .iter()
            .find_map(|k| m.get(*k).and_then(Value::as_array)),
        _ => None,
    };
    let Some(items) = items else {
        return Vec::new();
    };

    let out: Vec<RawRecord> = items.iter().filter_map(|v| v.as_object().cloned()).collect();
    if out.len() < items.len() {
        tracing::debug!(
            target: "standings",
            adapter = NAME,
            skipped = items.len() - out.len(),
            "non-object entries skipped"
        );
    }
    out
}

#[async_trait]
impl SourceAdapter for RapidApiAdapter {
    async fn fetch_records(&self) -> Result<Vec<RawRecord>> {
        let Some(key) = self.api_key.as_deref() else {
            return Err(SourceError::Configuration(
                "RAPIDAPI_KEY environment variable is not set".to_string(),
            )
            .into());
        };

        let resp = self
            .http
            .get(&self.url)
            .header("X-RapidAPI-Key", key)
            .header("X-RapidAPI-Host", &self.host)
            .send()
            .await
            .map_err(transport_error)?;

        let status = resp.status();
        let body = resp.text().await.map_err(transport_error)?;
        if !status.is_success() {
            return Err(SourceError::Http {
                status: status.as_u16(),
                preview: body_preview(&body, PREVIEW_CHARS),
            }
            .into());
        }

        tracing::debug!(
            target: "standings",
            adapter = NAME,
            preview = %body_preview(&body, 500),
            "api response"
        );
        Self::parse_body(&body)
    }

    fn name(&self) -> &'static str {
        NAME
    }
}
