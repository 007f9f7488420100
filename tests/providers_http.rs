// tests/providers_http.rs
//
// Adapters against a real (local) HTTP upstream.
//
// Covered:
// - JSON API: auth headers, plain user agent + year query, nested array extraction
// - HTML page: browser headers, medals table extraction, short rows skipped
// - non-2xx → Http error with status and truncated preview
// - timeout / refused connection → Transport error

mod common;

use axum::{
    extract::Query,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use common::*;
use medal_standings::ingest::providers::{HtmlTableAdapter, RapidApiAdapter, PREVIEW_CHARS};
use medal_standings::{SourceAdapter, SourceError};
use std::collections::HashMap;
use std::time::Duration;

async fn medals_api(headers: HeaderMap, Query(q): Query<HashMap<String, String>>) -> Response {
    let key = headers.get("x-rapidapi-key").and_then(|v| v.to_str().ok());
    let host = headers.get("x-rapidapi-host").and_then(|v| v.to_str().ok());
    if key != Some(TEST_KEY) || host != Some("olympic-sports-api.p.rapidapi.com") {
        return (StatusCode::UNAUTHORIZED, "invalid key").into_response();
    }
    let ua = headers.get(header::USER_AGENT).and_then(|v| v.to_str().ok());
    if ua != Some("medal-standings/0.1") {
        return (StatusCode::BAD_REQUEST, "unexpected user agent").into_response();
    }
    if q.get("year").map(String::as_str) != Some("2024") {
        return (StatusCode::BAD_REQUEST, "unknown year").into_response();
    }
    ([(header::CONTENT_TYPE, "application/json")], API_FIXTURE).into_response()
}

async fn medals_page(headers: HeaderMap) -> Response {
    let ua = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if !ua.starts_with("Mozilla/5.0") {
        return (StatusCode::FORBIDDEN, "bots not welcome").into_response();
    }
    ([(header::CONTENT_TYPE, "text/html")], PAGE_FIXTURE).into_response()
}

fn upstream() -> Router {
    Router::new()
        .route("/medals/countries", get(medals_api))
        .route("/medals", get(medals_page))
        .route(
            "/broken",
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "x".repeat(1_000)) }),
        )
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "too late"
            }),
        )
}

fn source_error(err: &anyhow::Error) -> SourceError {
    err.downcast_ref::<SourceError>()
        .cloned()
        .expect("adapter errors are classified")
}

#[tokio::test]
async fn api_adapter_sends_key_and_reads_nested_results() {
    let addr = serve(upstream()).await;
    let adapter = RapidApiAdapter::from_config(&api_config(addr, Some(TEST_KEY))).expect("adapter");

    let recs = adapter.fetch_records().await.expect("fetch ok");
    assert_eq!(recs.len(), 8);
    assert_eq!(recs[0]["country_name"], "United States");
    assert_eq!(recs[2]["gold_medals"], 20);
}

#[tokio::test]
async fn api_adapter_wrong_key_is_http_error_with_preview() {
    let addr = serve(upstream()).await;
    let adapter = RapidApiAdapter::from_config(&api_config(addr, Some("wrong"))).expect("adapter");

    let err = adapter.fetch_records().await.unwrap_err();
    match source_error(&err) {
        SourceError::Http { status, preview } => {
            assert_eq!(status, 401);
            assert_eq!(preview, "invalid key");
        }
        other => panic!("expected Http error, got {other:?}"),
    }
}

#[tokio::test]
async fn api_adapter_without_key_never_calls_upstream() {
    let addr = serve(upstream()).await;
    let adapter = RapidApiAdapter::from_config(&api_config(addr, None)).expect("adapter");

    let err = adapter.fetch_records().await.unwrap_err();
    assert!(matches!(source_error(&err), SourceError::Configuration(_)));
}

#[tokio::test]
async fn html_adapter_extracts_medals_table() {
    let addr = serve(upstream()).await;
    let adapter = HtmlTableAdapter::from_config(&html_config(addr, "/medals")).expect("adapter");

    let recs = adapter.fetch_records().await.expect("fetch ok");
    let names: Vec<_> = recs.iter().map(|r| r["country"].as_str().unwrap_or("")).collect();
    assert_eq!(names, vec!["Norway", "Italy", "United States", "Germany", "Austria"]);
    assert_eq!(recs[0]["flag_url"], "https://flags.test/no.svg");
    assert_eq!(recs[4]["silver"], 0);
}

#[tokio::test]
async fn html_adapter_non_2xx_keeps_truncated_preview() {
    let addr = serve(upstream()).await;
    let adapter = HtmlTableAdapter::from_config(&html_config(addr, "/broken")).expect("adapter");

    let err = adapter.fetch_records().await.unwrap_err();
    match source_error(&err) {
        SourceError::Http { status, preview } => {
            assert_eq!(status, 503);
            // PREVIEW_CHARS characters plus the ellipsis marker
            assert_eq!(preview.chars().count(), PREVIEW_CHARS + 1);
        }
        other => panic!("expected Http error, got {other:?}"),
    }
}

#[tokio::test]
async fn slow_upstream_times_out_as_transport_error() {
    let addr = serve(upstream()).await;
    let mut cfg = html_config(addr, "/slow");
    cfg.timeout_secs = 1;
    let adapter = HtmlTableAdapter::from_config(&cfg).expect("adapter");

    let err = adapter.fetch_records().await.unwrap_err();
    assert!(matches!(source_error(&err), SourceError::Transport(_)));
}

#[tokio::test]
async fn refused_connection_is_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let adapter = RapidApiAdapter::from_config(&api_config(addr, Some(TEST_KEY))).expect("adapter");
    let err = adapter.fetch_records().await.unwrap_err();
    assert!(matches!(source_error(&err), SourceError::Transport(_)));
}
