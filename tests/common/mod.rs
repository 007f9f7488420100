// tests/common/mod.rs
//
// Shared helpers: a throwaway upstream server on 127.0.0.1:0 and config builders
// pointing the adapters at it.
#![allow(dead_code)]

use axum::Router;
use medal_standings::{SourceConfig, SourceKind};
use std::net::SocketAddr;

pub const API_FIXTURE: &str = include_str!("../fixtures/medals_api.json");
pub const PAGE_FIXTURE: &str = include_str!("../fixtures/medals_page.html");
pub const TEST_KEY: &str = "test-key";

/// Serve `router` on an ephemeral local port for the rest of the test.
pub async fn serve(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("test upstream");
    });
    addr
}

/// API-mode config against a local upstream.
pub fn api_config(addr: SocketAddr, key: Option<&str>) -> SourceConfig {
    SourceConfig {
        source: SourceKind::Api,
        api_base: format!("http://{addr}"),
        api_key: key.map(str::to_string),
        timeout_secs: 2,
        connect_timeout_secs: 1,
        ..SourceConfig::default()
    }
}

/// HTML-mode config against a local upstream page.
pub fn html_config(addr: SocketAddr, path: &str) -> SourceConfig {
    SourceConfig {
        source: SourceKind::Html,
        page_url: format!("http://{addr}{path}"),
        timeout_secs: 2,
        connect_timeout_secs: 1,
        ..SourceConfig::default()
    }
}
