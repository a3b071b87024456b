#![allow(dead_code)]

pub mod mock_moralis;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use history_proxy::{
    AppError,
    cli::DEFAULT_CORS_ORIGINS,
    config::{Config, MoralisConfig, parse_base_url, parse_cors_origins},
    server::build,
};
use serde_json::Value;
use std::{
    sync::{Arc, LazyLock},
    time::Duration,
};
use tower::ServiceExt;
use tracing::Level;

pub const TEST_API_KEY: &str = "test-moralis-key";
pub const ADDRESS: &str = "0xAbC0000000000000000000000000000000000001";

static INIT_LOGGING: LazyLock<()> = LazyLock::new(|| {
    tracing_subscriber::fmt::init();
});

pub fn initialize_logging() {
    let _ = *INIT_LOGGING;
}

pub fn test_config(api_key: Option<&str>, base_url: &str) -> Config {
    Config {
        server_address: "127.0.0.1".parse().unwrap(),
        server_port: 3000,
        server_concurrency_limit: 64,
        log_level: Level::INFO,
        moralis: MoralisConfig {
            api_key: api_key.map(String::from),
            base_url: parse_base_url(base_url).unwrap(),
            request_timeout: Duration::from_secs(5),
        },
        cors: parse_cors_origins(DEFAULT_CORS_ORIGINS).unwrap(),
        no_metrics: true,
    }
}

pub fn build_app(config: Config) -> Result<Router, AppError> {
    build(Arc::new(config))
}

/// Sends `request` and decodes the body as JSON.
pub async fn send_json(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("Request to the app failed");

    let status = response.status();
    let body_bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");
    let json = serde_json::from_slice(&body_bytes).expect("Response body is not valid JSON");

    (status, json)
}

pub async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    send_json(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

pub fn history_uri(chain: &str, address: &str) -> String {
    format!("/api/history?chain={chain}&address={address}")
}
