//! Shared helpers for the integration suites.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use order_gateway::config::{
    ApiKey, ApiSecretKey, BearerSecret, GatewayConfig, GatewayConfigBuilder, HostUrl,
};
use order_gateway::server::{router, AppState};
use order_gateway::ShopDomain;
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde_json::Value;
use std::path::PathBuf;
use tower::util::ServiceExt;

/// The bearer secret every test gateway is configured with.
pub const BEARER_SECRET: &str = "test-bearer-secret";

/// A unique token-table path under the system temp dir, removed on drop.
pub struct TempTokenFile(pub PathBuf);

impl TempTokenFile {
    fn new() -> Self {
        let suffix: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(12)
            .map(char::from)
            .collect();
        Self(std::env::temp_dir().join(format!("gateway-shops-{suffix}.json")))
    }
}

impl Drop for TempTokenFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.0);
    }
}

/// A fully wired gateway under test.
pub struct TestGateway {
    pub router: Router,
    pub state: AppState,
    _token_file: TempTokenFile,
}

impl TestGateway {
    /// Installs a shop directly into the token store.
    pub fn install(&self, shop: &str, token: &str) {
        let shop = ShopDomain::new(shop).unwrap();
        self.state.store.save(&shop, token).unwrap();
    }
}

/// Builds a gateway with full OAuth + bearer configuration.
///
/// `api_base` routes all upstream traffic (Admin API and token exchange) to
/// the given mock server.
pub fn gateway(api_base: Option<&str>) -> TestGateway {
    gateway_with(api_base, |builder| builder)
}

/// Like [`gateway`], with a hook to customize the configuration.
pub fn gateway_with(
    api_base: Option<&str>,
    customize: impl FnOnce(GatewayConfigBuilder) -> GatewayConfigBuilder,
) -> TestGateway {
    let token_file = TempTokenFile::new();

    let mut builder = GatewayConfig::builder()
        .credentials(
            ApiKey::new("test-api-key").unwrap(),
            ApiSecretKey::new("test-secret").unwrap(),
        )
        .scopes("read_orders".parse().unwrap())
        .host(HostUrl::new("https://gateway.example.com").unwrap())
        .bearer_secret(BearerSecret::new(BEARER_SECRET).unwrap())
        .token_file(&token_file.0);
    if let Some(base) = api_base {
        builder = builder.api_base(HostUrl::new(base).unwrap());
    }
    let config = customize(builder).build();

    let state = AppState::new(config);
    TestGateway {
        router: router(state.clone()),
        state,
        _token_file: token_file,
    }
}

/// Sends a request through the router and collects the response.
pub async fn send(router: &Router, request: Request<Body>) -> (StatusCode, HeaderMap, String) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, headers, String::from_utf8_lossy(&bytes).to_string())
}

/// GET without authentication.
pub async fn get(router: &Router, uri: &str) -> (StatusCode, HeaderMap, String) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(router, request).await
}

/// GET with a bearer token.
pub async fn get_bearer(router: &Router, uri: &str, token: &str) -> (StatusCode, HeaderMap, String) {
    let request = Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(router, request).await
}

/// DELETE with a bearer token.
pub async fn delete_bearer(
    router: &Router,
    uri: &str,
    token: &str,
) -> (StatusCode, HeaderMap, String) {
    let request = Request::builder()
        .method("DELETE")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(router, request).await
}

/// Parses a response body as JSON.
pub fn json(body: &str) -> Value {
    serde_json::from_str(body).unwrap_or(Value::Null)
}

/// Pulls one query parameter's value out of a URL.
pub fn query_value(url: &str, key: &str) -> Option<String> {
    let (_, query) = url.split_once('?')?;
    query.split('&').find_map(|pair| {
        let (k, v) = pair.split_once('=')?;
        (k == key).then(|| v.to_string())
    })
}
