//! HTTP surface of the gateway.
//!
//! [`AppState`] carries everything a handler needs; [`router`] wires the
//! routes. The public routes are `/health` and the OAuth pair; everything
//! under `/v1` sits behind the bearer gate.

pub mod bearer;
pub mod error;
pub mod routes;

use crate::auth::oauth::NonceCache;
use crate::auth::AuthScopes;
use crate::clients::build_http_client;
use crate::config::{GatewayConfig, HostUrl, OAuthCredentials};
use crate::server::error::ApiError;
use crate::store::TokenStore;
use axum::middleware;
use axum::routing::{delete, get};
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Shared state for all request handlers.
///
/// Cheap to clone: everything inside is an `Arc` or an internally
/// reference-counted handle.
#[derive(Clone)]
pub struct AppState {
    /// Runtime configuration.
    pub config: Arc<GatewayConfig>,
    /// Per-shop access tokens.
    pub store: Arc<TokenStore>,
    /// Outstanding OAuth nonces.
    pub nonces: NonceCache,
    /// Shared HTTP client for all upstream traffic.
    pub http: reqwest::Client,
}

/// The OAuth configuration a request needs, borrowed from the config.
///
/// Produced by [`AppState::oauth_context`], which is the once-per-request
/// completeness check: any missing piece short-circuits with a configuration
/// error before OAuth-specific logic runs.
pub struct OAuthContext<'a> {
    /// App credentials.
    pub credentials: &'a OAuthCredentials,
    /// Public host URL for redirect URIs.
    pub host: &'a HostUrl,
    /// Scopes to request.
    pub scopes: &'a AuthScopes,
}

impl AppState {
    /// Builds the state from configuration, opening the token store at the
    /// configured path.
    #[must_use]
    pub fn new(config: GatewayConfig) -> Self {
        let store = Arc::new(TokenStore::open(config.token_file()));
        Self {
            config: Arc::new(config),
            store,
            nonces: NonceCache::with_default_ttl(),
            http: build_http_client(),
        }
    }

    /// Checks OAuth configuration completeness for this request.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Configuration`] naming what is missing.
    pub fn oauth_context(&self) -> Result<OAuthContext<'_>, ApiError> {
        let credentials = self
            .config
            .credentials()
            .ok_or_else(|| ApiError::Configuration("OAuth credentials are not set".to_string()))?;
        let host = self
            .config
            .host()
            .ok_or_else(|| ApiError::Configuration("public host URL is not set".to_string()))?;
        let scopes = self.config.scopes();
        if scopes.is_empty() {
            return Err(ApiError::Configuration(
                "requested OAuth scopes are not set".to_string(),
            ));
        }
        Ok(OAuthContext {
            credentials,
            host,
            scopes,
        })
    }
}

/// Builds the gateway router.
#[must_use]
pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/v1/orders", get(routes::orders::list_orders))
        .route("/v1/orders/{order_id}", get(routes::orders::get_order))
        .route("/v1/shop", get(routes::shops::shop_info))
        .route("/v1/shops", get(routes::shops::list_shops))
        .route("/v1/shops/{shop}", delete(routes::shops::uninstall_shop))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            bearer::require_bearer,
        ));

    Router::new()
        .route("/health", get(routes::health::health))
        .route("/auth", get(routes::auth::begin))
        .route("/auth/callback", get(routes::auth::callback))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
