//! # Shopify Order Gateway
//!
//! A small HTTP gateway that lets callers read order data from one or more
//! Shopify stores without ever holding raw Admin API tokens themselves.
//!
//! ## Overview
//!
//! The gateway does three jobs:
//!
//! - Runs the Shopify OAuth authorization-code exchange so a store owner can
//!   grant access ([`auth::oauth`])
//! - Persists the resulting per-store access token ([`store::TokenStore`])
//! - Proxies authenticated order reads to the Admin API, reshaping the
//!   payload ([`clients::AdminClient`], [`orders::OrderView`])
//!
//! The gateway's own API sits behind a static bearer secret
//! ([`server::bearer`]); the OAuth callback is protected by HMAC and
//! single-use state nonces instead.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use order_gateway::config::GatewayConfig;
//! use order_gateway::server::{router, AppState};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = GatewayConfig::from_env();
//!     let addr = config.socket_addr();
//!     let app = router(AppState::new(config));
//!
//!     let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
//!     axum::serve(listener, app).await.unwrap();
//! }
//! ```
//!
//! ## Design principles
//!
//! - **No global state**: configuration is instance-based and passed
//!   explicitly through [`server::AppState`]
//! - **Fail-fast validation**: configuration newtypes validate on
//!   construction; free-form shop input goes through one validator
//! - **Fail-closed routes**: missing configuration disables the routes that
//!   need it without taking the process down
//! - **Thread-safe**: all shared types are `Send + Sync`
//! - **Async-first**: designed for the Tokio runtime

pub mod auth;
pub mod clients;
pub mod config;
pub mod error;
pub mod orders;
pub mod server;
pub mod store;

// Re-export public types at crate root for convenience
pub use auth::AuthScopes;
pub use config::{
    ApiKey, ApiSecretKey, ApiVersion, BearerSecret, GatewayConfig, HostUrl, OrdersLocale,
    ShopDomain,
};
pub use error::ConfigError;

pub use clients::{AdminClient, ClientError, UpstreamGraphQlError, UpstreamHttpError};
pub use orders::OrderView;
pub use store::{ShopRecord, StoreError, TokenStore};
