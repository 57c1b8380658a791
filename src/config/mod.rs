//! Gateway configuration.
//!
//! This module provides the [`GatewayConfig`] type holding everything the
//! gateway needs at runtime: OAuth app credentials, requested scopes, the
//! public host URL, the Admin API version, the static bearer secret, and the
//! listener/persistence settings.
//!
//! # Fail-closed loading
//!
//! [`GatewayConfig::from_env`] never fails and never panics. Missing required
//! values are logged once at startup and left unset; the routes that need
//! them respond with a configuration error until the value is supplied. This
//! keeps a misconfigured process alive (and its health endpoint answering)
//! instead of crash-looping.
//!
//! # Environment variables
//!
//! | Variable | Meaning | Default |
//! |---|---|---|
//! | `SHOPIFY_API_KEY` | OAuth client id | required for OAuth routes |
//! | `SHOPIFY_API_SECRET` | OAuth client secret | required for OAuth routes |
//! | `SHOPIFY_SCOPES` | comma-separated scopes | required for OAuth routes |
//! | `GATEWAY_HOST_URL` | public base URL for redirect URIs | required for OAuth routes |
//! | `SHOPIFY_API_VERSION` | Admin API version | latest stable |
//! | `GATEWAY_BEARER_SECRET` | static bearer secret | protected routes fail closed |
//! | `GATEWAY_LISTEN_ADDR` | bind address | `127.0.0.1` |
//! | `GATEWAY_LISTEN_PORT` | listen port | `8080` |
//! | `GATEWAY_TOKEN_FILE` | token table path | `shops.json` |
//! | `SHOPIFY_API_BASE` | fixed upstream base URL override | per-shop `https://` |
//! | `ORDERS_DEFAULT_LIMIT` | orders list default page size | `10` |
//! | `ORDERS_LOCALE` | response envelope locale (`en`/`es`) | `en` |

mod newtypes;
mod version;

pub use newtypes::{ApiKey, ApiSecretKey, BearerSecret, HostUrl, ShopDomain};
pub use version::ApiVersion;

use crate::auth::AuthScopes;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

/// Default page size for the orders list endpoint.
pub const DEFAULT_ORDERS_LIMIT: u32 = 10;

/// Hard bounds Shopify enforces on the orders `limit` parameter.
pub const ORDERS_LIMIT_RANGE: (u32, u32) = (1, 250);

/// OAuth app credentials (client id + client secret).
#[derive(Clone, Debug)]
pub struct OAuthCredentials {
    /// The app's API key (OAuth client id).
    pub api_key: ApiKey,
    /// The app's API secret key (OAuth client secret).
    pub api_secret_key: ApiSecretKey,
}

/// Locale for the orders response envelope.
///
/// The locale only changes presentation: envelope key names and
/// financial-status labels. The data model underneath is one canonical
/// [`OrderView`](crate::orders::OrderView).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OrdersLocale {
    /// `ok` / `shop` / `count` / `orders` envelope keys.
    #[default]
    En,
    /// `exito` / `tienda` / `cantidad` / `pedidos` envelope keys.
    Es,
}

impl FromStr for OrdersLocale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "en" => Ok(Self::En),
            "es" => Ok(Self::Es),
            other => Err(format!("unsupported locale '{other}' (expected 'en' or 'es')")),
        }
    }
}

/// Presentation settings for the orders endpoints.
#[derive(Clone, Debug)]
pub struct OrdersPresentation {
    /// Default `limit` when the caller does not pass one.
    pub default_limit: u32,
    /// Envelope locale.
    pub locale: OrdersLocale,
}

impl Default for OrdersPresentation {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_ORDERS_LIMIT,
            locale: OrdersLocale::default(),
        }
    }
}

/// Runtime configuration for the gateway.
///
/// Construct via [`GatewayConfig::builder`] (tests, embedding) or
/// [`GatewayConfig::from_env`] (the server binary).
///
/// # Thread Safety
///
/// `GatewayConfig` is `Clone`, `Send`, and `Sync`, making it safe to share
/// across async tasks.
#[derive(Clone, Debug)]
pub struct GatewayConfig {
    credentials: Option<OAuthCredentials>,
    scopes: AuthScopes,
    host: Option<HostUrl>,
    api_version: ApiVersion,
    bearer_secret: Option<BearerSecret>,
    api_base: Option<HostUrl>,
    listen_addr: IpAddr,
    listen_port: u16,
    token_file: PathBuf,
    orders: OrdersPresentation,
}

// Verify GatewayConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<GatewayConfig>();
};

impl GatewayConfig {
    /// Creates a new builder.
    #[must_use]
    pub fn builder() -> GatewayConfigBuilder {
        GatewayConfigBuilder::default()
    }

    /// Loads configuration from environment variables (and `.env` if present).
    ///
    /// Never fails: missing or invalid values are logged and replaced with
    /// `None` / defaults so the process can start and fail closed per route.
    #[must_use]
    pub fn from_env() -> Self {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_key = read_parsed("SHOPIFY_API_KEY", |s: String| ApiKey::new(s));
        let api_secret_key = read_parsed("SHOPIFY_API_SECRET", |s: String| ApiSecretKey::new(s));
        let credentials = match (api_key, api_secret_key) {
            (Some(api_key), Some(api_secret_key)) => Some(OAuthCredentials {
                api_key,
                api_secret_key,
            }),
            _ => None,
        };

        let scopes = read_parsed("SHOPIFY_SCOPES", |s: String| s.parse::<AuthScopes>())
            .unwrap_or_default();
        let host = read_parsed("GATEWAY_HOST_URL", |s: String| HostUrl::new(s));
        let api_version = read_parsed("SHOPIFY_API_VERSION", |s: String| s.parse::<ApiVersion>())
            .unwrap_or_else(ApiVersion::latest);
        let bearer_secret = read_parsed("GATEWAY_BEARER_SECRET", |s: String| BearerSecret::new(s));
        let api_base = read_parsed("SHOPIFY_API_BASE", |s: String| HostUrl::new(s));

        let listen_addr = read_parsed("GATEWAY_LISTEN_ADDR", |s: String| s.parse::<IpAddr>())
            .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST));
        let listen_port = read_parsed("GATEWAY_LISTEN_PORT", |s: String| s.parse::<u16>())
            .unwrap_or(8080);
        let token_file = std::env::var("GATEWAY_TOKEN_FILE")
            .map_or_else(|_| PathBuf::from("shops.json"), PathBuf::from);

        let default_limit = read_parsed("ORDERS_DEFAULT_LIMIT", |s: String| s.parse::<u32>())
            .unwrap_or(DEFAULT_ORDERS_LIMIT)
            .clamp(ORDERS_LIMIT_RANGE.0, ORDERS_LIMIT_RANGE.1);
        let locale = read_parsed("ORDERS_LOCALE", |s: String| s.parse::<OrdersLocale>())
            .unwrap_or_default();

        let config = Self {
            credentials,
            scopes,
            host,
            api_version,
            bearer_secret,
            api_base,
            listen_addr,
            listen_port,
            token_file,
            orders: OrdersPresentation {
                default_limit,
                locale,
            },
        };
        config.log_startup_state();
        config
    }

    /// Logs, once, which required values are missing and which routes that
    /// disables. Called from `from_env`.
    fn log_startup_state(&self) {
        let mut missing = Vec::new();
        if self.credentials.is_none() {
            missing.push("SHOPIFY_API_KEY/SHOPIFY_API_SECRET");
        }
        if self.scopes.is_empty() {
            missing.push("SHOPIFY_SCOPES");
        }
        if self.host.is_none() {
            missing.push("GATEWAY_HOST_URL");
        }
        if !missing.is_empty() {
            tracing::warn!(
                missing = %missing.join(", "),
                "OAuth configuration incomplete; /auth routes will respond with a configuration error"
            );
        }
        if self.bearer_secret.is_none() {
            tracing::warn!(
                "GATEWAY_BEARER_SECRET is not set; protected routes fail closed until it is supplied"
            );
        }
    }

    /// Returns the OAuth app credentials, if configured.
    #[must_use]
    pub const fn credentials(&self) -> Option<&OAuthCredentials> {
        self.credentials.as_ref()
    }

    /// Returns the requested OAuth scopes.
    #[must_use]
    pub const fn scopes(&self) -> &AuthScopes {
        &self.scopes
    }

    /// Returns the public host URL, if configured.
    #[must_use]
    pub const fn host(&self) -> Option<&HostUrl> {
        self.host.as_ref()
    }

    /// Returns the Admin API version.
    #[must_use]
    pub const fn api_version(&self) -> &ApiVersion {
        &self.api_version
    }

    /// Returns the static bearer secret, if configured.
    #[must_use]
    pub const fn bearer_secret(&self) -> Option<&BearerSecret> {
        self.bearer_secret.as_ref()
    }

    /// Returns the fixed upstream base URL override, if configured.
    ///
    /// When set, all Admin API and token-exchange traffic is sent to this
    /// base instead of the per-shop `https://<domain>` origin.
    #[must_use]
    pub const fn api_base(&self) -> Option<&HostUrl> {
        self.api_base.as_ref()
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.listen_addr, self.listen_port)
    }

    /// Returns the token table file path.
    #[must_use]
    pub fn token_file(&self) -> &std::path::Path {
        &self.token_file
    }

    /// Returns the orders presentation settings.
    #[must_use]
    pub const fn orders(&self) -> &OrdersPresentation {
        &self.orders
    }

    /// Builds the URL a caller should visit to (re-)authorize a shop.
    ///
    /// Relative when no public host is configured.
    #[must_use]
    pub fn auth_url_for(&self, shop: &ShopDomain) -> String {
        let base = self.host.as_ref().map_or("", AsRef::as_ref);
        format!("{base}/auth?shop={}", shop.as_ref())
    }
}

/// Reads an environment variable and parses it, logging (and discarding)
/// invalid values.
fn read_parsed<T, E, F>(key: &str, parse: F) -> Option<T>
where
    F: FnOnce(String) -> Result<T, E>,
    E: std::fmt::Display,
{
    let raw = std::env::var(key).ok()?;
    match parse(raw) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(%key, %err, "ignoring invalid environment variable");
            None
        }
    }
}

/// Builder for [`GatewayConfig`].
///
/// All fields are optional; unset fields fall back to the same defaults
/// `from_env` uses. This mirrors the fail-closed model: a config built
/// without credentials simply disables the OAuth routes.
#[derive(Debug, Default)]
pub struct GatewayConfigBuilder {
    credentials: Option<OAuthCredentials>,
    scopes: Option<AuthScopes>,
    host: Option<HostUrl>,
    api_version: Option<ApiVersion>,
    bearer_secret: Option<BearerSecret>,
    api_base: Option<HostUrl>,
    listen_addr: Option<IpAddr>,
    listen_port: Option<u16>,
    token_file: Option<PathBuf>,
    orders: Option<OrdersPresentation>,
}

impl GatewayConfigBuilder {
    /// Sets the OAuth app credentials.
    #[must_use]
    pub fn credentials(mut self, api_key: ApiKey, api_secret_key: ApiSecretKey) -> Self {
        self.credentials = Some(OAuthCredentials {
            api_key,
            api_secret_key,
        });
        self
    }

    /// Sets the requested OAuth scopes.
    #[must_use]
    pub fn scopes(mut self, scopes: AuthScopes) -> Self {
        self.scopes = Some(scopes);
        self
    }

    /// Sets the public host URL.
    #[must_use]
    pub fn host(mut self, host: HostUrl) -> Self {
        self.host = Some(host);
        self
    }

    /// Sets the Admin API version.
    #[must_use]
    pub fn api_version(mut self, version: ApiVersion) -> Self {
        self.api_version = Some(version);
        self
    }

    /// Sets the static bearer secret.
    #[must_use]
    pub fn bearer_secret(mut self, secret: BearerSecret) -> Self {
        self.bearer_secret = Some(secret);
        self
    }

    /// Routes all upstream traffic to a fixed base URL (proxy/test hook).
    #[must_use]
    pub fn api_base(mut self, base: HostUrl) -> Self {
        self.api_base = Some(base);
        self
    }

    /// Sets the bind address.
    #[must_use]
    pub fn listen_addr(mut self, addr: IpAddr) -> Self {
        self.listen_addr = Some(addr);
        self
    }

    /// Sets the listen port.
    #[must_use]
    pub const fn listen_port(mut self, port: u16) -> Self {
        self.listen_port = Some(port);
        self
    }

    /// Sets the token table file path.
    #[must_use]
    pub fn token_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.token_file = Some(path.into());
        self
    }

    /// Sets the orders presentation settings.
    #[must_use]
    pub fn orders(mut self, orders: OrdersPresentation) -> Self {
        self.orders = Some(orders);
        self
    }

    /// Builds the [`GatewayConfig`].
    #[must_use]
    pub fn build(self) -> GatewayConfig {
        GatewayConfig {
            credentials: self.credentials,
            scopes: self.scopes.unwrap_or_default(),
            host: self.host,
            api_version: self.api_version.unwrap_or_else(ApiVersion::latest),
            bearer_secret: self.bearer_secret,
            api_base: self.api_base,
            listen_addr: self
                .listen_addr
                .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST)),
            listen_port: self.listen_port.unwrap_or(8080),
            token_file: self.token_file.unwrap_or_else(|| PathBuf::from("shops.json")),
            orders: self.orders.unwrap_or_default(),
        }
    }
}
