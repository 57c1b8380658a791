//! Authenticated Admin API client for a single shop.
//!
//! [`AdminClient`] binds a shop's base URL and access token together and
//! exposes the two call shapes the Admin API offers: versioned REST
//! (`/admin/api/<version>/<path>`) and GraphQL (`graphql.json`). The caller
//! resolves the shop's token first; the client itself is stateless and
//! holds no token store.
//!
//! Responses are never cached and requests are never retried.

use crate::clients::errors::{ClientError, UpstreamGraphQlError, UpstreamHttpError};
use crate::config::{ApiVersion, HostUrl, ShopDomain};
use reqwest::Method;
use serde_json::Value;
use std::time::Duration;

/// Header carrying the store's access token on every Admin API request.
const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

/// Bounded timeout for all outbound Shopify calls.
pub const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(15);

/// Builds the shared HTTP client used for all upstream traffic.
///
/// # Panics
///
/// Panics if the underlying reqwest client cannot be created. This should
/// only happen in extremely unusual circumstances (e.g., TLS initialization
/// failure).
#[must_use]
pub fn build_http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .use_rustls_tls()
        .timeout(UPSTREAM_TIMEOUT)
        .build()
        .expect("Failed to create HTTP client")
}

/// Per-store Admin API client.
///
/// # Thread Safety
///
/// `AdminClient` is `Send + Sync`; the inner `reqwest::Client` is a cheap
/// handle, so constructing one per request is fine.
///
/// # Example
///
/// ```rust,ignore
/// let client = AdminClient::new(http, &shop, token, &ApiVersion::latest(), None);
/// let body = client
///     .rest(Method::GET, "orders.json", &[("limit", "50".to_string())], None)
///     .await?;
/// ```
#[derive(Debug)]
pub struct AdminClient {
    http: reqwest::Client,
    base_url: String,
    access_token: String,
}

// Verify AdminClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<AdminClient>();
};

impl AdminClient {
    /// Creates a client for `shop` using its stored access token.
    ///
    /// When `api_base` is set, requests go to
    /// `<api_base>/admin/api/<version>` instead of the shop's own origin,
    /// used by proxy deployments and by the test suites to point at a mock
    /// server.
    #[must_use]
    pub fn new(
        http: reqwest::Client,
        shop: &ShopDomain,
        access_token: impl Into<String>,
        api_version: &ApiVersion,
        api_base: Option<&HostUrl>,
    ) -> Self {
        let base_url = api_base.map_or_else(
            || format!("https://{}/admin/api/{api_version}", shop.as_ref()),
            |base| format!("{}/admin/api/{api_version}", base.as_ref()),
        );

        Self {
            http,
            base_url,
            access_token: access_token.into(),
        }
    }

    /// Returns the base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Executes a REST call and returns the parsed JSON body.
    ///
    /// `path` is relative to the versioned base (e.g. `orders.json` or
    /// `orders/123.json`).
    ///
    /// # Errors
    ///
    /// - [`ClientError::Network`] for transport failures (including timeout).
    /// - [`ClientError::Response`] for non-2xx statuses, carrying the status
    ///   and the upstream body.
    pub async fn rest(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<Value, ClientError> {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));

        let mut request = self
            .http
            .request(method, &url)
            .header(ACCESS_TOKEN_HEADER, &self.access_token)
            .header(reqwest::header::ACCEPT, "application/json");
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let details = Self::body_as_json(response).await?;

        if status.is_success() {
            Ok(details)
        } else {
            Err(UpstreamHttpError {
                status: status.as_u16(),
                details,
            }
            .into())
        }
    }

    /// Executes a GraphQL query and returns the `data` field.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Network`] / [`ClientError::Response`] as for
    ///   [`Self::rest`].
    /// - [`ClientError::GraphQl`] when the body carries a non-empty `errors`
    ///   array, even on HTTP 200.
    pub async fn graphql(&self, query: &str, variables: Option<Value>) -> Result<Value, ClientError> {
        let url = format!("{}/graphql.json", self.base_url);
        let payload = serde_json::json!({
            "query": query,
            "variables": variables.unwrap_or(Value::Null),
        });

        let response = self
            .http
            .post(&url)
            .header(ACCESS_TOKEN_HEADER, &self.access_token)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        let body = Self::body_as_json(response).await?;

        if !status.is_success() {
            return Err(UpstreamHttpError {
                status: status.as_u16(),
                details: body,
            }
            .into());
        }

        if let Some(errors) = body.get("errors") {
            let has_errors = match errors {
                Value::Array(list) => !list.is_empty(),
                Value::Null => false,
                _ => true,
            };
            if has_errors {
                return Err(UpstreamGraphQlError {
                    errors: errors.clone(),
                }
                .into());
            }
        }

        Ok(body.get("data").cloned().unwrap_or(Value::Null))
    }

    /// Reads a response body, parsing it as JSON when possible and wrapping
    /// it as a plain string otherwise (Shopify error bodies are not always
    /// JSON).
    async fn body_as_json(response: reqwest::Response) -> Result<Value, ClientError> {
        let text = response.text().await?;
        Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
    }
}
