//! Error types for upstream Shopify API calls.
//!
//! The client translates every failure into a small taxonomy:
//!
//! - [`ClientError::Response`]: Shopify answered with a non-2xx HTTP status.
//! - [`ClientError::GraphQl`]: Shopify answered 200 but the body carries a
//!   GraphQL-level `errors` array.
//! - [`ClientError::Network`]: the request never completed (DNS, TLS,
//!   connect, or the bounded timeout).
//!
//! Nothing is retried; callers map these onto their own response codes.

use thiserror::Error;

/// A non-2xx HTTP response from the Admin API.
///
/// Carries the status and the response body (parsed as JSON when possible,
/// wrapped as a string otherwise) so callers can pass upstream errors
/// through.
#[derive(Debug, Error)]
#[error("Shopify responded with status {status}")]
pub struct UpstreamHttpError {
    /// The HTTP status code of the response.
    pub status: u16,
    /// The response body.
    pub details: serde_json::Value,
}

/// A GraphQL-level error list, delivered with HTTP 200.
#[derive(Debug, Error)]
#[error("Shopify GraphQL query failed: {errors}")]
pub struct UpstreamGraphQlError {
    /// The upstream `errors` array, verbatim.
    pub errors: serde_json::Value,
}

/// Unified error type for Admin API calls.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Shopify returned a non-2xx HTTP status.
    #[error(transparent)]
    Response(#[from] UpstreamHttpError),

    /// Shopify returned HTTP 200 with a GraphQL error list.
    #[error(transparent)]
    GraphQl(#[from] UpstreamGraphQlError),

    /// Transport-level failure (connection, TLS, timeout).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

// Verify ClientError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ClientError>();
};
