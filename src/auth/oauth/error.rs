//! OAuth-specific error types.
//!
//! Every failure mode of an installation attempt maps onto one variant here;
//! the HTTP layer translates them to status codes (400 for missing input,
//! 403 for verification failures, 500 or the upstream status for exchange
//! failures). None of these are retried; the merchant restarts the flow.

use thiserror::Error;

/// Errors that can occur during the OAuth authorization-code flow.
///
/// # Thread Safety
///
/// `OAuthError` is `Send + Sync`, making it safe to use across async
/// boundaries.
#[derive(Debug, Error)]
pub enum OAuthError {
    /// A required callback parameter was missing.
    #[error("Missing required parameter '{name}'")]
    MissingParam {
        /// Name of the missing query parameter.
        name: &'static str,
    },

    /// HMAC signature validation failed.
    ///
    /// The callback's `hmac` parameter does not match the signature computed
    /// over the remaining query parameters with the API secret key. Either
    /// the request was tampered with or the secret key is misconfigured.
    #[error("HMAC signature validation failed")]
    InvalidHmac,

    /// The `state` parameter does not correspond to a live nonce.
    ///
    /// Either the nonce was never issued, was already consumed, or expired.
    /// All three collapse to the same answer on purpose: the cache's TTL is
    /// the expiry mechanism, so an expired nonce is simply absent.
    #[error("state not found or expired")]
    StateUnknown,

    /// The nonce was issued for a different shop than the callback names.
    #[error("shop mismatch: state was issued for '{expected}', callback is for '{received}'")]
    ShopMismatch {
        /// The shop the nonce was issued for.
        expected: String,
        /// The shop named in the callback.
        received: String,
    },

    /// The token endpoint returned a non-success HTTP status.
    #[error("Token exchange failed with status {status}: {message}")]
    TokenEndpoint {
        /// The HTTP status code returned.
        status: u16,
        /// The error body from the response.
        message: String,
    },

    /// The token endpoint answered 2xx but the body carried no `access_token`.
    #[error("Token endpoint response did not contain an access_token")]
    MalformedTokenResponse,

    /// Transport-level failure reaching the token endpoint.
    #[error("Failed to reach token endpoint: {0}")]
    Transport(#[from] reqwest::Error),
}

// Verify OAuthError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<OAuthError>();
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_unknown_message() {
        assert_eq!(OAuthError::StateUnknown.to_string(), "state not found or expired");
    }

    #[test]
    fn test_shop_mismatch_includes_both_domains() {
        let error = OAuthError::ShopMismatch {
            expected: "a.myshopify.com".to_string(),
            received: "b.myshopify.com".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("a.myshopify.com"));
        assert!(message.contains("b.myshopify.com"));
    }

    #[test]
    fn test_token_endpoint_includes_status_and_message() {
        let error = OAuthError::TokenEndpoint {
            status: 401,
            message: "invalid client".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("401"));
        assert!(message.contains("invalid client"));
    }

    #[test]
    fn test_oauth_error_implements_std_error() {
        let error: &dyn std::error::Error = &OAuthError::InvalidHmac;
        let _ = error;
    }
}
