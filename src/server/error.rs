//! Request-level error type for the HTTP surface.
//!
//! Every handler returns `Result<T, ApiError>`. The `IntoResponse`
//! implementation renders a JSON body of at least `{error, message}`;
//! authentication failures that can be repaired by re-running OAuth also
//! carry an `auth_url`, and upstream failures pass Shopify's status and body
//! through.

use crate::auth::oauth::OAuthError;
use crate::clients::ClientError;
use crate::error::ConfigError;
use crate::store::StoreError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use thiserror::Error;

/// Application-level error for the gateway's HTTP surface.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Bad or missing input on the request.
    #[error("{0}")]
    Validation(String),

    /// The request (or the shop) is not authenticated.
    #[error("{message}")]
    Unauthorized {
        /// Human-readable reason.
        message: String,
        /// URL to (re-)run the OAuth flow, when that would fix it.
        auth_url: Option<String>,
    },

    /// Authenticated but not allowed (bad HMAC/state, missing permissions).
    #[error("{0}")]
    Forbidden(String),

    /// Resource does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Required server-side configuration is missing. Fail-closed.
    #[error("server configuration error: {0}")]
    Configuration(String),

    /// Shopify answered with an error status we pass through.
    #[error("Shopify responded with status {status}")]
    Upstream {
        /// Upstream status code.
        status: u16,
        /// Upstream response body.
        details: Value,
    },

    /// Shopify answered 200 with a GraphQL error list.
    #[error("Shopify GraphQL query failed")]
    UpstreamGraphQl(Value),

    /// Anything else; details go to the log, not the client.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Stable machine-readable code for the response body.
    const fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::Unauthorized { .. } => "unauthorized",
            Self::Forbidden(_) => "forbidden",
            Self::NotFound(_) => "not_found",
            Self::Configuration(_) => "configuration_error",
            Self::Upstream { .. } => "upstream_error",
            Self::UpstreamGraphQl(_) => "upstream_graphql_error",
            Self::Internal(_) => "internal_error",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Configuration(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            Self::UpstreamGraphQl(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Maps an Admin API call failure onto a caller-facing error.
    ///
    /// - upstream 401: the stored token is invalid or expired; the caller
    ///   gets a 401 with `auth_url` to re-run OAuth
    /// - upstream 403: insufficient permissions
    /// - upstream 404: mapped to our 404 when `map_404` is set (single-order
    ///   fetch), otherwise passed through like any other status
    /// - anything else: status and body passed through
    #[must_use]
    pub fn from_upstream(err: ClientError, auth_url: String, map_404: bool) -> Self {
        match err {
            ClientError::Response(response) => match response.status {
                401 => Self::Unauthorized {
                    message: "invalid or expired token".to_string(),
                    auth_url: Some(auth_url),
                },
                403 => Self::Forbidden("insufficient permissions".to_string()),
                404 if map_404 => Self::NotFound("order not found".to_string()),
                status => Self::Upstream {
                    status,
                    details: response.details,
                },
            },
            ClientError::GraphQl(err) => Self::UpstreamGraphQl(err.errors),
            ClientError::Network(err) => Self::Internal(format!("failed to reach Shopify: {err}")),
        }
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self::Internal(format!("failed to persist token: {err}"))
    }
}

impl From<OAuthError> for ApiError {
    fn from(err: OAuthError) -> Self {
        match err {
            OAuthError::MissingParam { .. } => Self::Validation(err.to_string()),
            OAuthError::InvalidHmac | OAuthError::StateUnknown | OAuthError::ShopMismatch { .. } => {
                Self::Forbidden(err.to_string())
            }
            OAuthError::TokenEndpoint { status, message } => {
                Self::Internal(format!("token exchange failed with status {status}: {message}"))
            }
            OAuthError::MalformedTokenResponse => Self::Internal(err.to_string()),
            OAuthError::Transport(_) => Self::Internal(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(error = %self, code = self.code(), "request failed");
        } else {
            tracing::debug!(error = %self, code = self.code(), "request rejected");
        }

        // Internal details stay in the log
        let message = match &self {
            Self::Internal(_) => "internal server error".to_string(),
            other => other.to_string(),
        };

        let mut body = json!({
            "error": self.code(),
            "message": message,
        });
        match self {
            Self::Unauthorized {
                auth_url: Some(auth_url),
                ..
            } => {
                body["auth_url"] = Value::String(auth_url);
            }
            Self::Upstream { details, .. } => {
                body["details"] = details;
            }
            Self::UpstreamGraphQl(errors) => {
                body["errors"] = errors;
            }
            _ => {}
        }

        (status, Json(body)).into_response()
    }
}
