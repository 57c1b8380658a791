//! Static bearer-token gate for protected routes.
//!
//! Every route under `/v1` passes through [`require_bearer`]. The check is a
//! constant-time comparison against the configured [`BearerSecret`]; there is
//! no session and no expiry. When no secret is configured the gate fails
//! closed with a configuration error rather than letting anything through.
//!
//! [`BearerSecret`]: crate::config::BearerSecret

use crate::auth::oauth::hmac::constant_time_compare;
use crate::server::error::ApiError;
use crate::server::AppState;
use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;

/// Middleware enforcing `Authorization: Bearer <secret>` on protected routes.
///
/// # Errors
///
/// - [`ApiError::Configuration`] when the server has no bearer secret
///   configured (fail-closed).
/// - [`ApiError::Unauthorized`] when the header is missing, malformed, or
///   carries the wrong token.
pub async fn require_bearer(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(secret) = state.config.bearer_secret() else {
        return Err(ApiError::Configuration(
            "bearer secret is not configured".to_string(),
        ));
    };

    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| unauthorized("missing Authorization header"))?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| unauthorized("Authorization header must be of the form 'Bearer <token>'"))?;

    if !constant_time_compare(token, secret.as_ref()) {
        return Err(unauthorized("invalid bearer token"));
    }

    Ok(next.run(request).await)
}

fn unauthorized(message: &str) -> ApiError {
    ApiError::Unauthorized {
        message: message.to_string(),
        auth_url: None,
    }
}
