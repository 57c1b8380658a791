//! Authorization-code exchange.
//!
//! The last leg of the flow: POST `{client_id, client_secret, code}` to the
//! shop's token endpoint and take the granted access token out of the
//! response. Exactly one attempt is made; any transport failure, non-2xx
//! status, or missing `access_token` field is fatal for the installation
//! attempt and the merchant restarts from `/auth`.

use crate::auth::oauth::OAuthError;
use crate::config::{HostUrl, OAuthCredentials, ShopDomain};
use serde::{Deserialize, Serialize};

/// Path of the token endpoint on the shop's admin.
const TOKEN_EXCHANGE_PATH: &str = "/admin/oauth/access_token";

/// Request body for the code exchange.
#[derive(Serialize)]
struct AccessTokenRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    code: &'a str,
}

/// Response body from the token endpoint.
///
/// `access_token` is optional at the serde level so its absence surfaces as
/// [`OAuthError::MalformedTokenResponse`] rather than a generic parse error.
#[derive(Deserialize)]
struct AccessTokenResponse {
    access_token: Option<String>,
    scope: Option<String>,
}

/// An access token granted by Shopify for one shop.
#[derive(Clone, Debug)]
pub struct GrantedToken {
    /// The opaque access token.
    pub access_token: String,
    /// The scopes the merchant actually granted, when reported.
    pub granted_scopes: Option<String>,
}

/// Returns the full token-endpoint URL for `shop`.
///
/// When `api_base` is set, upstream traffic is routed there instead of the
/// per-shop origin (proxy deployments and tests).
#[must_use]
pub fn token_exchange_url(shop: &ShopDomain, api_base: Option<&HostUrl>) -> String {
    api_base.map_or_else(
        || format!("https://{}{TOKEN_EXCHANGE_PATH}", shop.as_ref()),
        |base| format!("{}{TOKEN_EXCHANGE_PATH}", base.as_ref()),
    )
}

/// Exchanges an authorization code for an access token.
///
/// # Errors
///
/// - [`OAuthError::Transport`]: the endpoint could not be reached.
/// - [`OAuthError::TokenEndpoint`]: the endpoint answered with a non-2xx
///   status; carries the status and the raw error body.
/// - [`OAuthError::MalformedTokenResponse`]: a 2xx answer without an
///   `access_token` field (or an unparseable body).
pub async fn exchange_code(
    http: &reqwest::Client,
    token_url: &str,
    credentials: &OAuthCredentials,
    code: &str,
) -> Result<GrantedToken, OAuthError> {
    let request_body = AccessTokenRequest {
        client_id: credentials.api_key.as_ref(),
        client_secret: credentials.api_secret_key.as_ref(),
        code,
    };

    let response = http.post(token_url).json(&request_body).send().await?;

    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(OAuthError::TokenEndpoint {
            status: status.as_u16(),
            message,
        });
    }

    let token_response: AccessTokenResponse = response
        .json()
        .await
        .map_err(|_| OAuthError::MalformedTokenResponse)?;

    let access_token = token_response
        .access_token
        .filter(|token| !token.is_empty())
        .ok_or(OAuthError::MalformedTokenResponse)?;

    Ok(GrantedToken {
        access_token,
        granted_scopes: token_response.scope,
    })
}
