//! OAuth flow handlers: `GET /auth` and `GET /auth/callback`.
//!
//! State machine per installation attempt:
//!
//! 1. `/auth?shop=` validates the domain, issues a nonce, and 302-redirects
//!    the merchant to the shop's authorize page.
//! 2. `/auth/callback` consumes the nonce (exactly once, regardless of the
//!    verdict), verifies the HMAC when present, checks the nonce was issued
//!    for the same shop, exchanges the code, and persists the token.
//!
//! Every failure ends the attempt; the merchant restarts from `/auth`.

use crate::auth::oauth::{authorize_url, exchange_code, hmac, token_exchange_url, OAuthError};
use crate::config::ShopDomain;
use crate::server::error::ApiError;
use crate::server::AppState;
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use serde::Deserialize;
use std::collections::BTreeMap;

/// Query parameters for `GET /auth`.
#[derive(Debug, Deserialize)]
pub struct BeginQuery {
    /// The shop to install into. Free-form; normalized by the validator.
    pub shop: Option<String>,
}

/// `GET /auth?shop=`: start an installation attempt.
pub async fn begin(
    State(state): State<AppState>,
    Query(query): Query<BeginQuery>,
) -> Result<Response, ApiError> {
    let oauth = state.oauth_context()?;

    let shop_param = query
        .shop
        .ok_or_else(|| ApiError::Validation("missing required parameter: shop".to_string()))?;
    let shop = ShopDomain::new(shop_param)?;

    let nonce = state.nonces.issue(shop.clone()).await;
    let url = authorize_url(
        &shop,
        &oauth.credentials.api_key,
        oauth.scopes,
        oauth.host,
        &nonce,
    );

    tracing::info!(shop = %shop, "redirecting merchant to authorize page");
    Ok((StatusCode::FOUND, [(header::LOCATION, url)]).into_response())
}

/// `GET /auth/callback`: finish an installation attempt.
pub async fn callback(
    State(state): State<AppState>,
    Query(params): Query<BTreeMap<String, String>>,
) -> Result<Html<String>, ApiError> {
    let oauth = state.oauth_context()?;

    let shop_param = require_param(&params, "shop")?;
    let code = require_param(&params, "code")?;
    let state_param = require_param(&params, "state")?;
    let shop = ShopDomain::new(shop_param)?;

    // Single consumption: the nonce is spent here, before any verdict, so
    // neither an HMAC failure nor a shop mismatch leaves it replayable.
    let pending = state.nonces.consume(state_param).await;

    if let Some(supplied_hmac) = params.get("hmac") {
        let secret = oauth.credentials.api_secret_key.as_ref();
        if !hmac::verify_callback(&params, supplied_hmac, secret) {
            return Err(OAuthError::InvalidHmac.into());
        }
    }

    let pending = pending.ok_or(OAuthError::StateUnknown)?;
    if pending.shop != shop {
        return Err(OAuthError::ShopMismatch {
            expected: pending.shop.as_ref().to_string(),
            received: shop.as_ref().to_string(),
        }
        .into());
    }

    let token_url = token_exchange_url(&shop, state.config.api_base());
    let granted = exchange_code(&state.http, &token_url, oauth.credentials, code).await?;

    state.store.save(&shop, granted.access_token)?;
    tracing::info!(shop = %shop, "shop installed");

    Ok(Html(confirmation_page(&shop)))
}

fn require_param<'a>(
    params: &'a BTreeMap<String, String>,
    name: &'static str,
) -> Result<&'a str, OAuthError> {
    params
        .get(name)
        .map(String::as_str)
        .filter(|value| !value.is_empty())
        .ok_or(OAuthError::MissingParam { name })
}

fn confirmation_page(shop: &ShopDomain) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head><title>Installation complete</title></head>\n<body>\n\
         <h1>Installation complete</h1>\n\
         <p><strong>{}</strong> is now connected to the order gateway.</p>\n\
         </body>\n</html>\n",
        shop.as_ref()
    )
}
