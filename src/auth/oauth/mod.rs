//! Shopify OAuth authorization-code flow.
//!
//! The gateway installs into a store through the standard three-step dance:
//!
//! 1. **Authorize** ([`authorize_url`]): generate a single-use [`Nonce`],
//!    remember it in the [`NonceCache`] keyed by its value, and redirect the
//!    merchant to `https://<shop>/admin/oauth/authorize` with `client_id`,
//!    `scope`, `redirect_uri`, and `state=<nonce>`.
//! 2. **Callback** ([`hmac`], [`NonceCache::consume`]): verify the HMAC-SHA256
//!    signature Shopify puts on the callback query string, consume the nonce
//!    (single use, deleted whether verification then succeeds or fails), and
//!    check the nonce was issued for the same shop.
//! 3. **Exchange** ([`exchange_code`]): POST the authorization code to
//!    `/admin/oauth/access_token` and hand the granted token to the token
//!    store. No retries; any failure aborts the attempt and the merchant
//!    restarts from step 1.
//!
//! # Security notes
//!
//! - HMAC and state comparisons are constant-time ([`hmac::constant_time_compare`]).
//! - Nonces carry at least 128 bits of entropy and expire after
//!   [`NONCE_TTL`](nonce_cache::NONCE_TTL) via the cache's TTL, not per-entry
//!   timers, so expiry survives arbitrary consumption orders and is easy to
//!   reason about under test.

mod authorize;
mod error;
mod exchange;
pub mod hmac;
mod nonce_cache;
mod state;

pub use authorize::{authorize_url, CALLBACK_PATH};
pub use error::OAuthError;
pub use exchange::{exchange_code, token_exchange_url, GrantedToken};
pub use nonce_cache::{NonceCache, PendingAuth};
pub use state::Nonce;
