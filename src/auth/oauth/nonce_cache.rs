//! Expiring table of outstanding OAuth nonces.
//!
//! Each `/auth` redirect deposits a [`PendingAuth`] here keyed by the nonce
//! value; the `/auth/callback` handler consumes it exactly once. Expiry is
//! enforced by the cache's time-to-live rather than per-entry deferred
//! callbacks, so it holds across restarts of the flow and needs no timer
//! bookkeeping. Memory grows only with in-flight installations and is
//! bounded by the TTL and capacity.

use crate::auth::oauth::Nonce;
use crate::config::ShopDomain;
use chrono::{DateTime, Utc};
use moka::future::Cache;
use std::time::Duration;

/// How long a nonce stays valid after issuance.
pub const NONCE_TTL: Duration = Duration::from_secs(600);

/// Upper bound on outstanding installation attempts.
const MAX_PENDING: u64 = 100_000;

/// What we remember about an authorize redirect until its callback arrives.
#[derive(Clone, Debug)]
pub struct PendingAuth {
    /// The shop the redirect was issued for.
    pub shop: ShopDomain,
    /// When the nonce was issued.
    pub issued_at: DateTime<Utc>,
}

/// In-memory, TTL-expiring nonce table.
///
/// Single-instance by design: with more than one gateway process the table
/// would have to move to a shared store, which is out of scope here.
///
/// # Example
///
/// ```rust,ignore
/// let cache = NonceCache::with_default_ttl();
/// let nonce = cache.issue(shop.clone()).await;
///
/// // later, in the callback handler:
/// match cache.consume(nonce.as_ref()).await {
///     Some(pending) if pending.shop == shop => { /* proceed to exchange */ }
///     Some(_) => { /* shop mismatch */ }
///     None => { /* unknown, reused, or expired state */ }
/// }
/// ```
#[derive(Clone)]
pub struct NonceCache {
    entries: Cache<String, PendingAuth>,
}

impl NonceCache {
    /// Creates a cache whose entries expire after `ttl`.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        let entries = Cache::builder()
            .max_capacity(MAX_PENDING)
            .time_to_live(ttl)
            .build();
        Self { entries }
    }

    /// Creates a cache with the standard 10-minute TTL.
    #[must_use]
    pub fn with_default_ttl() -> Self {
        Self::new(NONCE_TTL)
    }

    /// Issues a fresh nonce for `shop` and records the pending attempt.
    pub async fn issue(&self, shop: ShopDomain) -> Nonce {
        let nonce = Nonce::new();
        let pending = PendingAuth {
            shop,
            issued_at: Utc::now(),
        };
        self.entries.insert(nonce.as_ref().to_string(), pending).await;
        nonce
    }

    /// Consumes the nonce for `state`, removing it from the table.
    ///
    /// Returns `None` when the state was never issued, already consumed, or
    /// expired. The removal happens unconditionally: a nonce is spent by
    /// being looked at, whether or not the caller's subsequent checks pass.
    pub async fn consume(&self, state: &str) -> Option<PendingAuth> {
        self.entries.remove(state).await
    }
}
