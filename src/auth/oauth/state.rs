//! State parameter handling for OAuth CSRF protection.
//!
//! This module provides the [`Nonce`] type: the random `state` value binding
//! an authorize redirect to its callback so a forged callback cannot complete
//! an installation.

use rand::distributions::Alphanumeric;
use rand::Rng;
use std::fmt;

/// A single-use OAuth state nonce.
///
/// The value is a 32-character alphanumeric string generated with a
/// cryptographically secure random number generator, which comes to roughly
/// 190 bits of entropy, comfortably above the 128-bit floor an unguessable
/// CSRF token needs.
///
/// # Thread Safety
///
/// `Nonce` is `Send + Sync`, making it safe to share across threads.
///
/// # Example
///
/// ```rust
/// use order_gateway::auth::oauth::Nonce;
///
/// let nonce = Nonce::new();
/// assert_eq!(nonce.as_ref().len(), 32);
/// assert!(nonce.as_ref().chars().all(|c| c.is_ascii_alphanumeric()));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Nonce(String);

// Verify Nonce is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Nonce>();
};

impl Nonce {
    /// The length of generated nonces.
    const LENGTH: usize = 32;

    /// Creates a new nonce from the thread-local CSPRNG.
    #[must_use]
    pub fn new() -> Self {
        let value: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(Self::LENGTH)
            .map(char::from)
            .collect();
        Self(value)
    }
}

impl Default for Nonce {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Nonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Nonce {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
