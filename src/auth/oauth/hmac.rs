//! HMAC validation for Shopify OAuth callbacks.
//!
//! Shopify signs the callback query string with HMAC-SHA256 keyed by the
//! app's API secret. The signature covers every query parameter except
//! `hmac` itself, sorted lexicographically by key and joined as
//! `key=value&key=value`.
//!
//! # Security
//!
//! All signature comparisons use constant-time comparison to prevent timing
//! attacks.
//!
//! # Example
//!
//! ```rust
//! use std::collections::BTreeMap;
//! use order_gateway::auth::oauth::hmac::{callback_signable, compute_signature};
//!
//! let mut params = BTreeMap::new();
//! params.insert("shop".to_string(), "example.myshopify.com".to_string());
//! params.insert("code".to_string(), "abc123".to_string());
//! params.insert("hmac".to_string(), "ignored".to_string());
//!
//! let signable = callback_signable(&params);
//! assert_eq!(signable, "code=abc123&shop=example.myshopify.com");
//!
//! let signature = compute_signature(&signable, "my-api-secret");
//! assert!(signature.chars().all(|c| c.is_ascii_hexdigit()));
//! ```

use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::collections::BTreeMap;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Computes an HMAC-SHA256 signature for the given message.
///
/// The signature is returned as a lowercase hexadecimal string, the format
/// Shopify uses for the OAuth `hmac` query parameter.
///
/// # Note
///
/// This function uses `expect()` internally but this will never panic because
/// HMAC-SHA256 accepts keys of any length.
///
/// # Example
///
/// ```rust
/// use order_gateway::auth::oauth::hmac::compute_signature;
///
/// let sig = compute_signature("test-message", "secret-key");
/// assert_eq!(sig.len(), 64); // SHA256 produces 32 bytes = 64 hex chars
/// ```
#[must_use]
#[allow(clippy::missing_panics_doc)] // HMAC accepts any key size, so this never panics
pub fn compute_signature(message: &str, secret: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(message.as_bytes());
    let result = mac.finalize();
    hex::encode(result.into_bytes())
}

/// Performs constant-time comparison of two strings.
///
/// Used for HMAC verification and anywhere else a secret is compared against
/// caller-supplied input.
#[must_use]
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    // ConstantTimeEq handles different lengths securely
    a_bytes.ct_eq(b_bytes).into()
}

/// Builds the signable string for a callback query.
///
/// Every parameter except `hmac` participates, sorted lexicographically by
/// key (which a `BTreeMap` gives us for free) and joined as `key=value&...`.
#[must_use]
pub fn callback_signable(params: &BTreeMap<String, String>) -> String {
    params
        .iter()
        .filter(|(key, _)| key.as_str() != "hmac")
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// Validates the HMAC signature of an OAuth callback.
///
/// Recomputes the signature over `params` (minus `hmac`) with `secret` and
/// compares it against `supplied` in constant time.
#[must_use]
pub fn verify_callback(params: &BTreeMap<String, String>, supplied: &str, secret: &str) -> bool {
    let signable = callback_signable(params);
    let computed = compute_signature(&signable, secret);
    constant_time_compare(&computed, supplied)
}

// Internal hex encoding since we don't want to add another dependency
mod hex {
    const HEX_CHARS: &[u8; 16] = b"0123456789abcdef";

    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        let bytes = bytes.as_ref();
        let mut result = String::with_capacity(bytes.len() * 2);
        for &byte in bytes {
            result.push(HEX_CHARS[(byte >> 4) as usize] as char);
            result.push(HEX_CHARS[(byte & 0x0f) as usize] as char);
        }
        result
    }
}
