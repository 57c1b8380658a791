//! OAuth scope handling for the Shopify Admin API.
//!
//! This module provides the [`AuthScopes`] type for managing the scopes the
//! gateway requests during app installation, including parsing and implied
//! scope handling.

use crate::error::ConfigError;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// A set of OAuth scopes for Shopify API access.
///
/// This type handles parsing, deduplication, and implied scope logic.
/// For example, `write_orders` implies `read_orders`, so the implied read
/// scope is added automatically when parsing.
///
/// # Serialization
///
/// `AuthScopes` serializes to and deserializes from a comma-separated string.
/// Scopes are kept in lexicographic order, so the serialized form is stable.
///
/// # Example
///
/// ```rust
/// use order_gateway::AuthScopes;
///
/// let scopes: AuthScopes = "read_orders, read_customers".parse().unwrap();
/// assert!(!scopes.is_empty());
/// assert_eq!(scopes.to_string(), "read_customers,read_orders");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct AuthScopes {
    scopes: BTreeSet<String>,
}

impl AuthScopes {
    /// Creates an empty scope set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the scope set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Returns an iterator over the scopes in lexicographic order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.scopes.iter().map(String::as_str)
    }

    /// Adds implied scopes for write permissions.
    ///
    /// `write_foo` implies `read_foo`.
    fn add_implied_scopes(&mut self) {
        let implied: Vec<String> = self
            .scopes
            .iter()
            .filter_map(|scope| {
                scope
                    .strip_prefix("write_")
                    .map(|suffix| format!("read_{suffix}"))
            })
            .collect();

        for scope in implied {
            self.scopes.insert(scope);
        }
    }
}

impl FromStr for AuthScopes {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut scopes = BTreeSet::new();
        for entry in s.split(',') {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }
            if !entry
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
            {
                return Err(ConfigError::InvalidScopes {
                    reason: format!("scope '{entry}' contains invalid characters"),
                });
            }
            scopes.insert(entry.to_string());
        }

        let mut auth_scopes = Self { scopes };
        auth_scopes.add_implied_scopes();
        Ok(auth_scopes)
    }
}

impl fmt::Display for AuthScopes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .scopes
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(",");
        f.write_str(&joined)
    }
}

impl Serialize for AuthScopes {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for AuthScopes {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_deduplicates_and_sorts() {
        let scopes: AuthScopes = "read_orders,read_customers,read_orders".parse().unwrap();
        assert_eq!(scopes.to_string(), "read_customers,read_orders");
    }

    #[test]
    fn test_parse_handles_whitespace() {
        let scopes: AuthScopes = " read_orders , read_customers ".parse().unwrap();
        assert_eq!(scopes.iter().count(), 2);
    }

    #[test]
    fn test_write_scope_implies_read_scope() {
        let scopes: AuthScopes = "write_orders".parse().unwrap();
        assert_eq!(scopes.to_string(), "read_orders,write_orders");
    }

    #[test]
    fn test_empty_string_parses_to_empty_set() {
        let scopes: AuthScopes = "".parse().unwrap();
        assert!(scopes.is_empty());
    }

    #[test]
    fn test_invalid_characters_rejected() {
        assert!(matches!(
            "read orders".parse::<AuthScopes>(),
            Err(ConfigError::InvalidScopes { .. })
        ));
    }

    #[test]
    fn test_serde_round_trip() {
        let scopes: AuthScopes = "write_orders,read_customers".parse().unwrap();
        let json = serde_json::to_string(&scopes).unwrap();
        assert_eq!(json, r#""read_customers,read_orders,write_orders""#);
        let restored: AuthScopes = serde_json::from_str(&json).unwrap();
        assert_eq!(scopes, restored);
    }
}
