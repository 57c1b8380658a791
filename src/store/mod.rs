//! Durable per-shop access token storage.
//!
//! The token table is a single JSON file: an object keyed by canonical shop
//! domain, each value a [`ShopRecord`]. The whole table is read into memory
//! at open time and rewritten in full on every mutation. That trades
//! throughput for simplicity, which is the right trade here: writes happen
//! once per app installation.
//!
//! Read failures (missing file, malformed content) degrade to an empty table
//! with a warning instead of failing: a corrupt table means merchants
//! re-install, not that the gateway stops serving. Write failures surface as
//! [`StoreError`] and the OAuth flow treats them as fatal.
//!
//! Concurrent writers from separate processes can lose updates; there is no
//! cross-process locking. This is a known, accepted limitation of the
//! flat-file design.

use crate::config::ShopDomain;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;

/// Errors that can occur while persisting the token table.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Writing the table file failed.
    #[error("Failed to write token table to {path}: {source}")]
    Write {
        /// The table file path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Serializing the table failed.
    #[error("Failed to serialize token table: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// One installed shop: its access token and when it was acquired.
///
/// Serialized with camelCase keys to match the persisted table contract
/// (`{"accessToken": ..., "installedAt": ...}`).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ShopRecord {
    /// The opaque access token issued by Shopify.
    pub access_token: String,
    /// When the token was acquired.
    pub installed_at: DateTime<Utc>,
}

/// Flat-file store mapping shop domains to access tokens.
///
/// At most one live token per domain: saving a token for an already-installed
/// domain overwrites the previous record (re-authentication replaces, never
/// appends).
///
/// # Thread Safety
///
/// Interior mutability via a mutex; safe to share behind an `Arc` across
/// request handlers.
#[derive(Debug)]
pub struct TokenStore {
    path: PathBuf,
    table: Mutex<HashMap<String, ShopRecord>>,
}

// Verify TokenStore is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<TokenStore>();
};

impl TokenStore {
    /// Opens the store, loading any existing table from `path`.
    ///
    /// A missing or unreadable file yields an empty table.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let table = Self::load(&path);
        Self {
            path,
            table: Mutex::new(table),
        }
    }

    fn load(path: &Path) -> HashMap<String, ShopRecord> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "token table not found, starting empty");
                return HashMap::new();
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "failed to read token table, starting empty");
                return HashMap::new();
            }
        };

        match serde_json::from_str(&contents) {
            Ok(table) => table,
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "malformed token table, starting empty");
                HashMap::new()
            }
        }
    }

    /// Upserts the record for `shop` and rewrites the table file.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the table cannot be serialized or written.
    /// The in-memory table keeps the new record either way; the next
    /// successful write persists it.
    pub fn save(&self, shop: &ShopDomain, access_token: impl Into<String>) -> Result<(), StoreError> {
        let record = ShopRecord {
            access_token: access_token.into(),
            installed_at: Utc::now(),
        };

        let mut table = self.table.lock().expect("token table mutex poisoned");
        table.insert(shop.as_ref().to_string(), record);
        self.persist(&table)
    }

    /// Returns the access token for `shop`, if one is on record.
    #[must_use]
    pub fn get(&self, shop: &ShopDomain) -> Option<String> {
        let table = self.table.lock().expect("token table mutex poisoned");
        table.get(shop.as_ref()).map(|r| r.access_token.clone())
    }

    /// Returns the full record for `shop`, if one is on record.
    #[must_use]
    pub fn record(&self, shop: &ShopDomain) -> Option<ShopRecord> {
        let table = self.table.lock().expect("token table mutex poisoned");
        table.get(shop.as_ref()).cloned()
    }

    /// Returns `true` if `shop` has a token on record.
    #[must_use]
    pub fn is_authenticated(&self, shop: &ShopDomain) -> bool {
        let table = self.table.lock().expect("token table mutex poisoned");
        table.contains_key(shop.as_ref())
    }

    /// Removes the record for `shop`, rewriting the table file.
    ///
    /// Returns `true` if a record existed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the rewritten table cannot be persisted.
    pub fn remove(&self, shop: &ShopDomain) -> Result<bool, StoreError> {
        let mut table = self.table.lock().expect("token table mutex poisoned");
        let existed = table.remove(shop.as_ref()).is_some();
        if existed {
            self.persist(&table)?;
        }
        Ok(existed)
    }

    /// Lists all installed shop domains, sorted.
    #[must_use]
    pub fn list_all(&self) -> Vec<String> {
        let table = self.table.lock().expect("token table mutex poisoned");
        let mut domains: Vec<String> = table.keys().cloned().collect();
        domains.sort();
        domains
    }

    /// Lists all records as `(domain, record)` pairs, sorted by domain.
    #[must_use]
    pub fn list_records(&self) -> Vec<(String, ShopRecord)> {
        let table = self.table.lock().expect("token table mutex poisoned");
        let mut records: Vec<(String, ShopRecord)> = table
            .iter()
            .map(|(domain, record)| (domain.clone(), record.clone()))
            .collect();
        records.sort_by(|a, b| a.0.cmp(&b.0));
        records
    }

    /// Rewrites the whole table file. Best-effort with respect to crashes:
    /// there is no fsync/rename dance, matching the durability contract.
    fn persist(&self, table: &HashMap<String, ShopRecord>) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(table)?;
        std::fs::write(&self.path, json).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::distributions::Alphanumeric;
    use rand::Rng;

    /// A unique file path under the system temp dir, removed on drop.
    struct TempTable(PathBuf);

    impl TempTable {
        fn new() -> Self {
            let suffix: String = rand::thread_rng()
                .sample_iter(&Alphanumeric)
                .take(12)
                .map(char::from)
                .collect();
            Self(std::env::temp_dir().join(format!("token-table-{suffix}.json")))
        }
    }

    impl Drop for TempTable {
        fn drop(&mut self) {
            let _ = std::fs::remove_file(&self.0);
        }
    }

    fn shop(name: &str) -> ShopDomain {
        ShopDomain::new(name).unwrap()
    }

    #[test]
    fn test_save_then_get_round_trips() {
        let file = TempTable::new();
        let store = TokenStore::open(&file.0);

        store.save(&shop("test-shop"), "shpat_token").unwrap();
        assert_eq!(store.get(&shop("test-shop")).as_deref(), Some("shpat_token"));
        assert!(store.is_authenticated(&shop("test-shop")));
    }

    #[test]
    fn test_save_overwrites_existing_record() {
        let file = TempTable::new();
        let store = TokenStore::open(&file.0);

        store.save(&shop("test-shop"), "first").unwrap();
        store.save(&shop("test-shop"), "second").unwrap();

        assert_eq!(store.get(&shop("test-shop")).as_deref(), Some("second"));
        assert_eq!(store.list_all().len(), 1);
    }

    #[test]
    fn test_remove_deletes_record() {
        let file = TempTable::new();
        let store = TokenStore::open(&file.0);

        store.save(&shop("test-shop"), "token").unwrap();
        assert!(store.remove(&shop("test-shop")).unwrap());
        assert!(store.get(&shop("test-shop")).is_none());
        assert!(!store.is_authenticated(&shop("test-shop")));

        // Removing again reports nothing was there
        assert!(!store.remove(&shop("test-shop")).unwrap());
    }

    #[test]
    fn test_table_survives_reopen() {
        let file = TempTable::new();
        {
            let store = TokenStore::open(&file.0);
            store.save(&shop("persisted-shop"), "shpat_kept").unwrap();
        }

        let reopened = TokenStore::open(&file.0);
        assert_eq!(
            reopened.get(&shop("persisted-shop")).as_deref(),
            Some("shpat_kept")
        );
    }

    #[test]
    fn test_missing_file_degrades_to_empty_table() {
        let file = TempTable::new();
        let store = TokenStore::open(&file.0);
        assert!(store.list_all().is_empty());
    }

    #[test]
    fn test_malformed_file_degrades_to_empty_table() {
        let file = TempTable::new();
        std::fs::write(&file.0, "not json at all {").unwrap();

        let store = TokenStore::open(&file.0);
        assert!(store.list_all().is_empty());
    }

    #[test]
    fn test_persisted_format_uses_camel_case_keys() {
        let file = TempTable::new();
        let store = TokenStore::open(&file.0);
        store.save(&shop("test-shop"), "shpat_token").unwrap();

        let contents = std::fs::read_to_string(&file.0).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
        let record = &parsed["test-shop.myshopify.com"];
        assert_eq!(record["accessToken"], "shpat_token");
        assert!(record["installedAt"].is_string());
    }

    #[test]
    fn test_list_all_is_sorted() {
        let file = TempTable::new();
        let store = TokenStore::open(&file.0);

        store.save(&shop("zeta"), "t1").unwrap();
        store.save(&shop("alpha"), "t2").unwrap();

        assert_eq!(
            store.list_all(),
            vec![
                "alpha.myshopify.com".to_string(),
                "zeta.myshopify.com".to_string()
            ]
        );
    }
}
