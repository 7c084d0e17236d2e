//! Snapshot persistence for the skillshare marketplace.
//!
//! The whole application state lives in two keyed JSON records: the
//! marketplace snapshot (offers, escrows, favorites) and the auth snapshot
//! (users, current session). Records are loaded once at startup and
//! rewritten in full on every state change; a missing or corrupt record
//! falls back to the empty default rather than failing startup. Key names
//! carry a version suffix instead of a migration scheme.
//!
//! # Key Components
//!
//! - [`JsonStore`]: directory of keyed JSON files with load/save lifecycle
//! - [`seed::seed_demo_data`]: one-time demo offers and accounts

pub mod seed;

use std::fs;
use std::path::PathBuf;

use accounts::AccountRegistry;
use marketplace::MarketStore;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sha2::{Digest, Sha256};

/// Key for the marketplace snapshot.
pub const MARKET_KEY: &str = "skillshare_app_v5";
/// Key for the auth snapshot.
pub const AUTH_KEY: &str = "skillshare_auth_v1";
/// Key for the one-shot seed marker.
pub const SEED_KEY: &str = "__skillshare_seeded_v5";

/// Error types for persistence operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Filesystem failure while writing a record
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Record failed to serialize
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A directory of keyed JSON records.
#[derive(Debug, Clone)]
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    /// Create a store rooted at a directory.
    ///
    /// The directory is created lazily on the first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Load a record, falling back on missing or corrupt data.
    pub fn load_or<T: DeserializeOwned>(&self, key: &str, fallback: T) -> T {
        match fs::read_to_string(self.path(key)) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(value) => value,
                Err(err) => {
                    tracing::warn!(key = %key, error = %err, "corrupt record, using fallback");
                    fallback
                }
            },
            Err(_) => fallback,
        }
    }

    /// Load a record, falling back on the type's default.
    pub fn load_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        self.load_or(key, T::default())
    }

    /// Rewrite a record in full.
    ///
    /// Logs a content hash so successive snapshots can be audited.
    pub fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let json = serde_json::to_string(value)?;
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path(key), &json)?;
        tracing::debug!(key = %key, hash = %content_hash(json.as_bytes()), "saved record");
        Ok(())
    }

    // -------- Application snapshots --------

    /// Load the marketplace snapshot.
    pub fn load_market(&self) -> MarketStore {
        self.load_or_default(MARKET_KEY)
    }

    /// Persist the marketplace snapshot.
    pub fn save_market(&self, store: &MarketStore) -> Result<(), StorageError> {
        self.save(MARKET_KEY, store)
    }

    /// Load the auth snapshot.
    pub fn load_accounts(&self) -> AccountRegistry {
        self.load_or_default(AUTH_KEY)
    }

    /// Persist the auth snapshot.
    pub fn save_accounts(&self, registry: &AccountRegistry) -> Result<(), StorageError> {
        self.save(AUTH_KEY, registry)
    }

    /// Where a record lives on disk. The file may not exist yet.
    pub fn record_path(&self, key: &str) -> PathBuf {
        self.path(key)
    }
}

/// SHA256 hash of serialized record content.
pub fn content_hash(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_record_falls_back() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::new(dir.path());
        let market = store.load_market();
        assert!(market.offers().is_empty());
    }

    #[test]
    fn test_corrupt_record_falls_back() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::new(dir.path());
        fs::create_dir_all(dir.path()).unwrap();
        fs::write(dir.path().join(format!("{MARKET_KEY}.json")), "{not json").unwrap();

        let market = store.load_market();
        assert!(market.escrows().is_empty());
    }

    #[test]
    fn test_market_snapshot_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::new(dir.path());

        let mut market = MarketStore::new();
        market.publish_offer(
            marketplace::OfferDraft {
                user_id: "u1".to_string(),
                user_name: "Uma".to_string(),
                title: "Bike repair".to_string(),
                desc: "Punctures and brakes.".to_string(),
                category: Some("logistics".to_string()),
                gbp_per_hour: 20,
            },
            &marketplace::MarketConfig::default(),
        );
        store.save_market(&market).unwrap();

        let back = store.load_market();
        assert_eq!(back.offers().len(), 1);
        assert_eq!(back.offers()[0].title, "Bike repair");
        assert_eq!(back.offers()[0].credits_per_hour, 2);
    }

    #[test]
    fn test_accounts_snapshot_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::new(dir.path());

        let mut registry = AccountRegistry::new();
        registry.credit_by_id("u1", 9);
        store.save_accounts(&registry).unwrap();

        let back = store.load_accounts();
        assert_eq!(back.balance_of("u1"), 9);
        assert!(back.current_user().is_none());
    }

    #[test]
    fn test_content_hash_is_stable() {
        assert_eq!(content_hash(b"abc"), content_hash(b"abc"));
        assert_ne!(content_hash(b"abc"), content_hash(b"abd"));
    }
}
