//! # Session Store
//!
//! Persists exactly one [`SessionRecord`] across restarts.
//!
//! The whole record is serialized into a single value under
//! [`SESSION_KEY`], so a save is all-or-nothing from the caller's point of
//! view. Writes are serialized through an async lock; last write wins.
//!
//! ## Legacy shapes
//!
//! Older front ends wrote a JSON blob under `medichain_wallet` and a separate
//! `medichain_demo_mode` flag. [`SessionStore::load`] migrates the blob into
//! the current shape and honors the flag (demo wins), without surfacing any
//! extra error to callers.

use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use shared::dto::{LegacyWalletBlob, Network, SessionRecord};

use crate::error::Result;
use crate::storage::KeyValueStorage;

/// Current record key.
pub const SESSION_KEY: &str = "medichain_session";

/// Legacy single-blob record (`{address, type, connected, connectedAt}`).
pub const LEGACY_WALLET_KEY: &str = "medichain_wallet";

/// Legacy demo flag, `"true"` when set.
pub const LEGACY_DEMO_KEY: &str = "medichain_demo_mode";

/// Per-field keys written by older front ends; only ever cleared.
const LEGACY_FIELD_KEYS: &[&str] = &[
    "medichain_wallet_address",
    "medichain_wallet_name",
    "medichain_connected",
    "slush_connection_request",
    "slush_connection_timestamp",
];

pub struct SessionStore {
    storage: Arc<dyn KeyValueStorage>,
    /// Network assigned to migrated legacy records, which never carried one
    default_network: Network,
    write_lock: Mutex<()>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>, default_network: Network) -> Self {
        Self {
            storage,
            default_network,
            write_lock: Mutex::new(()),
        }
    }

    /// Load the persisted session. Unreadable or corrupt data reads as no session.
    pub async fn load(&self) -> Option<SessionRecord> {
        let mut record = match self.read_current().await {
            Some(record) => Some(record),
            None => self.migrate_legacy().await,
        };

        if self.legacy_demo_flag().await {
            let network = record.as_ref().map(|r| r.network).unwrap_or(self.default_network);
            match record.as_mut() {
                Some(r) => r.is_demo_mode = true,
                None => record = Some(SessionRecord::demo(network)),
            }
        }

        record
    }

    /// Overwrite the persisted record.
    pub async fn save(&self, record: &SessionRecord) -> Result<()> {
        let raw = serde_json::to_string(record)?;

        let _guard = self.write_lock.lock().await;
        self.storage.set(SESSION_KEY, &raw).await?;
        // A stale demo flag would override the record on next load
        self.storage.remove(LEGACY_DEMO_KEY).await?;

        debug!(
            provider = %record.provider_name,
            demo = record.is_demo_mode,
            network = %record.network,
            "Session saved"
        );
        Ok(())
    }

    /// Remove the record and every legacy key. Attempts every key and
    /// returns the first failure.
    pub async fn clear(&self) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        let mut first_error = None;
        for key in [SESSION_KEY, LEGACY_WALLET_KEY, LEGACY_DEMO_KEY]
            .iter()
            .chain(LEGACY_FIELD_KEYS)
        {
            if let Err(e) = self.storage.remove(key).await {
                warn!(key = %key, error = %e, "Failed to remove session key");
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => {
                debug!("Session cleared");
                Ok(())
            }
        }
    }

    async fn read_current(&self) -> Option<SessionRecord> {
        let raw = match self.storage.get(SESSION_KEY).await {
            Ok(raw) => raw?,
            Err(e) => {
                warn!(error = %e, "Session storage unreadable; treating as no session");
                return None;
            }
        };

        match serde_json::from_str::<SessionRecord>(&raw) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(error = %e, "Persisted session is corrupt; treating as no session");
                None
            }
        }
    }

    async fn migrate_legacy(&self) -> Option<SessionRecord> {
        let raw = self.storage.get(LEGACY_WALLET_KEY).await.ok().flatten()?;

        let blob: LegacyWalletBlob = match serde_json::from_str(&raw) {
            Ok(blob) => blob,
            Err(e) => {
                warn!(error = %e, "Legacy wallet blob is corrupt; ignoring it");
                return None;
            }
        };

        let record = blob.into_record(self.default_network);
        match self.save(&record).await {
            Ok(()) => {
                if let Err(e) = self.storage.remove(LEGACY_WALLET_KEY).await {
                    warn!(error = %e, "Migrated legacy session but could not remove old key");
                }
                info!(provider = %record.provider_name, "Migrated legacy wallet session");
            }
            Err(e) => warn!(error = %e, "Could not persist migrated legacy session"),
        }

        Some(record)
    }

    async fn legacy_demo_flag(&self) -> bool {
        matches!(
            self.storage.get(LEGACY_DEMO_KEY).await,
            Ok(Some(flag)) if flag.trim() == "true"
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use crate::testing::{sample_address, FailingStorage};

    fn store_with(storage: Arc<MemoryStorage>) -> SessionStore {
        SessionStore::new(storage, Network::Testnet)
    }

    #[tokio::test]
    async fn test_save_then_load_roundtrip() {
        let store = store_with(Arc::new(MemoryStorage::new()));
        assert_eq!(store.load().await, None);

        let records = [
            SessionRecord::connected(sample_address(1), "Slush", Network::Testnet),
            SessionRecord::connected(sample_address(2), shared::MANUAL_PROVIDER, Network::Mainnet),
            SessionRecord::demo(Network::Devnet),
        ];
        for record in records {
            store.save(&record).await.unwrap();
            assert_eq!(store.load().await, Some(record));
        }
    }

    #[tokio::test]
    async fn test_clear_removes_everything() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set("medichain_wallet_address", "0x1").await.unwrap();
        storage.set(LEGACY_DEMO_KEY, "true").await.unwrap();

        let store = store_with(storage.clone());
        store
            .save(&SessionRecord::connected(sample_address(3), "Slush", Network::Testnet))
            .await
            .unwrap();
        store.clear().await.unwrap();

        assert_eq!(store.load().await, None);
        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_record_loads_as_empty() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(SESSION_KEY, "{\"address\": 12").await.unwrap();
        assert_eq!(store_with(storage).load().await, None);
    }

    #[tokio::test]
    async fn test_legacy_blob_is_migrated() {
        let storage = Arc::new(MemoryStorage::new());
        let blob = format!(
            r#"{{"address":"{}","type":"Slush Wallet","connected":true}}"#,
            sample_address(4)
        );
        storage.set(LEGACY_WALLET_KEY, &blob).await.unwrap();

        let store = store_with(storage.clone());
        let record = store.load().await.unwrap();
        assert_eq!(record.address(), Some(sample_address(4).as_str()));
        assert_eq!(record.provider_name, "Slush Wallet");
        assert_eq!(record.network, Network::Testnet);

        assert_eq!(storage.get(LEGACY_WALLET_KEY).await.unwrap(), None);
        assert!(storage.get(SESSION_KEY).await.unwrap().is_some());
        assert_eq!(store.load().await, Some(record));
    }

    #[tokio::test]
    async fn test_corrupt_legacy_blob_loads_as_empty() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(LEGACY_WALLET_KEY, "[[[").await.unwrap();
        assert_eq!(store_with(storage).load().await, None);
    }

    #[tokio::test]
    async fn test_legacy_demo_flag_wins() {
        let storage = Arc::new(MemoryStorage::new());
        let store = store_with(storage.clone());
        let real = SessionRecord::connected(sample_address(5), "Slush", Network::Testnet);
        store.save(&real).await.unwrap();
        storage.set(LEGACY_DEMO_KEY, "true").await.unwrap();

        let loaded = store.load().await.unwrap();
        assert!(loaded.is_demo_mode);

        storage.remove(SESSION_KEY).await.unwrap();
        let loaded = store.load().await.unwrap();
        assert!(loaded.is_demo_mode);
        assert_eq!(loaded.address(), None);
    }

    #[tokio::test]
    async fn test_unreadable_storage_loads_as_empty() {
        let store = SessionStore::new(Arc::new(FailingStorage), Network::Testnet);
        assert_eq!(store.load().await, None);
        assert!(store.clear().await.is_err());
        assert!(store.save(&SessionRecord::demo(Network::Testnet)).await.is_err());
    }
}
