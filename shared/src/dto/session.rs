//! # Session DTOs
//!
//! The persisted session record and the legacy blob older front ends wrote.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::network::Network;

/// Provider name recorded for sessions opened by typing an address.
pub const MANUAL_PROVIDER: &str = "Manual Entry";

/// Provider name recorded for demo sessions.
pub const DEMO_PROVIDER: &str = "Demo";

/// Fallback provider name for legacy blobs without a `type`.
pub const UNKNOWN_PROVIDER: &str = "Unknown Wallet";

/// The single persisted answer to "are we connected, and to what".
///
/// A non-demo record must carry a well-formed address; the controller treats
/// anything else as inconsistent and clears it on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Wallet account, present only for wallet and manual sessions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Provider that produced `address`, or a sentinel
    pub provider_name: String,
    #[serde(default)]
    pub is_demo_mode: bool,
    #[serde(default)]
    pub network: Network,
    pub connected_at_utc: DateTime<Utc>,
}

impl SessionRecord {
    /// Record for a session backed by a wallet account.
    pub fn connected(
        address: impl Into<String>,
        provider_name: impl Into<String>,
        network: Network,
    ) -> Self {
        Self {
            address: Some(address.into()),
            provider_name: provider_name.into(),
            is_demo_mode: false,
            network,
            connected_at_utc: Utc::now(),
        }
    }

    /// Record for a demo session; never carries an address.
    pub fn demo(network: Network) -> Self {
        Self {
            address: None,
            provider_name: DEMO_PROVIDER.to_string(),
            is_demo_mode: true,
            network,
            connected_at_utc: Utc::now(),
        }
    }

    /// Address as `&str`, treating an empty string like a missing one.
    pub fn address(&self) -> Option<&str> {
        self.address.as_deref().filter(|a| !a.trim().is_empty())
    }

    pub fn is_manual(&self) -> bool {
        self.provider_name == MANUAL_PROVIDER
    }
}

/// Legacy single-blob session shape (`medichain_wallet` key).
///
/// Kept readable so existing browser profiles migrate transparently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyWalletBlob {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(rename = "type", default)]
    pub wallet_type: Option<String>,
    #[serde(default)]
    pub connected: Option<bool>,
    #[serde(rename = "connectedAt", default)]
    pub connected_at: Option<DateTime<Utc>>,
}

impl LegacyWalletBlob {
    /// Convert into the current record shape.
    pub fn into_record(self, network: Network) -> SessionRecord {
        SessionRecord {
            address: self.address,
            provider_name: self
                .wallet_type
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| UNKNOWN_PROVIDER.to_string()),
            is_demo_mode: false,
            network,
            connected_at_utc: self.connected_at.unwrap_or_else(Utc::now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDR: &str = "0xabc0000000000000000000000000000000000000000000000000000000000001";

    #[test]
    fn test_demo_record_has_no_address() {
        let record = SessionRecord::demo(Network::Devnet);
        assert!(record.is_demo_mode);
        assert_eq!(record.address(), None);
        assert_eq!(record.provider_name, DEMO_PROVIDER);
    }

    #[test]
    fn test_empty_address_reads_as_missing() {
        let mut record = SessionRecord::connected(ADDR, "Slush", Network::Testnet);
        assert_eq!(record.address(), Some(ADDR));
        record.address = Some("  ".to_string());
        assert_eq!(record.address(), None);
    }

    #[test]
    fn test_record_json_roundtrip() {
        let record = SessionRecord::connected(ADDR, MANUAL_PROVIDER, Network::Mainnet);
        let json = serde_json::to_string(&record).unwrap();
        let back: SessionRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
        assert!(back.is_manual());
    }

    #[test]
    fn test_legacy_blob_conversion() {
        let raw = format!(
            r#"{{"address":"{}","type":"Slush Wallet","connected":true,"connectedAt":"2024-03-01T10:00:00Z"}}"#,
            ADDR
        );
        let blob: LegacyWalletBlob = serde_json::from_str(&raw).unwrap();
        let record = blob.into_record(Network::Testnet);
        assert_eq!(record.address(), Some(ADDR));
        assert_eq!(record.provider_name, "Slush Wallet");
        assert!(!record.is_demo_mode);
        assert_eq!(record.connected_at_utc.to_rfc3339(), "2024-03-01T10:00:00+00:00");
    }

    #[test]
    fn test_legacy_blob_without_type() {
        let blob: LegacyWalletBlob = serde_json::from_str(r#"{"address":"0x1"}"#).unwrap();
        assert_eq!(blob.into_record(Network::Testnet).provider_name, UNKNOWN_PROVIDER);
    }
}
