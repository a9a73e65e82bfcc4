//! # Wallet Configuration
//!
//! Configuration loaded from environment variables (a `.env` file is honored
//! when the binary calls `dotenvy::dotenv()` first). Validate on startup to
//! fail fast if misconfigured.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `MEDICHAIN_NETWORK` | `testnet` |
//! | `MEDICHAIN_RPC_URL` | the network's public full node |
//! | `MEDICHAIN_POLL_INTERVAL_SECS` | `30` |
//! | `MEDICHAIN_CONNECT_TIMEOUT_SECS` | `30` |
//! | `MEDICHAIN_SESSION_FILE` | `data/session.json` |
//! | `MEDICHAIN_PACKAGE_ID` | unset |
//!
//! ```rust,no_run
//! use lib_wallet::config::WalletConfig;
//!
//! let config = WalletConfig::from_env()?;
//! config.validate()?;
//! # Ok::<(), lib_wallet::WalletError>(())
//! ```

use std::path::PathBuf;
use std::time::Duration;

use lib_utils::{get_env_or, get_env_parse_or, is_sui_address};
use shared::dto::Network;

use crate::error::{Result, WalletError};

/// Default balance poll interval.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Default bound on a provider connect + account request.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WalletConfig {
    /// Network new sessions are bound to
    pub network: Network,

    /// JSON-RPC endpoint used for balance queries
    pub rpc_url: String,

    pub poll_interval: Duration,

    pub connect_timeout: Duration,

    /// File backing the session store
    pub session_file: PathBuf,

    /// Deployed MediChain Move package, needed only to build transactions
    pub package_id: Option<String>,
}

impl Default for WalletConfig {
    fn default() -> Self {
        let network = Network::default();
        Self {
            network,
            rpc_url: network.rpc_url().to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            session_file: PathBuf::from("data/session.json"),
            package_id: None,
        }
    }
}

impl WalletConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let network: Network = get_env_or("MEDICHAIN_NETWORK", Network::default().as_str())
            .parse()
            .map_err(WalletError::Config)?;

        let rpc_url = get_env_or("MEDICHAIN_RPC_URL", network.rpc_url());

        let poll_secs: u64 = get_env_parse_or(
            "MEDICHAIN_POLL_INTERVAL_SECS",
            DEFAULT_POLL_INTERVAL.as_secs(),
        )?;
        let connect_secs: u64 = get_env_parse_or(
            "MEDICHAIN_CONNECT_TIMEOUT_SECS",
            DEFAULT_CONNECT_TIMEOUT.as_secs(),
        )?;

        let session_file = PathBuf::from(get_env_or("MEDICHAIN_SESSION_FILE", "data/session.json"));

        let package_id = Some(get_env_or("MEDICHAIN_PACKAGE_ID", ""))
            .filter(|id| !id.trim().is_empty());

        Ok(Self {
            network,
            rpc_url,
            poll_interval: Duration::from_secs(poll_secs),
            connect_timeout: Duration::from_secs(connect_secs),
            session_file,
            package_id,
        })
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        if !(self.rpc_url.starts_with("http://") || self.rpc_url.starts_with("https://")) {
            return Err(WalletError::Config(format!(
                "MEDICHAIN_RPC_URL must be an http(s) URL, got {}",
                self.rpc_url
            )));
        }

        if self.poll_interval.is_zero() {
            return Err(WalletError::Config(
                "MEDICHAIN_POLL_INTERVAL_SECS must be at least 1".to_string(),
            ));
        }

        if self.connect_timeout.is_zero() {
            return Err(WalletError::Config(
                "MEDICHAIN_CONNECT_TIMEOUT_SECS must be at least 1".to_string(),
            ));
        }

        if let Some(package_id) = &self.package_id {
            if !is_sui_address(package_id) {
                return Err(WalletError::Config(format!(
                    "MEDICHAIN_PACKAGE_ID is not a Sui object id: {}",
                    package_id
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = WalletConfig::default();
        assert_eq!(config.network, Network::Testnet);
        assert_eq!(config.poll_interval, Duration::from_secs(30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = WalletConfig {
            rpc_url: "fullnode.testnet.sui.io".to_string(),
            ..WalletConfig::default()
        };
        assert!(matches!(config.validate(), Err(WalletError::Config(_))));

        let config = WalletConfig {
            poll_interval: Duration::ZERO,
            ..WalletConfig::default()
        };
        assert!(config.validate().is_err());

        let config = WalletConfig {
            package_id: Some("0xYOUR_PACKAGE_ID_HERE".to_string()),
            ..WalletConfig::default()
        };
        assert!(config.validate().is_err());

        let config = WalletConfig {
            package_id: Some(format!("0x{}", "1".repeat(64))),
            ..WalletConfig::default()
        };
        assert!(config.validate().is_ok());
    }
}
