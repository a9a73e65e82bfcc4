//! # Network Selection
//!
//! Sui networks a session can be bound to, with the public endpoints for each.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ledger network a session is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Testnet,
    Devnet,
    Mainnet,
    Local,
}

impl Network {
    /// All networks in display order
    pub fn all() -> &'static [Network] {
        &[Network::Testnet, Network::Devnet, Network::Mainnet, Network::Local]
    }

    /// Human-readable network name
    pub fn name(&self) -> &'static str {
        match self {
            Network::Testnet => "Sui Testnet",
            Network::Devnet => "Sui Devnet",
            Network::Mainnet => "Sui Mainnet",
            Network::Local => "Local Network",
        }
    }

    /// Identifier used in config and persisted records
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Testnet => "testnet",
            Network::Devnet => "devnet",
            Network::Mainnet => "mainnet",
            Network::Local => "local",
        }
    }

    /// Full node JSON-RPC endpoint
    pub fn rpc_url(&self) -> &'static str {
        match self {
            Network::Testnet => "https://fullnode.testnet.sui.io:443",
            Network::Devnet => "https://fullnode.devnet.sui.io:443",
            Network::Mainnet => "https://fullnode.mainnet.sui.io:443",
            Network::Local => "http://127.0.0.1:9000",
        }
    }

    /// Wallet-standard chain identifier (e.g. `sui:testnet`)
    pub fn chain_id(&self) -> String {
        format!("sui:{}", self.as_str())
    }

    pub fn explorer_url(&self) -> &'static str {
        match self {
            Network::Testnet => "https://suiexplorer.com/?network=testnet",
            Network::Devnet => "https://suiexplorer.com/?network=devnet",
            Network::Mainnet => "https://suiexplorer.com/?network=mainnet",
            Network::Local => "http://localhost:3000",
        }
    }

    /// Faucet endpoint; mainnet and local networks have none
    pub fn faucet_url(&self) -> Option<&'static str> {
        match self {
            Network::Testnet => Some("https://faucet.testnet.sui.io/gas"),
            Network::Devnet => Some("https://faucet.devnet.sui.io/gas"),
            Network::Mainnet | Network::Local => None,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "testnet" => Ok(Network::Testnet),
            "devnet" => Ok(Network::Devnet),
            "mainnet" => Ok(Network::Mainnet),
            "local" | "localnet" => Ok(Network::Local),
            other => Err(format!("Unknown network: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_network() {
        assert_eq!("testnet".parse::<Network>(), Ok(Network::Testnet));
        assert_eq!(" MAINNET ".parse::<Network>(), Ok(Network::Mainnet));
        assert_eq!("localnet".parse::<Network>(), Ok(Network::Local));
        assert!("ropsten".parse::<Network>().is_err());
    }

    #[test]
    fn test_network_metadata() {
        assert_eq!(Network::default(), Network::Testnet);
        assert_eq!(Network::Devnet.chain_id(), "sui:devnet");
        assert!(Network::Mainnet.faucet_url().is_none());
        assert_eq!(Network::Local.rpc_url(), "http://127.0.0.1:9000");
    }

    #[test]
    fn test_network_serde() {
        let json = serde_json::to_string(&Network::Devnet).unwrap();
        assert_eq!(json, "\"devnet\"");
        let parsed: Network = serde_json::from_str("\"mainnet\"").unwrap();
        assert_eq!(parsed, Network::Mainnet);
    }
}
