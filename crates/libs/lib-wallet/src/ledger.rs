//! # Ledger Queries
//!
//! Read-only balance lookups against a Sui full node. The controller never
//! needs a wallet for this; any address can be queried.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use std::time::Duration;

use shared::utils::{format_sui, mist_to_sui};

use crate::error::{Result, WalletError};

/// Coin type queried for the native balance.
pub const SUI_COIN_TYPE: &str = "0x2::sui::SUI";

/// Native balance in base units (MIST).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Balance(pub u64);

impl Balance {
    pub const ZERO: Balance = Balance(0);

    pub fn mist(&self) -> u64 {
        self.0
    }

    /// Balance in display units (SUI)
    pub fn as_sui(&self) -> f64 {
        mist_to_sui(self.0)
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_sui(self.0))
    }
}

/// Read-only balance source.
#[async_trait]
pub trait LedgerQuery: Send + Sync {
    async fn get_balance(&self, address: &str) -> Result<Balance>;
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: Option<BalanceResult>,
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BalanceResult {
    total_balance: String,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

/// JSON-RPC client calling `suix_getBalance` on a full node.
pub struct SuiRpcClient {
    client: Client,
    rpc_url: String,
}

impl SuiRpcClient {
    /// Create a client for `rpc_url`.
    ///
    /// Requests time out after 10 seconds so a stalled node cannot wedge the poller.
    pub fn new(rpc_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            rpc_url: rpc_url.into(),
        }
    }

    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }
}

#[async_trait]
impl LedgerQuery for SuiRpcClient {
    async fn get_balance(&self, address: &str) -> Result<Balance> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "suix_getBalance",
            "params": [address, SUI_COIN_TYPE],
        });

        let response = self
            .client
            .post(&self.rpc_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| WalletError::TransientFetch(format!("Network error: {}", e)))?;

        if !response.status().is_success() {
            return Err(WalletError::TransientFetch(format!(
                "Full node returned {}",
                response.status()
            )));
        }

        let text = response
            .text()
            .await
            .map_err(|e| WalletError::TransientFetch(format!("Failed to read response: {}", e)))?;

        parse_balance_response(&text)
    }
}

/// Parse a `suix_getBalance` JSON-RPC response body.
pub fn parse_balance_response(body: &str) -> Result<Balance> {
    let response: RpcResponse = serde_json::from_str(body)
        .map_err(|e| WalletError::TransientFetch(format!("Failed to parse response: {}", e)))?;

    if let Some(error) = response.error {
        return Err(WalletError::TransientFetch(format!(
            "RPC error {}: {}",
            error.code, error.message
        )));
    }

    let result = response
        .result
        .ok_or_else(|| WalletError::TransientFetch("Response has no result".to_string()))?;

    result
        .total_balance
        .parse::<u64>()
        .map(Balance)
        .map_err(|_| {
            WalletError::TransientFetch(format!("Invalid totalBalance: {}", result.total_balance))
        })
}
