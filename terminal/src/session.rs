//! # Session Wiring
//!
//! Builds the connection controller from configuration and renders its
//! state for the terminal.

use chrono::{DateTime, Utc};
use std::fmt::Write as _;
use std::sync::Arc;

use lib_utils::{format_time, seconds_since};
use lib_wallet::{
    ConnectionController, ConnectionState, ConnectionStatus, ControllerSettings, FileStorage,
    SessionStore, StaticHost, SuiRpcClient, WalletConfig, WalletRegistry,
};

/// The controller plus a read-only view of the persisted record.
pub struct Session {
    pub controller: ConnectionController,
    records: SessionStore,
}

impl Session {
    /// Wire a controller to the file-backed store and the configured full node.
    ///
    /// The terminal has no injected browser wallets, so the host is empty and
    /// only manual and demo sessions can be opened from here.
    pub fn open(config: &WalletConfig) -> Self {
        let storage = Arc::new(FileStorage::new(&config.session_file));
        let controller = ConnectionController::new(
            WalletRegistry::new(Arc::new(StaticHost::default())),
            SessionStore::new(storage.clone(), config.network),
            Arc::new(SuiRpcClient::new(config.rpc_url.clone())),
            ControllerSettings::from(config),
        );

        Self {
            controller,
            records: SessionStore::new(storage, config.network),
        }
    }

    /// When the persisted session was opened
    pub async fn connected_since(&self) -> Option<DateTime<Utc>> {
        self.records.load().await.map(|record| record.connected_at_utc)
    }
}

/// Multi-line status block.
pub fn render_state(state: &ConnectionState, since: Option<DateTime<Utc>>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Status:   {}", state.status);

    if let Some(address) = &state.address {
        let _ = writeln!(out, "Address:  {}", address);
    }
    if let Some(provider) = &state.provider_name {
        let _ = writeln!(out, "Wallet:   {}", provider);
    }
    let _ = writeln!(out, "Network:  {} ({})", state.network.name(), state.network.chain_id());

    match (&state.status, state.cached_balance) {
        (ConnectionStatus::Connected | ConnectionStatus::DemoConnected, Some(balance)) => {
            let _ = writeln!(out, "Balance:  {}", balance);
            if balance.mist() == 0 && !state.is_demo() {
                if let Some(faucet) = state.network.faucet_url() {
                    let _ = writeln!(out, "Faucet:   {}", faucet);
                }
            }
        }
        (ConnectionStatus::Connected, None) => {
            let _ = writeln!(out, "Balance:  loading...");
        }
        _ => {}
    }

    if state.status.is_connected() {
        if let Some(since) = since {
            let _ = writeln!(
                out,
                "Since:    {} ({}s ago)",
                format_time(since),
                seconds_since(since)
            );
        }
    }

    out
}

/// One-line summary used by `watch`.
pub fn render_line(state: &ConnectionState) -> String {
    let mut line = state.status.to_string();
    if let Some(address) = state.display_address() {
        let _ = write!(line, " {}", address);
    }
    if let Some(balance) = state.cached_balance {
        let _ = write!(line, " {}", balance);
    }
    line
}
