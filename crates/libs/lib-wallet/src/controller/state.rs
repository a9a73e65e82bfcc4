//! Connection state as seen by the UI boundary.

use std::fmt;
use std::time::Duration;

use shared::dto::Network;
use shared::utils::truncate_address;

use crate::config::{WalletConfig, DEFAULT_CONNECT_TIMEOUT, DEFAULT_POLL_INTERVAL};
use crate::ledger::Balance;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionStatus {
    Disconnected,
    Connecting,
    Connected,
    DemoConnected,
    /// Connection attempt or session failed; the UI offers a retry
    Error(String),
}

impl ConnectionStatus {
    /// Session is usable (wallet, manual or demo)
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionStatus::Connected | ConnectionStatus::DemoConnected)
    }

    /// States a connect request may start from
    pub(crate) fn accepts_connect(&self) -> bool {
        matches!(self, ConnectionStatus::Disconnected | ConnectionStatus::Error(_))
    }

    pub(crate) fn accepts_disconnect(&self) -> bool {
        matches!(
            self,
            ConnectionStatus::Connected | ConnectionStatus::DemoConnected | ConnectionStatus::Error(_)
        )
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionStatus::Disconnected => f.write_str("disconnected"),
            ConnectionStatus::Connecting => f.write_str("connecting"),
            ConnectionStatus::Connected => f.write_str("connected"),
            ConnectionStatus::DemoConnected => f.write_str("demo"),
            ConnectionStatus::Error(reason) => write!(f, "error: {}", reason),
        }
    }
}

/// Snapshot handed to state listeners.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionState {
    pub status: ConnectionStatus,
    pub address: Option<String>,
    pub provider_name: Option<String>,
    pub network: Network,
    /// Last successfully fetched balance; `None` until the first fetch lands
    pub cached_balance: Option<Balance>,
}

impl ConnectionState {
    pub fn disconnected(network: Network) -> Self {
        Self {
            status: ConnectionStatus::Disconnected,
            address: None,
            provider_name: None,
            network,
            cached_balance: None,
        }
    }

    pub fn is_demo(&self) -> bool {
        self.status == ConnectionStatus::DemoConnected
    }

    /// Shortened address for headers and status lines (`0x1234...abcd`)
    pub fn display_address(&self) -> Option<String> {
        self.address.as_deref().map(truncate_address)
    }
}

/// Non-fatal conditions the UI may surface as a toast or inline hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// A persisted session failed validation on load and was removed
    InconsistentSessionCleared(String),
    /// Manual address input was rejected
    InvalidAddress(String),
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::InconsistentSessionCleared(reason) => {
                write!(f, "Saved wallet session was invalid and has been reset ({})", reason)
            }
            Notice::InvalidAddress(reason) => f.write_str(reason),
        }
    }
}

/// Outcome of a controller command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// State changed and listeners were notified
    Applied,
    /// Command not valid from the current state; nothing happened
    Ignored,
    /// A newer transition won while this command was awaiting; its result was dropped
    Stale,
}

/// Controller tunables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerSettings {
    pub network: Network,
    pub poll_interval: Duration,
    pub connect_timeout: Duration,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            network: Network::default(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

impl From<&WalletConfig> for ControllerSettings {
    fn from(config: &WalletConfig) -> Self {
        Self {
            network: config.network,
            poll_interval: config.poll_interval,
            connect_timeout: config.connect_timeout,
        }
    }
}
