//! # Wallet Library
//!
//! Wallet session core: provider detection, the connection state machine,
//! session persistence and balance polling against a Sui full node.

pub mod config;
pub mod controller;
pub mod error;
pub mod ledger;
pub mod poller;
pub mod registry;
pub mod storage;
pub mod store;
pub mod transaction;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use config::WalletConfig;
pub use controller::{
    ConnectionController, ConnectionState, ConnectionStatus, ControllerSettings, Notice, Transition,
};
pub use error::{Result, WalletError};
pub use ledger::{Balance, LedgerQuery, SuiRpcClient};
pub use registry::{ProviderHandle, StaticHost, WalletRegistry};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
pub use store::SessionStore;
