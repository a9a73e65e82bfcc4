//! # Wallet Registry
//!
//! Detects wallet providers visible in the host environment and normalizes
//! them into [`ProviderHandle`]s.
//!
//! Providers expose partial, inconsistent interfaces. Every operation is a
//! separate capability trait and a [`WalletAdapter`] hands out
//! `Option<&dyn Capability>` for each one, so callers probe before calling
//! instead of assuming a method exists.
//!
//! ## Detection order
//!
//! 1. Wallets announced through the multi-provider discovery interface
//!    ([`CapabilityTag::Standard`]).
//! 2. Provider-specific globals ([`CapabilityTag::Legacy`]) from a fixed table,
//!    skipped when a provider of the same alias family was already found.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use lib_wallet::registry::{StaticHost, WalletRegistry};
//!
//! let registry = WalletRegistry::new(Arc::new(StaticHost::default()));
//! for (index, handle) in registry.detect().iter().enumerate() {
//!     println!("{index}: {} ({:?})", handle.name(), handle.tag());
//! }
//! ```

use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::debug;

use crate::error::Result;
use crate::transaction::{ExecutionResult, MoveCall};

/// Provider-specific globals probed after the discovery interface:
/// `(global reference, display name)`.
pub const LEGACY_GLOBALS: &[(&str, &str)] = &[
    ("suiWallet", "Sui Wallet"),
    ("slushWallet", "Slush Wallet"),
    ("slush", "Slush (new API)"),
    ("ethosWallet", "Ethos Wallet"),
    ("martian", "Martian Wallet"),
];

/// Alias keys matched case-insensitively as substrings; first match wins.
const KNOWN_ALIASES: &[&str] = &["slush", "sui wallet", "ethos", "martian", "suiet"];

/// How a provider was discovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapabilityTag {
    /// Announced through the multi-provider discovery interface
    Standard,
    /// Found through a provider-specific global reference
    Legacy,
}

/// Asynchronous notifications a connected provider may push.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderEvent {
    AccountsChanged(Vec<String>),
    Disconnected,
}

#[async_trait]
pub trait Connect: Send + Sync {
    async fn connect(&self) -> Result<()>;
}

#[async_trait]
pub trait AccountSource: Send + Sync {
    async fn get_accounts(&self) -> Result<Vec<String>>;
}

#[async_trait]
pub trait TransactionSigner: Send + Sync {
    async fn sign_and_execute(&self, transaction: &MoveCall) -> Result<ExecutionResult>;
}

#[async_trait]
pub trait Disconnect: Send + Sync {
    async fn disconnect(&self) -> Result<()>;
}

/// `accountsChanged` / `disconnect` event source.
pub trait AccountEvents: Send + Sync {
    fn subscribe(&self) -> broadcast::Receiver<ProviderEvent>;
}

/// A wallet object injected into the host, viewed through its capabilities.
///
/// Every capability defaults to absent; implementors override the ones they have.
pub trait WalletAdapter: Send + Sync {
    fn name(&self) -> &str;

    fn connector(&self) -> Option<&dyn Connect> {
        None
    }

    fn accounts(&self) -> Option<&dyn AccountSource> {
        None
    }

    fn signer(&self) -> Option<&dyn TransactionSigner> {
        None
    }

    fn disconnector(&self) -> Option<&dyn Disconnect> {
        None
    }

    fn events(&self) -> Option<&dyn AccountEvents> {
        None
    }
}

/// The environment wallets are injected into (a browser window, an embedding shell).
pub trait WalletHost: Send + Sync {
    /// Wallets registered with the discovery interface, in registration order
    fn standard_wallets(&self) -> Vec<Arc<dyn WalletAdapter>>;

    /// Look up a provider-specific global by name
    fn legacy_global(&self, global: &str) -> Option<Arc<dyn WalletAdapter>>;
}

/// One detected provider. Built fresh on every detection pass; only `name`
/// is stable across passes.
#[derive(Clone)]
pub struct ProviderHandle {
    name: String,
    tag: CapabilityTag,
    adapter: Arc<dyn WalletAdapter>,
}

impl ProviderHandle {
    pub fn new(name: impl Into<String>, tag: CapabilityTag, adapter: Arc<dyn WalletAdapter>) -> Self {
        Self {
            name: name.into(),
            tag,
            adapter,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tag(&self) -> CapabilityTag {
        self.tag
    }

    pub fn connector(&self) -> Option<&dyn Connect> {
        self.adapter.connector()
    }

    pub fn accounts(&self) -> Option<&dyn AccountSource> {
        self.adapter.accounts()
    }

    pub fn signer(&self) -> Option<&dyn TransactionSigner> {
        self.adapter.signer()
    }

    pub fn disconnector(&self) -> Option<&dyn Disconnect> {
        self.adapter.disconnector()
    }

    pub fn events(&self) -> Option<&dyn AccountEvents> {
        self.adapter.events()
    }
}

impl fmt::Debug for ProviderHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderHandle")
            .field("name", &self.name)
            .field("tag", &self.tag)
            .field("connect", &self.connector().is_some())
            .field("get_accounts", &self.accounts().is_some())
            .field("sign_and_execute", &self.signer().is_some())
            .field("disconnect", &self.disconnector().is_some())
            .field("events", &self.events().is_some())
            .finish()
    }
}

/// Normalize a provider name to its alias family for duplicate detection.
pub fn alias_family(name: &str) -> String {
    let lower = name.trim().to_lowercase();
    KNOWN_ALIASES
        .iter()
        .copied()
        .find(|alias| lower.contains(alias))
        .map(|alias| alias.to_string())
        .unwrap_or(lower)
}

/// Enumerates providers from a [`WalletHost`].
#[derive(Clone)]
pub struct WalletRegistry {
    host: Arc<dyn WalletHost>,
}

impl WalletRegistry {
    pub fn new(host: Arc<dyn WalletHost>) -> Self {
        Self { host }
    }

    /// Detect providers currently visible in the host. Never fails; an empty
    /// list means nothing is installed (or nothing has loaded yet).
    pub fn detect(&self) -> Vec<ProviderHandle> {
        let mut handles: Vec<ProviderHandle> = Vec::new();
        let mut families: Vec<String> = Vec::new();

        for adapter in self.host.standard_wallets() {
            let name = adapter.name().trim().to_string();
            if name.is_empty() || handles.iter().any(|h| h.name.eq_ignore_ascii_case(&name)) {
                debug!(name = %name, "Skipping unnamed or repeated standard wallet");
                continue;
            }
            families.push(alias_family(&name));
            handles.push(ProviderHandle::new(name, CapabilityTag::Standard, adapter));
        }

        for (global, display_name) in LEGACY_GLOBALS {
            let Some(adapter) = self.host.legacy_global(global) else {
                continue;
            };
            let family = alias_family(display_name);
            if families.contains(&family) {
                debug!(
                    global = %global,
                    family = %family,
                    "Legacy wallet already detected through discovery interface"
                );
                continue;
            }
            families.push(family);
            handles.push(ProviderHandle::new(*display_name, CapabilityTag::Legacy, adapter));
        }

        debug!(count = handles.len(), "Wallet detection finished");
        handles
    }
}

/// A host with a fixed set of providers, for embedding shells without a
/// browser and for tests.
#[derive(Default, Clone)]
pub struct StaticHost {
    standard: Vec<Arc<dyn WalletAdapter>>,
    globals: HashMap<String, Arc<dyn WalletAdapter>>,
}

impl StaticHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_standard(mut self, adapter: Arc<dyn WalletAdapter>) -> Self {
        self.standard.push(adapter);
        self
    }

    pub fn with_global(mut self, global: impl Into<String>, adapter: Arc<dyn WalletAdapter>) -> Self {
        self.globals.insert(global.into(), adapter);
        self
    }
}

impl WalletHost for StaticHost {
    fn standard_wallets(&self) -> Vec<Arc<dyn WalletAdapter>> {
        self.standard.clone()
    }

    fn legacy_global(&self, global: &str) -> Option<Arc<dyn WalletAdapter>> {
        self.globals.get(global).cloned()
    }
}
