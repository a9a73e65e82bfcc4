//! # Connection Controller
//!
//! The single state machine behind the wallet UI. Every connect, disconnect,
//! demo and account-change request goes through here.
//!
//! ## Transitions
//!
//! ```text
//! Disconnected ──request_connect──▶ Connecting ──ok──▶ Connected
//!      ▲   │                            │                  │
//!      │   └─request_manual_connect─────┼────────────────▶ │
//!      │                                └──fail──▶ Error   │
//!      └──────────── disconnect / account_changed([]) ◀────┘
//!
//! (any state) ──enter_demo_mode──▶ DemoConnected
//! ```
//!
//! ## Ordering
//!
//! Commands commit under an async commit lock: check the generation, persist,
//! apply, notify. The generation is bumped on every applied transition, so a
//! provider call that resolves after the session moved on is dropped as
//! [`Transition::Stale`]. Listeners always observe state that is already
//! persisted.

mod state;


pub use state::{ConnectionState, ConnectionStatus, ControllerSettings, Notice, Transition};

use parking_lot::{Mutex, RwLock};
use std::sync::{Arc, Weak};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use lib_utils::validate_sui_address;
use shared::dto::{SessionRecord, DEMO_PROVIDER, MANUAL_PROVIDER};

use crate::error::{Result, WalletError};
use crate::ledger::{Balance, LedgerQuery};
use crate::poller::BalancePoller;
use crate::registry::{ProviderEvent, ProviderHandle, WalletRegistry};
use crate::store::SessionStore;
use crate::transaction::{ExecutionResult, MoveCall};

type StateListener = Arc<dyn Fn(&ConnectionState) + Send + Sync>;
type NoticeListener = Arc<dyn Fn(&Notice) + Send + Sync>;

struct Inner {
    state: ConnectionState,
    generation: u64,
    /// Result of the last detection pass; `request_connect` indexes into it
    providers: Vec<ProviderHandle>,
    /// Provider behind the current wallet session, if any
    active: Option<ProviderHandle>,
    events_task: Option<JoinHandle<()>>,
}

struct Shared {
    registry: WalletRegistry,
    store: SessionStore,
    ledger: Arc<dyn LedgerQuery>,
    poller: BalancePoller,
    settings: ControllerSettings,
    inner: Mutex<Inner>,
    commit_lock: tokio::sync::Mutex<()>,
    /// Keeps state mutation and listener delivery in the same order
    emit_lock: Mutex<()>,
    state_listeners: RwLock<Vec<StateListener>>,
    notice_listeners: RwLock<Vec<NoticeListener>>,
}

impl Shared {
    fn emit_state(&self, state: &ConnectionState) {
        let listeners = self.state_listeners.read().clone();
        for listener in listeners {
            listener(state);
        }
    }

    fn emit_notice(&self, notice: &Notice) {
        let listeners = self.notice_listeners.read().clone();
        for listener in listeners {
            listener(notice);
        }
    }

    /// Store a fetched balance if the session it was fetched for is still current.
    fn apply_balance(&self, address: &str, generation: u64, balance: Balance) -> bool {
        let _emit = self.emit_lock.lock();
        let snapshot = {
            let mut inner = self.inner.lock();
            let current = inner.generation == generation
                && inner.state.status == ConnectionStatus::Connected
                && inner.state.address.as_deref() == Some(address);
            if !current {
                debug!(address = %address, "Discarding balance for a session that has ended");
                return false;
            }
            if inner.state.cached_balance == Some(balance) {
                return true;
            }
            inner.state.cached_balance = Some(balance);
            inner.state.clone()
        };
        self.emit_state(&snapshot);
        true
    }
}

impl Drop for Shared {
    fn drop(&mut self) {
        if let Some(task) = self.inner.get_mut().events_task.take() {
            task.abort();
        }
    }
}

/// Owns the wallet session. Cheap to clone; clones share one state machine.
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use lib_wallet::controller::{ConnectionController, ControllerSettings};
/// use lib_wallet::ledger::SuiRpcClient;
/// use lib_wallet::registry::{StaticHost, WalletRegistry};
/// use lib_wallet::storage::MemoryStorage;
/// use lib_wallet::store::SessionStore;
/// use shared::dto::Network;
///
/// # async fn run() -> lib_wallet::Result<()> {
/// let controller = ConnectionController::new(
///     WalletRegistry::new(Arc::new(StaticHost::default())),
///     SessionStore::new(Arc::new(MemoryStorage::new()), Network::Testnet),
///     Arc::new(SuiRpcClient::new(Network::Testnet.rpc_url())),
///     ControllerSettings::default(),
/// );
/// controller.on_state_change(|state| println!("{}", state.status));
/// controller.restore().await?;
/// controller.enter_demo_mode().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ConnectionController {
    shared: Arc<Shared>,
}

impl ConnectionController {
    pub fn new(
        registry: WalletRegistry,
        store: SessionStore,
        ledger: Arc<dyn LedgerQuery>,
        settings: ControllerSettings,
    ) -> Self {
        let poller = BalancePoller::new(Arc::clone(&ledger), settings.poll_interval);
        Self {
            shared: Arc::new(Shared {
                registry,
                store,
                ledger,
                poller,
                settings,
                inner: Mutex::new(Inner {
                    state: ConnectionState::disconnected(settings.network),
                    generation: 0,
                    providers: Vec::new(),
                    active: None,
                    events_task: None,
                }),
                commit_lock: tokio::sync::Mutex::new(()),
                emit_lock: Mutex::new(()),
                state_listeners: RwLock::new(Vec::new()),
                notice_listeners: RwLock::new(Vec::new()),
            }),
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.shared.inner.lock().state.clone()
    }

    pub fn settings(&self) -> &ControllerSettings {
        &self.shared.settings
    }

    /// Providers found by the last [`detect_providers`](Self::detect_providers) call
    pub fn providers(&self) -> Vec<ProviderHandle> {
        self.shared.inner.lock().providers.clone()
    }

    /// Register a listener for every new state. Called synchronously after
    /// the state is persisted; must not block.
    pub fn on_state_change<F>(&self, listener: F)
    where
        F: Fn(&ConnectionState) + Send + Sync + 'static,
    {
        self.shared.state_listeners.write().push(Arc::new(listener));
    }

    pub fn on_notice<F>(&self, listener: F)
    where
        F: Fn(&Notice) + Send + Sync + 'static,
    {
        self.shared.notice_listeners.write().push(Arc::new(listener));
    }

    /// Rehydrate from the session store. Call once at startup.
    pub async fn restore(&self) -> Result<Transition> {
        let _commit = self.shared.commit_lock.lock().await;
        let network = self.shared.settings.network;
        self.stop_session();

        let Some(record) = self.shared.store.load().await else {
            debug!("No saved wallet session");
            self.apply(ConnectionState::disconnected(network));
            return Ok(Transition::Applied);
        };

        if record.network != network {
            debug!(
                saved = %record.network,
                configured = %network,
                "Saved session network differs from configuration; using configuration"
            );
        }

        if record.is_demo_mode {
            if record.address.is_some() {
                info!("Saved session has both demo mode and an address; demo wins");
                let rewritten = SessionRecord {
                    address: None,
                    provider_name: DEMO_PROVIDER.to_string(),
                    ..record
                };
                if let Err(e) = self.shared.store.save(&rewritten).await {
                    warn!(error = %e, "Failed to rewrite demo session");
                }
            }
            self.apply(demo_state(network));
            info!("Restored demo session");
            return Ok(Transition::Applied);
        }

        let address = match record.address() {
            Some(address) => validate_sui_address(address, "Saved address").map(|_| address.to_string()),
            None => Err("Saved session has no address".to_string()),
        };

        match address {
            Ok(address) => {
                let generation = self.apply(ConnectionState {
                    status: ConnectionStatus::Connected,
                    address: Some(address.clone()),
                    provider_name: Some(record.provider_name.clone()),
                    network,
                    cached_balance: None,
                });
                self.start_polling(&address, generation);
                info!(
                    address = %address,
                    provider = %record.provider_name,
                    "Restored wallet session"
                );
            }
            Err(reason) => {
                let err = WalletError::InconsistentState(reason.clone());
                warn!(error = %err, "Clearing inconsistent saved session");
                if let Err(e) = self.shared.store.clear().await {
                    warn!(error = %e, "Failed to clear inconsistent session");
                }
                self.apply(ConnectionState::disconnected(network));
                self.shared
                    .emit_notice(&Notice::InconsistentSessionCleared(reason));
            }
        }

        Ok(Transition::Applied)
    }

    /// Run wallet detection and cache the result for [`request_connect`](Self::request_connect).
    pub fn detect_providers(&self) -> Vec<ProviderHandle> {
        let providers = self.shared.registry.detect();
        info!(
            count = providers.len(),
            names = ?providers.iter().map(|p| p.name()).collect::<Vec<_>>(),
            "Detected wallet providers"
        );
        self.shared.inner.lock().providers = providers.clone();
        providers
    }

    /// Connect through the detected provider at `index`.
    ///
    /// Ignored unless disconnected or in error. A failed attempt lands in
    /// [`ConnectionStatus::Error`] and still returns `Ok(Transition::Applied)`.
    pub async fn request_connect(&self, index: usize) -> Result<Transition> {
        let network = self.shared.settings.network;

        let (handle, generation) = {
            let _commit = self.shared.commit_lock.lock().await;
            let handle = {
                let inner = self.shared.inner.lock();
                if !inner.state.status.accepts_connect() {
                    debug!(status = %inner.state.status, "Ignoring connect request");
                    return Ok(Transition::Ignored);
                }
                inner.providers.get(index).cloned().ok_or_else(|| {
                    WalletError::Validation(format!("No wallet provider at index {}", index))
                })?
            };

            self.stop_session();
            let generation = self.apply(ConnectionState {
                status: ConnectionStatus::Connecting,
                provider_name: Some(handle.name().to_string()),
                ..ConnectionState::disconnected(network)
            });
            (handle, generation)
        };

        info!(provider = %handle.name(), "Connecting to wallet");
        let timeout = self.shared.settings.connect_timeout;
        let outcome = match tokio::time::timeout(timeout, request_accounts(&handle)).await {
            Ok(result) => result.and_then(first_account),
            Err(_) => Err(WalletError::Provider(format!(
                "{} did not respond within {} seconds",
                handle.name(),
                timeout.as_secs()
            ))),
        };

        let _commit = self.shared.commit_lock.lock().await;
        if self.shared.inner.lock().generation != generation {
            info!(provider = %handle.name(), "Discarding connect result; session moved on");
            return Ok(Transition::Stale);
        }

        let address = match outcome {
            Ok(address) => address,
            Err(e) => {
                warn!(provider = %handle.name(), error = %e, "Wallet connection failed");
                self.apply(ConnectionState {
                    status: ConnectionStatus::Error(e.user_message()),
                    provider_name: Some(handle.name().to_string()),
                    ..ConnectionState::disconnected(network)
                });
                return Ok(Transition::Applied);
            }
        };

        self.persist(&SessionRecord::connected(&address, handle.name(), network))
            .await;
        let generation = self.apply(ConnectionState {
            status: ConnectionStatus::Connected,
            address: Some(address.clone()),
            provider_name: Some(handle.name().to_string()),
            network,
            cached_balance: None,
        });
        self.start_polling(&address, generation);
        self.subscribe_events(&handle);
        self.shared.inner.lock().active = Some(handle.clone());

        info!(address = %address, provider = %handle.name(), "Wallet connected");
        Ok(Transition::Applied)
    }

    /// Open a read-only session for a typed address.
    ///
    /// Bad input is reported as a [`WalletError::Validation`] and a
    /// [`Notice::InvalidAddress`]; state and storage are left alone.
    pub async fn request_manual_connect(&self, address: &str) -> Result<Transition> {
        let network = self.shared.settings.network;
        let _commit = self.shared.commit_lock.lock().await;

        let status = self.shared.inner.lock().state.status.clone();
        if !status.accepts_connect() {
            debug!(status = %status, "Ignoring manual connect request");
            return Ok(Transition::Ignored);
        }

        let address = address.trim();
        if let Err(reason) = validate_sui_address(address, "Wallet address") {
            debug!(reason = %reason, "Rejected manual address");
            self.shared.emit_notice(&Notice::InvalidAddress(reason.clone()));
            return Err(WalletError::Validation(reason));
        }

        self.stop_session();
        self.persist(&SessionRecord::connected(address, MANUAL_PROVIDER, network))
            .await;
        let generation = self.apply(ConnectionState {
            status: ConnectionStatus::Connected,
            address: Some(address.to_string()),
            provider_name: Some(MANUAL_PROVIDER.to_string()),
            network,
            cached_balance: None,
        });
        self.start_polling(address, generation);

        info!(address = %address, "Manual wallet session opened");
        Ok(Transition::Applied)
    }

    /// Switch to demo mode from any state. Never touches the network.
    pub async fn enter_demo_mode(&self) -> Result<Transition> {
        let network = self.shared.settings.network;
        let _commit = self.shared.commit_lock.lock().await;

        self.stop_session();
        if let Err(e) = self.shared.store.clear().await {
            warn!(error = %e, "Failed to clear previous session");
        }
        self.persist(&SessionRecord::demo(network)).await;
        self.apply(demo_state(network));

        info!("Demo mode enabled");
        Ok(Transition::Applied)
    }

    /// End the session. The provider's own disconnect runs afterwards,
    /// best-effort.
    pub async fn disconnect(&self) -> Result<Transition> {
        let provider = {
            let _commit = self.shared.commit_lock.lock().await;

            let status = self.shared.inner.lock().state.status.clone();
            if !status.accepts_disconnect() {
                debug!(status = %status, "Ignoring disconnect request");
                return Ok(Transition::Ignored);
            }

            let provider = self.stop_session();
            if let Err(e) = self.shared.store.clear().await {
                warn!(error = %e, "Failed to clear session on disconnect");
            }
            self.apply(ConnectionState::disconnected(self.shared.settings.network));
            provider
        };

        if let Some(handle) = provider {
            if let Some(disconnector) = handle.disconnector() {
                if let Err(e) = disconnector.disconnect().await {
                    warn!(provider = %handle.name(), error = %e, "Provider disconnect failed");
                }
            }
        }

        info!("Wallet disconnected");
        Ok(Transition::Applied)
    }

    /// Apply an account change reported by the connected provider.
    ///
    /// An empty list is a disconnect. Otherwise the session keeps its
    /// provider and moves to the first account without passing through
    /// `Connecting`.
    pub async fn account_changed(&self, accounts: Vec<String>) -> Result<Transition> {
        if self.shared.inner.lock().state.status != ConnectionStatus::Connected {
            debug!("Ignoring account change outside a wallet session");
            return Ok(Transition::Ignored);
        }

        let Some(next) = accounts.first().map(|a| a.trim().to_string()) else {
            info!("Provider reported no accounts; disconnecting");
            return self.disconnect().await;
        };

        let network = self.shared.settings.network;
        let _commit = self.shared.commit_lock.lock().await;

        let current = self.shared.inner.lock().state.clone();
        if current.status != ConnectionStatus::Connected {
            return Ok(Transition::Ignored);
        }
        if current.address.as_deref() == Some(next.as_str()) {
            debug!(address = %next, "Account unchanged");
            return Ok(Transition::Ignored);
        }

        if let Err(reason) = validate_sui_address(&next, "Account") {
            warn!(account = %next, reason = %reason, "Provider reported a malformed account");
            self.stop_session();
            if let Err(e) = self.shared.store.clear().await {
                warn!(error = %e, "Failed to clear session after malformed account");
            }
            self.apply(ConnectionState {
                status: ConnectionStatus::Error(reason),
                provider_name: current.provider_name,
                ..ConnectionState::disconnected(network)
            });
            return Ok(Transition::Applied);
        }

        let provider_name = current
            .provider_name
            .clone()
            .unwrap_or_else(|| shared::dto::UNKNOWN_PROVIDER.to_string());
        self.persist(&SessionRecord::connected(&next, &provider_name, network))
            .await;
        let generation = self.apply(ConnectionState {
            address: Some(next.clone()),
            cached_balance: None,
            ..current
        });
        self.start_polling(&next, generation);

        info!(address = %next, provider = %provider_name, "Wallet account changed");
        Ok(Transition::Applied)
    }

    /// Fetch the balance once, outside the polling schedule.
    ///
    /// Returns `None` when there is no session to query. Demo sessions
    /// always read zero.
    pub async fn refresh_balance(&self) -> Result<Option<Balance>> {
        let (state, generation) = {
            let inner = self.shared.inner.lock();
            (inner.state.clone(), inner.generation)
        };

        match (&state.status, state.address) {
            (ConnectionStatus::DemoConnected, _) => Ok(Some(Balance::ZERO)),
            (ConnectionStatus::Connected, Some(address)) => {
                let balance = self.shared.ledger.get_balance(&address).await?;
                self.shared.apply_balance(&address, generation, balance);
                Ok(Some(balance))
            }
            _ => Ok(None),
        }
    }

    /// Sign and execute a Move call through the connected wallet.
    ///
    /// Only wallet sessions can sign. A signing failure is returned to the
    /// caller and leaves the session as it was.
    pub async fn sign_and_execute(&self, call: &MoveCall) -> Result<ExecutionResult> {
        let (status, active) = {
            let inner = self.shared.inner.lock();
            (inner.state.status.clone(), inner.active.clone())
        };

        match status {
            ConnectionStatus::Connected => {}
            ConnectionStatus::DemoConnected => {
                return Err(WalletError::Provider(
                    "Transactions are not available in demo mode".to_string(),
                ))
            }
            _ => return Err(WalletError::Provider("No wallet connected".to_string())),
        }

        let handle = active.ok_or_else(|| {
            WalletError::Provider(
                "This session cannot sign; connect a wallet extension to send transactions"
                    .to_string(),
            )
        })?;
        let signer = handle.signer().ok_or_else(|| {
            WalletError::Provider(format!("{} cannot sign transactions", handle.name()))
        })?;

        call.validate()?;

        info!(call = %call.target(), provider = %handle.name(), "Submitting transaction");
        let result = signer.sign_and_execute(call).await.map_err(|e| match e {
            WalletError::Provider(_) => e,
            other => WalletError::Provider(other.to_string()),
        })?;

        info!(digest = %result.digest, "Transaction executed");
        Ok(result)
    }

    /// Replace the state, bump the generation and notify listeners.
    /// Callers hold the commit lock.
    fn apply(&self, state: ConnectionState) -> u64 {
        let _emit = self.shared.emit_lock.lock();
        let (snapshot, generation) = {
            let mut inner = self.shared.inner.lock();
            inner.generation += 1;
            inner.state = state;
            (inner.state.clone(), inner.generation)
        };
        debug!(status = %snapshot.status, generation, "Connection state changed");
        self.shared.emit_state(&snapshot);
        generation
    }

    async fn persist(&self, record: &SessionRecord) {
        if let Err(e) = self.shared.store.save(record).await {
            warn!(
                error = %e,
                provider = %record.provider_name,
                "Failed to save session; it will not survive a restart"
            );
        }
    }

    /// Stop background work for the current session and release its provider.
    fn stop_session(&self) -> Option<ProviderHandle> {
        self.shared.poller.stop();
        let mut inner = self.shared.inner.lock();
        if let Some(task) = inner.events_task.take() {
            task.abort();
        }
        inner.active.take()
    }

    fn start_polling(&self, address: &str, generation: u64) {
        let weak: Weak<Shared> = Arc::downgrade(&self.shared);
        let polled = address.to_string();
        self.shared.poller.start(address, move |balance| {
            if let Some(shared) = weak.upgrade() {
                shared.apply_balance(&polled, generation, balance);
            }
        });
    }

    /// Forward provider account events into controller commands.
    ///
    /// Each command runs in its own task, so aborting the forwarder from
    /// inside `disconnect` never cancels the command doing the aborting.
    fn subscribe_events(&self, handle: &ProviderHandle) {
        let Some(source) = handle.events() else {
            debug!(provider = %handle.name(), "Provider has no account events");
            return;
        };

        let mut events = source.subscribe();
        let weak = Arc::downgrade(&self.shared);
        let provider = handle.name().to_string();

        let task = tokio::spawn(async move {
            loop {
                let event = match events.recv().await {
                    Ok(event) => event,
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(provider = %provider, skipped, "Missed provider events");
                        continue;
                    }
                    Err(RecvError::Closed) => break,
                };

                let Some(shared) = weak.upgrade() else {
                    break;
                };
                let controller = ConnectionController { shared };
                debug!(provider = %provider, event = ?event, "Provider event");

                let command = tokio::spawn(async move {
                    match event {
                        ProviderEvent::AccountsChanged(accounts) => {
                            controller.account_changed(accounts).await
                        }
                        ProviderEvent::Disconnected => controller.disconnect().await,
                    }
                });
                match command.await {
                    Ok(Err(e)) => warn!(provider = %provider, error = %e, "Provider event failed"),
                    Err(e) => warn!(provider = %provider, error = %e, "Provider event task failed"),
                    Ok(Ok(_)) => {}
                }
            }
        });

        self.shared.inner.lock().events_task = Some(task);
    }
}

async fn request_accounts(handle: &ProviderHandle) -> Result<Vec<String>> {
    if let Some(connector) = handle.connector() {
        connector.connect().await?;
    }

    let source = handle.accounts().ok_or_else(|| {
        WalletError::Provider(format!("{} does not expose accounts", handle.name()))
    })?;
    source.get_accounts().await
}

fn first_account(accounts: Vec<String>) -> Result<String> {
    let first = accounts
        .into_iter()
        .next()
        .map(|a| a.trim().to_string())
        .ok_or_else(|| WalletError::Provider("Wallet returned no accounts".to_string()))?;

    validate_sui_address(&first, "Wallet account").map_err(WalletError::Provider)?;
    Ok(first)
}

fn demo_state(network: shared::dto::Network) -> ConnectionState {
    ConnectionState {
        status: ConnectionStatus::DemoConnected,
        address: None,
        provider_name: Some(DEMO_PROVIDER.to_string()),
        network,
        cached_balance: Some(Balance::ZERO),
    }
}
