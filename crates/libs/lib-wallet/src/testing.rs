//! Hand-written doubles for the capability traits, storage and ledger.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, Notify};

use crate::error::{Result, WalletError};
use crate::ledger::{Balance, LedgerQuery};
use crate::registry::{
    AccountEvents, AccountSource, Connect, Disconnect, ProviderEvent, TransactionSigner,
    WalletAdapter,
};
use crate::storage::KeyValueStorage;
use crate::transaction::{ExecutionResult, MoveCall};

/// Deterministic well-formed Sui address.
pub(crate) fn sample_address(n: u64) -> String {
    format!("0x{:064x}", n)
}

/// Storage whose every operation fails.
pub(crate) struct FailingStorage;

#[async_trait]
impl KeyValueStorage for FailingStorage {
    async fn get(&self, _key: &str) -> Result<Option<String>> {
        Err(WalletError::Storage("storage unavailable".to_string()))
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<()> {
        Err(WalletError::Storage("storage unavailable".to_string()))
    }

    async fn remove(&self, _key: &str) -> Result<()> {
        Err(WalletError::Storage("storage unavailable".to_string()))
    }
}

/// Scriptable wallet provider. Has `connect`, `get_accounts` and `disconnect`
/// by default; signing and events are opt-in.
pub(crate) struct MockAdapter {
    name: String,
    has_connect: bool,
    has_disconnect: bool,
    has_signer: bool,
    has_events: bool,
    accounts: Result<Vec<String>>,
    connect_error: Option<WalletError>,
    disconnect_error: Option<WalletError>,
    sign_error: Option<WalletError>,
    gate: Option<Arc<Notify>>,
    events: broadcast::Sender<ProviderEvent>,
    connect_calls: AtomicUsize,
    disconnect_calls: AtomicUsize,
    sign_calls: AtomicUsize,
}

impl MockAdapter {
    pub fn new(name: &str) -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            name: name.to_string(),
            has_connect: true,
            has_disconnect: true,
            has_signer: false,
            has_events: false,
            accounts: Ok(vec![sample_address(1)]),
            connect_error: None,
            disconnect_error: None,
            sign_error: None,
            gate: None,
            events,
            connect_calls: AtomicUsize::new(0),
            disconnect_calls: AtomicUsize::new(0),
            sign_calls: AtomicUsize::new(0),
        }
    }

    pub fn without_connect(mut self) -> Self {
        self.has_connect = false;
        self
    }

    pub fn without_disconnect(mut self) -> Self {
        self.has_disconnect = false;
        self
    }

    pub fn with_signer(mut self) -> Self {
        self.has_signer = true;
        self
    }

    pub fn with_events(mut self) -> Self {
        self.has_events = true;
        self
    }

    pub fn with_accounts(mut self, accounts: Vec<String>) -> Self {
        self.accounts = Ok(accounts);
        self
    }

    pub fn with_connect_error(mut self, message: &str) -> Self {
        self.connect_error = Some(WalletError::Provider(message.to_string()));
        self
    }

    pub fn with_disconnect_error(mut self, message: &str) -> Self {
        self.disconnect_error = Some(WalletError::Provider(message.to_string()));
        self
    }

    pub fn with_sign_error(mut self, message: &str) -> Self {
        self.sign_error = Some(WalletError::Provider(message.to_string()));
        self
    }

    /// `connect` blocks until the gate is notified.
    pub fn with_gate(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn into_dyn(self) -> Arc<dyn WalletAdapter> {
        Arc::new(self)
    }

    /// Push an event to every subscriber.
    pub fn emit(&self, event: ProviderEvent) {
        let _ = self.events.send(event);
    }

    pub fn connects(&self) -> usize {
        self.connect_calls.load(Ordering::SeqCst)
    }

    pub fn disconnects(&self) -> usize {
        self.disconnect_calls.load(Ordering::SeqCst)
    }

    pub fn signs(&self) -> usize {
        self.sign_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Connect for MockAdapter {
    async fn connect(&self) -> Result<()> {
        self.connect_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        match &self.connect_error {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl AccountSource for MockAdapter {
    async fn get_accounts(&self) -> Result<Vec<String>> {
        self.accounts.clone()
    }
}

#[async_trait]
impl TransactionSigner for MockAdapter {
    async fn sign_and_execute(&self, transaction: &MoveCall) -> Result<ExecutionResult> {
        self.sign_calls.fetch_add(1, Ordering::SeqCst);
        match &self.sign_error {
            Some(e) => Err(e.clone()),
            None => Ok(ExecutionResult {
                digest: format!("digest-{}", transaction.function),
                effects: None,
            }),
        }
    }
}

#[async_trait]
impl Disconnect for MockAdapter {
    async fn disconnect(&self) -> Result<()> {
        self.disconnect_calls.fetch_add(1, Ordering::SeqCst);
        match &self.disconnect_error {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }
}

impl AccountEvents for MockAdapter {
    fn subscribe(&self) -> broadcast::Receiver<ProviderEvent> {
        self.events.subscribe()
    }
}

impl WalletAdapter for MockAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    fn connector(&self) -> Option<&dyn Connect> {
        self.has_connect.then_some(self as &dyn Connect)
    }

    fn accounts(&self) -> Option<&dyn AccountSource> {
        Some(self)
    }

    fn signer(&self) -> Option<&dyn TransactionSigner> {
        self.has_signer.then_some(self as &dyn TransactionSigner)
    }

    fn disconnector(&self) -> Option<&dyn Disconnect> {
        self.has_disconnect.then_some(self as &dyn Disconnect)
    }

    fn events(&self) -> Option<&dyn AccountEvents> {
        self.has_events.then_some(self as &dyn AccountEvents)
    }
}

/// Ledger returning scripted results first, then a fixed balance.
pub(crate) struct MockLedger {
    balance: Balance,
    scripted: Mutex<VecDeque<Result<Balance>>>,
    calls: Mutex<HashMap<String, usize>>,
}

impl MockLedger {
    pub fn with_balance(balance: Balance) -> Self {
        Self {
            balance,
            scripted: Mutex::new(VecDeque::new()),
            calls: Mutex::new(HashMap::new()),
        }
    }

    pub fn push_result(&self, result: Result<Balance>) {
        self.scripted.lock().push_back(result);
    }

    pub fn calls_for(&self, address: &str) -> usize {
        self.calls.lock().get(address).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().values().sum()
    }
}

#[async_trait]
impl LedgerQuery for MockLedger {
    async fn get_balance(&self, address: &str) -> Result<Balance> {
        *self.calls.lock().entry(address.to_string()).or_insert(0) += 1;
        self.scripted
            .lock()
            .pop_front()
            .unwrap_or(Ok(self.balance))
    }
}
