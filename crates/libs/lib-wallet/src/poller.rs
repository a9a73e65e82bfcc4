//! # Balance Poller
//!
//! Background task keeping the cached balance fresh for the active session.
//!
//! - Fetches immediately on [`BalancePoller::start`], then every interval
//! - Starting again replaces the running task, so two pollers never overlap
//! - A failed fetch is logged and skipped; the sink only ever sees real results

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::ledger::{Balance, LedgerQuery};

struct PollTask {
    address: String,
    handle: JoinHandle<()>,
}

pub struct BalancePoller {
    ledger: Arc<dyn LedgerQuery>,
    interval: Duration,
    task: Mutex<Option<PollTask>>,
}

impl BalancePoller {
    pub fn new(ledger: Arc<dyn LedgerQuery>, interval: Duration) -> Self {
        Self {
            ledger,
            interval,
            task: Mutex::new(None),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Start polling `address`, delivering each successful result to `on_balance`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start<F>(&self, address: &str, on_balance: F)
    where
        F: Fn(Balance) + Send + Sync + 'static,
    {
        let mut task = self.task.lock();
        if let Some(previous) = task.take() {
            previous.handle.abort();
            debug!(previous = %previous.address, next = %address, "Restarting balance poller");
        }

        let ledger = Arc::clone(&self.ledger);
        let interval = self.interval;
        let polled = address.to_string();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;

                let start = std::time::Instant::now();
                match ledger.get_balance(&polled).await {
                    Ok(balance) => {
                        debug!(
                            address = %polled,
                            balance = %balance,
                            duration_ms = start.elapsed().as_millis(),
                            "Balance fetched"
                        );
                        on_balance(balance);
                    }
                    Err(e) => {
                        warn!(
                            address = %polled,
                            error = %e,
                            "Balance fetch failed - keeping last known balance"
                        );
                    }
                }
            }
        });

        info!(address = %address, interval_secs = interval.as_secs(), "Balance poller started");
        *task = Some(PollTask {
            address: address.to_string(),
            handle,
        });
    }

    /// Cancel polling. No-op when not running.
    pub fn stop(&self) {
        if let Some(task) = self.task.lock().take() {
            task.handle.abort();
            info!(address = %task.address, "Balance poller stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.task
            .lock()
            .as_ref()
            .is_some_and(|task| !task.handle.is_finished())
    }

    /// Address currently being polled
    pub fn address(&self) -> Option<String> {
        self.task.lock().as_ref().map(|task| task.address.clone())
    }
}

impl Drop for BalancePoller {
    fn drop(&mut self) {
        if let Some(task) = self.task.get_mut().take() {
            task.handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WalletError;
    use crate::testing::MockLedger;
    use tokio::time::sleep;

    fn recorder() -> (Arc<Mutex<Vec<Balance>>>, impl Fn(Balance) + Send + Sync + 'static) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = {
            let seen = Arc::clone(&seen);
            move |balance| seen.lock().push(balance)
        };
        (seen, sink)
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetches_immediately_then_on_interval() {
        let ledger = Arc::new(MockLedger::with_balance(Balance(7)));
        let poller = BalancePoller::new(ledger.clone(), Duration::from_secs(30));
        let (seen, sink) = recorder();

        poller.start("0xa", sink);
        sleep(Duration::from_secs(1)).await;
        assert_eq!(ledger.calls_for("0xa"), 1);
        assert_eq!(*seen.lock(), vec![Balance(7)]);

        sleep(Duration::from_secs(30)).await;
        assert_eq!(ledger.calls_for("0xa"), 2);
        assert!(poller.is_running());
        assert_eq!(poller.address().as_deref(), Some("0xa"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_fetch_is_skipped() {
        let ledger = Arc::new(MockLedger::with_balance(Balance(1)));
        ledger.push_result(Ok(Balance(500)));
        ledger.push_result(Err(WalletError::TransientFetch("node down".to_string())));
        ledger.push_result(Ok(Balance::ZERO));

        let poller = BalancePoller::new(ledger.clone(), Duration::from_secs(30));
        let (seen, sink) = recorder();
        poller.start("0xa", sink);

        sleep(Duration::from_secs(31)).await;
        assert_eq!(*seen.lock(), vec![Balance(500)]);

        sleep(Duration::from_secs(30)).await;
        assert_eq!(*seen.lock(), vec![Balance(500), Balance::ZERO]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_replaces_previous_task() {
        let ledger = Arc::new(MockLedger::with_balance(Balance(1)));
        let poller = BalancePoller::new(ledger.clone(), Duration::from_secs(30));

        poller.start("0xa", |_| {});
        sleep(Duration::from_secs(1)).await;
        poller.start("0xb", |_| {});
        let before = ledger.calls_for("0xa");

        sleep(Duration::from_secs(100)).await;
        assert_eq!(ledger.calls_for("0xa"), before);
        assert_eq!(ledger.calls_for("0xb"), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_cancels_polling() {
        let ledger = Arc::new(MockLedger::with_balance(Balance(1)));
        let poller = BalancePoller::new(ledger.clone(), Duration::from_secs(30));

        poller.start("0xa", |_| {});
        sleep(Duration::from_secs(1)).await;
        poller.stop();
        poller.stop();

        sleep(Duration::from_secs(300)).await;
        assert_eq!(ledger.total_calls(), 1);
        assert!(!poller.is_running());
        assert_eq!(poller.address(), None);
    }
}
