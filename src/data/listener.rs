use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::Address;
use alloy::providers::{Provider, ProviderBuilder, WsConnect};
use futures::StreamExt;
use tokio::sync::{mpsc, watch};

use crate::data::contract;
use crate::data::provider::PortalProvider;
use crate::data::wallet::Wallet;
use crate::events::AppEvent;

const INITIAL_BACKOFF: Duration = Duration::from_secs(1);
const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Tracks what the wallet last reported so only changes are forwarded.
#[derive(Debug, Default)]
pub struct WalletSnapshot {
    accounts: Option<Vec<Address>>,
    chain_id: Option<u64>,
}

impl WalletSnapshot {
    /// Record the latest accounts. Returns them if they differ from a previous poll.
    pub fn update_accounts(&mut self, accounts: Vec<Address>) -> Option<Vec<Address>> {
        let changed = matches!(&self.accounts, Some(prev) if *prev != accounts);
        self.accounts = Some(accounts.clone());
        changed.then_some(accounts)
    }

    /// Record the latest chain id. Returns it if it differs from a previous poll.
    pub fn update_chain(&mut self, chain_id: u64) -> Option<u64> {
        let changed = matches!(self.chain_id, Some(prev) if prev != chain_id);
        self.chain_id = Some(chain_id);
        changed.then_some(chain_id)
    }
}

/// Poll the wallet for account and network switches, emitting
/// `AccountsChanged` / `ChainChanged` the way a browser wallet would.
pub fn spawn_wallet_watcher(
    provider: Arc<PortalProvider>,
    wallet: Wallet,
    interval: Duration,
    event_tx: mpsc::UnboundedSender<AppEvent>,
    mut shutdown: watch::Receiver<bool>,
) {
    tokio::spawn(async move {
        let mut snapshot = WalletSnapshot::default();
        let mut ticker = tokio::time::interval(interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                res = shutdown.changed() => {
                    if res.is_err() || *shutdown.borrow() {
                        tracing::debug!("wallet watcher stopped");
                        return;
                    }
                    continue;
                }
            }

            match wallet.authorized_accounts(provider.inner()).await {
                Ok(accounts) => {
                    if let Some(accounts) = snapshot.update_accounts(accounts) {
                        tracing::info!("accountsChanged: {accounts:?}");
                        let _ = event_tx.send(AppEvent::AccountsChanged(accounts));
                    }
                }
                Err(e) => tracing::debug!("account poll failed: {e}"),
            }

            match provider.chain_id().await {
                Ok(chain_id) => {
                    if let Some(chain_id) = snapshot.update_chain(chain_id) {
                        tracing::info!("chainChanged: {chain_id:#x}");
                        let _ = event_tx.send(AppEvent::ChainChanged(chain_id));
                    }
                }
                Err(e) => tracing::debug!("chain id poll failed: {e}"),
            }
        }
    });
}

/// Follow `NewWave` events. Uses a WebSocket subscription when `ws_url` is set,
/// otherwise polls `eth_getLogs` over each new block range.
pub fn spawn_new_wave_listener(
    provider: Arc<PortalProvider>,
    ws_url: Option<String>,
    interval: Duration,
    event_tx: mpsc::UnboundedSender<AppEvent>,
    shutdown: watch::Receiver<bool>,
) {
    match ws_url {
        Some(url) => {
            let contract = provider.contract();
            tokio::spawn(subscribe_with_reconnect(url, contract, event_tx, shutdown));
        }
        None => {
            tokio::spawn(poll_new_waves(provider, interval, event_tx, shutdown));
        }
    }
}

async fn subscribe_with_reconnect(
    url: String,
    contract: Address,
    event_tx: mpsc::UnboundedSender<AppEvent>,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut backoff = INITIAL_BACKOFF;

    loop {
        match subscribe(&url, contract, &event_tx, &mut shutdown, &mut backoff).await {
            Ok(()) => {
                let _ = event_tx.send(AppEvent::ListenerDisconnected);
                return;
            }
            Err(e) => {
                tracing::warn!("NewWave subscription error: {e}, reconnecting in {backoff:?}");
                let _ = event_tx.send(AppEvent::ListenerDisconnected);
                tokio::select! {
                    _ = tokio::time::sleep(backoff) => {
                        backoff = next_backoff(backoff);
                    }
                    res = shutdown.changed() => {
                        if res.is_err() || *shutdown.borrow() {
                            return;
                        }
                    }
                }
            }
        }
    }
}

async fn subscribe(
    url: &str,
    contract: Address,
    event_tx: &mpsc::UnboundedSender<AppEvent>,
    shutdown: &mut watch::Receiver<bool>,
    backoff: &mut Duration,
) -> color_eyre::Result<()> {
    tracing::info!("connecting to {url} for NewWave events");
    let provider = ProviderBuilder::new().on_ws(WsConnect::new(url)).await?;
    let sub = provider
        .subscribe_logs(&contract::new_wave_filter(contract))
        .await?;
    let mut stream = sub.into_stream();

    mark_subscribed(backoff, event_tx);

    loop {
        tokio::select! {
            res = shutdown.changed() => {
                if res.is_err() || *shutdown.borrow() {
                    return Ok(());
                }
            }
            log = stream.next() => {
                let Some(log) = log else {
                    return Err(color_eyre::eyre::eyre!("subscription stream ended"));
                };
                forward_log(&log, event_tx);
            }
        }
    }
}

async fn poll_new_waves(
    provider: Arc<PortalProvider>,
    interval: Duration,
    event_tx: mpsc::UnboundedSender<AppEvent>,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(interval);
    let mut last_seen: Option<u64> = None;
    let mut connected = false;

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            res = shutdown.changed() => {
                if res.is_err() || *shutdown.borrow() {
                    return;
                }
                continue;
            }
        }

        let latest = match provider.latest_block_number().await {
            Ok(n) => n,
            Err(e) => {
                tracing::debug!("block number poll failed: {e}");
                if connected {
                    connected = false;
                    let _ = event_tx.send(AppEvent::ListenerDisconnected);
                }
                continue;
            }
        };

        if !connected {
            connected = true;
            let _ = event_tx.send(AppEvent::ListenerConnected);
        }

        let Some(from) = next_range_start(last_seen, latest) else {
            last_seen = Some(latest);
            continue;
        };

        match provider.new_wave_logs(from, latest).await {
            Ok(logs) => {
                for log in &logs {
                    forward_log(log, &event_tx);
                }
                last_seen = Some(latest);
            }
            Err(e) => tracing::warn!("eth_getLogs {from}..={latest} failed: {e}"),
        }
    }
}

fn forward_log(log: &alloy::rpc::types::Log, event_tx: &mpsc::UnboundedSender<AppEvent>) {
    match contract::decode_new_wave(log) {
        Ok(wave) => {
            tracing::info!("NewWave {} {} {:?}", wave.address, wave.timestamp, wave.message);
            let _ = event_tx.send(AppEvent::NewWave(wave));
        }
        Err(e) => tracing::debug!("skipping undecodable log: {e}"),
    }
}

/// First block to scan, or None when there is nothing new. The first poll only sets a baseline.
fn next_range_start(last_seen: Option<u64>, latest: u64) -> Option<u64> {
    match last_seen {
        Some(last) if latest > last => Some(last + 1),
        _ => None,
    }
}

/// A live subscription restarts the reconnect schedule from the shortest delay.
fn mark_subscribed(backoff: &mut Duration, event_tx: &mpsc::UnboundedSender<AppEvent>) {
    *backoff = INITIAL_BACKOFF;
    let _ = event_tx.send(AppEvent::ListenerConnected);
}

fn next_backoff(current: Duration) -> Duration {
    (current * 2).min(MAX_BACKOFF)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_poll_is_baseline() {
        let mut snapshot = WalletSnapshot::default();
        assert!(snapshot.update_accounts(vec![Address::ZERO]).is_none());
        assert!(snapshot.update_chain(4).is_none());
    }

    #[test]
    fn test_account_change_detected() {
        let mut snapshot = WalletSnapshot::default();
        snapshot.update_accounts(vec![Address::repeat_byte(1)]);
        assert!(snapshot.update_accounts(vec![Address::repeat_byte(1)]).is_none());
        let changed = snapshot.update_accounts(vec![Address::repeat_byte(2)]);
        assert_eq!(changed, Some(vec![Address::repeat_byte(2)]));
    }

    #[test]
    fn test_disconnect_detected() {
        let mut snapshot = WalletSnapshot::default();
        snapshot.update_accounts(vec![Address::repeat_byte(1)]);
        assert_eq!(snapshot.update_accounts(vec![]), Some(vec![]));
    }

    #[test]
    fn test_chain_change_detected() {
        let mut snapshot = WalletSnapshot::default();
        snapshot.update_chain(4);
        assert_eq!(snapshot.update_chain(4), None);
        assert_eq!(snapshot.update_chain(1), Some(1));
    }

    #[test]
    fn test_next_range_start() {
        assert_eq!(next_range_start(None, 100), None);
        assert_eq!(next_range_start(Some(100), 100), None);
        assert_eq!(next_range_start(Some(100), 105), Some(101));
        assert_eq!(next_range_start(Some(100), 90), None);
    }

    #[test]
    fn test_backoff_caps() {
        assert_eq!(next_backoff(Duration::from_secs(1)), Duration::from_secs(2));
        assert_eq!(next_backoff(Duration::from_secs(16)), Duration::from_secs(30));
        assert_eq!(next_backoff(Duration::from_secs(30)), Duration::from_secs(30));
    }

    #[test]
    fn test_subscription_resets_backoff() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut backoff = INITIAL_BACKOFF;
        for _ in 0..6 {
            backoff = next_backoff(backoff);
        }
        assert_eq!(backoff, MAX_BACKOFF);

        mark_subscribed(&mut backoff, &tx);
        assert_eq!(backoff, Duration::from_secs(1));
        assert!(matches!(rx.try_recv(), Ok(AppEvent::ListenerConnected)));
    }
}
