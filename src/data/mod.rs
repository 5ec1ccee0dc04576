pub mod chains;
pub mod contract;
pub mod export;
pub mod listener;
pub mod provider;
pub mod types;
pub mod wallet;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::Address;
use tokio::sync::{mpsc, watch};

use crate::data::provider::PortalProvider;
use crate::data::types::{ChainConfig, ExportFormat, Wave};
use crate::data::wallet::Wallet;
use crate::error::{PortalError, Result};
use crate::events::AppEvent;

/// Network the portal contract lives on.
#[derive(Debug, Clone)]
pub struct ExpectedChain {
    pub chain_id: u64,
    pub name: String,
}

impl ExpectedChain {
    /// Resolve the deployment network from a preset and an optional `--chain-id` override.
    /// An overridden id is named after that id, not the preset.
    pub fn resolve(preset: ChainConfig, chain_id: Option<u64>) -> Self {
        match chain_id {
            Some(id) if id != preset.chain_id => Self {
                chain_id: id,
                name: chains::chain_name(id),
            },
            _ => Self {
                chain_id: preset.chain_id,
                name: preset.name,
            },
        }
    }

    /// Check the wallet's chain against the deployment network.
    pub fn check(&self, actual: u64) -> Result<()> {
        if actual == self.chain_id {
            Ok(())
        } else {
            Err(PortalError::WrongChain {
                expected: self.name.clone(),
                actual: chains::format_chain_id(actual),
            })
        }
    }
}

/// Runs wallet and contract operations off the UI loop, reporting results as `AppEvent`s.
pub struct PortalService {
    provider: Arc<PortalProvider>,
    wallet: Wallet,
    expected_chain: ExpectedChain,
    event_tx: mpsc::UnboundedSender<AppEvent>,
    shutdown_tx: watch::Sender<bool>,
}

impl PortalService {
    pub fn new(
        provider: PortalProvider,
        wallet: Wallet,
        expected_chain: ExpectedChain,
        event_tx: mpsc::UnboundedSender<AppEvent>,
    ) -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            provider: Arc::new(provider),
            wallet,
            expected_chain,
            event_tx,
            shutdown_tx,
        }
    }

    pub fn provider(&self) -> &PortalProvider {
        &self.provider
    }

    pub fn wallet(&self) -> &Wallet {
        &self.wallet
    }

    /// Start the wallet watcher and the `NewWave` listener.
    pub fn attach_listeners(&self, ws_url: Option<String>, poll_interval: Duration) {
        if self.wallet.is_present() {
            listener::spawn_wallet_watcher(
                Arc::clone(&self.provider),
                self.wallet.clone(),
                poll_interval,
                self.event_tx.clone(),
                self.shutdown_tx.subscribe(),
            );
        }

        if self.provider.version().emits_events() {
            listener::spawn_new_wave_listener(
                Arc::clone(&self.provider),
                ws_url,
                poll_interval,
                self.event_tx.clone(),
                self.shutdown_tx.subscribe(),
            );
        }
    }

    /// Pick up an already-authorized account without prompting.
    pub fn check_if_wallet_is_connected(&self) {
        let ctx = self.task_context();

        tokio::spawn(async move {
            if !ctx.wallet.is_present() {
                tracing::info!("No wallet detected; pass --private-key or --node-accounts");
                return;
            }
            tracing::info!("Wallet source: {}", ctx.wallet.label());

            match ctx.wallet.authorized_accounts(ctx.provider.inner()).await {
                Ok(accounts) => match accounts.first() {
                    Some(account) => {
                        tracing::info!("Found an authorized account: {account}");
                        let _ = ctx.event_tx.send(AppEvent::AccountConnected(*account));
                        ctx.verify_chain(None).await;
                    }
                    None => {
                        tracing::info!("No authorized account found");
                        let _ = ctx.event_tx.send(AppEvent::NoAuthorizedAccount);
                    }
                },
                Err(e) => ctx.report(e),
            }
        });
    }

    /// Explicit connect request from the user.
    pub fn connect_wallet(&self) {
        let ctx = self.task_context();

        tokio::spawn(async move {
            let accounts = match ctx.wallet.request_accounts(ctx.provider.inner()).await {
                Ok(accounts) => accounts,
                Err(e) => {
                    ctx.report(e);
                    return;
                }
            };

            match accounts.first() {
                Some(account) => {
                    tracing::info!("Connected {account}");
                    let _ = ctx.event_tx.send(AppEvent::AccountConnected(*account));
                    ctx.verify_chain(None).await;
                }
                None => ctx.report(PortalError::NoAccount),
            }
        });
    }

    /// Re-check the network after the wallet reported a switch.
    pub fn handle_chain_changed(&self, chain_id: u64) {
        let ctx = self.task_context();
        tokio::spawn(async move {
            ctx.verify_chain(Some(chain_id)).await;
        });
    }

    pub fn refresh(&self) {
        let ctx = self.task_context();
        tokio::spawn(async move {
            ctx.fetch_total_wave_count().await;
            ctx.fetch_all_waves().await;
        });
    }

    /// Send a wave from `account`, then refresh count and list once mined.
    pub fn send_wave(&self, account: Address, message: String) {
        let ctx = self.task_context();

        tokio::spawn(async move {
            match ctx.send_wave(account, &message).await {
                Ok(()) => {
                    ctx.fetch_total_wave_count().await;
                    ctx.fetch_all_waves().await;
                }
                Err(e) => {
                    tracing::error!("wave failed: {e}");
                    if e.is_alert() {
                        let _ = ctx.event_tx.send(AppEvent::Alert(e.to_string()));
                    }
                    let _ = ctx.event_tx.send(AppEvent::WaveFailed(e.to_string()));
                }
            }
        });
    }

    /// Write the given waves to `dir` in the chosen format.
    pub fn export_waves(&self, waves: Vec<Wave>, format: ExportFormat, dir: PathBuf) {
        let tx = self.event_tx.clone();

        tokio::task::spawn_blocking(move || {
            let path = export::default_path(&dir, format);
            let result = match format {
                ExportFormat::Csv => export::export_waves_csv(&waves, &path),
                ExportFormat::Json => export::export_waves_json(&waves, &path),
            };
            match result {
                Ok(msg) => {
                    tracing::info!("{msg}");
                    let _ = tx.send(AppEvent::ExportComplete(msg));
                }
                Err(e) => {
                    let _ = tx.send(AppEvent::Error(e.to_string()));
                }
            }
        });
    }

    fn task_context(&self) -> TaskContext {
        TaskContext {
            provider: Arc::clone(&self.provider),
            wallet: self.wallet.clone(),
            expected_chain: self.expected_chain.clone(),
            event_tx: self.event_tx.clone(),
        }
    }
}

impl Drop for PortalService {
    fn drop(&mut self) {
        let _ = self.shutdown_tx.send(true);
    }
}

/// What a spawned operation needs, cloned out of the service.
struct TaskContext {
    provider: Arc<PortalProvider>,
    wallet: Wallet,
    expected_chain: ExpectedChain,
    event_tx: mpsc::UnboundedSender<AppEvent>,
}

impl TaskContext {
    fn report(&self, err: PortalError) {
        if err.is_alert() {
            tracing::warn!("{err}");
            let _ = self.event_tx.send(AppEvent::Alert(err.to_string()));
        } else {
            tracing::error!("{err}");
            let _ = self.event_tx.send(AppEvent::Error(err.to_string()));
        }
    }

    async fn current_chain(&self, known: Option<u64>) -> Result<u64> {
        match known {
            Some(chain_id) => Ok(chain_id),
            None => self.provider.chain_id().await,
        }
    }

    /// Confirm the network, then load count and waves. Wrong networks raise an alert.
    async fn verify_chain(&self, known: Option<u64>) {
        let chain_id = match self.current_chain(known).await {
            Ok(id) => id,
            Err(e) => {
                self.report(e);
                return;
            }
        };
        tracing::info!("Connected to chain {}", chains::format_chain_id(chain_id));

        if self.provider.version().verifies_chain() {
            if let Err(e) = self.expected_chain.check(chain_id) {
                let _ = self.event_tx.send(AppEvent::WrongChain(chain_id));
                self.report(e);
                return;
            }
        }

        let _ = self.event_tx.send(AppEvent::ChainVerified(chain_id));
        self.fetch_total_wave_count().await;
        self.fetch_all_waves().await;
    }

    async fn fetch_total_wave_count(&self) {
        match self.provider.total_waves().await {
            Ok(count) => {
                tracing::info!("Retrieved total wave count... {count}");
                let _ = self.event_tx.send(AppEvent::WaveCountLoaded(count));
            }
            Err(e) => self.report(e),
        }
    }

    async fn fetch_all_waves(&self) {
        if !self.provider.version().has_wave_list() {
            return;
        }
        match self.provider.all_waves().await {
            Ok(waves) => {
                tracing::debug!("Retrieved {} waves", waves.len());
                let _ = self.event_tx.send(AppEvent::WavesLoaded(waves));
            }
            Err(e) => self.report(e),
        }
    }

    async fn send_wave(&self, account: Address, message: &str) -> Result<()> {
        let version = self.provider.version();
        if version.has_messages() && message.trim().is_empty() {
            return Err(PortalError::EmptyMessage);
        }

        if version.verifies_chain() {
            let chain_id = self.provider.chain_id().await?;
            self.expected_chain.check(chain_id)?;
        }

        let event_tx = self.event_tx.clone();
        let receipt = self
            .provider
            .wave(account, message, move |hash| {
                tracing::info!("Mining... {hash}");
                let _ = event_tx.send(AppEvent::WaveSubmitted(hash));
            })
            .await?;

        tracing::info!("Mined -- {}", receipt.tx_hash);
        let _ = self.event_tx.send(AppEvent::WaveMined(receipt));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rinkeby() -> ExpectedChain {
        ExpectedChain {
            chain_id: 4,
            name: "Rinkeby Test Network".to_string(),
        }
    }

    #[test]
    fn test_expected_chain_accepts_match() {
        assert!(rinkeby().check(4).is_ok());
    }

    #[test]
    fn test_expected_chain_rejects_other() {
        match rinkeby().check(1) {
            Err(PortalError::WrongChain { expected, actual }) => {
                assert_eq!(expected, "Rinkeby Test Network");
                assert_eq!(actual, "0x1");
            }
            other => panic!("expected WrongChain, got {other:?}"),
        }
    }

    #[test]
    fn test_resolve_keeps_preset_name() {
        let preset = chains::get_chain_config("rinkeby").unwrap();
        let chain = ExpectedChain::resolve(preset.clone(), None);
        assert_eq!(chain.chain_id, 4);
        assert_eq!(chain.name, "Rinkeby Test Network");

        let chain = ExpectedChain::resolve(preset, Some(4));
        assert_eq!(chain.name, "Rinkeby Test Network");
    }

    #[test]
    fn test_resolve_chain_id_override_renames() {
        let preset = chains::get_chain_config("rinkeby").unwrap();
        let chain = ExpectedChain::resolve(preset.clone(), Some(1337));
        assert_eq!(chain.chain_id, 1337);
        assert_eq!(chain.name, "chain 0x539");

        let chain = ExpectedChain::resolve(preset, Some(1));
        assert_eq!(chain.name, "Ethereum Mainnet");
        assert!(chain.check(1337).unwrap_err().to_string().contains("Ethereum Mainnet"));
    }

    #[tokio::test]
    async fn test_check_without_wallet_reports_nothing() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let provider = PortalProvider::connect(
            "http://127.0.0.1:1",
            &Wallet::Absent,
            contract::DEFAULT_CONTRACT,
            contract::ContractVersion::Current,
            contract::DEFAULT_GAS_LIMIT,
        )
        .await
        .unwrap();
        let service = PortalService::new(provider, Wallet::Absent, rinkeby(), tx);

        service.check_if_wallet_is_connected();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_connect_without_wallet_alerts() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let provider = PortalProvider::connect(
            "http://127.0.0.1:1",
            &Wallet::Absent,
            contract::DEFAULT_CONTRACT,
            contract::ContractVersion::Current,
            contract::DEFAULT_GAS_LIMIT,
        )
        .await
        .unwrap();
        let service = PortalService::new(provider, Wallet::Absent, rinkeby(), tx);

        service.connect_wallet();
        match rx.recv().await {
            Some(AppEvent::Alert(msg)) => assert!(msg.contains("No wallet found")),
            other => panic!("expected alert, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_chain_changed_to_wrong_chain_alerts() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let provider = PortalProvider::connect(
            "http://127.0.0.1:1",
            &Wallet::Absent,
            contract::DEFAULT_CONTRACT,
            contract::ContractVersion::Current,
            contract::DEFAULT_GAS_LIMIT,
        )
        .await
        .unwrap();
        let service = PortalService::new(provider, Wallet::Absent, rinkeby(), tx);

        service.handle_chain_changed(1);
        assert!(matches!(rx.recv().await, Some(AppEvent::WrongChain(1))));
        match rx.recv().await {
            Some(AppEvent::Alert(msg)) => {
                assert!(msg.starts_with("You are not connected to the Rinkeby Test Network!"));
            }
            other => panic!("expected alert, got {other:?}"),
        }

        // No count or wave fetch follows a wrong chain.
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(rx.try_recv().is_err());
    }
}
