mod app;
mod components;
mod config;
mod data;
mod error;
mod events;
mod logging;
mod state;
mod theme;
mod utils;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{Result, bail};
use tokio::sync::mpsc;

use crate::app::App;
use crate::config::Config;
use crate::data::provider::PortalProvider;
use crate::data::wallet::Wallet;
use crate::data::{ExpectedChain, PortalService, chains};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let config = Config::parse();

    let log_path = logging::init(config.log_file.as_deref(), &config.log_level)?;

    let Some(preset) = chains::get_chain_config(&config.chain) else {
        bail!(
            "Unknown chain '{}'. Supported: {}",
            config.chain,
            chains::supported_chains().join(", ")
        );
    };
    let rpc_url = config.rpc_url.clone().unwrap_or_else(|| preset.rpc_url.clone());
    let expected_chain = ExpectedChain::resolve(preset, config.chain_id);

    let wallet = Wallet::from_config(config.private_key.as_deref(), config.node_accounts)?;

    tracing::info!("Starting wave-portal v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("RPC: {rpc_url}");
    tracing::info!(
        "Contract: {} ({:?}, counter {})",
        config.contract,
        config.contract_version,
        config.contract_version.count_method()
    );
    tracing::info!("Wallet: {}", wallet.label());

    eprintln!("Connecting to {rpc_url}... (logging to {})", log_path.display());
    let provider = PortalProvider::connect(
        &rpc_url,
        &wallet,
        config.contract,
        config.contract_version,
        config.gas_limit,
    )
    .await?;

    let (event_tx, event_rx) = mpsc::unbounded_channel();

    let service = Arc::new(PortalService::new(
        provider,
        wallet,
        expected_chain,
        event_tx,
    ));
    service.attach_listeners(
        config.ws_url.clone(),
        Duration::from_millis(config.poll_interval_ms),
    );

    let mut app = App::with_service(
        Arc::clone(&service),
        event_rx,
        config.tick_rate_ms,
        config.export_dir.clone(),
    );

    // Initialize terminal
    let terminal = ratatui::init();
    let result = app.run(terminal).await;

    // Restore terminal
    ratatui::restore();

    tracing::info!("Shutting down");
    result
}
