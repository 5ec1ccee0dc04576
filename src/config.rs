use std::path::PathBuf;

use alloy::primitives::Address;
use clap::Parser;

use crate::data::contract::{ContractVersion, DEFAULT_CONTRACT, DEFAULT_GAS_LIMIT};

#[derive(Parser, Debug)]
#[command(name = "wave-portal", about = "Wave at a WavePortal contract from your terminal")]
pub struct Config {
    /// RPC endpoint URL (defaults to the chain preset's endpoint)
    #[arg(short, long, env = "WAVE_RPC_URL")]
    pub rpc_url: Option<String>,

    /// WebSocket RPC endpoint URL for live NewWave events
    #[arg(long, env = "WAVE_WS_URL")]
    pub ws_url: Option<String>,

    /// Chain preset the contract is deployed on (rinkeby, goerli, sepolia, ethereum, anvil)
    #[arg(long, default_value = "rinkeby")]
    pub chain: String,

    /// Expected chain id, overriding the preset
    #[arg(long)]
    pub chain_id: Option<u64>,

    /// WavePortal contract address
    #[arg(long, env = "WAVE_CONTRACT", default_value_t = DEFAULT_CONTRACT)]
    pub contract: Address,

    /// ABI generation of the deployed contract
    #[arg(long, value_enum, default_value = "current")]
    pub contract_version: ContractVersion,

    /// Private key used to sign waves
    #[arg(long, env = "WAVE_PRIVATE_KEY", hide_env_values = true)]
    pub private_key: Option<String>,

    /// Use accounts unlocked on the RPC node instead of a local key
    #[arg(long)]
    pub node_accounts: bool,

    /// Gas limit for wave transactions
    #[arg(long, default_value_t = DEFAULT_GAS_LIMIT)]
    pub gas_limit: u64,

    /// Interval in milliseconds for wallet and event polling
    #[arg(long, default_value = "4000")]
    pub poll_interval_ms: u64,

    /// Tick rate in milliseconds for UI refresh
    #[arg(long, default_value = "100")]
    pub tick_rate_ms: u64,

    /// Directory for wave exports
    #[arg(long, default_value = ".")]
    pub export_dir: PathBuf,

    /// Log file (defaults to the platform data directory)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Log level used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
