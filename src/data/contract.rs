use alloy::primitives::{address, Address, Bytes, U256};
use alloy::rpc::types::{Filter, Log};
use alloy::sol;
use alloy::sol_types::{SolCall, SolEvent};
use clap::ValueEnum;

use crate::data::types::Wave;
use crate::error::Result;

/// Address of the deployed WavePortal contract.
pub const DEFAULT_CONTRACT: Address = address!("34681A1c206bf08F17395B2724690634d3d45096");

/// Gas limit sent with every wave, matching what the portal has always used.
pub const DEFAULT_GAS_LIMIT: u64 = 400_000;

sol! {
    #[allow(missing_docs)]
    struct OnChainWave {
        address waver;
        string message;
        uint256 timestamp;
    }

    #[allow(missing_docs)]
    event NewWave(address indexed from, uint256 timestamp, string message);

    #[allow(missing_docs)]
    function wave(string message) external;
    #[allow(missing_docs)]
    function getTotalWaves() external view returns (uint256);
    #[allow(missing_docs)]
    function getTotalWaveCount() external view returns (uint256);
    #[allow(missing_docs)]
    function getAllWaves() external view returns (OnChainWave[] memory);
}

mod classic {
    alloy::sol! {
        #[allow(missing_docs)]
        function wave() external;
    }
}

/// The three deployed generations of the WavePortal ABI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ContractVersion {
    /// `wave()` and `getTotalWaves()` only.
    Classic,
    /// Adds messages, `getAllWaves()` and the `NewWave` event.
    Messages,
    /// Renames the counter to `getTotalWaveCount()` and checks the chain before waving.
    Current,
}

impl ContractVersion {
    pub fn has_messages(&self) -> bool {
        !matches!(self, ContractVersion::Classic)
    }

    pub fn has_wave_list(&self) -> bool {
        self.has_messages()
    }

    pub fn emits_events(&self) -> bool {
        self.has_messages()
    }

    pub fn verifies_chain(&self) -> bool {
        matches!(self, ContractVersion::Current)
    }

    pub fn count_method(&self) -> &'static str {
        match self {
            ContractVersion::Current => "getTotalWaveCount",
            _ => "getTotalWaves",
        }
    }
}

/// Calldata for `wave`. Classic contracts ignore the message.
pub fn encode_wave(version: ContractVersion, message: &str) -> Bytes {
    let data = if version.has_messages() {
        waveCall {
            message: message.to_string(),
        }
        .abi_encode()
    } else {
        classic::waveCall {}.abi_encode()
    };
    Bytes::from(data)
}

/// Calldata for the version's wave counter.
pub fn encode_total_waves(version: ContractVersion) -> Bytes {
    let data = match version {
        ContractVersion::Current => getTotalWaveCountCall {}.abi_encode(),
        _ => getTotalWavesCall {}.abi_encode(),
    };
    Bytes::from(data)
}

pub fn encode_all_waves() -> Bytes {
    Bytes::from(getAllWavesCall {}.abi_encode())
}

pub fn decode_total_waves(version: ContractVersion, data: &[u8]) -> Result<u64> {
    let count = match version {
        ContractVersion::Current => getTotalWaveCountCall::abi_decode_returns(data, true)?._0,
        _ => getTotalWavesCall::abi_decode_returns(data, true)?._0,
    };
    Ok(u256_to_u64(count))
}

/// Decode `getAllWaves()` into display order, most recent first.
pub fn decode_all_waves(data: &[u8]) -> Result<Vec<Wave>> {
    let raw = getAllWavesCall::abi_decode_returns(data, true)?._0;
    let mut waves: Vec<Wave> = raw
        .into_iter()
        .map(|w| Wave::from_unix(w.waver, u256_to_u64(w.timestamp), w.message))
        .collect();
    waves.reverse();
    Ok(waves)
}

pub fn decode_new_wave(log: &Log) -> Result<Wave> {
    let event = NewWave::decode_log_data(log.data(), true)?;
    Ok(Wave::from_unix(
        event.from,
        u256_to_u64(event.timestamp),
        event.message,
    ))
}

/// Log filter matching `NewWave` emitted by the portal contract.
pub fn new_wave_filter(contract: Address) -> Filter {
    Filter::new()
        .address(contract)
        .event_signature(NewWave::SIGNATURE_HASH)
}

fn u256_to_u64(value: U256) -> u64 {
    u64::try_from(value).unwrap_or(u64::MAX)
}
