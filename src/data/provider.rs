use alloy::primitives::{Address, Bytes, B256};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::{Filter, Log, TransactionRequest};
use color_eyre::eyre::Result as EyreResult;

use crate::data::contract::{self, ContractVersion};
use crate::data::types::{Wave, WaveReceipt};
use crate::data::wallet::Wallet;
use crate::error::{PortalError, Result};

/// RPC access to one WavePortal deployment through a type-erased alloy provider.
pub struct PortalProvider {
    provider: Box<dyn Provider + Send + Sync>,
    contract: Address,
    version: ContractVersion,
    gas_limit: u64,
}

impl PortalProvider {
    /// Connect over HTTP, installing the local signer when the wallet has one.
    pub async fn connect(
        rpc_url: &str,
        wallet: &Wallet,
        contract: Address,
        version: ContractVersion,
        gas_limit: u64,
    ) -> EyreResult<Self> {
        let url = rpc_url.parse()?;
        let provider: Box<dyn Provider + Send + Sync> = match wallet.ethereum_wallet() {
            Some(signer) => Box::new(ProviderBuilder::new().wallet(signer).on_http(url)),
            None => Box::new(ProviderBuilder::new().on_http(url)),
        };
        Ok(Self {
            provider,
            contract,
            version,
            gas_limit,
        })
    }

    pub fn inner(&self) -> &(dyn Provider + Send + Sync) {
        self.provider.as_ref()
    }

    pub fn contract(&self) -> Address {
        self.contract
    }

    pub fn version(&self) -> ContractVersion {
        self.version
    }

    /// `eth_chainId`, read fresh on every call since the wallet may switch networks.
    pub async fn chain_id(&self) -> Result<u64> {
        Ok(self.provider.get_chain_id().await?)
    }

    pub async fn latest_block_number(&self) -> Result<u64> {
        Ok(self.provider.get_block_number().await?)
    }

    async fn read(&self, input: Bytes) -> Result<Bytes> {
        let tx = TransactionRequest::default()
            .to(self.contract)
            .input(input.into());
        Ok(self.provider.call(tx).await?)
    }

    pub async fn total_waves(&self) -> Result<u64> {
        let data = self.read(contract::encode_total_waves(self.version)).await?;
        contract::decode_total_waves(self.version, &data)
    }

    /// All waves in display order. Versions without a wave list return nothing.
    pub async fn all_waves(&self) -> Result<Vec<Wave>> {
        if !self.version.has_wave_list() {
            return Ok(Vec::new());
        }
        let data = self.read(contract::encode_all_waves()).await?;
        contract::decode_all_waves(&data)
    }

    /// Send a wave from `from`, reporting the hash once accepted and the receipt once mined.
    pub async fn wave(
        &self,
        from: Address,
        message: &str,
        on_submitted: impl FnOnce(B256),
    ) -> Result<WaveReceipt> {
        let tx = TransactionRequest::default()
            .from(from)
            .to(self.contract)
            .input(contract::encode_wave(self.version, message).into())
            .gas_limit(self.gas_limit);

        let pending = self.provider.send_transaction(tx).await?;
        let tx_hash = *pending.tx_hash();
        on_submitted(tx_hash);

        let receipt = pending.get_receipt().await?;
        if !receipt.status() {
            return Err(PortalError::Reverted(tx_hash));
        }
        Ok(WaveReceipt {
            tx_hash,
            block_number: receipt.block_number,
            gas_used: receipt.gas_used,
        })
    }

    /// `NewWave` logs in an inclusive block range.
    pub async fn new_wave_logs(&self, from_block: u64, to_block: u64) -> Result<Vec<Log>> {
        let filter: Filter = contract::new_wave_filter(self.contract)
            .from_block(from_block)
            .to_block(to_block);
        Ok(self.provider.get_logs(&filter).await?)
    }
}
