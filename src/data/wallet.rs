use alloy::network::EthereumWallet;
use alloy::primitives::Address;
use alloy::providers::Provider;
use alloy::signers::local::PrivateKeySigner;

use crate::error::{PortalError, Result};

/// Where accounts and signatures come from.
#[derive(Debug, Clone)]
pub enum Wallet {
    /// A private key held in-process; transactions are signed locally.
    Local(PrivateKeySigner),
    /// Accounts unlocked on the RPC node; the node signs via `eth_sendTransaction`.
    Node,
    /// Nothing configured.
    Absent,
}

impl Wallet {
    pub fn from_config(private_key: Option<&str>, node_accounts: bool) -> Result<Self> {
        if let Some(key) = private_key {
            let signer = parse_private_key(key)?;
            return Ok(Wallet::Local(signer));
        }
        if node_accounts {
            return Ok(Wallet::Node);
        }
        Ok(Wallet::Absent)
    }

    pub fn is_present(&self) -> bool {
        !matches!(self, Wallet::Absent)
    }

    /// Signing wallet to install on the provider, if signing happens locally.
    pub fn ethereum_wallet(&self) -> Option<EthereumWallet> {
        match self {
            Wallet::Local(signer) => Some(EthereumWallet::from(signer.clone())),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Wallet::Local(_) => "local key",
            Wallet::Node => "node accounts",
            Wallet::Absent => "no wallet",
        }
    }

    /// Accounts already authorized, without prompting (`eth_accounts`).
    pub async fn authorized_accounts(
        &self,
        provider: &(dyn Provider + Send + Sync),
    ) -> Result<Vec<Address>> {
        match self {
            Wallet::Local(signer) => Ok(vec![signer.address()]),
            Wallet::Node => Ok(provider.get_accounts().await?),
            Wallet::Absent => Err(PortalError::NoWallet),
        }
    }

    /// Ask the wallet to expose its accounts (`eth_requestAccounts`).
    pub async fn request_accounts(
        &self,
        provider: &(dyn Provider + Send + Sync),
    ) -> Result<Vec<Address>> {
        match self {
            Wallet::Local(signer) => Ok(vec![signer.address()]),
            Wallet::Node => {
                let requested: std::result::Result<Vec<Address>, _> = provider
                    .client()
                    .request_noparams("eth_requestAccounts")
                    .await;
                match requested {
                    Ok(accounts) => Ok(accounts),
                    Err(e) => {
                        tracing::debug!("eth_requestAccounts unavailable ({e}), using eth_accounts");
                        Ok(provider.get_accounts().await?)
                    }
                }
            }
            Wallet::Absent => Err(PortalError::NoWallet),
        }
    }
}

fn parse_private_key(key: &str) -> Result<PrivateKeySigner> {
    let trimmed = key.trim();
    let hex = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    hex.parse::<PrivateKeySigner>()
        .map_err(|e| PortalError::InvalidKey(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    // First default anvil/hardhat dev key.
    const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const DEV_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

    #[test]
    fn test_local_wallet_from_key() {
        let wallet = Wallet::from_config(Some(DEV_KEY), false).unwrap();
        match wallet {
            Wallet::Local(signer) => {
                assert_eq!(signer.address(), DEV_ADDRESS.parse::<Address>().unwrap());
            }
            other => panic!("expected local wallet, got {other:?}"),
        }
    }

    #[test]
    fn test_key_without_prefix() {
        let wallet = Wallet::from_config(Some(DEV_KEY.trim_start_matches("0x")), false).unwrap();
        assert!(matches!(wallet, Wallet::Local(_)));
        assert!(wallet.ethereum_wallet().is_some());
    }

    #[test]
    fn test_key_takes_precedence_over_node() {
        let wallet = Wallet::from_config(Some(DEV_KEY), true).unwrap();
        assert!(matches!(wallet, Wallet::Local(_)));
    }

    #[test]
    fn test_invalid_key() {
        let err = Wallet::from_config(Some("0x1234"), false).unwrap_err();
        assert!(matches!(err, PortalError::InvalidKey(_)));
    }

    #[test]
    fn test_node_and_absent() {
        let node = Wallet::from_config(None, true).unwrap();
        assert!(matches!(node, Wallet::Node));
        assert!(node.is_present());
        assert!(node.ethereum_wallet().is_none());

        let absent = Wallet::from_config(None, false).unwrap();
        assert!(!absent.is_present());
        assert_eq!(absent.label(), "no wallet");
    }
}
