use alloy::primitives::B256;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PortalError {
    #[error("No wallet found. Pass --private-key or --node-accounts")]
    NoWallet,

    #[error("No connected account")]
    NoAccount,

    #[error("You are not connected to the {expected}! (wallet is on chain {actual})")]
    WrongChain { expected: String, actual: String },

    #[error("Message is empty")]
    EmptyMessage,

    #[error("invalid private key: {0}")]
    InvalidKey(String),

    #[error("RPC error: {0}")]
    Rpc(#[from] alloy::transports::TransportError),

    #[error("pending transaction error: {0}")]
    PendingTransaction(#[from] alloy::providers::PendingTransactionError),

    #[error("ABI decode error: {0}")]
    Decode(#[from] alloy::sol_types::Error),

    #[error("transaction {0} reverted")]
    Reverted(B256),

    #[error("export error: {0}")]
    Export(String),
}

pub type Result<T> = std::result::Result<T, PortalError>;

impl PortalError {
    /// Errors the user has to act on get a modal alert instead of a status line.
    pub fn is_alert(&self) -> bool {
        matches!(
            self,
            PortalError::NoWallet | PortalError::WrongChain { .. } | PortalError::NoAccount
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrong_chain_message() {
        let err = PortalError::WrongChain {
            expected: "Rinkeby Test Network".to_string(),
            actual: "0x1".to_string(),
        };
        assert!(err.to_string().starts_with("You are not connected to the Rinkeby Test Network!"));
        assert!(err.is_alert());
    }

    #[test]
    fn test_status_line_errors() {
        assert!(!PortalError::EmptyMessage.is_alert());
        assert!(!PortalError::Reverted(B256::ZERO).is_alert());
        assert!(PortalError::NoWallet.is_alert());
    }
}
