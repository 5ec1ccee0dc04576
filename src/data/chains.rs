use crate::data::types::ChainConfig;

/// Get a chain configuration preset by name.
pub fn get_chain_config(name: &str) -> Option<ChainConfig> {
    match name.to_lowercase().as_str() {
        "rinkeby" => Some(ChainConfig {
            name: "Rinkeby Test Network".to_string(),
            chain_id: 4,
            rpc_url: "http://localhost:8545".to_string(),
        }),
        "goerli" => Some(ChainConfig {
            name: "Goerli Test Network".to_string(),
            chain_id: 5,
            rpc_url: "https://rpc.ankr.com/eth_goerli".to_string(),
        }),
        "sepolia" => Some(ChainConfig {
            name: "Sepolia Test Network".to_string(),
            chain_id: 11155111,
            rpc_url: "https://rpc.sepolia.org".to_string(),
        }),
        "ethereum" | "eth" | "mainnet" => Some(ChainConfig {
            name: "Ethereum Mainnet".to_string(),
            chain_id: 1,
            rpc_url: "https://eth.merkle.io".to_string(),
        }),
        "anvil" | "localhost" | "local" => Some(ChainConfig {
            name: "Local Network".to_string(),
            chain_id: 31337,
            rpc_url: "http://localhost:8545".to_string(),
        }),
        _ => None,
    }
}

/// Return a list of all supported chain names.
pub fn supported_chains() -> Vec<&'static str> {
    vec!["rinkeby", "goerli", "sepolia", "ethereum", "anvil"]
}

/// Display name for a chain id, used when the wallet reports a chain we have no preset for.
pub fn chain_name(chain_id: u64) -> String {
    supported_chains()
        .into_iter()
        .filter_map(get_chain_config)
        .find(|c| c.chain_id == chain_id)
        .map(|c| c.name)
        .unwrap_or_else(|| format!("chain {}", format_chain_id(chain_id)))
}

/// Format a chain id the way `eth_chainId` returns it.
pub fn format_chain_id(chain_id: u64) -> String {
    format!("{chain_id:#x}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rinkeby_config() {
        let config = get_chain_config("rinkeby").unwrap();
        assert_eq!(config.chain_id, 4);
        assert_eq!(config.name, "Rinkeby Test Network");
    }

    #[test]
    fn test_case_insensitive() {
        assert!(get_chain_config("Sepolia").is_some());
        assert!(get_chain_config("RINKEBY").is_some());
    }

    #[test]
    fn test_aliases() {
        assert_eq!(get_chain_config("mainnet").unwrap().chain_id, 1);
        assert_eq!(get_chain_config("localhost").unwrap().chain_id, 31337);
    }

    #[test]
    fn test_unknown_chain() {
        assert!(get_chain_config("unknown").is_none());
    }

    #[test]
    fn test_supported_chains_resolve() {
        for name in supported_chains() {
            assert!(get_chain_config(name).is_some(), "{name} has no preset");
        }
    }

    #[test]
    fn test_format_chain_id() {
        assert_eq!(format_chain_id(4), "0x4");
        assert_eq!(format_chain_id(11155111), "0xaa36a7");
    }

    #[test]
    fn test_chain_name() {
        assert_eq!(chain_name(5), "Goerli Test Network");
        assert_eq!(chain_name(42), "chain 0x2a");
    }
}
