//! The single network the dApp operates on.

use alloy_chains::NamedChain;
use alloy_primitives::ChainId;
use serde::{Deserialize, Serialize};

/// Describes the chain a wallet must be on before any network-dependent call is made.
///
/// This is everything a wallet needs to either switch to the chain or, if it does not know the
/// chain yet, register it first.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkRequirement {
    /// Numeric chain id, rendered as `0x`-prefixed hex on the wallet wire.
    pub chain_id: ChainId,
    /// Human-readable chain name shown by the wallet when registering the chain.
    pub chain_name: String,
    /// The chain's native currency.
    pub native_currency: NativeCurrency,
    /// RPC endpoints the wallet should use for this chain.
    pub rpc_urls: Vec<String>,
    /// Block explorers the wallet should link to.
    #[serde(default)]
    pub block_explorer_urls: Vec<String>,
}

impl NetworkRequirement {
    /// The Sepolia test network.
    pub fn sepolia() -> Self {
        Self {
            chain_id: NamedChain::Sepolia as u64,
            chain_name: "Sepolia Test Network".to_string(),
            native_currency: NativeCurrency {
                name: "Sepolia ETH".to_string(),
                symbol: "ETH".to_string(),
                decimals: 18,
            },
            rpc_urls: vec!["https://rpc.sepolia.org".to_string()],
            block_explorer_urls: vec!["https://sepolia.etherscan.io".to_string()],
        }
    }

    /// Returns the chain id as the `0x`-prefixed lower-case hex string wallets expect.
    ///
    /// ```
    /// use mood_config::NetworkRequirement;
    ///
    /// assert_eq!(NetworkRequirement::sepolia().chain_id_hex(), "0xaa36a7");
    /// ```
    pub fn chain_id_hex(&self) -> String {
        format!("{:#x}", self.chain_id)
    }

    /// Returns the [`NamedChain`] for this requirement, if it is a well-known chain.
    pub fn named(&self) -> Option<NamedChain> {
        NamedChain::try_from(self.chain_id).ok()
    }

    /// The first configured RPC endpoint, if any.
    pub fn default_rpc_url(&self) -> Option<&str> {
        self.rpc_urls.first().map(String::as_str)
    }
}

impl Default for NetworkRequirement {
    fn default() -> Self {
        Self::sepolia()
    }
}

/// Native currency of a chain, as described by EIP-3085.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}
