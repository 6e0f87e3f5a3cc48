//! Parameter objects of the wallet RPC methods.

use mood_config::{NativeCurrency, NetworkRequirement};
use serde::{Deserialize, Serialize};

/// Parameter of `wallet_switchEthereumChain` (EIP-3326).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchEthereumChainParameter {
    pub chain_id: String,
}

/// Parameter of `wallet_addEthereumChain` (EIP-3085).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddEthereumChainParameter {
    pub chain_id: String,
    pub chain_name: String,
    pub native_currency: NativeCurrency,
    pub rpc_urls: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub block_explorer_urls: Vec<String>,
}

impl From<&NetworkRequirement> for SwitchEthereumChainParameter {
    fn from(network: &NetworkRequirement) -> Self {
        Self { chain_id: network.chain_id_hex() }
    }
}

impl From<&NetworkRequirement> for AddEthereumChainParameter {
    fn from(network: &NetworkRequirement) -> Self {
        Self {
            chain_id: network.chain_id_hex(),
            chain_name: network.chain_name.clone(),
            native_currency: network.native_currency.clone(),
            rpc_urls: network.rpc_urls.clone(),
            block_explorer_urls: network.block_explorer_urls.clone(),
        }
    }
}
