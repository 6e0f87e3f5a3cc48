use alloy_primitives::{Address, TxHash};
use alloy_provider::{DynProvider, Provider, ProviderBuilder};
use alloy_rpc_types_eth::{TransactionInput, TransactionRequest};
use alloy_sol_types::SolCall;
use async_trait::async_trait;
use mood_config::Config;
use mood_wallets::{ProviderError, ProviderGateway, ProviderGatewayExt};
use std::sync::Arc;
use url::Url;

use crate::IMood;

/// Errors of the underlying contract calls.
#[derive(Debug, thiserror::Error)]
pub enum ContractError {
    #[error(transparent)]
    Call(#[from] alloy_contract::Error),
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error("no RPC endpoint configured for contract reads")]
    MissingRpcUrl,
    #[error("invalid RPC endpoint `{url}`: {source}")]
    InvalidRpcUrl { url: String, source: url::ParseError },
    #[error("{0}")]
    Backend(String),
}

/// The ABI-level capability behind the two Mood operations.
#[async_trait]
pub trait ContractClient: Send + Sync {
    /// `getMood()`, through an unauthenticated client. No account is involved.
    async fn read_mood(&self, target: Address) -> Result<String, ContractError>;

    /// `setMood(mood)`, signed and sent by the wallet on behalf of `from`.
    async fn write_mood(
        &self,
        target: Address,
        from: Address,
        mood: &str,
    ) -> Result<TxHash, ContractError>;
}

/// Submits `setMood(mood)` from `from` through the wallet.
///
/// Browser wallets sign and broadcast in one step, so this goes out as `eth_sendTransaction` and
/// yields the transaction hash.
pub async fn send_set_mood(
    gateway: &dyn ProviderGateway,
    target: Address,
    from: Address,
    mood: &str,
) -> Result<TxHash, ProviderError> {
    let input = IMood::setMoodCall { _mood: mood.to_string() }.abi_encode();
    let tx = TransactionRequest::default()
        .from(from)
        .to(target)
        .input(TransactionInput::both(input.into()));
    gateway.send_transaction(&tx).await
}

/// Reads over plain JSON-RPC, writes through the wallet.
#[derive(Clone)]
pub struct RpcContractClient {
    provider: DynProvider,
    gateway: Arc<dyn ProviderGateway>,
}

impl RpcContractClient {
    pub fn new(rpc_url: Url, gateway: Arc<dyn ProviderGateway>) -> Self {
        let provider = ProviderBuilder::new().connect_http(rpc_url).erased();
        Self { provider, gateway }
    }

    /// Builds a client reading from [`Config::read_rpc_url`].
    pub fn from_config(
        config: &Config,
        gateway: Arc<dyn ProviderGateway>,
    ) -> Result<Self, ContractError> {
        let url = config.read_rpc_url().ok_or(ContractError::MissingRpcUrl)?;
        let rpc_url = Url::parse(url)
            .map_err(|source| ContractError::InvalidRpcUrl { url: url.to_string(), source })?;
        Ok(Self::new(rpc_url, gateway))
    }
}

#[async_trait]
impl ContractClient for RpcContractClient {
    async fn read_mood(&self, target: Address) -> Result<String, ContractError> {
        let mood = IMood::new(target, &self.provider).getMood().call().await?;
        Ok(mood)
    }

    async fn write_mood(
        &self,
        target: Address,
        from: Address,
        mood: &str,
    ) -> Result<TxHash, ContractError> {
        Ok(send_set_mood(self.gateway.as_ref(), target, from, mood).await?)
    }
}

impl std::fmt::Debug for RpcContractClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcContractClient").finish_non_exhaustive()
    }
}
