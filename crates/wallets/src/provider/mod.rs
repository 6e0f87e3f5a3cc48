//! The capability boundary around an injected EIP-1193 wallet provider.
//!
//! Core logic never reaches for an ambient provider object; it is handed a
//! [`ProviderGateway`] at construction, which is what lets tests substitute a scripted wallet.

use alloy_primitives::{Address, ChainId, TxHash, U64};
use alloy_rpc_types_eth::TransactionRequest;
use async_trait::async_trait;
use mood_config::NetworkRequirement;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::sync::Arc;

use crate::ProviderError;

mod events;
pub use events::{EventHandler, EventHub, ProviderEvent, ProviderEventKind, Subscription};

mod http;
pub use http::HttpGateway;

mod timeout;
pub use timeout::TimeoutGateway;

mod types;
pub use types::{AddEthereumChainParameter, SwitchEthereumChainParameter};

/// Wallet RPC method names.
pub mod methods {
    pub const CHAIN_ID: &str = "eth_chainId";
    pub const ACCOUNTS: &str = "eth_accounts";
    pub const REQUEST_ACCOUNTS: &str = "eth_requestAccounts";
    pub const SEND_TRANSACTION: &str = "eth_sendTransaction";
    pub const SWITCH_CHAIN: &str = "wallet_switchEthereumChain";
    pub const ADD_CHAIN: &str = "wallet_addEthereumChain";
}

/// A pass-through handle on a wallet provider.
///
/// Every call goes to an out-of-process wallet application. Nothing here retries.
#[async_trait]
pub trait ProviderGateway: Send + Sync {
    /// Whether a wallet is present at all.
    fn is_available(&self) -> bool;

    /// Sends a raw EIP-1193 request.
    ///
    /// Fails with [`ProviderError::Unavailable`] if no wallet is present and
    /// [`ProviderError::Rejected`] if the wallet answered with an error, including the user
    /// declining a prompt.
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError>;

    /// Registers `handler` for events of `kind`.
    fn subscribe(&self, kind: ProviderEventKind, handler: EventHandler) -> Subscription;
}

#[async_trait]
impl<G: ProviderGateway + ?Sized> ProviderGateway for Arc<G> {
    fn is_available(&self) -> bool {
        (**self).is_available()
    }

    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
        (**self).request(method, params).await
    }

    fn subscribe(&self, kind: ProviderEventKind, handler: EventHandler) -> Subscription {
        (**self).subscribe(kind, handler)
    }
}

/// Typed wrappers around the wallet methods the dApp uses.
#[async_trait]
pub trait ProviderGatewayExt: ProviderGateway {
    /// `eth_chainId`: the wallet's active chain.
    async fn chain_id(&self) -> Result<ChainId, ProviderError> {
        let value = self.request(methods::CHAIN_ID, json!([])).await?;
        decode::<U64>(methods::CHAIN_ID, value).map(|id| id.to::<u64>())
    }

    /// `wallet_switchEthereumChain` to the required network.
    async fn switch_chain(&self, network: &NetworkRequirement) -> Result<(), ProviderError> {
        let param = SwitchEthereumChainParameter::from(network);
        self.request(methods::SWITCH_CHAIN, json!([param])).await?;
        Ok(())
    }

    /// `wallet_addEthereumChain` for the required network.
    async fn add_chain(&self, network: &NetworkRequirement) -> Result<(), ProviderError> {
        let param = AddEthereumChainParameter::from(network);
        self.request(methods::ADD_CHAIN, json!([param])).await?;
        Ok(())
    }

    /// `eth_requestAccounts`: prompts the user for account access.
    async fn request_accounts(&self) -> Result<Vec<Address>, ProviderError> {
        let value = self.request(methods::REQUEST_ACCOUNTS, json!([])).await?;
        decode(methods::REQUEST_ACCOUNTS, value)
    }

    /// `eth_accounts`: the accounts already authorized, without prompting.
    async fn accounts(&self) -> Result<Vec<Address>, ProviderError> {
        let value = self.request(methods::ACCOUNTS, json!([])).await?;
        decode(methods::ACCOUNTS, value)
    }

    /// `eth_sendTransaction`: the wallet signs and broadcasts in one step.
    async fn send_transaction(&self, tx: &TransactionRequest) -> Result<TxHash, ProviderError> {
        let value = self.request(methods::SEND_TRANSACTION, json!([tx])).await?;
        decode(methods::SEND_TRANSACTION, value)
    }
}

#[async_trait]
impl<G: ProviderGateway + ?Sized> ProviderGatewayExt for G {}

fn decode<T: DeserializeOwned>(method: &str, value: Value) -> Result<T, ProviderError> {
    serde_json::from_value(value).map_err(|err| ProviderError::invalid_response(method, err))
}

/// The gateway used when no wallet is injected.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoProvider;

#[async_trait]
impl ProviderGateway for NoProvider {
    fn is_available(&self) -> bool {
        false
    }

    async fn request(&self, method: &str, _params: Value) -> Result<Value, ProviderError> {
        trace!(method, "no wallet provider");
        Err(ProviderError::Unavailable)
    }

    fn subscribe(&self, _kind: ProviderEventKind, _handler: EventHandler) -> Subscription {
        Subscription::noop()
    }
}
