use alloy_json_rpc::RpcError;
use alloy_rpc_client::RpcClient;
use async_trait::async_trait;
use serde_json::Value;
use url::Url;

use super::{EventHandler, EventHub, ProviderEvent, ProviderEventKind, ProviderGateway, Subscription};
use crate::{ProviderError, error::codes};

/// A wallet reachable over JSON-RPC, e.g. a browser bridge or a dev node with unlocked accounts.
///
/// Requests are forwarded verbatim. JSON-RPC has no push channel, so whoever relays the wallet's
/// `accountsChanged`/`chainChanged` notifications feeds them in through [`emit`](Self::emit).
#[derive(Clone, Debug)]
pub struct HttpGateway {
    client: RpcClient,
    events: EventHub,
}

impl HttpGateway {
    pub fn new(url: Url) -> Self {
        Self { client: RpcClient::new_http(url), events: EventHub::new() }
    }

    /// Delivers a wallet notification to the registered handlers.
    pub fn emit(&self, event: &ProviderEvent) {
        self.events.emit(event);
    }

    /// Parses and delivers a raw `(name, payload)` notification.
    pub fn emit_raw(&self, name: &str, payload: Value) -> Result<(), ProviderError> {
        let event = ProviderEvent::from_wire(name, payload)?;
        self.emit(&event);
        Ok(())
    }
}

#[async_trait]
impl ProviderGateway for HttpGateway {
    fn is_available(&self) -> bool {
        true
    }

    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
        trace!(method, "wallet request");
        self.client.request::<_, Value>(method.to_string(), params).await.map_err(|err| match err {
            RpcError::ErrorResp(payload) => {
                ProviderError::rejected(method, payload.code, payload.message.to_string())
            }
            RpcError::DeserError { .. } | RpcError::SerError(_) => {
                ProviderError::invalid_response(method, err)
            }
            other => ProviderError::rejected(method, codes::DISCONNECTED, other.to_string()),
        })
    }

    fn subscribe(&self, kind: ProviderEventKind, handler: EventHandler) -> Subscription {
        self.events.subscribe(kind, handler)
    }
}
