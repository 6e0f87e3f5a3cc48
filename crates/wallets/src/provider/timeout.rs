use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

use super::{EventHandler, ProviderEventKind, ProviderGateway, Subscription};
use crate::ProviderError;

/// Bounds every request of the wrapped gateway by a fixed timeout.
///
/// Event subscriptions are passed through untouched.
#[derive(Clone, Debug)]
pub struct TimeoutGateway<G> {
    inner: G,
    timeout: Duration,
}

impl<G> TimeoutGateway<G> {
    pub fn new(inner: G, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn into_inner(self) -> G {
        self.inner
    }
}

#[async_trait]
impl<G: ProviderGateway> ProviderGateway for TimeoutGateway<G> {
    fn is_available(&self) -> bool {
        self.inner.is_available()
    }

    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
        match tokio::time::timeout(self.timeout, self.inner.request(method, params)).await {
            Ok(res) => res,
            Err(_) => {
                warn!(method, timeout = ?self.timeout, "wallet request timed out");
                Err(ProviderError::Timeout { method: method.to_string(), timeout: self.timeout })
            }
        }
    }

    fn subscribe(&self, kind: ProviderEventKind, handler: EventHandler) -> Subscription {
        self.inner.subscribe(kind, handler)
    }
}
