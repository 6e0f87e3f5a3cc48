//! Getting the wallet onto the required network.

use mood_config::NetworkRequirement;
use std::sync::Arc;

use crate::{ProviderError, ProviderGateway, ProviderGatewayExt};

/// How the wallet ended up on the required network.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Negotiation {
    /// The wallet was already on the required chain; nothing was prompted.
    AlreadyActive,
    /// The wallet switched to the required chain.
    Switched,
    /// The wallet did not know the chain; it was registered and then switched to.
    Registered,
}

/// Why the wallet could not be brought onto the required network.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum NegotiationError {
    #[error("failed to switch the wallet to the required network: {0}")]
    Switch(#[source] ProviderError),
    #[error("failed to register the required network with the wallet: {0}")]
    Register(#[source] ProviderError),
    #[error("failed to switch to the required network after registering it: {0}")]
    Retry(#[source] ProviderError),
}

impl NegotiationError {
    /// The wallet error that ended the negotiation.
    pub fn provider_error(&self) -> &ProviderError {
        match self {
            Self::Switch(err) | Self::Register(err) | Self::Retry(err) => err,
        }
    }
}

/// Ensures the wallet's active chain is the required one.
///
/// Only a switch failing with the "unrecognized chain" code is recovered from, by registering the
/// chain and retrying the switch exactly once. Every other failure ends the attempt.
#[derive(Clone)]
pub struct NetworkNegotiator {
    gateway: Arc<dyn ProviderGateway>,
}

impl NetworkNegotiator {
    pub fn new(gateway: Arc<dyn ProviderGateway>) -> Self {
        Self { gateway }
    }

    pub async fn negotiate(
        &self,
        network: &NetworkRequirement,
    ) -> Result<Negotiation, NegotiationError> {
        let required = network.chain_id;
        match self.gateway.chain_id().await {
            Ok(active) if active == required => {
                trace!(chain_id = required, "wallet already on the required network");
                return Ok(Negotiation::AlreadyActive);
            }
            Ok(active) => debug!(active, required, "wallet on another network"),
            Err(err) => debug!(%err, "could not query the active network"),
        }

        match self.gateway.switch_chain(network).await {
            Ok(()) => {
                debug!(chain_id = required, "switched network");
                Ok(Negotiation::Switched)
            }
            Err(err) if err.is_unrecognized_chain() => {
                info!(chain = %network.chain_name, "wallet does not know the network, adding it");
                self.gateway.add_chain(network).await.map_err(NegotiationError::Register)?;
                self.gateway.switch_chain(network).await.map_err(NegotiationError::Retry)?;
                debug!(chain_id = required, "registered and switched network");
                Ok(Negotiation::Registered)
            }
            Err(err) => Err(NegotiationError::Switch(err)),
        }
    }

    /// Returns whether the wallet is now on the required network.
    ///
    /// Callers must not proceed with network-dependent operations on `false`.
    pub async fn ensure_network(&self, network: &NetworkRequirement) -> bool {
        match self.negotiate(network).await {
            Ok(_) => true,
            Err(err) => {
                warn!(chain = %network.chain_name, %err, "network negotiation failed");
                false
            }
        }
    }
}

impl std::fmt::Debug for NetworkNegotiator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetworkNegotiator").finish_non_exhaustive()
    }
}
