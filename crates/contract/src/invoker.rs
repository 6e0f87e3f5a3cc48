use alloy_primitives::TxHash;
use mood_config::ContractTarget;
use mood_wallets::{NegotiationError, SessionManager, SessionStatus};
use std::sync::Arc;

use crate::{ContractClient, ContractError};

/// Why a write was refused before anything was sent.
#[derive(Debug, thiserror::Error)]
pub enum NotReady {
    #[error("wallet is not connected")]
    Disconnected,
    #[error(transparent)]
    Network(NegotiationError),
}

#[derive(Debug, thiserror::Error)]
pub enum InvokeError {
    #[error("not ready to write: {0}")]
    NotReady(#[from] NotReady),
    #[error("failed to read the mood: {0}")]
    ReadFailed(#[source] ContractError),
    #[error("failed to set the mood: {0}")]
    WriteFailed(#[source] ContractError),
}

/// Performs `getMood`/`setMood` against the configured contract.
///
/// Reads need nothing but the network. Writes need a connected session and a freshly negotiated
/// network: the wallet can change chains at any point between connecting and writing, so the
/// negotiation is never cached.
#[derive(Clone)]
pub struct ContractInvoker {
    client: Arc<dyn ContractClient>,
    target: ContractTarget,
    sessions: SessionManager,
}

impl ContractInvoker {
    pub fn new(
        client: Arc<dyn ContractClient>,
        target: ContractTarget,
        sessions: SessionManager,
    ) -> Self {
        Self { client, target, sessions }
    }

    pub fn target(&self) -> &ContractTarget {
        &self.target
    }

    /// Returns the currently stored mood.
    pub async fn read_value(&self) -> Result<String, InvokeError> {
        debug!(contract = %self.target.address, "getMood");
        self.client.read_mood(self.target.address).await.map_err(|err| {
            error!(%err, "getMood failed");
            InvokeError::ReadFailed(err)
        })
    }

    /// Stores `value` as the new mood, returning the transaction hash.
    pub async fn write_value(&self, value: &str) -> Result<TxHash, InvokeError> {
        if self.sessions.snapshot().status != SessionStatus::Connected {
            return Err(NotReady::Disconnected.into());
        }

        let network = self.sessions.network();
        if let Err(err) = self.sessions.negotiator().negotiate(network).await {
            warn!(chain = %network.chain_name, %err, "refusing to write off the required network");
            return Err(NotReady::Network(err).into());
        }
        self.sessions.mark_network_verified();

        // the session may have been torn down while the wallet was prompting
        let Some(from) = self.sessions.snapshot().account else {
            return Err(NotReady::Disconnected.into());
        };

        debug!(contract = %self.target.address, %from, value, "setMood");
        let hash = self.client.write_mood(self.target.address, from, value).await.map_err(|err| {
            error!(%err, "setMood failed");
            InvokeError::WriteFailed(err)
        })?;
        info!(%hash, "mood transaction submitted");
        Ok(hash)
    }
}

impl std::fmt::Debug for ContractInvoker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContractInvoker").field("target", &self.target).finish_non_exhaustive()
    }
}
