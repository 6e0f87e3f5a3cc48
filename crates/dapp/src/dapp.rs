use alloy_primitives::TxHash;
use mood_config::Config;
use mood_contract::{ContractClient, ContractInvoker, RpcContractClient};
use mood_wallets::{
    NetworkNegotiator, ProviderGateway, SessionManager, SessionSnapshot, TimeoutGateway,
};
use std::sync::Arc;

use crate::{DappError, OperationResult};

/// The dApp core, wired together from a [`Config`] and a wallet gateway.
///
/// Cloning yields another handle on the same session.
#[derive(Clone, Debug)]
pub struct MoodDapp {
    config: Arc<Config>,
    sessions: SessionManager,
    invoker: ContractInvoker,
}

impl MoodDapp {
    /// Loads the [`Config`] from its usual sources and wires the dApp to `gateway`.
    pub fn load(gateway: Arc<dyn ProviderGateway>) -> Result<Self, DappError> {
        Self::new(Config::load()?, gateway)
    }

    /// Reads go to [`Config::read_rpc_url`], writes through `gateway`.
    pub fn new(config: Config, gateway: Arc<dyn ProviderGateway>) -> Result<Self, DappError> {
        let gateway = bounded(&config, gateway);
        let client =
            RpcContractClient::from_config(&config, gateway.clone()).map_err(DappError::Setup)?;
        Ok(Self::assemble(config, gateway, Arc::new(client)))
    }

    /// Like [`new`](Self::new), with a caller-provided contract client.
    pub fn with_client(
        config: Config,
        gateway: Arc<dyn ProviderGateway>,
        client: Arc<dyn ContractClient>,
    ) -> Self {
        let gateway = bounded(&config, gateway);
        Self::assemble(config, gateway, client)
    }

    fn assemble(
        config: Config,
        gateway: Arc<dyn ProviderGateway>,
        client: Arc<dyn ContractClient>,
    ) -> Self {
        let negotiator = NetworkNegotiator::new(gateway.clone());
        let sessions = SessionManager::new(gateway, negotiator, config.network.clone());
        let invoker = ContractInvoker::new(client, config.contract.clone(), sessions.clone());
        debug!(
            chain = %config.network.chain_name,
            contract = %config.contract.address,
            "mood dapp ready"
        );
        Self { config: Arc::new(config), sessions, invoker }
    }

    /// Picks up a wallet authorization left over from an earlier visit. Run once on startup.
    pub async fn start(&self) -> Result<SessionSnapshot, DappError> {
        Ok(self.sessions.restore_if_authorized().await?)
    }

    /// Brings the wallet onto the required network and asks for account access.
    pub async fn connect(&self) -> Result<SessionSnapshot, DappError> {
        self.sessions.connect().await.map_err(|err| {
            warn!(%err, "connect failed");
            err.into()
        })
    }

    pub fn disconnect(&self) -> SessionSnapshot {
        self.sessions.disconnect()
    }

    pub fn session_snapshot(&self) -> SessionSnapshot {
        self.sessions.snapshot()
    }

    /// The stored mood. Needs no wallet.
    pub async fn read_value(&self) -> Result<String, DappError> {
        Ok(self.invoker.read_value().await?)
    }

    /// Sets the mood from the connected account.
    pub async fn write_value(&self, value: &str) -> Result<TxHash, DappError> {
        Ok(self.invoker.write_value(value).await?)
    }

    pub async fn get_mood(&self) -> OperationResult {
        self.read_value().await.into()
    }

    pub async fn set_mood(&self, value: &str) -> OperationResult {
        self.write_value(value).await.into()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }
}

fn bounded(config: &Config, gateway: Arc<dyn ProviderGateway>) -> Arc<dyn ProviderGateway> {
    match config.request_timeout() {
        Some(timeout) => {
            trace!(?timeout, "bounding wallet requests");
            Arc::new(TimeoutGateway::new(gateway, timeout))
        }
        None => gateway,
    }
}
