//! Wallet session state machine.

use alloy_primitives::Address;
use futures::future::{BoxFuture, FutureExt, Shared};
use mood_config::NetworkRequirement;
use parking_lot::Mutex;
use std::{fmt, sync::Arc};

use crate::{
    NegotiationError, NetworkNegotiator, ProviderError, ProviderEvent, ProviderEventKind,
    ProviderGateway, ProviderGatewayExt, Subscription,
};

/// Connection status of a [`Session`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SessionStatus {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
        })
    }
}

/// The client's record of whether a wallet account is authorized and usable.
///
/// An account is present if and only if the status is [`SessionStatus::Connected`]; the
/// constructors are the only way to build a session, so the invariant cannot be broken.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    status: SessionStatus,
    account: Option<Address>,
    chain_verified: bool,
}

impl Session {
    pub const fn disconnected() -> Self {
        Self { status: SessionStatus::Disconnected, account: None, chain_verified: false }
    }

    pub const fn connecting() -> Self {
        Self { status: SessionStatus::Connecting, account: None, chain_verified: false }
    }

    pub const fn connected(account: Address, chain_verified: bool) -> Self {
        Self { status: SessionStatus::Connected, account: Some(account), chain_verified }
    }

    pub const fn status(&self) -> SessionStatus {
        self.status
    }

    pub const fn account(&self) -> Option<Address> {
        self.account
    }

    pub const fn is_connected(&self) -> bool {
        matches!(self.status, SessionStatus::Connected)
    }

    /// Whether the wallet was last seen on the required network.
    ///
    /// This is informational: writes always re-negotiate the network.
    pub const fn chain_verified(&self) -> bool {
        self.chain_verified
    }

    pub const fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot { status: self.status, account: self.account }
    }

    fn switch_account(&mut self, account: Address) {
        if self.is_connected() {
            self.account = Some(account);
        }
    }
}

/// What the view layer gets to see of the session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub status: SessionStatus,
    pub account: Option<Address>,
}

/// Errors surfaced by [`SessionManager`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("no wallet provider found, please install MetaMask")]
    ProviderUnavailable,
    #[error(transparent)]
    ProviderRejected(ProviderError),
    #[error("wallet is not on the required network: {0}")]
    NetworkMismatch(#[source] NegotiationError),
    #[error("wallet did not authorize any account")]
    AccessDenied,
    #[error("connection attempt was superseded by a disconnect")]
    Aborted,
}

impl From<ProviderError> for SessionError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Unavailable => Self::ProviderUnavailable,
            err => Self::ProviderRejected(err),
        }
    }
}

type ConnectFuture = Shared<BoxFuture<'static, Result<SessionSnapshot, SessionError>>>;

/// Owns the [`Session`] and keeps it in sync with the wallet.
///
/// Cloning yields another handle on the same session.
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<Inner>,
}

struct Inner {
    gateway: Arc<dyn ProviderGateway>,
    negotiator: NetworkNegotiator,
    network: NetworkRequirement,
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    session: Session,
    /// Bumped whenever the session is torn down, so an in-flight connect can tell it was
    /// overtaken.
    epoch: u64,
    pending: Option<ConnectFuture>,
    subscriptions: Vec<Subscription>,
}

impl State {
    /// Resets to `Disconnected`, returning the subscriptions to release once the lock is gone.
    #[must_use]
    fn reset(&mut self) -> Vec<Subscription> {
        self.session = Session::disconnected();
        self.epoch += 1;
        self.pending = None;
        std::mem::take(&mut self.subscriptions)
    }
}

impl SessionManager {
    pub fn new(
        gateway: Arc<dyn ProviderGateway>,
        negotiator: NetworkNegotiator,
        network: NetworkRequirement,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                gateway,
                negotiator,
                network,
                state: Mutex::new(State::default()),
            }),
        }
    }

    /// Connects the wallet: negotiates the network, then asks for account access.
    ///
    /// Calling this while a connect is in flight joins that attempt instead of starting a second
    /// negotiation. Calling it while connected returns the current session.
    pub async fn connect(&self) -> Result<SessionSnapshot, SessionError> {
        let attempt = {
            let mut state = self.inner.state.lock();
            if let Some(pending) = &state.pending {
                trace!("joining in-flight connect");
                pending.clone()
            } else if state.session.is_connected() {
                return Ok(state.session.snapshot());
            } else {
                if !self.inner.gateway.is_available() {
                    warn!("cannot connect without a wallet provider");
                    return Err(SessionError::ProviderUnavailable);
                }
                state.session = Session::connecting();
                debug!(status = %SessionStatus::Connecting, "session transition");
                self.inner.subscribe(&mut state);
                let epoch = state.epoch;
                let attempt = self.inner.clone().establish(epoch).boxed().shared();
                state.pending = Some(attempt.clone());
                attempt
            }
        };
        attempt.await
    }

    /// Mirrors an authorization the wallet already holds, without prompting and without touching
    /// the wallet's network.
    ///
    /// Meant to run once at startup. Without a wallet this is a no-op.
    pub async fn restore_if_authorized(&self) -> Result<SessionSnapshot, SessionError> {
        if !self.inner.gateway.is_available() {
            debug!("no wallet provider, nothing to restore");
            return Ok(self.snapshot());
        }
        let epoch = {
            let state = self.inner.state.lock();
            if state.session.status() != SessionStatus::Disconnected {
                return Ok(state.session.snapshot());
            }
            state.epoch
        };

        let accounts = self.inner.gateway.accounts().await.inspect_err(|err| {
            error!(%err, "failed to query authorized accounts");
        })?;

        let mut state = self.inner.state.lock();
        if state.epoch != epoch || state.session.status() != SessionStatus::Disconnected {
            return Ok(state.session.snapshot());
        }
        if let Some(&account) = accounts.first() {
            state.session = Session::connected(account, false);
            self.inner.subscribe(&mut state);
            info!(%account, "restored wallet session");
        }
        Ok(state.session.snapshot())
    }

    /// Tears the session down and releases the event subscriptions.
    pub fn disconnect(&self) -> SessionSnapshot {
        let released = self.inner.state.lock().reset();
        for subscription in released {
            subscription.unsubscribe();
        }
        info!("wallet disconnected");
        self.snapshot()
    }

    /// Records that the wallet was just verified to be on the required network.
    pub fn mark_network_verified(&self) {
        let mut state = self.inner.state.lock();
        if state.session.is_connected() {
            state.session.chain_verified = true;
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.inner.state.lock().session.snapshot()
    }

    pub fn session(&self) -> Session {
        self.inner.state.lock().session.clone()
    }

    /// The network this session negotiates for.
    pub fn network(&self) -> &NetworkRequirement {
        &self.inner.network
    }

    pub fn negotiator(&self) -> &NetworkNegotiator {
        &self.inner.negotiator
    }

    pub fn gateway(&self) -> &Arc<dyn ProviderGateway> {
        &self.inner.gateway
    }
}

impl fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionManager")
            .field("session", &self.session())
            .field("network", &self.inner.network.chain_name)
            .finish_non_exhaustive()
    }
}

impl Inner {
    async fn establish(self: Arc<Self>, epoch: u64) -> Result<SessionSnapshot, SessionError> {
        let outcome = self.negotiate_and_authorize(epoch).await;

        let (result, released) = {
            let mut state = self.state.lock();
            if state.epoch != epoch {
                debug!("connect attempt overtaken by a disconnect");
                return Err(SessionError::Aborted);
            }
            match outcome {
                Ok(account) => {
                    state.pending = None;
                    // a `chainChanged` during the account prompt has already cleared the flag
                    let verified = state.session.chain_verified();
                    state.session = Session::connected(account, verified);
                    info!(%account, "wallet connected");
                    (Ok(state.session.snapshot()), Vec::new())
                }
                Err(err) => {
                    warn!(%err, "failed to connect wallet");
                    (Err(err), state.reset())
                }
            }
        };
        drop(released);
        result
    }

    async fn negotiate_and_authorize(&self, epoch: u64) -> Result<Address, SessionError> {
        self.negotiator.negotiate(&self.network).await.map_err(SessionError::NetworkMismatch)?;
        {
            let mut state = self.state.lock();
            if state.epoch == epoch {
                state.session.chain_verified = true;
            }
        }

        let accounts = self.gateway.request_accounts().await.map_err(|err| match err {
            ProviderError::Rejected { .. } => {
                debug!(%err, "account access refused");
                SessionError::AccessDenied
            }
            err => SessionError::from(err),
        })?;
        accounts.first().copied().ok_or(SessionError::AccessDenied)
    }

    fn subscribe(self: &Arc<Self>, state: &mut State) {
        if !state.subscriptions.is_empty() {
            return;
        }
        for kind in [ProviderEventKind::AccountsChanged, ProviderEventKind::ChainChanged] {
            let inner = Arc::downgrade(self);
            let subscription = self.gateway.subscribe(
                kind,
                Arc::new(move |event| {
                    if let Some(inner) = inner.upgrade() {
                        inner.on_event(event);
                    }
                }),
            );
            state.subscriptions.push(subscription);
        }
    }

    fn on_event(&self, event: &ProviderEvent) {
        let mut state = self.state.lock();
        let released = match event {
            ProviderEvent::AccountsChanged(accounts) => match accounts.first() {
                None if state.session.status() != SessionStatus::Disconnected => {
                    info!("wallet revoked account access");
                    state.reset()
                }
                None => Vec::new(),
                Some(&account) => {
                    if state.session.is_connected() && state.session.account() != Some(account) {
                        debug!(%account, "active account changed");
                        state.session.switch_account(account);
                    }
                    Vec::new()
                }
            },
            ProviderEvent::ChainChanged(chain_id) => {
                debug!(chain_id, "wallet changed network, next write re-negotiates");
                state.session.chain_verified = false;
                Vec::new()
            }
        };
        drop(state);
        drop(released);
    }
}
