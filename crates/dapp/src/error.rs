use mood_config::ExtractConfigError;
use mood_contract::{ContractError, InvokeError, NotReady};
use mood_wallets::{NegotiationError, ProviderError, SessionError};

/// Everything a [`MoodDapp`](crate::MoodDapp) operation can fail with.
///
/// None of these are fatal: after any of them the session is left either disconnected or as it
/// was, and no write has been performed.
#[derive(Debug, thiserror::Error)]
pub enum DappError {
    #[error("Please install MetaMask!")]
    ProviderUnavailable,
    #[error(transparent)]
    ProviderRejected(ProviderError),
    #[error("could not switch the wallet to the required network: {0}")]
    NetworkMismatch(#[source] NegotiationError),
    #[error("no account was authorized")]
    AccessDenied,
    #[error("connection was cancelled")]
    Aborted,
    #[error("not ready to write: {0}")]
    NotReady(#[source] NotReady),
    #[error("failed to read the mood: {0}")]
    ReadFailed(#[source] ContractError),
    #[error("failed to set the mood: {0}")]
    WriteFailed(#[source] ContractError),
    #[error(transparent)]
    Config(#[from] ExtractConfigError),
    #[error("failed to set up the contract client: {0}")]
    Setup(#[source] ContractError),
}

impl DappError {
    /// Whether the user declined a wallet prompt.
    pub fn is_user_rejection(&self) -> bool {
        match self {
            Self::ProviderRejected(err) => err.is_user_rejection(),
            Self::NetworkMismatch(err) | Self::NotReady(NotReady::Network(err)) => {
                err.provider_error().is_user_rejection()
            }
            _ => false,
        }
    }
}

impl From<SessionError> for DappError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::ProviderUnavailable => Self::ProviderUnavailable,
            SessionError::ProviderRejected(err) => Self::ProviderRejected(err),
            SessionError::NetworkMismatch(err) => Self::NetworkMismatch(err),
            SessionError::AccessDenied => Self::AccessDenied,
            SessionError::Aborted => Self::Aborted,
        }
    }
}

impl From<InvokeError> for DappError {
    fn from(err: InvokeError) -> Self {
        match err {
            InvokeError::NotReady(err) => Self::NotReady(err),
            InvokeError::ReadFailed(err) => Self::ReadFailed(err),
            InvokeError::WriteFailed(err) => Self::WriteFailed(err),
        }
    }
}
