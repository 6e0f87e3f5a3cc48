use std::time::Duration;

/// EIP-1193 provider error codes.
pub mod codes {
    /// The user rejected the request.
    pub const USER_REJECTED_REQUEST: i64 = 4001;
    /// The requested method and/or account has not been authorized by the user.
    pub const UNAUTHORIZED: i64 = 4100;
    /// The provider does not support the requested method.
    pub const UNSUPPORTED_METHOD: i64 = 4200;
    /// The provider is disconnected from all chains.
    pub const DISCONNECTED: i64 = 4900;
    /// The provider is not connected to the requested chain.
    pub const CHAIN_DISCONNECTED: i64 = 4901;
    /// The wallet does not know the requested chain; it has to be added first (EIP-3326).
    pub const UNRECOGNIZED_CHAIN: i64 = 4902;
}

/// Errors returned by a [`ProviderGateway`](crate::ProviderGateway).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    #[error("no wallet provider is available")]
    Unavailable,
    #[error("wallet rejected `{method}` (code {code}): {message}")]
    Rejected { method: String, code: i64, message: String },
    #[error("wallet did not answer `{method}` within {timeout:?}")]
    Timeout { method: String, timeout: Duration },
    #[error("invalid response to `{method}`: {reason}")]
    InvalidResponse { method: String, reason: String },
}

impl ProviderError {
    pub fn rejected(method: impl Into<String>, code: i64, message: impl Into<String>) -> Self {
        Self::Rejected { method: method.into(), code, message: message.into() }
    }

    pub fn invalid_response(method: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidResponse { method: method.into(), reason: reason.to_string() }
    }

    /// The provider error code, if the wallet returned one.
    pub fn code(&self) -> Option<i64> {
        match self {
            Self::Rejected { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Whether the wallet refused to switch because it does not know the chain.
    pub fn is_unrecognized_chain(&self) -> bool {
        self.code() == Some(codes::UNRECOGNIZED_CHAIN)
    }

    /// Whether the user declined the request in the wallet.
    pub fn is_user_rejection(&self) -> bool {
        self.code() == Some(codes::USER_REJECTED_REQUEST)
    }
}
