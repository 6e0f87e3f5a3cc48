use alloy_primitives::TxHash;
use std::fmt;

use crate::DappError;

/// The result of a view-level read or write, rendered as the message shown to the user.
#[derive(Debug)]
pub enum OperationResult {
    /// The stored mood. Empty if none was ever set.
    Read(String),
    /// A `setMood` transaction was submitted.
    Written(TxHash),
    Failed(DappError),
}

impl OperationResult {
    pub fn is_ok(&self) -> bool {
        !matches!(self, Self::Failed(_))
    }

    pub fn error(&self) -> Option<&DappError> {
        match self {
            Self::Failed(err) => Some(err),
            _ => None,
        }
    }
}

impl fmt::Display for OperationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read(mood) if mood.is_empty() => f.write_str("No mood set yet"),
            Self::Read(mood) => f.write_str(mood),
            Self::Written(hash) => write!(f, "Mood set successfully! Transaction hash: {hash}"),
            Self::Failed(err) => write!(f, "Error: {err}"),
        }
    }
}

impl From<Result<String, DappError>> for OperationResult {
    fn from(res: Result<String, DappError>) -> Self {
        res.map_or_else(Self::Failed, Self::Read)
    }
}

impl From<Result<TxHash, DappError>> for OperationResult {
    fn from(res: Result<TxHash, DappError>) -> Self {
        res.map_or_else(Self::Failed, Self::Written)
    }
}
