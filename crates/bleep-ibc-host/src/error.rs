use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse classification shared by every IBC module error.
///
/// Callers that only need to decide "retry after fixing the input" versus
/// "nothing to do" match on this instead of the concrete error enums.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Channel, connection or consensus record absent
    NotFound,
    /// Channel not in the state the operation requires
    InvalidState,
    /// Capability check failed
    Unauthorized,
    /// Proposed change identical to the current state
    NoOpRejected,
    /// Attempted to change an immutable counterparty
    InvalidCounterparty,
    /// Attempted to downgrade delivery guarantees
    IncompatibleOrdering,
    /// Stored payload belongs to another record family
    InvalidConsensusState,
    /// Underlying key-value store failed
    Storage,
    /// Record bytes could not be encoded or decoded
    Codec,
}

impl ErrorKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::InvalidState => "invalid_state",
            Self::Unauthorized => "unauthorized",
            Self::NoOpRejected => "no_op_rejected",
            Self::InvalidCounterparty => "invalid_counterparty",
            Self::IncompatibleOrdering => "incompatible_ordering",
            Self::InvalidConsensusState => "invalid_consensus_state",
            Self::Storage => "storage",
            Self::Codec => "codec",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Failure of the host key-value store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage backend error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Storage
    }
}

#[cfg(feature = "rocksdb")]
impl From<rocksdb::Error> for StoreError {
    fn from(err: rocksdb::Error) -> Self {
        StoreError::Backend(err.into_string())
    }
}
