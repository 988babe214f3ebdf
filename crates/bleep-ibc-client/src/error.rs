use crate::codec::CodecError;
use crate::height::Height;
use bleep_ibc_host::{ClientId, ErrorKind, StoreError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Client state not found for client {client_id}")]
    ClientStateNotFound { client_id: ClientId },

    #[error("Invalid client state for client {client_id}: {reason}")]
    InvalidClientState { client_id: ClientId, reason: CodecError },

    #[error("Consensus state not found for client {client_id} at height {height}")]
    ConsensusStateNotFound { client_id: ClientId, height: Height },

    #[error("Invalid consensus state for client {client_id} at height {height}: {reason}")]
    InvalidConsensusState {
        client_id: ClientId,
        height: Height,
        reason: CodecError,
    },

    #[error("Conflicting consensus state for client {client_id} at height {height}")]
    ConflictingConsensusState { client_id: ClientId, height: Height },

    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ClientStateNotFound { .. } | Self::ConsensusStateNotFound { .. } => ErrorKind::NotFound,
            Self::InvalidConsensusState { .. } => ErrorKind::InvalidConsensusState,
            Self::ConflictingConsensusState { .. } => ErrorKind::InvalidState,
            Self::InvalidClientState { .. } | Self::Codec(_) => ErrorKind::Codec,
            Self::Store(_) => ErrorKind::Storage,
        }
    }
}
