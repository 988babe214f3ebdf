use crate::channel::{Order, State};
use bleep_ibc_host::{ChannelId, ErrorKind, PortId, StoreError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("Channel not found: port ID ({port_id}) channel ID ({channel_id})")]
    ChannelNotFound { port_id: PortId, channel_id: ChannelId },

    #[error("Invalid channel state: expected {expected}, got {actual}")]
    InvalidChannelState { expected: State, actual: State },

    #[error("Caller does not own capability for channel, port ID ({port_id}) channel ID ({channel_id})")]
    ChannelCapabilityNotFound { port_id: PortId, channel_id: ChannelId },

    #[error("Existing channel end is identical to proposed upgrade channel end")]
    ChannelExists,

    #[error("Connection not found: {connection_id}")]
    ConnectionNotFound { connection_id: String },

    #[error("Counterparty port ID and channel ID cannot be upgraded")]
    InvalidCounterparty,

    #[error("Channel ordering {current} must be a subset of the new ordering {proposed}")]
    InvalidChannelOrdering { current: Order, proposed: Order },

    #[error("Upgrade record incomplete for port ID ({port_id}) channel ID ({channel_id}): missing {missing}")]
    UpgradeIncomplete {
        port_id: PortId,
        channel_id: ChannelId,
        missing: &'static str,
    },

    #[error("Upgrade sequence exhausted for port ID ({port_id}) channel ID ({channel_id})")]
    UpgradeSequenceOverflow { port_id: PortId, channel_id: ChannelId },

    #[error("Failed to encode or decode {record}: {reason}")]
    Codec { record: &'static str, reason: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ChannelError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ChannelNotFound { .. } | Self::ConnectionNotFound { .. } => ErrorKind::NotFound,
            Self::InvalidChannelState { .. }
            | Self::UpgradeIncomplete { .. }
            | Self::UpgradeSequenceOverflow { .. } => ErrorKind::InvalidState,
            Self::ChannelCapabilityNotFound { .. } => ErrorKind::Unauthorized,
            Self::ChannelExists => ErrorKind::NoOpRejected,
            Self::InvalidCounterparty => ErrorKind::InvalidCounterparty,
            Self::InvalidChannelOrdering { .. } => ErrorKind::IncompatibleOrdering,
            Self::Codec { .. } => ErrorKind::Codec,
            Self::Store(_) => ErrorKind::Storage,
        }
    }
}
