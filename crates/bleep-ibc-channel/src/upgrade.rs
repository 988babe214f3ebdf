use crate::channel::Channel;
use bleep_ibc_client::Height;
use serde::{Deserialize, Serialize};

/// Counterparty-side deadline for confirming an upgrade attempt.
///
/// The attempt may be aborted once the counterparty reaches either bound.
/// Bounds are recorded exactly as the initiating application supplied them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeTimeout {
    /// Counterparty block height ceiling
    pub timeout_height: Height,
    /// Counterparty block time ceiling, UNIX nanoseconds
    pub timeout_timestamp: u64,
}

impl UpgradeTimeout {
    pub fn new(timeout_height: Height, timeout_timestamp: u64) -> Self {
        UpgradeTimeout {
            timeout_height,
            timeout_timestamp,
        }
    }
}

/// In-flight upgrade bookkeeping for one channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpgradeAttempt {
    /// Channel exactly as it was before the attempt began
    pub restore_channel: Channel,
    /// Attempt number, 1 for the channel's first upgrade
    pub sequence: u64,
    pub timeout: UpgradeTimeout,
}

/// Outcome of a successful Init step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpgradeInit {
    pub upgrade_sequence: u64,
    /// Version of the channel before the upgrade
    pub previous_version: String,
}
