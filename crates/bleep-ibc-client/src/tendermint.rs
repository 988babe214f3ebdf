//! Tendermint light client records.

use crate::codec::TypedRecord;
use crate::height::Height;
use crate::state::{ClientState, ConsensusState};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const TENDERMINT_CLIENT_TYPE: &str = "07-tendermint";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TendermintConsensusState {
    /// Block time of the header, UNIX nanoseconds
    pub timestamp_nanos: u64,
    /// App hash committed in the header
    pub root: Vec<u8>,
    /// Hash of the validator set that signs the next block
    pub next_validators_hash: Vec<u8>,
}

impl TendermintConsensusState {
    pub fn new(timestamp_nanos: u64, root: Vec<u8>, next_validators_hash: Vec<u8>) -> Self {
        TendermintConsensusState {
            timestamp_nanos,
            root,
            next_validators_hash,
        }
    }
}

impl fmt::Display for TendermintConsensusState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TendermintConsensusState(root={}, timestamp={})",
            hex::encode(&self.root),
            self.timestamp_nanos
        )
    }
}

impl TypedRecord for TendermintConsensusState {
    const TYPE_URL: &'static str = "/ibc.lightclients.tendermint.v1.ConsensusState";
}

impl ConsensusState for TendermintConsensusState {
    fn client_type(&self) -> &'static str {
        TENDERMINT_CLIENT_TYPE
    }

    fn timestamp_nanos(&self) -> u64 {
        self.timestamp_nanos
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TendermintClientState {
    pub chain_id: String,
    /// How long a consensus state stays trusted after it was processed
    pub trusting_period_secs: u64,
    pub latest_height: Height,
    /// Set once misbehaviour has been proven
    pub frozen_height: Option<Height>,
}

impl TendermintClientState {
    pub fn new(chain_id: impl Into<String>, trusting_period_secs: u64, latest_height: Height) -> Self {
        TendermintClientState {
            chain_id: chain_id.into(),
            trusting_period_secs,
            latest_height,
            frozen_height: None,
        }
    }
}

impl TypedRecord for TendermintClientState {
    const TYPE_URL: &'static str = "/ibc.lightclients.tendermint.v1.ClientState";
}

impl ClientState for TendermintClientState {
    fn client_type(&self) -> &'static str {
        TENDERMINT_CLIENT_TYPE
    }

    fn latest_height(&self) -> Height {
        self.latest_height
    }

    fn is_frozen(&self) -> bool {
        self.frozen_height.is_some()
    }
}
