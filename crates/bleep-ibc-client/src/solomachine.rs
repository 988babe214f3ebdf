//! Solo machine light client records.

use crate::codec::TypedRecord;
use crate::state::ConsensusState;
use serde::{Deserialize, Serialize};

pub const SOLOMACHINE_CLIENT_TYPE: &str = "06-solomachine";

/// Current signing key of a solo machine, plus the timestamp it was set at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoloMachineConsensusState {
    pub public_key: Vec<u8>,
    /// Separates signatures of different solo machines sharing a key
    pub diversifier: String,
    pub timestamp: u64,
}

impl TypedRecord for SoloMachineConsensusState {
    const TYPE_URL: &'static str = "/ibc.lightclients.solomachine.v2.ConsensusState";
}

impl ConsensusState for SoloMachineConsensusState {
    fn client_type(&self) -> &'static str {
        SOLOMACHINE_CLIENT_TYPE
    }

    fn timestamp_nanos(&self) -> u64 {
        self.timestamp
    }
}
