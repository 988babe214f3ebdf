//! Light client records for BLEEP IBC.
//!
//! Holds the counterparty [`Height`] type, the typed client and consensus state
//! records, and [`ClientStore`]: the per-client view of the host store that
//! maps heights to consensus states plus the local time and height at which
//! each one was first processed.

pub mod codec;
pub mod error;
pub mod height;
pub mod solomachine;
pub mod state;
pub mod store;
pub mod tendermint;

pub use codec::{Any, CodecError, TypedRecord};
pub use error::ClientError;
pub use height::{Height, HeightError};
pub use solomachine::SoloMachineConsensusState;
pub use state::{ClientState, ConsensusState};
pub use store::{ClientStore, ConsensusRecord};
pub use tendermint::{TendermintClientState, TendermintConsensusState};
