// CONSENSUS STATE STORE
// Per-client mapping from counterparty height to consensus fact and local
// processing metadata
//
// INVARIANTS:
// 1. Processed time/height are written once per height, when the consensus
//    state at that height is first accepted, and never rewritten
// 2. An accepted consensus state is never replaced by a different one
// 3. "Nothing stored" (NotFound) and "something of another family stored"
//    (InvalidConsensusState) are always distinguishable
// 4. Records are never deleted here; pruning belongs to the host

use crate::codec::CodecError;
use crate::error::ClientError;
use crate::height::Height;
use crate::state::{ClientState, ConsensusState};
use bleep_ibc_host::path::{
    client_state_key, consensus_state_key, processed_height_key, processed_time_key,
};
use bleep_ibc_host::{ClientId, KvStore, ReadStore};
use log::{debug, info, warn};

/// Consensus state together with the local bookkeeping recorded for it.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsensusRecord<CS> {
    pub consensus_state: CS,
    /// Local wall clock (UNIX nanoseconds) when the state was first processed
    pub processed_time: Option<u64>,
    /// Local chain height when the state was first processed
    pub processed_height: Option<Height>,
}

/// View of the host store scoped to one light client.
pub struct ClientStore<S> {
    store: S,
    client_id: ClientId,
}

impl<S> ClientStore<S> {
    pub fn new(store: S, client_id: ClientId) -> Self {
        ClientStore { store, client_id }
    }

    pub fn client_id(&self) -> &ClientId {
        &self.client_id
    }

    pub fn into_inner(self) -> S {
        self.store
    }
}

impl<S: ReadStore> ClientStore<S> {
    // ── client state ────────────────────────────────────────────────────────

    pub fn get_client_state<CS: ClientState>(&self) -> Result<CS, ClientError> {
        let bytes = self
            .store
            .get(&client_state_key(&self.client_id))?
            .ok_or_else(|| ClientError::ClientStateNotFound {
                client_id: self.client_id.clone(),
            })?;
        CS::decode_any(&bytes).map_err(|reason| ClientError::InvalidClientState {
            client_id: self.client_id.clone(),
            reason,
        })
    }

    // ── consensus states ────────────────────────────────────────────────────

    /// Consensus state stored at `height`, decoded as family `CS`.
    pub fn get_consensus_state<CS: ConsensusState>(&self, height: Height) -> Result<CS, ClientError> {
        let bytes = self
            .store
            .get(&consensus_state_key(&self.client_id, &height))?
            .ok_or_else(|| ClientError::ConsensusStateNotFound {
                client_id: self.client_id.clone(),
                height,
            })?;
        CS::decode_any(&bytes).map_err(|reason| {
            warn!(
                "Consensus state for client {} at height {} is not a {}: {}",
                self.client_id,
                height,
                CS::TYPE_URL,
                reason
            );
            ClientError::InvalidConsensusState {
                client_id: self.client_id.clone(),
                height,
                reason,
            }
        })
    }

    pub fn has_consensus_state(&self, height: Height) -> Result<bool, ClientError> {
        Ok(self.store.has(&consensus_state_key(&self.client_id, &height))?)
    }

    /// Consensus state at `height` plus its processed time and height.
    pub fn get_consensus_record<CS: ConsensusState>(
        &self,
        height: Height,
    ) -> Result<ConsensusRecord<CS>, ClientError> {
        Ok(ConsensusRecord {
            consensus_state: self.get_consensus_state(height)?,
            processed_time: self.get_processed_time(height)?,
            processed_height: self.get_processed_height(height)?,
        })
    }

    /// Local time at which the consensus state at `height` was first processed.
    ///
    /// `None` means nothing was ever recorded for that height. Timeout and
    /// expiry checks probe such heights routinely, so absence is not an error.
    pub fn get_processed_time(&self, height: Height) -> Result<Option<u64>, ClientError> {
        match self.store.get(&processed_time_key(&self.client_id, &height))? {
            None => Ok(None),
            Some(bytes) => {
                let raw: [u8; 8] = bytes.as_slice().try_into().map_err(|_| {
                    CodecError::Malformed(format!("processed time is {} bytes, expected 8", bytes.len()))
                })?;
                Ok(Some(u64::from_be_bytes(raw)))
            }
        }
    }

    /// Local height at which the consensus state at `height` was first processed.
    pub fn get_processed_height(&self, height: Height) -> Result<Option<Height>, ClientError> {
        match self.store.get(&processed_height_key(&self.client_id, &height))? {
            None => Ok(None),
            Some(bytes) => {
                let processed = bincode::deserialize(&bytes)
                    .map_err(|e| CodecError::Malformed(e.to_string()))?;
                Ok(Some(processed))
            }
        }
    }

}

impl<S: KvStore> ClientStore<S> {
    pub fn set_client_state<CS: ClientState>(&mut self, client_state: &CS) -> Result<(), ClientError> {
        self.store
            .set(&client_state_key(&self.client_id), client_state.encode_any()?)?;
        Ok(())
    }

    /// Accept a consensus state for `height` on behalf of the client-update path.
    ///
    /// On first acceptance the state is written together with `host_timestamp`
    /// and `host_height` as its processed metadata, and `true` is returned.
    /// Re-submitting the identical state is a no-op returning `false`; the
    /// metadata from the first acceptance is kept. A different state at an
    /// already-populated height is rejected and nothing is written.
    pub fn store_consensus_state<CS: ConsensusState>(
        &mut self,
        height: Height,
        consensus_state: &CS,
        host_timestamp: u64,
        host_height: Height,
    ) -> Result<bool, ClientError> {
        if self.has_consensus_state(height)? {
            let existing: CS = self.get_consensus_state(height)?;
            if existing == *consensus_state {
                debug!(
                    "Consensus state for client {} at height {} already stored",
                    self.client_id, height
                );
                return Ok(false);
            }
            warn!(
                "Rejected conflicting consensus state for client {} at height {}",
                self.client_id, height
            );
            return Err(ClientError::ConflictingConsensusState {
                client_id: self.client_id.clone(),
                height,
            });
        }

        self.store.set(
            &consensus_state_key(&self.client_id, &height),
            consensus_state.encode_any()?,
        )?;
        if self.get_processed_time(height)?.is_none() {
            self.store.set(
                &processed_time_key(&self.client_id, &height),
                host_timestamp.to_be_bytes().to_vec(),
            )?;
        }
        if self.get_processed_height(height)?.is_none() {
            let encoded = bincode::serialize(&host_height)
                .map_err(|e| CodecError::Malformed(e.to_string()))?;
            self.store
                .set(&processed_height_key(&self.client_id, &height), encoded)?;
        }

        info!(
            "Stored {} consensus state for client {} at height {} (processed at {} / {})",
            consensus_state.client_type(),
            self.client_id,
            height,
            host_timestamp,
            host_height
        );
        Ok(true)
    }
}
