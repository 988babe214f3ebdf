use crate::codec::TypedRecord;
use crate::height::Height;

/// Consensus fact a light client recorded for one counterparty height.
///
/// The payload shape (state root, validator commitments, keys) is owned by the
/// client family; the store only needs to tag and untag it.
pub trait ConsensusState: TypedRecord + Clone + PartialEq {
    fn client_type(&self) -> &'static str;

    /// Counterparty block time of this consensus state, in UNIX nanoseconds
    fn timestamp_nanos(&self) -> u64;
}

/// Light client's own tracking record for a counterparty chain.
pub trait ClientState: TypedRecord + Clone {
    fn client_type(&self) -> &'static str;

    fn latest_height(&self) -> Height;

    fn is_frozen(&self) -> bool;
}
