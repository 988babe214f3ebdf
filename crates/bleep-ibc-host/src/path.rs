//! Store key paths for every record family the IBC modules persist.
//!
//! All families share one underlying store. Each path starts with a distinct
//! family prefix and identifiers cannot contain `/`, so no two families (and no
//! two records of one family) ever map to the same key.

use crate::identifier::{ChannelId, ClientId, PortId};
use std::fmt::Display;

pub const KEY_CHANNEL_END_PREFIX: &str = "channelEnds";
pub const KEY_CHANNEL_UPGRADE_PREFIX: &str = "channelUpgrades";
pub const KEY_UPGRADE_RESTORE: &str = "restore";
pub const KEY_UPGRADE_SEQUENCE: &str = "upgradeSequence";
pub const KEY_UPGRADE_TIMEOUT: &str = "upgradeTimeout";
pub const KEY_CAPABILITY_PREFIX: &str = "capabilities";
pub const KEY_CLIENT_PREFIX: &str = "clients";
pub const KEY_CLIENT_STATE: &str = "clientState";
pub const KEY_CONSENSUS_STATE_PREFIX: &str = "consensusStates";
pub const KEY_PROCESSED_TIME: &str = "processedTime";
pub const KEY_PROCESSED_HEIGHT: &str = "processedHeight";

fn channel_path(port_id: &PortId, channel_id: &ChannelId) -> String {
    format!("ports/{port_id}/channels/{channel_id}")
}

/// `channelEnds/ports/{port}/channels/{channel}`
pub fn channel_key(port_id: &PortId, channel_id: &ChannelId) -> Vec<u8> {
    format!("{KEY_CHANNEL_END_PREFIX}/{}", channel_path(port_id, channel_id)).into_bytes()
}

/// `channelUpgrades/restore/ports/{port}/channels/{channel}`
pub fn upgrade_restore_channel_key(port_id: &PortId, channel_id: &ChannelId) -> Vec<u8> {
    upgrade_key(KEY_UPGRADE_RESTORE, port_id, channel_id)
}

/// `channelUpgrades/upgradeSequence/ports/{port}/channels/{channel}`
pub fn upgrade_sequence_key(port_id: &PortId, channel_id: &ChannelId) -> Vec<u8> {
    upgrade_key(KEY_UPGRADE_SEQUENCE, port_id, channel_id)
}

/// `channelUpgrades/upgradeTimeout/ports/{port}/channels/{channel}`
pub fn upgrade_timeout_key(port_id: &PortId, channel_id: &ChannelId) -> Vec<u8> {
    upgrade_key(KEY_UPGRADE_TIMEOUT, port_id, channel_id)
}

fn upgrade_key(field: &str, port_id: &PortId, channel_id: &ChannelId) -> Vec<u8> {
    format!(
        "{KEY_CHANNEL_UPGRADE_PREFIX}/{field}/{}",
        channel_path(port_id, channel_id)
    )
    .into_bytes()
}

/// Name of the capability that owns a channel.
pub fn channel_capability_path(port_id: &PortId, channel_id: &ChannelId) -> String {
    format!("{KEY_CAPABILITY_PREFIX}/{}", channel_path(port_id, channel_id))
}

/// `clients/{client}/clientState`
pub fn client_state_key(client_id: &ClientId) -> Vec<u8> {
    format!("{KEY_CLIENT_PREFIX}/{client_id}/{KEY_CLIENT_STATE}").into_bytes()
}

fn consensus_state_path(client_id: &ClientId, height: &impl Display) -> String {
    format!("{KEY_CLIENT_PREFIX}/{client_id}/{KEY_CONSENSUS_STATE_PREFIX}/{height}")
}

/// `clients/{client}/consensusStates/{height}`
pub fn consensus_state_key(client_id: &ClientId, height: &impl Display) -> Vec<u8> {
    consensus_state_path(client_id, height).into_bytes()
}

/// `clients/{client}/consensusStates/{height}/processedTime`
pub fn processed_time_key(client_id: &ClientId, height: &impl Display) -> Vec<u8> {
    format!("{}/{KEY_PROCESSED_TIME}", consensus_state_path(client_id, height)).into_bytes()
}

/// `clients/{client}/consensusStates/{height}/processedHeight`
pub fn processed_height_key(client_id: &ClientId, height: &impl Display) -> Vec<u8> {
    format!("{}/{KEY_PROCESSED_HEIGHT}", consensus_state_path(client_id, height)).into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn ids() -> (PortId, ChannelId, ClientId) {
        (
            "transfer".parse().unwrap(),
            ChannelId::new(0),
            ClientId::new("07-tendermint", 0).unwrap(),
        )
    }

    #[test]
    fn test_channel_paths() {
        let (port, channel, _) = ids();
        assert_eq!(channel_key(&port, &channel), b"channelEnds/ports/transfer/channels/channel-0");
        assert_eq!(
            upgrade_sequence_key(&port, &channel),
            b"channelUpgrades/upgradeSequence/ports/transfer/channels/channel-0"
        );
        assert_eq!(
            channel_capability_path(&port, &channel),
            "capabilities/ports/transfer/channels/channel-0"
        );
    }

    #[test]
    fn test_consensus_paths() {
        let (_, _, client) = ids();
        assert_eq!(
            processed_time_key(&client, &"1-10"),
            b"clients/07-tendermint-0/consensusStates/1-10/processedTime"
        );
    }

    #[test]
    fn test_families_never_collide() {
        let (port, channel, client) = ids();
        let keys: Vec<Vec<u8>> = vec![
            channel_key(&port, &channel),
            upgrade_restore_channel_key(&port, &channel),
            upgrade_sequence_key(&port, &channel),
            upgrade_timeout_key(&port, &channel),
            channel_capability_path(&port, &channel).into_bytes(),
            client_state_key(&client),
            consensus_state_key(&client, &"0-1"),
            processed_time_key(&client, &"0-1"),
            processed_height_key(&client, &"0-1"),
        ];
        let unique: BTreeSet<_> = keys.iter().collect();
        assert_eq!(unique.len(), keys.len());
    }
}
