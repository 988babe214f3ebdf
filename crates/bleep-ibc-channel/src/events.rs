//! Events and counters emitted by the channel upgrade handshake.

use crate::channel::Channel;
use bleep_ibc_host::{ChannelId, PortId};
use bleep_telemetry::Event;

pub const EVENT_TYPE_CHANNEL_UPGRADE_INIT: &str = "channel_upgrade_init";

pub const ATTRIBUTE_KEY_PORT_ID: &str = "port_id";
pub const ATTRIBUTE_KEY_CHANNEL_ID: &str = "channel_id";
pub const ATTRIBUTE_KEY_COUNTERPARTY_PORT_ID: &str = "counterparty_port_id";
pub const ATTRIBUTE_KEY_COUNTERPARTY_CHANNEL_ID: &str = "counterparty_channel_id";
pub const ATTRIBUTE_KEY_UPGRADE_CONNECTION_HOPS: &str = "upgrade_connection_hops";
pub const ATTRIBUTE_KEY_UPGRADE_VERSION: &str = "upgrade_version";
pub const ATTRIBUTE_KEY_UPGRADE_ORDERING: &str = "upgrade_ordering";
pub const ATTRIBUTE_KEY_UPGRADE_SEQUENCE: &str = "upgrade_sequence";

/// Counter bumped once per committed Init step.
pub const COUNTER_UPGRADE_INIT: [&str; 3] = ["ibc", "channel", "upgrade-init"];

/// Build the `channel_upgrade_init` event for a committed Init step.
///
/// `channel_upgrade` is the channel as written, so the attributes describe the
/// proposed parameters. Connection hops are comma separated; a counterparty
/// without a channel yet reports an empty channel id.
pub fn channel_upgrade_init_event(
    port_id: &PortId,
    channel_id: &ChannelId,
    upgrade_sequence: u64,
    channel_upgrade: &Channel,
) -> Event {
    let connection_hops = channel_upgrade
        .connection_hops
        .iter()
        .map(|hop| hop.as_str())
        .collect::<Vec<_>>()
        .join(",");
    let counterparty_channel_id = channel_upgrade
        .counterparty
        .channel_id
        .as_ref()
        .map(|id| id.as_str())
        .unwrap_or_default();

    Event::new(EVENT_TYPE_CHANNEL_UPGRADE_INIT)
        .with_attribute(ATTRIBUTE_KEY_PORT_ID, port_id)
        .with_attribute(ATTRIBUTE_KEY_CHANNEL_ID, channel_id)
        .with_attribute(
            ATTRIBUTE_KEY_COUNTERPARTY_PORT_ID,
            &channel_upgrade.counterparty.port_id,
        )
        .with_attribute(ATTRIBUTE_KEY_COUNTERPARTY_CHANNEL_ID, counterparty_channel_id)
        .with_attribute(ATTRIBUTE_KEY_UPGRADE_CONNECTION_HOPS, connection_hops)
        .with_attribute(ATTRIBUTE_KEY_UPGRADE_VERSION, &channel_upgrade.version)
        .with_attribute(ATTRIBUTE_KEY_UPGRADE_ORDERING, channel_upgrade.ordering)
        .with_attribute(ATTRIBUTE_KEY_UPGRADE_SEQUENCE, upgrade_sequence)
}
