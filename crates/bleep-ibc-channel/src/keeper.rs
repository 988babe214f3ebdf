// CHANNEL UPGRADE HANDSHAKE
// Init step of the upgrade protocol: validate a proposed channel, number the
// attempt, snapshot the channel, and commit the new channel end
//
// SAFETY INVARIANTS:
// 1. Init is all or nothing: a rejected proposal leaves the store untouched
// 2. Checks run in a fixed order and the first failure wins
// 3. Init never writes the channel end itself; only the commit step does
// 4. The restore channel is the channel exactly as it was before the attempt
// 5. Upgrade sequences strictly increase per channel, starting at 1
// 6. Counterparty identity can never change through an upgrade
// 7. Ordering can only be strengthened, never weakened
//
// Init and commit are split so the application callback can run between
// them. Hosts that need atomicity run both against a CacheStore and commit
// the cache once the whole message has succeeded.

use crate::channel::{Channel, State};
use crate::error::ChannelError;
use crate::events::{channel_upgrade_init_event, COUNTER_UPGRADE_INIT};
use crate::store::ChannelStore;
use crate::upgrade::{UpgradeAttempt, UpgradeInit, UpgradeTimeout};
use bleep_ibc_client::Height;
use bleep_ibc_host::path::channel_capability_path;
use bleep_ibc_host::{
    Capability, CapabilityAuthenticator, ChannelId, ConnectionRegistry, KvStore, PortId,
    ReadStore,
};
use bleep_telemetry::TelemetrySink;
use log::{debug, info};
use std::sync::Arc;

/// Channel keeper: owns the collaborators the handshake consults.
pub struct ChannelKeeper<A, R> {
    /// Capability module scoped to IBC core
    capabilities: A,
    /// Connection keeper, consulted for the proposed first hop
    connections: R,
    /// Destination for handshake events and counters
    telemetry: Arc<dyn TelemetrySink>,
}

impl<A: CapabilityAuthenticator, R: ConnectionRegistry> ChannelKeeper<A, R> {
    pub fn new(capabilities: A, connections: R, telemetry: Arc<dyn TelemetrySink>) -> Self {
        ChannelKeeper {
            capabilities,
            connections,
            telemetry,
        }
    }

    pub fn get_channel<S: ReadStore>(
        &self,
        store: &S,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) -> Result<Option<Channel>, ChannelError> {
        ChannelStore::new(store).get_channel(port_id, channel_id)
    }

    pub fn set_channel<S: KvStore>(
        &self,
        store: &mut S,
        port_id: &PortId,
        channel_id: &ChannelId,
        channel: &Channel,
    ) -> Result<(), ChannelError> {
        ChannelStore::new(store).set_channel(port_id, channel_id, channel)
    }

    pub fn get_upgrade<S: ReadStore>(
        &self,
        store: &S,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) -> Result<Option<UpgradeAttempt>, ChannelError> {
        ChannelStore::new(store).get_upgrade(port_id, channel_id)
    }

    /// Validate and stage the Init step of a channel upgrade.
    ///
    /// On success the restore channel, the new upgrade sequence and the
    /// counterparty timeout are written, and the attempt number plus the
    /// channel's current version are returned. The channel end is left as is;
    /// call [`Self::write_upgrade_init_channel`] once the application has
    /// accepted the upgrade.
    ///
    /// `proposed_upgrade_channel` is expected in state INITUPGRADE. A proposal
    /// equal to the current channel in that state changes nothing and is
    /// rejected with `ChannelExists`.
    #[allow(clippy::too_many_arguments)]
    pub fn chan_upgrade_init<S: KvStore>(
        &self,
        store: &mut S,
        port_id: &PortId,
        channel_id: &ChannelId,
        channel_capability: &Capability,
        proposed_upgrade_channel: &Channel,
        counterparty_timeout_height: Height,
        counterparty_timeout_timestamp: u64,
    ) -> Result<UpgradeInit, ChannelError> {
        let mut channels = ChannelStore::new(store);

        let restore_channel = channels.get_channel(port_id, channel_id)?.ok_or_else(|| {
            debug!("Upgrade init rejected: channel {}/{} not found", port_id, channel_id);
            ChannelError::ChannelNotFound {
                port_id: port_id.clone(),
                channel_id: channel_id.clone(),
            }
        })?;

        if restore_channel.state != State::Open {
            debug!(
                "Upgrade init rejected: channel {}/{} is {}",
                port_id, channel_id, restore_channel.state
            );
            return Err(ChannelError::InvalidChannelState {
                expected: State::Open,
                actual: restore_channel.state,
            });
        }

        let capability_name = channel_capability_path(port_id, channel_id);
        if !self
            .capabilities
            .authenticate_capability(channel_capability, &capability_name)
        {
            debug!(
                "Upgrade init rejected: capability {} does not own {}",
                channel_capability.index(),
                capability_name
            );
            return Err(ChannelError::ChannelCapabilityNotFound {
                port_id: port_id.clone(),
                channel_id: channel_id.clone(),
            });
        }

        let channel = restore_channel.with_state(State::InitUpgrade);
        if channel == *proposed_upgrade_channel {
            debug!(
                "Upgrade init rejected: proposal for {}/{} changes nothing",
                port_id, channel_id
            );
            return Err(ChannelError::ChannelExists);
        }

        match proposed_upgrade_channel.first_hop() {
            Some(hop) if self.connections.has_connection(hop) => {}
            hop => {
                let connection_id = hop.map(|h| h.to_string()).unwrap_or_default();
                debug!(
                    "Upgrade init rejected: connection '{}' not found",
                    connection_id
                );
                return Err(ChannelError::ConnectionNotFound { connection_id });
            }
        }

        if proposed_upgrade_channel.counterparty != channel.counterparty {
            debug!(
                "Upgrade init rejected: counterparty {} cannot become {}",
                channel.counterparty, proposed_upgrade_channel.counterparty
            );
            return Err(ChannelError::InvalidCounterparty);
        }

        if !channel
            .ordering
            .subset_of(proposed_upgrade_channel.ordering)
        {
            debug!(
                "Upgrade init rejected: ordering {} cannot weaken to {}",
                channel.ordering, proposed_upgrade_channel.ordering
            );
            return Err(ChannelError::InvalidChannelOrdering {
                current: channel.ordering,
                proposed: proposed_upgrade_channel.ordering,
            });
        }

        let upgrade_sequence = match channels.get_upgrade_sequence(port_id, channel_id)? {
            Some(last) => last
                .checked_add(1)
                .ok_or_else(|| ChannelError::UpgradeSequenceOverflow {
                    port_id: port_id.clone(),
                    channel_id: channel_id.clone(),
                })?,
            None => 1,
        };
        let timeout = UpgradeTimeout::new(counterparty_timeout_height, counterparty_timeout_timestamp);

        channels.set_upgrade_restore_channel(port_id, channel_id, &restore_channel)?;
        channels.set_upgrade_sequence(port_id, channel_id, upgrade_sequence)?;
        channels.set_upgrade_timeout(port_id, channel_id, &timeout)?;

        info!(
            "Upgrade init staged for {}/{}: sequence {}, timeout height {} timestamp {}",
            port_id, channel_id, upgrade_sequence, counterparty_timeout_height, counterparty_timeout_timestamp
        );

        Ok(UpgradeInit {
            upgrade_sequence,
            previous_version: restore_channel.version,
        })
    }

    /// Commit a channel that passed the Init step.
    ///
    /// Writes `channel_upgrade` as the channel end, logs the state change,
    /// emits `channel_upgrade_init` and bumps `ibc/channel/upgrade-init`.
    /// Fails only if the host store rejects the write, in which case nothing
    /// is emitted.
    pub fn write_upgrade_init_channel<S: KvStore>(
        &self,
        store: &mut S,
        port_id: &PortId,
        channel_id: &ChannelId,
        upgrade_sequence: u64,
        channel_upgrade: &Channel,
    ) -> Result<(), ChannelError> {
        ChannelStore::new(store).set_channel(port_id, channel_id, channel_upgrade)?;

        info!(
            "channel state updated: port-id={} channel-id={} previous-state={} new-state={}",
            port_id,
            channel_id,
            State::Open,
            State::InitUpgrade
        );

        self.telemetry.emit_event(channel_upgrade_init_event(
            port_id,
            channel_id,
            upgrade_sequence,
            channel_upgrade,
        ));
        self.telemetry.incr_counter(&COUNTER_UPGRADE_INIT, 1);
        Ok(())
    }
}
