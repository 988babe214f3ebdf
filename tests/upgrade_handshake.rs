//! End-to-end channel upgrade Init + Commit against a node built from config.

use bleep_ibc::channel::{Channel, ChannelError, ChannelStore, Counterparty, Order, State};
use bleep_ibc::client::Height;
use bleep_ibc::host::path::channel_capability_path;
use bleep_ibc::host::{CacheStore, Capability, ChannelId, ConnectionId, PortId};
use bleep_ibc::{IbcConfig, IbcNode};
use proptest::prelude::*;

const COUNTER_UPGRADE_INIT: [&str; 3] = ["ibc", "channel", "upgrade-init"];

struct Setup {
    node: IbcNode,
    port_id: PortId,
    channel_id: ChannelId,
    capability: Capability,
}

fn open_channel() -> Channel {
    Channel::new(
        State::Open,
        Order::Unordered,
        Counterparty::new("portB".parse().unwrap(), Some(ChannelId::new(7))),
        vec![ConnectionId::new(0)],
        "ics20-1",
    )
}

fn ordered_proposal() -> Channel {
    let mut proposed = open_channel().with_state(State::InitUpgrade);
    proposed.ordering = Order::Ordered;
    proposed
}

fn setup() -> Setup {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut node = IbcNode::from_config(&IbcConfig::default()).unwrap();
    let port_id: PortId = "portA".parse().unwrap();
    let channel_id = ChannelId::new(1);

    node.connections.insert(ConnectionId::new(0));
    let capability = node
        .capabilities
        .new_capability(&channel_capability_path(&port_id, &channel_id))
        .unwrap();
    let keeper = node.channel_keeper();
    keeper
        .set_channel(&mut node.store, &port_id, &channel_id, &open_channel())
        .unwrap();

    Setup {
        node,
        port_id,
        channel_id,
        capability,
    }
}

impl Setup {
    fn init(&mut self, proposed: &Channel) -> Result<u64, ChannelError> {
        let keeper = self.node.channel_keeper();
        keeper
            .chan_upgrade_init(
                &mut self.node.store,
                &self.port_id,
                &self.channel_id,
                &self.capability,
                proposed,
                Height::new(0, 100),
                5000,
            )
            .map(|init| init.upgrade_sequence)
    }
}

#[test]
fn first_attempt_records_restore_channel() {
    let mut s = setup();
    assert_eq!(s.init(&ordered_proposal()).unwrap(), 1);

    let keeper = s.node.channel_keeper();
    let attempt = keeper
        .get_upgrade(&s.node.store, &s.port_id, &s.channel_id)
        .unwrap()
        .unwrap();
    assert_eq!(attempt.sequence, 1);
    assert_eq!(attempt.restore_channel.state, State::Open);
    assert_eq!(attempt.timeout.timeout_height, Height::new(0, 100));
    assert_eq!(attempt.timeout.timeout_timestamp, 5000);
}

#[test]
fn uncommitted_retry_takes_next_sequence() {
    let mut s = setup();
    assert_eq!(s.init(&ordered_proposal()).unwrap(), 1);
    assert_eq!(s.init(&ordered_proposal()).unwrap(), 2);

    let keeper = s.node.channel_keeper();
    let stored = keeper
        .get_channel(&s.node.store, &s.port_id, &s.channel_id)
        .unwrap()
        .unwrap();
    assert_eq!(stored.state, State::Open);
}

#[test]
fn init_then_commit_round_trip() {
    let mut s = setup();
    let proposed = ordered_proposal();
    let sequence = s.init(&proposed).unwrap();

    let keeper = s.node.channel_keeper();
    keeper
        .write_upgrade_init_channel(&mut s.node.store, &s.port_id, &s.channel_id, sequence, &proposed)
        .unwrap();

    let stored = keeper
        .get_channel(&s.node.store, &s.port_id, &s.channel_id)
        .unwrap()
        .unwrap();
    assert_eq!(stored, proposed);
    assert_eq!(stored.state, State::InitUpgrade);

    let attempt = keeper
        .get_upgrade(&s.node.store, &s.port_id, &s.channel_id)
        .unwrap()
        .unwrap();
    assert_eq!(attempt.restore_channel, open_channel());

    let engine = s.node.telemetry.engine.as_ref().unwrap();
    assert_eq!(engine.counter(&COUNTER_UPGRADE_INIT), 1);
    let events = engine.events_of_kind("channel_upgrade_init");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].attribute("port_id"), Some("portA"));
    assert_eq!(events[0].attribute("upgrade_ordering"), Some("ORDERED"));
}

#[test]
fn rejected_message_leaves_no_trace() {
    let mut s = setup();
    let keeper = s.node.channel_keeper();

    let mut bad = ordered_proposal();
    bad.counterparty.port_id = "portC".parse().unwrap();
    {
        let mut cache = CacheStore::new(&mut s.node.store);
        let err = keeper
            .chan_upgrade_init(
                &mut cache,
                &s.port_id,
                &s.channel_id,
                &s.capability,
                &bad,
                Height::new(0, 100),
                5000,
            )
            .unwrap_err();
        assert!(matches!(err, ChannelError::InvalidCounterparty));
        assert_eq!(cache.pending_writes(), 0);
    }

    assert!(keeper
        .get_upgrade(&s.node.store, &s.port_id, &s.channel_id)
        .unwrap()
        .is_none());
    assert_eq!(s.init(&ordered_proposal()).unwrap(), 1);
}

proptest! {
    #[test]
    fn uncommitted_attempts_count_up(attempts in 1u64..10) {
        let mut s = setup();
        for expected in 1..=attempts {
            prop_assert_eq!(s.init(&ordered_proposal()).unwrap(), expected);
        }
        let sequence = ChannelStore::new(&s.node.store)
            .get_upgrade_sequence(&s.port_id, &s.channel_id)
            .unwrap();
        prop_assert_eq!(sequence, Some(attempts));
    }
}
