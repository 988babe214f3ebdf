use bleep_ibc_host::{ChannelId, ConnectionId, PortId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Channel lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum State {
    Uninitialized,
    Init,
    TryOpen,
    Open,
    Closed,
    /// Upgrade initiated locally, awaiting the counterparty
    InitUpgrade,
    /// Upgrade proposed by the counterparty and accepted locally
    TryUpgrade,
}

impl State {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uninitialized => "UNINITIALIZED",
            Self::Init => "INIT",
            Self::TryOpen => "TRYOPEN",
            Self::Open => "OPEN",
            Self::Closed => "CLOSED",
            Self::InitUpgrade => "INITUPGRADE",
            Self::TryUpgrade => "TRYUPGRADE",
        }
    }

    pub fn is_upgrading(&self) -> bool {
        matches!(self, Self::InitUpgrade | Self::TryUpgrade)
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Packet delivery guarantee of a channel.
///
/// Orderings form a chain of capabilities: `Ordered` provides everything
/// `Unordered` does plus in-sequence delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Order {
    Unordered,
    Ordered,
}

impl Order {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unordered => "UNORDERED",
            Self::Ordered => "ORDERED",
        }
    }

    /// True if every guarantee of `self` is also provided by `other`.
    pub fn subset_of(&self, other: Order) -> bool {
        match self {
            Self::Unordered => true,
            Self::Ordered => other == Order::Ordered,
        }
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Remote end of a channel. Fixed when the channel is created.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Counterparty {
    pub port_id: PortId,
    /// Empty until the counterparty has allocated its channel
    pub channel_id: Option<ChannelId>,
}

impl Counterparty {
    pub fn new(port_id: PortId, channel_id: Option<ChannelId>) -> Self {
        Counterparty { port_id, channel_id }
    }
}

impl fmt::Display for Counterparty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.channel_id {
            Some(channel_id) => write!(f, "{}/{}", self.port_id, channel_id),
            None => write!(f, "{}/<none>", self.port_id),
        }
    }
}

/// Channel end as stored under `channelEnds/ports/{port}/channels/{channel}`.
///
/// Equality is structural over every field; the upgrade handshake relies on it
/// to detect proposals that change nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub state: State,
    pub ordering: Order,
    pub counterparty: Counterparty,
    /// Connections the channel's packets travel over, in order
    pub connection_hops: Vec<ConnectionId>,
    /// Application version negotiated by the two ends
    pub version: String,
}

impl Channel {
    pub fn new(
        state: State,
        ordering: Order,
        counterparty: Counterparty,
        connection_hops: Vec<ConnectionId>,
        version: impl Into<String>,
    ) -> Self {
        Channel {
            state,
            ordering,
            counterparty,
            connection_hops,
            version: version.into(),
        }
    }

    /// Copy of this channel in `state`, all other fields unchanged
    pub fn with_state(&self, state: State) -> Self {
        Channel {
            state,
            ..self.clone()
        }
    }

    pub fn first_hop(&self) -> Option<&ConnectionId> {
        self.connection_hops.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_partial_order() {
        assert!(Order::Unordered.subset_of(Order::Unordered));
        assert!(Order::Unordered.subset_of(Order::Ordered));
        assert!(Order::Ordered.subset_of(Order::Ordered));
        assert!(!Order::Ordered.subset_of(Order::Unordered));
    }

    #[test]
    fn test_with_state_changes_only_state() {
        let channel = Channel::new(
            State::Open,
            Order::Unordered,
            Counterparty::new("transfer".parse().unwrap(), Some(ChannelId::new(4))),
            vec![ConnectionId::new(0)],
            "ics20-1",
        );
        let bumped = channel.with_state(State::InitUpgrade);
        assert_eq!(bumped.state, State::InitUpgrade);
        assert_ne!(bumped, channel);
        assert_eq!(bumped.with_state(State::Open), channel);
        assert!(bumped.state.is_upgrading());
    }

    #[test]
    fn test_display_forms() {
        assert_eq!(State::InitUpgrade.to_string(), "INITUPGRADE");
        assert_eq!(Order::Ordered.to_string(), "ORDERED");
        let counterparty = Counterparty::new("transfer".parse().unwrap(), None);
        assert_eq!(counterparty.to_string(), "transfer/<none>");
    }
}
