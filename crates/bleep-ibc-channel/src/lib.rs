//! Channel records and the channel upgrade handshake for BLEEP IBC.
//!
//! [`ChannelKeeper`] drives the Init step of the upgrade handshake: it moves an
//! OPEN channel towards INITUPGRADE, checks that the proposed parameters only
//! ever add guarantees, numbers the attempt, and snapshots the channel so the
//! attempt can be rolled back. [`ChannelStore`] persists channels and the
//! in-flight upgrade attempt.

pub mod channel;
pub mod error;
pub mod events;
pub mod keeper;
pub mod store;
pub mod upgrade;

pub use channel::{Channel, Counterparty, Order, State};
pub use error::ChannelError;
pub use keeper::ChannelKeeper;
pub use store::ChannelStore;
pub use upgrade::{UpgradeAttempt, UpgradeInit, UpgradeTimeout};
