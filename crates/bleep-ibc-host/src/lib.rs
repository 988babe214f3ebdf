//! Host abstractions shared by the BLEEP IBC modules.
//!
//! Everything the channel and client modules need from the hosting chain lives
//! here: identifier validation, the key paths records are stored under, the
//! key-value store contract, and the capability / connection collaborators.

pub mod capability;
pub mod connection;
pub mod error;
pub mod identifier;
pub mod path;
pub mod store;

pub use capability::{Capability, CapabilityAuthenticator, ScopedCapabilities};
pub use connection::{ConnectionRegistry, ConnectionSet};
pub use error::{ErrorKind, StoreError};
pub use identifier::{ChannelId, ClientId, ConnectionId, IdentifierError, PortId};
pub use store::{CacheStore, KvStore, MemoryStore, ReadStore};

#[cfg(feature = "rocksdb")]
pub use store::RocksStore;
