//! Connection existence contract consumed by the channel handshake.

use crate::identifier::ConnectionId;
use parking_lot::RwLock;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Resolves whether a connection identifier names a usable connection.
pub trait ConnectionRegistry {
    fn has_connection(&self, connection_id: &ConnectionId) -> bool;
}

impl<T: ConnectionRegistry + ?Sized> ConnectionRegistry for Arc<T> {
    fn has_connection(&self, connection_id: &ConnectionId) -> bool {
        (**self).has_connection(connection_id)
    }
}

/// In-memory registry of open connections.
#[derive(Debug, Default)]
pub struct ConnectionSet {
    connections: RwLock<BTreeSet<ConnectionId>>,
}

impl ConnectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, connection_id: ConnectionId) -> bool {
        self.connections.write().insert(connection_id)
    }

    pub fn remove(&self, connection_id: &ConnectionId) -> bool {
        self.connections.write().remove(connection_id)
    }
}

impl FromIterator<ConnectionId> for ConnectionSet {
    fn from_iter<I: IntoIterator<Item = ConnectionId>>(iter: I) -> Self {
        ConnectionSet {
            connections: RwLock::new(iter.into_iter().collect()),
        }
    }
}

impl ConnectionRegistry for ConnectionSet {
    fn has_connection(&self, connection_id: &ConnectionId) -> bool {
        self.connections.read().contains(connection_id)
    }
}
