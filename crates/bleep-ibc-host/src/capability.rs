//! Capability authentication contract.
//!
//! A capability is an unforgeable token scoped to one named resource (for
//! channels, `capabilities/ports/{port}/channels/{channel}`). The IBC modules
//! only ever ask the yes/no question "does the caller own the capability for
//! this name"; how tokens are minted and passed between modules is the host's
//! concern.

use log::{debug, warn};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Opaque authorization credential handed to the owning application module.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Capability {
    index: u64,
}

impl Capability {
    pub fn index(&self) -> u64 {
        self.index
    }
}

/// Answers whether a capability token owns a named resource.
pub trait CapabilityAuthenticator {
    fn authenticate_capability(&self, capability: &Capability, name: &str) -> bool;
}

impl<T: CapabilityAuthenticator + ?Sized> CapabilityAuthenticator for Arc<T> {
    fn authenticate_capability(&self, capability: &Capability, name: &str) -> bool {
        (**self).authenticate_capability(capability, name)
    }
}

#[derive(Debug, Default)]
struct CapabilityTable {
    next_index: u64,
    by_name: HashMap<String, u64>,
}

/// In-memory capability keeper scoped to a single owning module.
#[derive(Debug, Default)]
pub struct ScopedCapabilities {
    table: RwLock<CapabilityTable>,
}

impl ScopedCapabilities {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint a fresh capability bound to `name`.
    ///
    /// Returns `None` if the name is already bound; a name has exactly one owner.
    pub fn new_capability(&self, name: &str) -> Option<Capability> {
        let mut table = self.table.write();
        if table.by_name.contains_key(name) {
            warn!("Capability {} already bound, refusing to mint another", name);
            return None;
        }
        table.next_index += 1;
        let index = table.next_index;
        table.by_name.insert(name.to_string(), index);
        debug!("Minted capability {} for {}", index, name);
        Some(Capability { index })
    }

    /// Unbind `name` so that no token authenticates for it any more.
    pub fn release_capability(&self, name: &str) -> bool {
        self.table.write().by_name.remove(name).is_some()
    }
}

impl CapabilityAuthenticator for ScopedCapabilities {
    fn authenticate_capability(&self, capability: &Capability, name: &str) -> bool {
        self.table.read().by_name.get(name) == Some(&capability.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authenticates_only_bound_name() {
        let caps = ScopedCapabilities::new();
        let cap = caps.new_capability("capabilities/ports/transfer/channels/channel-0").unwrap();
        assert!(caps.authenticate_capability(&cap, "capabilities/ports/transfer/channels/channel-0"));
        assert!(!caps.authenticate_capability(&cap, "capabilities/ports/transfer/channels/channel-1"));
    }

    #[test]
    fn test_foreign_token_rejected() {
        let caps = ScopedCapabilities::new();
        let owner = caps.new_capability("a").unwrap();
        let other = caps.new_capability("b").unwrap();
        assert_ne!(owner.index(), other.index());
        assert!(!caps.authenticate_capability(&other, "a"));
    }

    #[test]
    fn test_name_has_single_owner() {
        let caps = ScopedCapabilities::new();
        assert!(caps.new_capability("a").is_some());
        assert!(caps.new_capability("a").is_none());
    }

    #[test]
    fn test_release_revokes() {
        let caps = Arc::new(ScopedCapabilities::new());
        let cap = caps.new_capability("a").unwrap();
        assert!(caps.release_capability("a"));
        assert!(!caps.authenticate_capability(&cap, "a"));
    }
}
