//! `PeerRegistry` (§6): enumerates connected peers and whether each
//! advertises the avalanche capability.
//!
//! Grounded on the donor crate's `peer_manager.rs` `PeerInfo` struct (a
//! capability flag alongside connection bookkeeping), narrowed to the one
//! flag Core B actually consumes.

use std::collections::BTreeMap;

use parking_lot::RwLock;

use super::types::NodeId;

/// `for_each_node(fn)`: enumerates known peers in a stable order (§6).
/// Implementations must be cheap to call under the processor's lock-free
/// iteration (no I/O).
pub trait PeerRegistry: Send + Sync {
    fn for_each_node(&self, f: &mut dyn FnMut(NodeId, bool));
}

/// An in-memory `PeerRegistry` for embedding applications and tests.
/// `BTreeMap` keeps iteration order deterministic by `NodeId`, which
/// `get_suitable_node_to_query`'s "next peer" semantics rely on for
/// reproducible tests (§8 S5).
pub struct InMemoryPeerRegistry {
    peers: RwLock<BTreeMap<NodeId, bool>>,
}

impl InMemoryPeerRegistry {
    pub fn new() -> Self {
        Self { peers: RwLock::new(BTreeMap::new()) }
    }

    pub fn add_peer(&self, node_id: NodeId, avalanche_capable: bool) {
        self.peers.write().insert(node_id, avalanche_capable);
    }

    pub fn remove_peer(&self, node_id: NodeId) {
        self.peers.write().remove(&node_id);
    }

    pub fn set_capable(&self, node_id: NodeId, avalanche_capable: bool) {
        if let Some(flag) = self.peers.write().get_mut(&node_id) {
            *flag = avalanche_capable;
        }
    }
}

impl Default for InMemoryPeerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PeerRegistry for InMemoryPeerRegistry {
    fn for_each_node(&self, f: &mut dyn FnMut(NodeId, bool)) {
        for (&node_id, &capable) in self.peers.read().iter() {
            f(node_id, capable);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iterates_peers_in_stable_order() {
        let registry = InMemoryPeerRegistry::new();
        registry.add_peer(2, true);
        registry.add_peer(1, false);

        let mut seen = Vec::new();
        registry.for_each_node(&mut |id, capable| seen.push((id, capable)));

        assert_eq!(seen, vec![(1, false), (2, true)]);
    }

    #[test]
    fn removed_peer_is_not_visited() {
        let registry = InMemoryPeerRegistry::new();
        registry.add_peer(5, true);
        registry.remove_peer(5);

        let mut count = 0;
        registry.for_each_node(&mut |_, _| count += 1);
        assert_eq!(count, 0);
    }
}
