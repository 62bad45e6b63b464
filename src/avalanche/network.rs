//! `NetworkLayer` (§6): the narrow outbound interface Core B uses to issue a
//! poll. The wire format of the eventual P2P message is owned entirely by
//! the embedding P2P stack; Core B only needs to hand off `(node_id, invs,
//! round_id)` without blocking (§5 "poll issuance records intent under the
//! lock, releases it, then hands the inv list to the network layer").

use super::types::{Inv, NodeId};

/// Must not block on I/O — `run_event_loop` calls this after releasing the
/// processor's lock, and the scheduler thread must not stall on it (§5).
pub trait NetworkLayer: Send + Sync {
    fn send_poll(&self, node_id: NodeId, invs: &[Inv], round_id: u64);
}

/// Test double recording every poll it was asked to send, for assertions in
/// `processor` unit tests and `tests/avalanche_scenarios.rs`.
#[derive(Default)]
pub struct RecordingNetworkLayer {
    sent: parking_lot::Mutex<Vec<(NodeId, Vec<Inv>, u64)>>,
}

impl RecordingNetworkLayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<(NodeId, Vec<Inv>, u64)> {
        self.sent.lock().clone()
    }

    pub fn last(&self) -> Option<(NodeId, Vec<Inv>, u64)> {
        self.sent.lock().last().cloned()
    }
}

impl NetworkLayer for RecordingNetworkLayer {
    fn send_poll(&self, node_id: NodeId, invs: &[Inv], round_id: u64) {
        self.sent.lock().push((node_id, invs.to_vec(), round_id));
    }
}
