//! `PollRegistry` (§4.6): a small map keyed by `(node_id, round_id)` holding
//! in-flight `PollRound`s, plus the per-node "outstanding round" invariant
//! `get_suitable_node_to_query` and `register_votes` both depend on.
//!
//! Grounded on the donor crate's `consensus.rs` `active_rounds` sharded-map
//! pattern (`DashMap<Hash256, Arc<RwLock<QueryRound>>>`), narrowed here to a
//! plain `HashMap` guarded by the processor's single mutex (§5 mandates one
//! mutex, not per-entry locking) rather than a lock-free shard map.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use crate::types::Hash256;

use super::types::NodeId;

/// `{ round_id, node_id, invs, issued_at }` (§3). `invs` is the ordered list
/// of block hashes the round polled for; a response's votes must align
/// positionally with it (§4.5 step 2-3).
#[derive(Clone, Debug)]
pub struct PollRound {
    pub round_id: u64,
    pub node_id: NodeId,
    pub invs: Vec<Hash256>,
    pub issued_at: Instant,
}

/// Tracks at most one outstanding `PollRound` per node (§4.6 invariant).
#[derive(Default)]
pub struct PollRegistry {
    rounds: HashMap<(NodeId, u64), PollRound>,
    outstanding_by_node: HashMap<NodeId, u64>,
    next_round_id: AtomicU64,
}

impl PollRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` iff `node_id` already has a round in flight.
    pub fn has_outstanding(&self, node_id: NodeId) -> bool {
        self.outstanding_by_node.contains_key(&node_id)
    }

    /// Issues a fresh, monotonically increasing round id for `node_id` and
    /// records the round. Caller must have already checked
    /// `!has_outstanding(node_id)`.
    pub fn issue(&mut self, node_id: NodeId, invs: Vec<Hash256>, issued_at: Instant) -> PollRound {
        let round_id = self.next_round_id.fetch_add(1, Ordering::Relaxed);
        let round = PollRound { round_id, node_id, invs, issued_at };
        self.rounds.insert((node_id, round_id), round.clone());
        self.outstanding_by_node.insert(node_id, round_id);
        round
    }

    /// Removes and returns the pending round for `(node_id, round_id)`, if
    /// any. Used both on a valid response and on every discard path
    /// (shape/hash mismatch) — a round is always retired by the time
    /// `register_votes` returns, regardless of outcome (§4.5 step 1, §7
    /// `RoundShapeMismatch`).
    pub fn take(&mut self, node_id: NodeId, round_id: u64) -> Option<PollRound> {
        let round = self.rounds.remove(&(node_id, round_id))?;
        if self.outstanding_by_node.get(&node_id) == Some(&round_id) {
            self.outstanding_by_node.remove(&node_id);
        }
        Some(round)
    }

    /// Discards any outstanding round for a disconnected peer (§5
    /// "Cancellation").
    pub fn discard_for_node(&mut self, node_id: NodeId) {
        if let Some(round_id) = self.outstanding_by_node.remove(&node_id) {
            self.rounds.remove(&(node_id, round_id));
        }
    }
}
