//! `AvalancheProcessor` (§4.5): the front-of-house orchestrator holding the
//! reconcilable-block set, per-peer poll state, and the scheduled tick.
//!
//! Grounded on the donor crate's `consensus.rs` `AvalancheConsensus` (the
//! shape of a struct owning per-entity vote state plus a query-round map),
//! generalized from its `DashMap`-sharded design to the single
//! `parking_lot::Mutex` §5 mandates ("a single mutex protects the
//! tracked-block map, the PollRegistry, and the per-peer in-flight flag").
//! Event-loop cancellation is grounded on `shutdown.rs`'s
//! `CancellationToken` ownership pattern via `Scheduler`/`SchedulerHandle`.

use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::{debug, trace, warn};

use crate::config::Config;
use crate::constants::avalanche::AVALANCHE_FINALIZATION_SCORE;
use crate::types::Hash256;

use super::network::NetworkLayer;
use super::peer_registry::PeerRegistry;
use super::poll_registry::PollRegistry;
use super::scheduler::{Scheduler, SchedulerHandle};
use super::types::{AvalancheResponse, BlockRef, Inv, NodeId, Status, StatusUpdate};
use super::vote_record::VoteRecord;

struct BlockVoteEntry<B> {
    block: B,
    vote: VoteRecord,
}

#[derive(Default)]
struct ProcessorState<B> {
    tracked: HashMap<Hash256, BlockVoteEntry<B>>,
    polls: PollRegistry,
}

/// Owns every `VoteRecord` and `PollRound` it creates (§3 "Ownership").
/// `B` stands in for a borrowed `const CBlockIndex*` (see `BlockRef`).
pub struct AvalancheProcessor<B: BlockRef> {
    state: Mutex<ProcessorState<B>>,
    peer_registry: Arc<dyn PeerRegistry>,
    network: Arc<dyn NetworkLayer>,
    scheduler: Arc<dyn Scheduler>,
    poll_interval: Duration,
    event_loop_handle: Mutex<Option<SchedulerHandle>>,
    /// Same-direction confidence a tracked block's `VoteRecord` must reach
    /// to finalize. Defaults to [`AVALANCHE_FINALIZATION_SCORE`]; overridable
    /// via `with_finalization_score`/`from_config` so
    /// `Config::avalanche.finalization_score` (`src/config.rs`) has a real
    /// code path to take effect instead of being read only by its own tests.
    finalization_score: u32,
}

impl<B: BlockRef> AvalancheProcessor<B> {
    pub fn new(
        peer_registry: Arc<dyn PeerRegistry>,
        network: Arc<dyn NetworkLayer>,
        scheduler: Arc<dyn Scheduler>,
        poll_interval: Duration,
    ) -> Arc<Self> {
        Self::with_finalization_score(
            peer_registry,
            network,
            scheduler,
            poll_interval,
            AVALANCHE_FINALIZATION_SCORE,
        )
    }

    /// Constructs a processor that finalizes `VoteRecord`s at
    /// `finalization_score` instead of the crate-wide default.
    pub fn with_finalization_score(
        peer_registry: Arc<dyn PeerRegistry>,
        network: Arc<dyn NetworkLayer>,
        scheduler: Arc<dyn Scheduler>,
        poll_interval: Duration,
        finalization_score: u32,
    ) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(ProcessorState::default()),
            peer_registry,
            network,
            scheduler,
            poll_interval,
            event_loop_handle: Mutex::new(None),
            finalization_score,
        })
    }

    /// Constructs a processor from an embedding application's `Config`,
    /// sourcing both the poll cadence and the finalization score from it.
    pub fn from_config(
        peer_registry: Arc<dyn PeerRegistry>,
        network: Arc<dyn NetworkLayer>,
        scheduler: Arc<dyn Scheduler>,
        config: &Config,
    ) -> Arc<Self> {
        Self::with_finalization_score(
            peer_registry,
            network,
            scheduler,
            Duration::from_millis(config.avalanche.poll_interval_ms),
            config.avalanche.finalization_score,
        )
    }

    /// Inserts `block` under its block hash with a fresh `VoteRecord`.
    /// Returns `true` only if the block was not already tracked (§4.5,
    /// §7 `DuplicateRegistration`).
    pub fn add_block_to_reconcile(&self, block: B) -> bool {
        let mut state = self.state.lock();
        let hash = block.block_hash();
        if state.tracked.contains_key(&hash) {
            return false;
        }
        let vote = VoteRecord::with_finalization_score(self.finalization_score);
        state.tracked.insert(hash, BlockVoteEntry { block, vote });
        true
    }

    /// The current `accepted` flag, or `false` if `hash` is not tracked.
    pub fn is_accepted(&self, hash: Hash256) -> bool {
        self.state.lock().tracked.get(&hash).map(|e| e.vote.is_accepted()).unwrap_or(false)
    }

    /// Confidence, or `-1` if `hash` is not tracked.
    pub fn get_confidence(&self, hash: Hash256) -> i32 {
        self.state
            .lock()
            .tracked
            .get(&hash)
            .map(|e| e.vote.get_confidence() as i32)
            .unwrap_or(-1)
    }

    /// The candidate set for the next outbound poll, ordered by descending
    /// accumulated proof-of-work, then by block hash as a tiebreaker.
    /// Finalized blocks are excluded — they are removed from `tracked` the
    /// moment they finalize, so this is just every remaining entry (§4.5,
    /// §8 invariant 8).
    pub fn get_invs_for_next_poll(&self) -> Vec<Inv> {
        let state = self.state.lock();
        Self::invs_locked(&state)
    }

    fn invs_locked(state: &ProcessorState<B>) -> Vec<Inv> {
        let mut entries: Vec<&BlockVoteEntry<B>> = state.tracked.values().collect();
        entries.sort_by(|a, b| {
            b.block
                .chain_work()
                .cmp(&a.block.chain_work())
                .then_with(|| a.block.block_hash().cmp(&b.block.block_hash()))
        });
        entries.iter().map(|e| Inv::block(e.block.block_hash())).collect()
    }

    /// The next peer that is avalanche-capable and has no outstanding poll
    /// round, or `None` (§4.5, §8 invariant 7).
    pub fn get_suitable_node_to_query(&self) -> Option<NodeId> {
        let state = self.state.lock();
        Self::suitable_node_locked(&self.peer_registry, &state.polls)
    }

    fn suitable_node_locked(
        peer_registry: &Arc<dyn PeerRegistry>,
        polls: &PollRegistry,
    ) -> Option<NodeId> {
        let mut found = None;
        peer_registry.for_each_node(&mut |node_id, capable| {
            if found.is_some() {
                return;
            }
            if capable && !polls.has_outstanding(node_id) {
                found = Some(node_id);
            }
        });
        found
    }

    /// Discards any outstanding poll round for `node_id` (§5 "Cancellation":
    /// "pending PollRounds are abandoned"). The embedding application must
    /// call this whenever it observes a peer disconnect — `PeerRegistry` is
    /// a narrow, separately-injected collaborator that has no back-reference
    /// to the processor, so removing a peer from it (e.g.
    /// `InMemoryPeerRegistry::remove_peer`) does not by itself reclaim the
    /// round. Without this call, a disconnected peer's `NodeId` would stay
    /// marked outstanding forever, and a reconnecting or reused `NodeId`
    /// would then be permanently skipped by `get_suitable_node_to_query`.
    pub fn notify_peer_disconnected(&self, node_id: NodeId) {
        let mut state = self.state.lock();
        state.polls.discard_for_node(node_id);
    }

    /// Selects a suitable peer, snapshots the current inv set, and issues a
    /// poll recorded in the `PollRegistry` (§4.5). The lock is released
    /// before the outbound call per §5 ("must not span network I/O").
    pub fn run_event_loop(&self) {
        let issued = {
            let mut state = self.state.lock();
            let Some(node_id) = Self::suitable_node_locked(&self.peer_registry, &state.polls)
            else {
                trace!("avalanche event loop: no suitable peer to query");
                return;
            };
            let invs = Self::invs_locked(&state);
            if invs.is_empty() {
                trace!("avalanche event loop: nothing to reconcile");
                return;
            }
            let hashes: Vec<Hash256> = invs.iter().map(|inv| inv.hash).collect();
            let round = state.polls.issue(node_id, hashes, Instant::now());
            Some((node_id, invs, round.round_id))
        };

        if let Some((node_id, invs, round_id)) = issued {
            debug!(node_id, round_id, count = invs.len(), "issuing avalanche poll");
            self.network.send_poll(node_id, &invs, round_id);
        }
    }

    /// Validates and applies an incoming response, appending any emitted
    /// `StatusUpdate`s (§4.5 algorithm, steps 1-6).
    pub fn register_votes(
        &self,
        node_id: NodeId,
        response: AvalancheResponse,
        out_updates: &mut Vec<StatusUpdate<B>>,
    ) -> bool {
        let mut state = self.state.lock();

        // Step 1: look up the pending round.
        let Some(round) = state.polls.take(node_id, response.round_id) else {
            warn!(node_id, round_id = response.round_id, "avalanche: unknown poll round");
            return false;
        };

        // Step 2: shape must match exactly.
        if response.votes.len() != round.invs.len() {
            warn!(node_id, round_id = round.round_id, "avalanche: response shape mismatch");
            return false;
        }

        // Step 3: positional block-hash alignment must match exactly.
        for (vote, expected_hash) in response.votes.iter().zip(round.invs.iter()) {
            if vote.block_hash != *expected_hash {
                warn!(node_id, round_id = round.round_id, "avalanche: response hash mismatch");
                return false;
            }
        }

        // Step 4-5: apply each vote in inv order, emitting transitions.
        let mut to_remove = Vec::new();
        for vote in &response.votes {
            let Some(entry) = state.tracked.get_mut(&vote.block_hash) else {
                // Open Question (b): a block un-tracked between poll issuance
                // and response arrival is silently skipped.
                continue;
            };

            let was_finalized = entry.vote.has_finalized();
            let was_accepted = entry.vote.is_accepted();
            entry.vote.register_vote(vote.is_yes());
            let now_finalized = entry.vote.has_finalized();
            let now_accepted = entry.vote.is_accepted();

            if !was_finalized && now_finalized {
                let status = if now_accepted { Status::Finalized } else { Status::Invalid };
                out_updates.push(StatusUpdate { block: entry.block.clone(), status });
                to_remove.push(vote.block_hash);
            } else if was_accepted != now_accepted {
                let status = if now_accepted { Status::Accepted } else { Status::Rejected };
                out_updates.push(StatusUpdate { block: entry.block.clone(), status });
            }
        }

        // Finalized records are removed from the tracked set (§4.5 step 5).
        for hash in to_remove {
            state.tracked.remove(&hash);
        }

        // Step 6: the round was already retired by `take` above.
        true
    }

    /// Starts the scheduled event loop at `self.poll_interval`. Returns
    /// `true` only on the start→running transition (§7
    /// `DuplicateLifecycle`). Takes `self: &Arc<Self>` because the scheduled
    /// callback must hold a weak reference back to the processor, never a
    /// strong one — a strong reference would create an ownership cycle
    /// through the scheduler and defeat deterministic cancellation on drop.
    pub fn start_event_loop(self: &Arc<Self>) -> bool {
        let mut handle_guard = self.event_loop_handle.lock();
        if handle_guard.is_some() {
            return false;
        }
        let weak: Weak<Self> = Arc::downgrade(self);
        let callback: super::scheduler::SchedulerCallback = Arc::new(move || {
            if let Some(processor) = weak.upgrade() {
                processor.run_event_loop();
            }
        });
        let handle = self.scheduler.schedule_every(self.poll_interval, callback);
        *handle_guard = Some(handle);
        true
    }

    /// Stops the scheduled event loop. Returns `true` only on the
    /// running→stopped transition (§7 `DuplicateLifecycle`).
    pub fn stop_event_loop(&self) -> bool {
        let mut handle_guard = self.event_loop_handle.lock();
        match handle_guard.take() {
            Some(handle) => {
                self.scheduler.cancel(&handle);
                true
            }
            None => false,
        }
    }
}

impl<B: BlockRef> Drop for AvalancheProcessor<B> {
    /// Destruction cancels the scheduled callback deterministically,
    /// independent of whether the caller ever invoked `stop_event_loop`
    /// (§5, §9 Design Note "Event loop").
    fn drop(&mut self) {
        if let Some(handle) = self.event_loop_handle.lock().take() {
            self.scheduler.cancel(&handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::avalanche::peer_registry::InMemoryPeerRegistry;
    use crate::avalanche::scheduler::ManualScheduler;
    use crate::constants::avalanche::AVALANCHE_FINALIZATION_SCORE;

    #[derive(Clone)]
    struct TestBlock {
        hash: Hash256,
        work: u128,
    }

    impl BlockRef for TestBlock {
        fn block_hash(&self) -> Hash256 {
            self.hash
        }

        fn chain_work(&self) -> u128 {
            self.work
        }
    }

    fn block(byte: u8, work: u128) -> TestBlock {
        TestBlock { hash: Hash256([byte; 32]), work }
    }

    fn new_processor() -> (
        Arc<AvalancheProcessor<TestBlock>>,
        Arc<InMemoryPeerRegistry>,
        Arc<super::super::network::RecordingNetworkLayer>,
        Arc<ManualScheduler>,
    ) {
        let peers = Arc::new(InMemoryPeerRegistry::new());
        let network = Arc::new(super::super::network::RecordingNetworkLayer::new());
        let scheduler = Arc::new(ManualScheduler::new());
        let processor = AvalancheProcessor::new(
            peers.clone(),
            network.clone(),
            scheduler.clone(),
            Duration::from_millis(10),
        );
        (processor, peers, network, scheduler)
    }

    #[test]
    fn add_block_to_reconcile_is_idempotent() {
        let (processor, _, _, _) = new_processor();
        let b = block(1, 10);
        assert!(processor.add_block_to_reconcile(b.clone()));
        assert!(!processor.add_block_to_reconcile(b));
    }

    #[test]
    fn untracked_block_reports_unaccepted_with_negative_confidence() {
        let (processor, _, _, _) = new_processor();
        assert!(!processor.is_accepted(Hash256([9u8; 32])));
        assert_eq!(processor.get_confidence(Hash256([9u8; 32])), -1);
    }

    /// Issues a poll via `run_event_loop` and returns the round id
    /// `register_votes` must echo back.
    fn issue_and_capture_round_id(
        processor: &Arc<AvalancheProcessor<TestBlock>>,
        network: &super::super::network::RecordingNetworkLayer,
    ) -> u64 {
        processor.run_event_loop();
        network.last().expect("a poll was issued").2
    }

    /// S2 — single-block accept-then-finalize.
    #[test]
    fn s2_single_block_accept_then_finalize() {
        let (processor, peers, network, _) = new_processor();
        peers.add_peer(1, true);
        let b = block(1, 10);
        processor.add_block_to_reconcile(b.clone());

        let yes = AvalancheResponse {
            round_id: 0,
            votes: vec![super::super::types::AvalancheVote::accepted(b.block_hash())],
        };

        for _ in 0..5 {
            let round_id = issue_and_capture_round_id(&processor, &network);
            let mut updates = Vec::new();
            assert!(processor.register_votes(1, AvalancheResponse { round_id, ..yes.clone() }, &mut updates));
            assert!(!processor.is_accepted(b.block_hash()));
            assert!(updates.is_empty());
        }

        // Sixth YES: flips to accepted (see `vote_record.rs`'s own
        // transcript test for the initial-window arithmetic).
        let round_id = issue_and_capture_round_id(&processor, &network);
        let mut updates = Vec::new();
        assert!(processor.register_votes(1, AvalancheResponse { round_id, ..yes.clone() }, &mut updates));
        assert!(processor.is_accepted(b.block_hash()));
        assert_eq!(updates.len(), 1);
        assert!(matches!(updates[0].status, Status::Accepted));

        for _ in 0..(AVALANCHE_FINALIZATION_SCORE - 1) {
            let round_id = issue_and_capture_round_id(&processor, &network);
            let mut updates = Vec::new();
            assert!(processor.register_votes(1, AvalancheResponse { round_id, ..yes.clone() }, &mut updates));
            assert!(updates.is_empty());
        }

        let round_id = issue_and_capture_round_id(&processor, &network);
        let mut updates = Vec::new();
        assert!(processor.register_votes(1, AvalancheResponse { round_id, ..yes }, &mut updates));
        assert_eq!(updates.len(), 1);
        assert!(matches!(updates[0].status, Status::Finalized));
        assert!(processor.get_invs_for_next_poll().is_empty());
    }

    /// S4 — multi-block ordering by descending proof-of-work.
    #[test]
    fn s4_multi_block_ordering_by_descending_pow() {
        let (processor, peers, network, _) = new_processor();
        peers.add_peer(1, true);

        let a = block(0xAA, 10);
        processor.add_block_to_reconcile(a.clone());
        processor.run_event_loop();
        assert_eq!(network.last().unwrap().1, vec![Inv::block(a.block_hash())]);

        // A response clears the outstanding round so B can be polled next.
        let round_id = network.last().unwrap().2;
        let mut updates = Vec::new();
        processor.register_votes(
            1,
            AvalancheResponse {
                round_id,
                votes: vec![super::super::types::AvalancheVote::accepted(a.block_hash())],
            },
            &mut updates,
        );

        let b = block(0xBB, 20);
        processor.add_block_to_reconcile(b.clone());

        let invs = processor.get_invs_for_next_poll();
        assert_eq!(invs, vec![Inv::block(b.block_hash()), Inv::block(a.block_hash())]);

        processor.run_event_loop();
        let (_, sent_invs, round_id) = network.last().unwrap();
        assert_eq!(sent_invs, vec![Inv::block(b.block_hash()), Inv::block(a.block_hash())]);

        // A response in the wrong order is rejected with no updates.
        let mut updates = Vec::new();
        let wrong_order = AvalancheResponse {
            round_id,
            votes: vec![
                super::super::types::AvalancheVote::accepted(a.block_hash()),
                super::super::types::AvalancheVote::accepted(b.block_hash()),
            ],
        };
        assert!(!processor.register_votes(1, wrong_order, &mut updates));
        assert!(updates.is_empty());
    }

    /// S5 — poll lifecycle: only the capable peer is queryable, and it
    /// becomes unqueryable exactly while a round is outstanding.
    #[test]
    fn s5_poll_lifecycle_tracks_outstanding_round() {
        let (processor, peers, network, _) = new_processor();
        peers.add_peer(1, true);
        peers.add_peer(2, false);

        assert_eq!(processor.get_suitable_node_to_query(), Some(1));

        let b = block(1, 10);
        processor.add_block_to_reconcile(b.clone());
        processor.run_event_loop();
        assert_eq!(processor.get_suitable_node_to_query(), None);

        let round_id = network.last().unwrap().2;
        let mut updates = Vec::new();
        assert!(processor.register_votes(
            1,
            AvalancheResponse {
                round_id,
                votes: vec![super::super::types::AvalancheVote::accepted(b.block_hash())],
            },
            &mut updates,
        ));
        assert_eq!(processor.get_suitable_node_to_query(), Some(1));
    }

    /// S6 — event-loop lifecycle.
    #[test]
    fn s6_event_loop_lifecycle() {
        let (processor, _, _, scheduler) = new_processor();
        assert!(processor.start_event_loop());
        assert!(!processor.start_event_loop());
        assert_eq!(scheduler.active_count(), 1);

        drop(processor);
        assert_eq!(scheduler.active_count(), 0);
    }

    #[test]
    fn explicit_stop_cancels_the_scheduled_task() {
        let (processor, _, _, scheduler) = new_processor();
        assert!(processor.start_event_loop());
        assert_eq!(scheduler.active_count(), 1);
        assert!(processor.stop_event_loop());
        assert!(!processor.stop_event_loop());
        assert_eq!(scheduler.active_count(), 0);
    }

    /// S3 — single-block reject-then-invalid, re-adding the same block hash
    /// after an earlier finalization.
    #[test]
    fn s3_single_block_reject_then_invalid() {
        let (processor, peers, network, _) = new_processor();
        peers.add_peer(1, true);
        let b = block(1, 10);
        assert!(processor.add_block_to_reconcile(b.clone()));

        let no = AvalancheResponse {
            round_id: 0,
            votes: vec![super::super::types::AvalancheVote::rejected(b.block_hash())],
        };

        for _ in 0..3 {
            let round_id = issue_and_capture_round_id(&processor, &network);
            let mut updates = Vec::new();
            assert!(processor.register_votes(1, AvalancheResponse { round_id, ..no.clone() }, &mut updates));
            assert!(updates.is_empty());
        }

        // A freshly created `VoteRecord` already has `accepted == false`, so
        // a run of NO votes never needs to *flip* state the way YES votes
        // do in S2 — it only needs to carry the window's popcount below the
        // NO threshold and then reinforce confidence up to the score. That
        // takes `AVALANCHE_FINALIZATION_SCORE` further votes from here.
        for _ in 0..AVALANCHE_FINALIZATION_SCORE {
            let round_id = issue_and_capture_round_id(&processor, &network);
            let mut updates = Vec::new();
            assert!(processor.register_votes(1, AvalancheResponse { round_id, ..no.clone() }, &mut updates));
            assert!(updates.is_empty());
        }

        let round_id = issue_and_capture_round_id(&processor, &network);
        let mut updates = Vec::new();
        assert!(processor.register_votes(1, AvalancheResponse { round_id, ..no }, &mut updates));
        assert_eq!(updates.len(), 1);
        assert!(matches!(updates[0].status, Status::Invalid));
        assert!(processor.get_invs_for_next_poll().is_empty());
        assert_eq!(processor.get_confidence(b.block_hash()), -1);
    }

    #[test]
    fn register_votes_for_unknown_node_returns_false() {
        let (processor, _, _, _) = new_processor();
        let mut updates = Vec::new();
        let response = AvalancheResponse { round_id: 0, votes: vec![] };
        assert!(!processor.register_votes(42, response, &mut updates));
        assert!(updates.is_empty());
    }

    /// `from_config`'s finalization score must actually govern when a
    /// tracked block finalizes, not just round-trip through `Config`'s own
    /// TOML tests.
    #[test]
    fn from_config_threads_finalization_score_into_vote_records() {
        let peers = Arc::new(InMemoryPeerRegistry::new());
        peers.add_peer(1, true);
        let network = Arc::new(super::super::network::RecordingNetworkLayer::new());
        let scheduler = Arc::new(ManualScheduler::new());
        let mut config = crate::config::Config::default();
        config.avalanche.finalization_score = 3;

        let processor = AvalancheProcessor::from_config(peers, network.clone(), scheduler, &config);
        let b = block(1, 10);
        processor.add_block_to_reconcile(b.clone());

        let yes = super::super::types::AvalancheVote::accepted(b.block_hash());

        // First five YES votes only build the window; the sixth flips
        // `accepted` with confidence 0 (same arithmetic as S2).
        for _ in 0..5 {
            let round_id = issue_and_capture_round_id(&processor, &network);
            let mut updates = Vec::new();
            processor.register_votes(1, AvalancheResponse { round_id, votes: vec![yes] }, &mut updates);
            assert!(updates.is_empty());
        }
        let round_id = issue_and_capture_round_id(&processor, &network);
        let mut updates = Vec::new();
        processor.register_votes(1, AvalancheResponse { round_id, votes: vec![yes] }, &mut updates);
        assert!(matches!(updates[0].status, Status::Accepted));

        // With the configured score of 3, two more YES votes reinforce
        // confidence to 2 without finalizing...
        for _ in 0..2 {
            let round_id = issue_and_capture_round_id(&processor, &network);
            let mut updates = Vec::new();
            processor.register_votes(1, AvalancheResponse { round_id, votes: vec![yes] }, &mut updates);
            assert!(updates.is_empty());
        }
        // ...and the next one finalizes at 3, not at the crate-wide default
        // of `AVALANCHE_FINALIZATION_SCORE` (128).
        let round_id = issue_and_capture_round_id(&processor, &network);
        let mut updates = Vec::new();
        processor.register_votes(1, AvalancheResponse { round_id, votes: vec![yes] }, &mut updates);
        assert_eq!(updates.len(), 1);
        assert!(matches!(updates[0].status, Status::Finalized));
    }

    /// A disconnected peer's outstanding round must be reclaimed explicitly
    /// — nothing in `PeerRegistry::remove_peer` does this on the processor's
    /// behalf — otherwise a reused `NodeId` is permanently unqueryable.
    #[test]
    fn notify_peer_disconnected_reclaims_a_reused_node_id() {
        let (processor, peers, network, _) = new_processor();
        peers.add_peer(1, true);
        let b = block(1, 10);
        processor.add_block_to_reconcile(b);
        processor.run_event_loop();
        assert!(network.last().is_some());
        assert_eq!(processor.get_suitable_node_to_query(), None);

        // The peer drops off the network mid-round; its entry is removed
        // from the registry, but that alone leaves the round outstanding.
        peers.remove_peer(1);
        peers.add_peer(1, true);
        assert_eq!(processor.get_suitable_node_to_query(), None);

        // The caller notifies the processor of the disconnect explicitly.
        processor.notify_peer_disconnected(1);
        assert_eq!(processor.get_suitable_node_to_query(), Some(1));
    }
}
