//! Shared data types for Core B (§3, §6): node identifiers, the block
//! handle abstraction, poll wire shapes, and status transitions.

use serde::{Deserialize, Serialize};

use crate::types::Hash256;

/// Stand-in for the P2P layer's node identifier (`int64_t NodeId` in the
/// donor's protocol). A plain alias, not a newtype, since Core B never does
/// arithmetic on it beyond equality and map-keying.
pub type NodeId = i64;

/// A stand-in for a borrowed `const CBlockIndex*` (§3 "Ownership"). Rust has
/// no analogue to a borrowed C++ pointer, so `AvalancheProcessor` is generic
/// over this trait instead; tests supply a small synthetic implementation.
/// `chain_work` backs the descending-PoW ordering `get_invs_for_next_poll`
/// requires (§4.5).
pub trait BlockRef: Clone + Send + Sync + 'static {
    fn block_hash(&self) -> Hash256;
    fn chain_work(&self) -> u128;
}

/// The only inventory kind Core B ever exchanges (§2 GLOSSARY: "Core B uses
/// only the `MSG_BLOCK` variant").
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InvType {
    MsgBlock,
}

/// `Inv{type, hash}`, the inventory descriptor exchanged in the peer
/// protocol (GLOSSARY).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Inv {
    pub inv_type: InvType,
    pub hash: Hash256,
}

impl Inv {
    pub fn block(hash: Hash256) -> Self {
        Self { inv_type: InvType::MsgBlock, hash }
    }
}

/// `{ error_code: u32, block_hash: 256-bit }`. Error code zero means "yes, I
/// have this block accepted"; non-zero encodes rejection or unknown (§3).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvalancheVote {
    pub error_code: u32,
    pub block_hash: Hash256,
}

impl AvalancheVote {
    pub fn accepted(block_hash: Hash256) -> Self {
        Self { error_code: 0, block_hash }
    }

    pub fn rejected(block_hash: Hash256) -> Self {
        Self { error_code: 1, block_hash }
    }

    /// Error code zero means YES; anything else means NO (§3, §4.5 step 4).
    pub fn is_yes(&self) -> bool {
        self.error_code == 0
    }
}

/// `{ round_id, votes }`. `votes` must align positionally with the
/// originating `PollRound`'s `invs` (§3).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvalancheResponse {
    pub round_id: u64,
    pub votes: Vec<AvalancheVote>,
}

/// The four terminal/transition states `register_votes` can emit (§3, §4.5
/// step 5).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Accepted,
    Rejected,
    Finalized,
    Invalid,
}

/// `{ block_index_ref, status }`, delivered to the caller via the
/// `out_updates` out-parameter of `register_votes` (§3, §6).
#[derive(Clone, Debug)]
pub struct StatusUpdate<B> {
    pub block: B,
    pub status: Status,
}
