//! Narrow capability traits for Core A's external collaborators (§6),
//! injected at construction the way the donor crate injects
//! `Arc<dyn UtxoStorage>` in `storage.rs`/`utxo_manager.rs`. Tests
//! substitute synthetic in-memory implementations.

use crate::error::CoinStatsError;
use crate::types::{Coin, CoinStats, Hash256, OutPoint};

/// A stand-in for a borrowed `const CBlockIndex*`: the block a scan is
/// rooted at. Rust has no analogue to a borrowed C++ pointer, so the
/// processor and the stats driver are generic over this trait instead
/// (SPEC_FULL §3).
pub trait BlockIndexRef: Clone + Send + Sync {
    fn height(&self) -> u32;
    fn block_hash(&self) -> Hash256;
}

/// A restartable, forward-only ordered iterator yielding `(OutPoint, Coin)`
/// pairs sorted by `(txid, output_index)` lexicographic order, plus the
/// block identifier it was snapshotted at.
pub trait CoinCursor {
    fn valid(&self) -> bool;
    fn key(&self) -> OutPoint;
    fn value(&self) -> Result<Coin, CoinStatsError>;
    fn next(&mut self);
    fn estimate_size(&self) -> u64;
    fn best_block(&self) -> Hash256;
}

/// Resolves a block hash to the stable block-index handle `B`, read under
/// the caller's chain lock.
pub trait BlockManager<B: BlockIndexRef> {
    fn lookup_block_index(&self, block_hash: Hash256) -> Option<B>;
}

/// Optional precomputed store keyed by block index that short-circuits
/// Core A when the requested hash mode matches (`HashType::MuHash` or
/// `HashType::None`, per §4.3 step 2).
pub trait CoinStatsIndex<B: BlockIndexRef> {
    fn lookup(&self, pindex: &B, stats: &mut CoinStats) -> bool;
}

/// In-memory `CoinCursor` used by tests and small embedding tools: holds a
/// pre-sorted `Vec<(OutPoint, Coin)>` and a fixed best-block hash.
pub struct VecCoinCursor {
    items: Vec<(OutPoint, Coin)>,
    pos: usize,
    best_block: Hash256,
}

impl VecCoinCursor {
    /// `items` must already be sorted ascending by `(txid, n)` — the real
    /// coin database guarantees this; this constructor trusts the caller
    /// the same way the production cursor would.
    pub fn new(items: Vec<(OutPoint, Coin)>, best_block: Hash256) -> Self {
        Self { items, pos: 0, best_block }
    }
}

impl CoinCursor for VecCoinCursor {
    fn valid(&self) -> bool {
        self.pos < self.items.len()
    }

    fn key(&self) -> OutPoint {
        self.items[self.pos].0
    }

    fn value(&self) -> Result<Coin, CoinStatsError> {
        Ok(self.items[self.pos].1.clone())
    }

    fn next(&mut self) {
        self.pos += 1;
    }

    fn estimate_size(&self) -> u64 {
        self.items.len() as u64 * 64
    }

    fn best_block(&self) -> Hash256 {
        self.best_block
    }
}
