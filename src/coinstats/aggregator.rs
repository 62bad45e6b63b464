//! `StatsAggregator` and the `get_utxo_stats` driver (§4.3): the Core A
//! entry point. Grounded on `original_source/src/node/coinstats.cpp`'s
//! templated `GetUTXOStats` — cursor loop, flush-on-txid-boundary, the
//! `CoinStatsIndex` short-circuit gated on `hash_type in {MuHash, None}`
//! tested before `PrepareHash`, and the final `FinalizeHash` + `disk_size`
//! steps.

use std::collections::BTreeMap;
use tracing::{debug, trace, warn};

use super::cursor::{BlockIndexRef, BlockManager, CoinCursor, CoinStatsIndex};
use super::hash_sink::HashSink;
use crate::constants::coinstats::BOGO_SIZE_FIXED_OVERHEAD;
use crate::error::CoinStatsError;
use crate::types::{Coin, CoinStats, Hash256, HashType};

/// `bogo_size(script_pubkey) = 50 + len(script_pubkey)` (§4.1). Fixed;
/// never change — downstream snapshot commitments depend on it.
pub fn bogo_size(script_pubkey: &[u8]) -> u64 {
    BOGO_SIZE_FIXED_OVERHEAD + script_pubkey.len() as u64
}

/// Drives the running `CoinStats` record from grouped per-transaction
/// outputs. Owned exclusively by `get_utxo_stats` for the duration of one
/// scan.
#[derive(Default)]
struct StatsAggregator;

impl StatsAggregator {
    /// Applies one transaction's flushed output buffer to `stats`.
    fn flush(&self, stats: &mut CoinStats, outputs: &BTreeMap<u32, Coin>) {
        if outputs.is_empty() {
            return;
        }
        stats.n_transactions += 1;
        for coin in outputs.values() {
            stats.n_transaction_outputs += 1;
            stats.total_amount += coin.out.value;
            stats.n_bogo_size += bogo_size(&coin.out.script_pubkey);
        }
    }
}

/// Cooperative-cancellation hook, called between every cursor item
/// (§4.3 step 4, §5). Returning `Err` aborts the scan with no partial
/// publication of stats.
pub trait Interrupt {
    fn check(&mut self) -> Result<(), CoinStatsError>;
}

impl<F: FnMut() -> Result<(), CoinStatsError>> Interrupt for F {
    fn check(&mut self) -> Result<(), CoinStatsError> {
        self()
    }
}

/// Runs a full UTXO-set scan and produces a `CoinStats` record, per
/// `spec.md` §4.3's six-step algorithm.
///
/// `pindex`, when given, pins the scan to a specific block; otherwise the
/// cursor's best block is resolved via `block_manager`.
pub fn get_utxo_stats<C, B, I>(
    cursor: &mut C,
    block_manager: &dyn BlockManager<B>,
    hash_type: HashType,
    index: Option<&I>,
    index_requested: bool,
    pindex: Option<B>,
    mut interrupt: impl Interrupt,
) -> Result<CoinStats, CoinStatsError>
where
    C: CoinCursor,
    B: BlockIndexRef,
    I: CoinStatsIndex<B>,
{
    let mut stats = CoinStats::new(hash_type, index_requested);

    // Step 1: resolve the block the cursor is rooted at.
    let pindex = match pindex {
        Some(p) => p,
        None => {
            let best = cursor.best_block();
            block_manager
                .lookup_block_index(best)
                .ok_or(CoinStatsError::MissingBestBlock)?
        }
    };
    stats.height = pindex.height();
    stats.block_hash = pindex.block_hash();

    // Step 2: index short-circuit for hash modes that support it.
    if matches!(hash_type, HashType::MuHash | HashType::None) && index_requested {
        if let Some(index) = index {
            stats.index_requested = true;
            if index.lookup(&pindex, &mut stats) {
                stats.index_used = true;
                debug!(height = stats.height, "coinstats short-circuited via index");
                return Ok(stats);
            }
        }
    }

    // Step 3: construct and prepare the commitment sink.
    let mut sink = HashSink::new(hash_type);
    sink.prepare(&stats);
    let aggregator = StatsAggregator;

    // Step 4: iterate the cursor, flushing on each txid boundary.
    let mut prev_txid: Option<Hash256> = None;
    let mut buffer: BTreeMap<u32, Coin> = BTreeMap::new();

    while cursor.valid() {
        interrupt.check()?;

        let key = cursor.key();
        if prev_txid.is_some_and(|prev| prev != key.txid) && !buffer.is_empty() {
            let txid = prev_txid.expect("checked above");
            aggregator.flush(&mut stats, &buffer);
            sink.update(txid, &buffer);
            buffer.clear();
        }

        let coin = cursor.value().map_err(|_| CoinStatsError::CursorDecode { outpoint: Some(key) })?;
        buffer.insert(key.n, coin);
        stats.coins_count += 1;
        prev_txid = Some(key.txid);

        cursor.next();
    }

    // Step 5: flush any residual buffer.
    if let (Some(txid), false) = (prev_txid, buffer.is_empty()) {
        aggregator.flush(&mut stats, &buffer);
        sink.update(txid, &buffer);
    }

    // Step 6: finalize the commitment and record the disk-size estimate.
    sink.finalize(&mut stats);
    stats.disk_size = cursor.estimate_size();

    if stats.coins_count != stats.n_transaction_outputs {
        warn!(
            coins_count = stats.coins_count,
            n_transaction_outputs = stats.n_transaction_outputs,
            "coinstats invariant violated: coins_count != n_transaction_outputs"
        );
    }
    trace!(height = stats.height, coins = stats.coins_count, "coinstats scan complete");

    Ok(stats)
}
