//! The three commitment variants Core A can drive while scanning the UTXO
//! set (§4.2). Expressed as a tagged enum per the Design Note in §9 — not
//! a trait-object hierarchy — because the set of variants is closed and
//! frozen by consensus.

use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

use super::muhash::MuHash3072;
use super::varint::{write_compact_size, write_varint, write_varint_signed_nonneg};
use crate::constants::coinstats::SATOSHI_UNIT;
use crate::types::{Coin, CoinStats, Hash256, HashType, OutPoint};

/// The per-output byte string fed to MuHash's multiplicative insert (§4.1):
/// `OutPoint{txid, n} || u32_le(height*2+is_coinbase) || i64_le(value) ||
/// compact_size(len(script)) || script_bytes`.
fn serialize_muhash_output(outpoint: &OutPoint, coin: &Coin) -> Vec<u8> {
    let mut buf = Vec::with_capacity(32 + 4 + 4 + 8 + 2 + coin.out.script_pubkey.len());
    buf.extend_from_slice(outpoint.txid.as_bytes());
    buf.extend_from_slice(&outpoint.n.to_le_bytes());
    buf.extend_from_slice(&coin.packed_height().to_le_bytes());
    buf.extend_from_slice(&coin.out.value.to_le_bytes());
    write_compact_size(&mut buf, coin.out.script_pubkey.len() as u64);
    buf.extend_from_slice(&coin.out.script_pubkey);
    buf
}

/// A sequential transcript hasher. `prepare` feeds the block hash;
/// `update` emits one grouped record per transaction; `finalize` yields the
/// 256-bit digest. The grouping keeps the encoding length proportional to
/// `#txs + #outputs`, never `#outputs * #txs` (§4.2 rationale).
#[derive(Debug)]
struct SerializedHashState {
    hasher: Sha256,
}

impl SerializedHashState {
    fn new() -> Self {
        Self { hasher: Sha256::new() }
    }

    fn prepare(&mut self, stats: &CoinStats) {
        self.hasher.update(stats.block_hash.as_bytes());
    }

    fn update(&mut self, txid: Hash256, outputs: &BTreeMap<u32, Coin>) {
        if outputs.is_empty() {
            return;
        }
        let mut buf = Vec::new();
        let mut first = true;
        for (n, coin) in outputs {
            if first {
                buf.extend_from_slice(txid.as_bytes());
                write_varint(&mut buf, coin.packed_height() as u64);
                first = false;
            }
            write_varint(&mut buf, (*n as u64) + 1);
            buf.extend_from_slice(&coin.out.script_pubkey);
            write_varint_signed_nonneg(&mut buf, coin.out.value / SATOSHI_UNIT);
        }
        write_varint(&mut buf, 0);
        self.hasher.update(&buf);
    }

    /// Finalizes via the double-SHA256 ("Hash256") convention the teacher
    /// uses for this exact purpose (`examples/time-coin-time-masternode/src/address.rs`'s
    /// `compute_checksum`: `hash2 = Sha256::digest(Sha256::digest(data))`),
    /// matching `original_source/src/node/coinstats.cpp`'s `ss.GetHash()`
    /// over a `CHashWriter` (itself a double-SHA256).
    fn finalize(self, stats: &mut CoinStats) {
        let first_pass = self.hasher.finalize();
        let second_pass = Sha256::digest(first_pass);
        stats.hash_serialized = Hash256(second_pass.into());
    }
}

/// Polymorphic commitment sink. Lifecycle: `prepare(stats) -> update(txid,
/// outputs) -> finalize(stats)`, called once per transaction boundary by
/// the aggregator.
pub enum HashSink {
    /// No commitment; all three operations are zero-cost no-ops and
    /// `hash_serialized` is left zeroed.
    None,
    SerializedHash(SerializedHashState),
    MuHash3072(MuHash3072),
}

impl HashSink {
    pub fn new(hash_type: HashType) -> Self {
        match hash_type {
            HashType::None => HashSink::None,
            HashType::HashSerialized => HashSink::SerializedHash(SerializedHashState::new()),
            HashType::MuHash => HashSink::MuHash3072(MuHash3072::new()),
        }
    }

    pub fn prepare(&mut self, stats: &CoinStats) {
        match self {
            HashSink::None => {}
            HashSink::SerializedHash(s) => s.prepare(stats),
            HashSink::MuHash3072(_) => {}
        }
    }

    /// `outputs` must be sorted ascending by output index — the aggregator
    /// guarantees this by buffering per-transaction outputs in a `BTreeMap`.
    pub fn update(&mut self, txid: Hash256, outputs: &BTreeMap<u32, Coin>) {
        match self {
            HashSink::None => {}
            HashSink::SerializedHash(s) => s.update(txid, outputs),
            HashSink::MuHash3072(m) => {
                for (n, coin) in outputs {
                    let outpoint = OutPoint::new(txid, *n);
                    let bytes = serialize_muhash_output(&outpoint, coin);
                    m.insert(&bytes);
                }
            }
        }
    }

    pub fn finalize(self, stats: &mut CoinStats) {
        match self {
            HashSink::None => {}
            HashSink::SerializedHash(s) => s.finalize(stats),
            HashSink::MuHash3072(m) => {
                stats.hash_serialized = m.finalize();
            }
        }
    }
}
