//! Shared data-model types used by both Core A (coinstats) and Core B (avalanche).
//!
//! Field layouts follow `spec.md` §3 verbatim; derives follow the donor
//! crate's blanket habit for domain types (`Clone, Debug, PartialEq, Eq,
//! Hash`, plus `serde` at serialization boundaries).

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 256-bit digest or identifier (txid, block hash, commitment digest).
///
/// Ordering is big-endian byte comparison, which `[u8; 32]`'s derived `Ord`
/// already provides — this is what `OutPoint`'s total order relies on.
#[derive(Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Hash256(pub [u8; 32]);

impl Hash256 {
    pub const ZERO: Hash256 = Hash256([0u8; 32]);

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl From<[u8; 32]> for Hash256 {
    fn from(bytes: [u8; 32]) -> Self {
        Hash256(bytes)
    }
}

impl fmt::Display for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash256({})", hex::encode(self.0))
    }
}

/// `(txid, output_index)`. Total order is `(txid, n)` with big-endian byte
/// comparison on `txid` — derived field order gives this directly.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OutPoint {
    pub txid: Hash256,
    pub n: u32,
}

impl OutPoint {
    pub fn new(txid: Hash256, n: u32) -> Self {
        Self { txid, n }
    }
}

/// `{ value: i64 satoshi-units, script_pubkey: byte-sequence }`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct TxOut {
    pub value: i64,
    pub script_pubkey: Vec<u8>,
}

/// A single unspent output plus the metadata needed by the bogo-size and
/// hashing primitives. `height`/`is_coinbase` are stored unpacked; the
/// `32 * height + is_coinbase` packed encoding only exists on the wire
/// (§3, §4.1), never in memory.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Coin {
    pub out: TxOut,
    pub height: u32,
    pub is_coinbase: bool,
}

impl Coin {
    /// The packed `height*2 + is_coinbase` value used by both hash sinks.
    pub fn packed_height(&self) -> u32 {
        self.height * 2 + self.is_coinbase as u32
    }
}

/// Which commitment, if any, `get_utxo_stats` should compute over the scan.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum HashType {
    HashSerialized,
    MuHash,
    None,
}

/// Accumulator produced by a single `get_utxo_stats` call. See `spec.md`
/// §3 for field invariants: `coins_count == n_transaction_outputs`,
/// `n_transactions <= n_transaction_outputs`, `total_amount` in
/// `[0, MAX_MONEY]`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CoinStats {
    pub height: u32,
    pub block_hash: Hash256,
    pub coins_count: u64,
    pub n_transactions: u64,
    pub n_transaction_outputs: u64,
    pub n_bogo_size: u64,
    pub total_amount: i64,
    pub hash_serialized: Hash256,
    pub disk_size: u64,
    pub hash_type: HashType,
    pub index_requested: bool,
    pub index_used: bool,
}

impl CoinStats {
    pub fn new(hash_type: HashType, index_requested: bool) -> Self {
        Self {
            height: 0,
            block_hash: Hash256::ZERO,
            coins_count: 0,
            n_transactions: 0,
            n_transaction_outputs: 0,
            n_bogo_size: 0,
            total_amount: 0,
            hash_serialized: Hash256::ZERO,
            disk_size: 0,
            hash_type,
            index_requested,
            index_used: false,
        }
    }
}

/// Maximum representable supply, used to bound `total_amount` (§3).
pub const MAX_MONEY: i64 = 21_000_000 * 100_000_000;
