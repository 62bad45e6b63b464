//! Core A: UTXO set statistics and commitment engine.
//!
//! Given a [`cursor::CoinCursor`] over the UTXO set at a specific block,
//! [`aggregator::get_utxo_stats`] computes aggregate statistics and,
//! optionally, a cryptographic commitment over the entire set — either a
//! sequential serialization hash ([`hash_sink::HashSink::SerializedHash`])
//! or an order-independent multiset hash
//! ([`hash_sink::HashSink::MuHash3072`]).

pub mod aggregator;
pub mod cursor;
pub mod hash_sink;
pub mod muhash;
pub mod varint;

pub use aggregator::{bogo_size, get_utxo_stats, Interrupt};
pub use cursor::{BlockIndexRef, BlockManager, CoinCursor, CoinStatsIndex, VecCoinCursor};
pub use hash_sink::HashSink;
