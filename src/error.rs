//! Core A's typed, propagated error kind.
//!
//! Core B failures are deliberately *not* modeled here: per spec §7 they are
//! all recoverable and expressed as boolean returns plus empty update lists,
//! never as exceptional control flow.

use thiserror::Error;

/// Failure modes of [`crate::coinstats::get_utxo_stats`].
///
/// On any of these, the scan is aborted and no `CoinStats` is published —
/// partial results are never returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoinStatsError {
    /// The cursor yielded a value that could not be decoded into a `Coin`.
    #[error("cursor yielded a malformed value at {outpoint:?}")]
    CursorDecode {
        /// The `OutPoint` whose value failed to decode, if known.
        outpoint: Option<crate::types::OutPoint>,
    },

    /// The `interrupt` hook signalled cancellation mid-scan.
    #[error("scan cancelled by interrupt hook")]
    Cancelled,

    /// `pindex` was absent and the cursor's best block could not be
    /// resolved via the block manager.
    #[error("cursor's best block is not known to the block manager")]
    MissingBestBlock,
}
