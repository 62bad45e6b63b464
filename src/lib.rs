//! `utxo-avalanche-core`: two consensus-adjacent cores extracted from a
//! full-node implementation.
//!
//! - [`coinstats`] — Core A, the UTXO set statistics and commitment engine
//!   (`get_utxo_stats`, `HashSink`).
//! - [`avalanche`] — Core B, the Avalanche pre-consensus voting engine
//!   (`AvalancheProcessor`).
//!
//! Both are injected with narrow collaborator traits at construction; see
//! `DESIGN.md` for the grounding of each part and `SPEC_FULL.md` for the
//! full requirements this crate implements.

pub mod avalanche;
pub mod coinstats;
pub mod config;
pub mod constants;
pub mod error;
pub mod types;

pub use config::Config;
pub use error::CoinStatsError;
