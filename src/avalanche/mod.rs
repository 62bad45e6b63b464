//! Core B: the Avalanche pre-consensus voting engine.
//!
//! [`processor::AvalancheProcessor`] repeatedly polls a set of peers about
//! the acceptance status of candidate blocks, accumulates their votes into
//! per-block [`vote_record::VoteRecord`] confidence records, and emits
//! [`types::StatusUpdate`] transitions. It drives a scheduled event loop via
//! [`scheduler::Scheduler`], manages outstanding poll round-trips per peer
//! via [`poll_registry::PollRegistry`], and enforces strict request/response
//! matching (§4.5).

pub mod network;
pub mod peer_registry;
pub mod poll_registry;
pub mod processor;
pub mod scheduler;
pub mod types;
pub mod vote_record;

pub use network::{NetworkLayer, RecordingNetworkLayer};
pub use peer_registry::{InMemoryPeerRegistry, PeerRegistry};
pub use poll_registry::{PollRegistry, PollRound};
pub use processor::AvalancheProcessor;
pub use scheduler::{ManualScheduler, Scheduler, SchedulerCallback, SchedulerHandle, TokioScheduler};
pub use types::{AvalancheResponse, AvalancheVote, BlockRef, Inv, InvType, NodeId, Status, StatusUpdate};
pub use vote_record::VoteRecord;
