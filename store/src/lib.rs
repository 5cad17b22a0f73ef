//! Abstract repository traits for Agora governance state.
//!
//! Every storage backend (SQL, embedded KV, in-memory for testing) implements
//! these traits. The rest of the codebase depends only on the traits.
//!
//! Lookups return `Option` rather than failing on absence — "not stored yet"
//! is ordinary state for a node catching up on an unordered message stream,
//! not an error.

pub mod error;
pub mod proposal;
pub mod result;
pub mod vote;

pub use error::StoreError;
pub use proposal::{NewProposal, OptionRecord, ProposalRecord, ProposalStore};
pub use result::{NewResult, OptionTallyRecord, ResultRecord, ResultStore};
pub use vote::{NewVote, VoteRecord, VoteStore};
