//! Vote repository trait.

use crate::StoreError;
use agora_types::MarketAddress;
use serde::{Deserialize, Serialize};

/// One admitted ballot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRecord {
    pub id: u64,
    pub proposal_id: u64,
    pub option_id: u32,
    pub voter: MarketAddress,
    /// Chain height at cast time.
    pub block: u64,
    /// Weight derived from the voter's balance at cast time, minimum 1.
    pub weight: u128,
    /// Superseded votes are retained but excluded from tallies.
    pub superseded: bool,
}

/// Request to record an admitted ballot.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewVote {
    pub proposal_id: u64,
    pub option_id: u32,
    pub voter: MarketAddress,
    pub block: u64,
    pub weight: u128,
}

/// Repository for admitted votes.
pub trait VoteStore {
    /// The current (non-superseded) vote by `voter` on a proposal, if any.
    fn find_current_vote(
        &self,
        proposal_id: u64,
        voter: &MarketAddress,
    ) -> Result<Option<VoteRecord>, StoreError>;

    /// All current votes on a proposal.
    fn current_votes(&self, proposal_id: u64) -> Result<Vec<VoteRecord>, StoreError>;

    /// Record a new current vote.
    fn create_vote(&self, req: &NewVote) -> Result<VoteRecord, StoreError>;

    /// Mark a vote as superseded. It stays stored but stops counting.
    fn supersede_vote(&self, vote_id: u64) -> Result<(), StoreError>;
}
