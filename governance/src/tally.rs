//! Result tally engine — append-only tally snapshots for a proposal.
//!
//! Tallies are never edited in place. Every recomputation aggregates the
//! current vote set into a brand-new snapshot at the current chain height;
//! the previous snapshots remain as an audit trail. Aggregation is a pure
//! function of the vote set, so recomputing twice from the same votes yields
//! identical numbers regardless of how the votes arrived.

use crate::GovernanceError;
use agora_chain::ChainOracle;
use agora_store::{NewResult, OptionTallyRecord, ProposalRecord, ResultRecord, ResultStore, VoteStore};
use std::collections::HashMap;
use std::sync::Arc;

/// Creates and refreshes tally snapshots.
#[derive(Clone)]
pub struct TallyEngine {
    results: Arc<dyn ResultStore + Send + Sync>,
    votes: Arc<dyn VoteStore + Send + Sync>,
    oracle: Arc<dyn ChainOracle + Send + Sync>,
}

impl TallyEngine {
    pub fn new(
        results: Arc<dyn ResultStore + Send + Sync>,
        votes: Arc<dyn VoteStore + Send + Sync>,
        oracle: Arc<dyn ChainOracle + Send + Sync>,
    ) -> Self {
        Self {
            results,
            votes,
            oracle,
        }
    }

    /// Create a fresh snapshot with zeroed tallies for every option.
    ///
    /// Used when a proposal is first stored, before any vote is known.
    pub fn materialize(&self, proposal: &ProposalRecord) -> Result<ResultRecord, GovernanceError> {
        let block = self.oracle.current_height()?;
        let tallies = proposal
            .options
            .iter()
            .map(|o| OptionTallyRecord {
                option_id: o.option_id,
                weight: 0,
                voters: 0,
            })
            .collect();
        let record = self.results.create_result(&NewResult {
            proposal_id: proposal.id,
            block,
            tallies,
        })?;
        Ok(record)
    }

    /// The current snapshot for a proposal, materializing a zeroed one if
    /// none exists.
    ///
    /// Initialization is create-proposal-then-materialize; a transient
    /// failure between the two leaves a proposal without a snapshot, and the
    /// redelivery that follows lands on the duplicate path. This closes that
    /// gap.
    pub fn ensure_result(&self, proposal: &ProposalRecord) -> Result<ResultRecord, GovernanceError> {
        match self.results.current_result(proposal.id)? {
            Some(record) => Ok(record),
            None => self.materialize(proposal),
        }
    }

    /// Aggregate the current vote set into a new snapshot.
    ///
    /// A voter's superseded votes are invisible here: the vote store only
    /// surfaces the one current vote per voter, so `sum(voters)` over the
    /// options always equals the number of distinct voters.
    pub fn recompute(&self, proposal: &ProposalRecord) -> Result<ResultRecord, GovernanceError> {
        let votes = self.votes.current_votes(proposal.id)?;

        let mut weight_by_option: HashMap<u32, u128> = HashMap::new();
        let mut voters_by_option: HashMap<u32, u64> = HashMap::new();
        for vote in &votes {
            *weight_by_option.entry(vote.option_id).or_insert(0) += vote.weight;
            *voters_by_option.entry(vote.option_id).or_insert(0) += 1;
        }

        let block = self.oracle.current_height()?;
        let tallies = proposal
            .options
            .iter()
            .map(|o| OptionTallyRecord {
                option_id: o.option_id,
                weight: weight_by_option.get(&o.option_id).copied().unwrap_or(0),
                voters: voters_by_option.get(&o.option_id).copied().unwrap_or(0),
            })
            .collect();
        let record = self.results.create_result(&NewResult {
            proposal_id: proposal.id,
            block,
            tallies,
        })?;
        Ok(record)
    }
}
