//! Vote admission — validates and records one ballot.
//!
//! One current vote per voter per proposal. A later cast (by block height)
//! supersedes the earlier one; an older cast arriving late is already-known
//! information and is ignored. Ties on block height go to the later arrival,
//! since height alone cannot order two casts and arrival order is the only
//! remaining signal.

use crate::{GovernanceError, TallyEngine};
use agora_chain::ChainOracle;
use agora_messages::VoteMessage;
use agora_store::{NewVote, OptionRecord, ProposalRecord, VoteStore};
use agora_types::{OptionRole, ProposalKind};
use std::sync::Arc;
use tracing::{debug, info};

/// How an inbound ballot was resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VoteOutcome {
    /// First ballot by this voter on this proposal.
    Recorded,
    /// Replaced the voter's earlier ballot.
    Superseded,
    /// Older than the voter's current ballot — ignored, no state change.
    StaleIgnored,
}

/// Validates ballots and maintains the one-current-vote-per-voter invariant.
pub struct VoteAdmission {
    votes: Arc<dyn VoteStore + Send + Sync>,
    oracle: Arc<dyn ChainOracle + Send + Sync>,
    tally: TallyEngine,
}

impl VoteAdmission {
    pub fn new(
        votes: Arc<dyn VoteStore + Send + Sync>,
        oracle: Arc<dyn ChainOracle + Send + Sync>,
        tally: TallyEngine,
    ) -> Self {
        Self {
            votes,
            oracle,
            tally,
        }
    }

    /// Admit one ballot against its (already resolved) proposal.
    pub fn admit(
        &self,
        proposal: &ProposalRecord,
        vote: &VoteMessage,
    ) -> Result<VoteOutcome, GovernanceError> {
        let option = self.resolve_option(proposal, vote)?;

        // Weight comes from the chain balance at cast time, clamped so every
        // address can cast a nonzero ballot.
        let balance = self.oracle.balance_at(&vote.voter, vote.block)?;
        let weight = balance.max(1);

        let outcome = match self.votes.find_current_vote(proposal.id, &vote.voter)? {
            Some(current) if vote.block < current.block => {
                debug!(
                    proposal = %proposal.hash,
                    voter = %vote.voter,
                    incoming_block = vote.block,
                    current_block = current.block,
                    "stale vote ignored"
                );
                return Ok(VoteOutcome::StaleIgnored);
            }
            Some(current) => {
                // Equal block: last write wins.
                self.votes.supersede_vote(current.id)?;
                self.record(proposal, option, vote, weight)?;
                VoteOutcome::Superseded
            }
            None => {
                self.record(proposal, option, vote, weight)?;
                VoteOutcome::Recorded
            }
        };

        self.tally.recompute(proposal)?;
        Ok(outcome)
    }

    fn record(
        &self,
        proposal: &ProposalRecord,
        option: &OptionRecord,
        vote: &VoteMessage,
        weight: u128,
    ) -> Result<(), GovernanceError> {
        self.votes.create_vote(&NewVote {
            proposal_id: proposal.id,
            option_id: option.option_id,
            voter: vote.voter.clone(),
            block: vote.block,
            weight,
        })?;
        info!(
            proposal = %proposal.hash,
            voter = %vote.voter,
            option = option.option_id,
            block = vote.block,
            weight,
            "vote recorded"
        );
        Ok(())
    }

    /// Resolve the ballot's target option.
    ///
    /// Item ballots are keep/remove questions: the proposal must carry a
    /// `Remove`-role option for the ballot to be meaningful at all. Either
    /// failure is structural — the option set is immutable, so a retry can
    /// never succeed.
    fn resolve_option<'p>(
        &self,
        proposal: &'p ProposalRecord,
        vote: &VoteMessage,
    ) -> Result<&'p OptionRecord, GovernanceError> {
        if proposal.kind == ProposalKind::ItemVote
            && proposal.option_with_role(OptionRole::Remove).is_none()
        {
            return Err(GovernanceError::OptionNotFound {
                proposal: proposal.hash,
                wanted: "Remove-role".into(),
            });
        }
        proposal
            .option_by_id(vote.option_id)
            .ok_or_else(|| GovernanceError::OptionNotFound {
                proposal: proposal.hash,
                wanted: format!("id {}", vote.option_id),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_nullables::{NullChain, NullStore};
    use agora_store::{NewProposal, ProposalStore, ResultStore};
    use agora_types::{ItemHash, MarketAddress, ProposalHash, Timestamp};

    fn stored_proposal(store: &NullStore, roles: &[(OptionRole, &str)]) -> ProposalRecord {
        store
            .create_proposal(&NewProposal {
                hash: ProposalHash::new([1u8; 32]),
                submitter: MarketAddress::new("agm_submitter"),
                kind: ProposalKind::ItemVote,
                item: Some(ItemHash::new([1u8; 32])),
                title: "t".into(),
                description: "d".into(),
                block_start: 1,
                block_end: 1000,
                received_at: Timestamp::new(10),
                posted_at: Timestamp::new(5),
                options: roles
                    .iter()
                    .enumerate()
                    .map(|(i, (role, text))| OptionRecord {
                        option_id: i as u32,
                        description: (*text).into(),
                        role: *role,
                    })
                    .collect(),
            })
            .unwrap()
    }

    fn keep_remove(store: &NullStore) -> ProposalRecord {
        stored_proposal(store, &[(OptionRole::Keep, "KEEP"), (OptionRole::Remove, "REMOVE")])
    }

    fn admission(store: &Arc<NullStore>, chain: &Arc<NullChain>) -> VoteAdmission {
        let tally = TallyEngine::new(store.clone(), store.clone(), chain.clone());
        VoteAdmission::new(store.clone(), chain.clone(), tally)
    }

    fn ballot(voter: &str, option_id: u32, block: u64) -> VoteMessage {
        VoteMessage {
            proposal: ProposalHash::new([1u8; 32]),
            option_id,
            voter: MarketAddress::new(voter),
            block,
        }
    }

    #[test]
    fn first_vote_is_recorded_with_balance_weight() {
        let store = Arc::new(NullStore::new());
        let chain = Arc::new(NullChain::new(101));
        let proposal = keep_remove(&store);
        chain.set_balance(&MarketAddress::new("agm_v1"), 50);

        let outcome = admission(&store, &chain)
            .admit(&proposal, &ballot("agm_v1", 1, 101))
            .unwrap();
        assert_eq!(outcome, VoteOutcome::Recorded);

        let result = store.current_result(proposal.id).unwrap().unwrap();
        assert_eq!(result.tally_for(1).unwrap().weight, 50);
        assert_eq!(result.tally_for(1).unwrap().voters, 1);
    }

    #[test]
    fn zero_balance_clamps_to_weight_one() {
        let store = Arc::new(NullStore::new());
        let chain = Arc::new(NullChain::new(101));
        let proposal = keep_remove(&store);

        admission(&store, &chain)
            .admit(&proposal, &ballot("agm_pauper", 1, 101))
            .unwrap();

        let result = store.current_result(proposal.id).unwrap().unwrap();
        assert_eq!(result.tally_for(1).unwrap().weight, 1);
    }

    #[test]
    fn later_block_supersedes_earlier_vote() {
        let store = Arc::new(NullStore::new());
        let chain = Arc::new(NullChain::new(110));
        let proposal = keep_remove(&store);
        let a = admission(&store, &chain);
        chain.set_balance(&MarketAddress::new("agm_v1"), 50);

        a.admit(&proposal, &ballot("agm_v1", 0, 100)).unwrap();
        let outcome = a.admit(&proposal, &ballot("agm_v1", 1, 105)).unwrap();
        assert_eq!(outcome, VoteOutcome::Superseded);

        let result = store.current_result(proposal.id).unwrap().unwrap();
        assert_eq!(result.tally_for(0).unwrap().voters, 0);
        assert_eq!(result.tally_for(0).unwrap().weight, 0);
        assert_eq!(result.tally_for(1).unwrap().voters, 1);
        assert_eq!(result.tally_for(1).unwrap().weight, 50);
        // Both casts are retained, one current.
        assert_eq!(store.all_votes(proposal.id).len(), 2);
    }

    #[test]
    fn stale_vote_is_ignored_without_tally_change() {
        let store = Arc::new(NullStore::new());
        let chain = Arc::new(NullChain::new(110));
        let proposal = keep_remove(&store);
        let a = admission(&store, &chain);
        chain.set_balance(&MarketAddress::new("agm_v1"), 50);

        a.admit(&proposal, &ballot("agm_v1", 1, 105)).unwrap();
        let snapshots_before = store.result_count(proposal.id);

        let outcome = a.admit(&proposal, &ballot("agm_v1", 0, 100)).unwrap();
        assert_eq!(outcome, VoteOutcome::StaleIgnored);

        let result = store.current_result(proposal.id).unwrap().unwrap();
        assert_eq!(result.tally_for(1).unwrap().voters, 1);
        assert_eq!(store.result_count(proposal.id), snapshots_before);
        assert_eq!(store.all_votes(proposal.id).len(), 1);
    }

    #[test]
    fn equal_block_last_write_wins() {
        let store = Arc::new(NullStore::new());
        let chain = Arc::new(NullChain::new(110));
        let proposal = keep_remove(&store);
        let a = admission(&store, &chain);

        a.admit(&proposal, &ballot("agm_v1", 0, 100)).unwrap();
        let outcome = a.admit(&proposal, &ballot("agm_v1", 1, 100)).unwrap();
        assert_eq!(outcome, VoteOutcome::Superseded);

        let current = store
            .find_current_vote(proposal.id, &MarketAddress::new("agm_v1"))
            .unwrap()
            .unwrap();
        assert_eq!(current.option_id, 1);
    }

    #[test]
    fn item_ballot_without_remove_option_is_structural_failure() {
        let store = Arc::new(NullStore::new());
        let chain = Arc::new(NullChain::new(110));
        let proposal = stored_proposal(&store, &[(OptionRole::Custom, "A"), (OptionRole::Custom, "B")]);

        let err = admission(&store, &chain)
            .admit(&proposal, &ballot("agm_v1", 0, 100))
            .unwrap_err();
        assert!(matches!(err, GovernanceError::OptionNotFound { .. }));
        assert!(!err.is_transient());
        // No vote, no snapshot.
        assert!(store.all_votes(proposal.id).is_empty());
        assert_eq!(store.result_count(proposal.id), 0);
    }

    #[test]
    fn unknown_option_id_is_structural_failure() {
        let store = Arc::new(NullStore::new());
        let chain = Arc::new(NullChain::new(110));
        let proposal = keep_remove(&store);

        let err = admission(&store, &chain)
            .admit(&proposal, &ballot("agm_v1", 7, 100))
            .unwrap_err();
        assert!(matches!(err, GovernanceError::OptionNotFound { .. }));
        assert!(store.all_votes(proposal.id).is_empty());
    }

    #[test]
    fn oracle_outage_admits_nothing() {
        let store = Arc::new(NullStore::new());
        let chain = Arc::new(NullChain::new(110));
        let proposal = keep_remove(&store);

        chain.set_unavailable(true);
        let err = admission(&store, &chain)
            .admit(&proposal, &ballot("agm_v1", 1, 100))
            .unwrap_err();
        assert!(err.is_transient());
        assert!(store.all_votes(proposal.id).is_empty());
    }
}
