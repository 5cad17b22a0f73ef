//! The message ingestion port — the single entry point through which the
//! delivery subsystem hands decoded messages to the engine.
//!
//! `notify` never panics and never retries internally. It reports exactly
//! one of three terminal statuses; retry scheduling belongs to the caller,
//! which redelivers `Waiting` messages on its own schedule.

use crate::{
    GovernanceError, ProcessingOutcome, ProposalReconciler, TallyEngine, VoteAdmission,
};
use agora_chain::ChainOracle;
use agora_messages::{EnvelopeMeta, MarketMessage, ProposalMessage, VoteMessage};
use agora_store::{ProposalStore, ResultStore, VoteStore};
use std::sync::Arc;
use tracing::warn;

/// The reconciliation engine behind the ingestion port.
pub struct GovernanceEngine {
    proposals: Arc<dyn ProposalStore + Send + Sync>,
    reconciler: ProposalReconciler,
    admission: VoteAdmission,
}

impl GovernanceEngine {
    pub fn new(
        proposals: Arc<dyn ProposalStore + Send + Sync>,
        results: Arc<dyn ResultStore + Send + Sync>,
        votes: Arc<dyn VoteStore + Send + Sync>,
        oracle: Arc<dyn ChainOracle + Send + Sync>,
    ) -> Self {
        let tally = TallyEngine::new(results, votes.clone(), oracle.clone());
        Self {
            proposals: proposals.clone(),
            reconciler: ProposalReconciler::new(proposals, tally.clone()),
            admission: VoteAdmission::new(votes, oracle, tally),
        }
    }

    /// Ingest one decoded message and report its terminal status.
    ///
    /// Policy no-ops (duplicate announcements, stale votes) are `Processed`.
    /// On `Waiting`, no state was committed for this message beyond what a
    /// redelivery will complete idempotently.
    pub fn notify(&self, message: &MarketMessage, meta: &EnvelopeMeta) -> ProcessingOutcome {
        let result = match message {
            MarketMessage::Proposal(proposal) => self.handle_proposal(proposal, meta),
            MarketMessage::Vote(vote) => self.handle_vote(vote),
        };
        let outcome = ProcessingOutcome::from_result(&result);
        if let Err(error) = &result {
            match outcome {
                ProcessingOutcome::Waiting => {
                    warn!(%error, "processing deferred, awaiting redelivery")
                }
                _ => warn!(%error, "message failed structural validation, discarded"),
            }
        }
        outcome
    }

    fn handle_proposal(
        &self,
        proposal: &ProposalMessage,
        meta: &EnvelopeMeta,
    ) -> Result<(), GovernanceError> {
        proposal.validate()?;
        self.reconciler.admit(proposal, meta)?;
        Ok(())
    }

    fn handle_vote(&self, vote: &VoteMessage) -> Result<(), GovernanceError> {
        vote.validate()?;
        let proposal = self
            .proposals
            .find_by_hash(&vote.proposal)?
            .ok_or(GovernanceError::ProposalNotFound(vote.proposal))?;
        self.admission.admit(&proposal, vote)?;
        Ok(())
    }
}
