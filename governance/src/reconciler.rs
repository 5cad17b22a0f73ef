//! Proposal reconciler — create/replace/ignore resolution for inbound
//! proposal announcements.
//!
//! Identity is by subject, not by arrival order. Among all announcements a
//! node ever sees for one subject, the one with the oldest claimed origin
//! wins as canonical. That rule is commutative and idempotent, so every node
//! converges on the same record no matter how the transport reorders or
//! duplicates deliveries.

use crate::{GovernanceError, TallyEngine};
use agora_messages::{EnvelopeMeta, ProposalMessage};
use agora_store::{NewProposal, OptionRecord, ProposalRecord, ProposalStore};
use std::sync::Arc;
use tracing::{debug, info};

/// How an inbound proposal announcement was resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// First announcement for this subject — stored, tallies zeroed.
    Created,
    /// The stored record already is (or claims to be) at least as old as the
    /// incoming one; nothing to do. The common duplicate case.
    AlreadyCanonical,
    /// The incoming announcement claims an older origin than the stored
    /// record — the stored fields were overwritten in place and the tally
    /// recomputed from the current vote set.
    Replaced,
}

/// Decides what an inbound proposal announcement means for local state.
pub struct ProposalReconciler {
    proposals: Arc<dyn ProposalStore + Send + Sync>,
    tally: TallyEngine,
}

impl ProposalReconciler {
    pub fn new(proposals: Arc<dyn ProposalStore + Send + Sync>, tally: TallyEngine) -> Self {
        Self { proposals, tally }
    }

    /// Admit an inbound proposal announcement.
    ///
    /// Any store or oracle failure propagates with local state untouched;
    /// the caller maps transient failures to a retry.
    pub fn admit(
        &self,
        incoming: &ProposalMessage,
        meta: &EnvelopeMeta,
    ) -> Result<ReconcileOutcome, GovernanceError> {
        let subject = incoming.subject();

        let existing = self.proposals.find_by_subject(&subject)?;
        match existing {
            None => {
                let record = self
                    .proposals
                    .create_proposal(&request_from(incoming, meta))?;
                self.tally.materialize(&record)?;
                info!(%subject, hash = %record.hash, "proposal stored");
                Ok(ReconcileOutcome::Created)
            }
            Some(stored) if meta.posted_at >= stored.posted_at => {
                // No new information: the stored record's claimed origin is
                // already the oldest we have seen for this subject. A retry
                // after a failed initialization lands here, so finish it.
                self.tally.ensure_result(&stored)?;
                debug!(%subject, "proposal announcement ignored, record already canonical");
                Ok(ReconcileOutcome::AlreadyCanonical)
            }
            Some(stored) => {
                // The stored record was built from a late-arriving message
                // whose true origin is newer than the one arriving now.
                let replaced = self
                    .proposals
                    .replace_proposal(stored.id, &request_from(incoming, meta))?;
                self.tally.recompute(&replaced)?;
                info!(
                    %subject,
                    old_hash = %stored.hash,
                    new_hash = %replaced.hash,
                    "proposal replaced by older-origin announcement"
                );
                Ok(ReconcileOutcome::Replaced)
            }
        }
    }
}

fn request_from(incoming: &ProposalMessage, meta: &EnvelopeMeta) -> NewProposal {
    NewProposal {
        hash: incoming.digest(),
        submitter: incoming.submitter.clone(),
        kind: incoming.kind,
        item: incoming.item,
        title: incoming.title.clone(),
        description: incoming.description.clone(),
        block_start: incoming.block_start,
        block_end: incoming.block_end,
        received_at: meta.received_at,
        posted_at: meta.posted_at,
        options: incoming
            .options
            .iter()
            .map(|o| OptionRecord {
                option_id: o.option_id,
                description: o.description.clone(),
                role: o.role,
            })
            .collect(),
    }
}
