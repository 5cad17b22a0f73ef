//! Proposal repository trait.

use crate::StoreError;
use agora_types::{
    ItemHash, MarketAddress, OptionRole, ProposalHash, ProposalKind, Subject, Timestamp,
};
use serde::{Deserialize, Serialize};

/// One selectable answer, stored with its proposal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionRecord {
    /// Ordinal position, 0..N-1.
    pub option_id: u32,
    pub description: String,
    pub role: OptionRole,
}

/// A stored proposal with its immutable option set.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProposalRecord {
    /// Local row id; stable across replacement.
    pub id: u64,
    /// Content-derived identity; changes when the record is replaced.
    pub hash: ProposalHash,
    pub submitter: MarketAddress,
    pub kind: ProposalKind,
    pub item: Option<ItemHash>,
    pub title: String,
    pub description: String,
    pub block_start: u64,
    pub block_end: u64,
    /// When this node first stored the proposal.
    pub received_at: Timestamp,
    /// Claimed origin time; the canonical record for a subject is the one
    /// with the oldest claimed origin any node has seen.
    pub posted_at: Timestamp,
    pub options: Vec<OptionRecord>,
}

impl ProposalRecord {
    /// The identity this record is reconciled under.
    pub fn subject(&self) -> Subject {
        match self.item {
            Some(item) if self.kind.targets_item() => Subject::Item(item),
            _ => Subject::Proposal(self.hash),
        }
    }

    /// Find an option by its role marker.
    pub fn option_with_role(&self, role: OptionRole) -> Option<&OptionRecord> {
        self.options.iter().find(|o| o.role == role)
    }

    /// Find an option by ordinal.
    pub fn option_by_id(&self, option_id: u32) -> Option<&OptionRecord> {
        self.options.iter().find(|o| o.option_id == option_id)
    }
}

/// Request to create a proposal, or to overwrite one in place.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewProposal {
    pub hash: ProposalHash,
    pub submitter: MarketAddress,
    pub kind: ProposalKind,
    pub item: Option<ItemHash>,
    pub title: String,
    pub description: String,
    pub block_start: u64,
    pub block_end: u64,
    pub received_at: Timestamp,
    pub posted_at: Timestamp,
    pub options: Vec<OptionRecord>,
}

/// Repository for proposals and their options.
///
/// `create_proposal` persists the proposal together with its option set in
/// one atomic operation; a proposal without options must never be observable.
pub trait ProposalStore {
    /// Look up the live proposal for a subject, if any.
    fn find_by_subject(&self, subject: &Subject) -> Result<Option<ProposalRecord>, StoreError>;

    /// Look up a proposal by its content hash.
    fn find_by_hash(&self, hash: &ProposalHash) -> Result<Option<ProposalRecord>, StoreError>;

    /// Create a proposal and its options atomically.
    fn create_proposal(&self, req: &NewProposal) -> Result<ProposalRecord, StoreError>;

    /// Overwrite an existing proposal's fields and options in place,
    /// keeping its local id.
    fn replace_proposal(&self, id: u64, req: &NewProposal) -> Result<ProposalRecord, StoreError>;
}
