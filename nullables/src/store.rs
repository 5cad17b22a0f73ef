//! Nullable store — thread-safe in-memory repository for testing.

use agora_store::{
    NewProposal, NewResult, NewVote, ProposalRecord, ProposalStore, ResultRecord, ResultStore,
    StoreError, VoteRecord, VoteStore,
};
use agora_types::{MarketAddress, ProposalHash, Subject};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

/// An in-memory proposal/result/vote repository for testing.
/// Thread-safe for use with tokio's multi-threaded runtime.
pub struct NullStore {
    proposals: Mutex<HashMap<u64, ProposalRecord>>,
    results: Mutex<Vec<ResultRecord>>,
    votes: Mutex<Vec<VoteRecord>>,
    next_proposal_id: AtomicU64,
    next_result_id: AtomicU64,
    next_vote_id: AtomicU64,
    unavailable: AtomicBool,
}

impl NullStore {
    pub fn new() -> Self {
        Self {
            proposals: Mutex::new(HashMap::new()),
            results: Mutex::new(Vec::new()),
            votes: Mutex::new(Vec::new()),
            next_proposal_id: AtomicU64::new(1),
            next_result_id: AtomicU64::new(1),
            next_vote_id: AtomicU64::new(1),
            unavailable: AtomicBool::new(false),
        }
    }

    /// Simulate a repository outage. While set, every operation fails with
    /// `StoreError::Unavailable`.
    pub fn set_unavailable(&self, down: bool) {
        self.unavailable.store(down, Ordering::SeqCst);
    }

    /// Number of stored proposals.
    pub fn proposal_count(&self) -> usize {
        self.proposals.lock().unwrap().len()
    }

    /// Number of snapshots ever created for a proposal.
    pub fn result_count(&self, proposal_id: u64) -> usize {
        self.results
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.proposal_id == proposal_id)
            .count()
    }

    /// All votes ever recorded for a proposal, superseded included.
    pub fn all_votes(&self, proposal_id: u64) -> Vec<VoteRecord> {
        self.votes
            .lock()
            .unwrap()
            .iter()
            .filter(|v| v.proposal_id == proposal_id)
            .cloned()
            .collect()
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("injected outage".into()));
        }
        Ok(())
    }
}

impl Default for NullStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ProposalStore for NullStore {
    fn find_by_subject(&self, subject: &Subject) -> Result<Option<ProposalRecord>, StoreError> {
        self.check_available()?;
        Ok(self
            .proposals
            .lock()
            .unwrap()
            .values()
            .find(|p| p.subject() == *subject)
            .cloned())
    }

    fn find_by_hash(&self, hash: &ProposalHash) -> Result<Option<ProposalRecord>, StoreError> {
        self.check_available()?;
        Ok(self
            .proposals
            .lock()
            .unwrap()
            .values()
            .find(|p| p.hash == *hash)
            .cloned())
    }

    fn create_proposal(&self, req: &NewProposal) -> Result<ProposalRecord, StoreError> {
        self.check_available()?;
        let record = ProposalRecord {
            id: self.next_proposal_id.fetch_add(1, Ordering::SeqCst),
            hash: req.hash,
            submitter: req.submitter.clone(),
            kind: req.kind,
            item: req.item,
            title: req.title.clone(),
            description: req.description.clone(),
            block_start: req.block_start,
            block_end: req.block_end,
            received_at: req.received_at,
            posted_at: req.posted_at,
            options: req.options.clone(),
        };
        let mut proposals = self.proposals.lock().unwrap();
        if proposals.values().any(|p| p.subject() == record.subject()) {
            return Err(StoreError::Duplicate(record.subject().to_string()));
        }
        proposals.insert(record.id, record.clone());
        Ok(record)
    }

    fn replace_proposal(&self, id: u64, req: &NewProposal) -> Result<ProposalRecord, StoreError> {
        self.check_available()?;
        let mut proposals = self.proposals.lock().unwrap();
        let slot = proposals
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("proposal id {id}")))?;
        slot.hash = req.hash;
        slot.submitter = req.submitter.clone();
        slot.kind = req.kind;
        slot.item = req.item;
        slot.title = req.title.clone();
        slot.description = req.description.clone();
        slot.block_start = req.block_start;
        slot.block_end = req.block_end;
        slot.received_at = req.received_at;
        slot.posted_at = req.posted_at;
        slot.options = req.options.clone();
        Ok(slot.clone())
    }
}

impl ResultStore for NullStore {
    fn current_result(&self, proposal_id: u64) -> Result<Option<ResultRecord>, StoreError> {
        self.check_available()?;
        Ok(self
            .results
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.proposal_id == proposal_id)
            .max_by_key(|r| r.id)
            .cloned())
    }

    fn create_result(&self, req: &NewResult) -> Result<ResultRecord, StoreError> {
        self.check_available()?;
        let record = ResultRecord {
            id: self.next_result_id.fetch_add(1, Ordering::SeqCst),
            proposal_id: req.proposal_id,
            block: req.block,
            tallies: req.tallies.clone(),
        };
        self.results.lock().unwrap().push(record.clone());
        Ok(record)
    }

    fn result_history(&self, proposal_id: u64) -> Result<Vec<ResultRecord>, StoreError> {
        self.check_available()?;
        Ok(self
            .results
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.proposal_id == proposal_id)
            .cloned()
            .collect())
    }
}

impl VoteStore for NullStore {
    fn find_current_vote(
        &self,
        proposal_id: u64,
        voter: &MarketAddress,
    ) -> Result<Option<VoteRecord>, StoreError> {
        self.check_available()?;
        Ok(self
            .votes
            .lock()
            .unwrap()
            .iter()
            .find(|v| v.proposal_id == proposal_id && &v.voter == voter && !v.superseded)
            .cloned())
    }

    fn current_votes(&self, proposal_id: u64) -> Result<Vec<VoteRecord>, StoreError> {
        self.check_available()?;
        Ok(self
            .votes
            .lock()
            .unwrap()
            .iter()
            .filter(|v| v.proposal_id == proposal_id && !v.superseded)
            .cloned()
            .collect())
    }

    fn create_vote(&self, req: &NewVote) -> Result<VoteRecord, StoreError> {
        self.check_available()?;
        let record = VoteRecord {
            id: self.next_vote_id.fetch_add(1, Ordering::SeqCst),
            proposal_id: req.proposal_id,
            option_id: req.option_id,
            voter: req.voter.clone(),
            block: req.block,
            weight: req.weight,
            superseded: false,
        };
        self.votes.lock().unwrap().push(record.clone());
        Ok(record)
    }

    fn supersede_vote(&self, vote_id: u64) -> Result<(), StoreError> {
        self.check_available()?;
        let mut votes = self.votes.lock().unwrap();
        match votes.iter_mut().find(|v| v.id == vote_id) {
            Some(vote) => {
                vote.superseded = true;
                Ok(())
            }
            None => Err(StoreError::NotFound(format!("vote id {vote_id}"))),
        }
    }
}
