//! Tally snapshot repository trait.

use crate::StoreError;
use serde::{Deserialize, Serialize};

/// Per-option tally within one snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionTallyRecord {
    pub option_id: u32,
    /// Sum of admitted vote weights for this option.
    pub weight: u128,
    /// Number of distinct voters whose current vote targets this option.
    pub voters: u64,
}

/// A point-in-time tally snapshot for a proposal.
///
/// Snapshots are append-only: recomputation creates a new one, the highest
/// id is current, and history is retained for audit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub id: u64,
    pub proposal_id: u64,
    /// Chain height at computation time.
    pub block: u64,
    pub tallies: Vec<OptionTallyRecord>,
}

impl ResultRecord {
    /// The tally for an option, if the snapshot has one.
    pub fn tally_for(&self, option_id: u32) -> Option<&OptionTallyRecord> {
        self.tallies.iter().find(|t| t.option_id == option_id)
    }

    /// Total distinct voters across all options.
    pub fn total_voters(&self) -> u64 {
        self.tallies.iter().map(|t| t.voters).sum()
    }
}

/// Request to create a snapshot with all its option tallies.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewResult {
    pub proposal_id: u64,
    pub block: u64,
    pub tallies: Vec<OptionTallyRecord>,
}

/// Repository for tally snapshots.
///
/// A snapshot and its option tallies are created in one atomic operation, so
/// a half-written tally can never become the current result.
pub trait ResultStore {
    /// The most recently created snapshot for a proposal, if any.
    fn current_result(&self, proposal_id: u64) -> Result<Option<ResultRecord>, StoreError>;

    /// Create a snapshot together with its option tallies.
    fn create_result(&self, req: &NewResult) -> Result<ResultRecord, StoreError>;

    /// All snapshots for a proposal, oldest first (audit trail).
    fn result_history(&self, proposal_id: u64) -> Result<Vec<ResultRecord>, StoreError>;
}
