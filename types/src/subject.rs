//! Reconciliation identity for proposals.

use crate::hash::{ItemHash, ProposalHash};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The identity a proposal is reconciled under.
///
/// Item ballots are keyed by the item they concern — at most one live
/// proposal exists per item, and conflicting announcements for the same item
/// resolve against each other. Public ballots have no shared subject, so
/// their content hash is the identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Subject {
    /// Keyed by the marketplace item the ballot concerns.
    Item(ItemHash),
    /// Keyed by the proposal's own content hash.
    Proposal(ProposalHash),
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Item(h) => write!(f, "item:{}", h),
            Self::Proposal(h) => write!(f, "proposal:{}", h),
        }
    }
}
