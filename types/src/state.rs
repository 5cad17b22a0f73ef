//! Proposal and option classification enums.

use serde::{Deserialize, Serialize};

/// What kind of question a proposal asks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProposalKind {
    /// A ballot about a specific marketplace item (e.g. "remove this listing").
    ItemVote,
    /// A free-form community ballot with arbitrary options.
    PublicVote,
}

impl ProposalKind {
    /// Whether proposals of this kind concern a marketplace item.
    pub fn targets_item(&self) -> bool {
        matches!(self, Self::ItemVote)
    }
}

/// Semantic marker on a proposal option.
///
/// Item ballots locate their "remove the listing" option by role rather than
/// by matching the option description, so a relabelled option set cannot
/// redirect a ballot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionRole {
    /// The option that, if it wins, removes the item from the market.
    Remove,
    /// The option that keeps the item listed.
    Keep,
    /// A free-form option on a public ballot.
    Custom,
}
