//! Outbound message composition for locally-initiated actions.
//!
//! Composition only assembles wire structures. Delivery, signing, and
//! encryption belong to the transport.

use agora_messages::{OptionSpec, ProposalMessage, VoteMessage};
use agora_store::ProposalRecord;
use agora_types::{ItemHash, MarketAddress, OptionRole, ProposalKind};

/// Standard option descriptions for an item-removal ballot.
const KEEP_DESCRIPTION: &str = "KEEP";
const REMOVE_DESCRIPTION: &str = "REMOVE";

/// Compose an item-removal ballot with the standard keep/remove option pair.
pub fn item_removal_proposal(
    submitter: MarketAddress,
    item: ItemHash,
    title: impl Into<String>,
    description: impl Into<String>,
    block_start: u64,
    block_end: u64,
) -> ProposalMessage {
    ProposalMessage {
        submitter,
        kind: ProposalKind::ItemVote,
        item: Some(item),
        title: title.into(),
        description: description.into(),
        options: vec![
            OptionSpec {
                option_id: 0,
                description: KEEP_DESCRIPTION.into(),
                role: OptionRole::Keep,
            },
            OptionSpec {
                option_id: 1,
                description: REMOVE_DESCRIPTION.into(),
                role: OptionRole::Remove,
            },
        ],
        block_start,
        block_end,
    }
}

/// Compose a public ballot with free-form options.
pub fn public_proposal(
    submitter: MarketAddress,
    title: impl Into<String>,
    description: impl Into<String>,
    options: Vec<String>,
    block_start: u64,
    block_end: u64,
) -> ProposalMessage {
    ProposalMessage {
        submitter,
        kind: ProposalKind::PublicVote,
        item: None,
        title: title.into(),
        description: description.into(),
        options: options
            .into_iter()
            .enumerate()
            .map(|(i, description)| OptionSpec {
                option_id: i as u32,
                description,
                role: OptionRole::Custom,
            })
            .collect(),
        block_start,
        block_end,
    }
}

/// Compose a ballot on a locally-stored proposal.
pub fn vote_for(
    proposal: &ProposalRecord,
    option_id: u32,
    voter: MarketAddress,
    block: u64,
) -> VoteMessage {
    VoteMessage {
        proposal: proposal.hash,
        option_id,
        voter,
        block,
    }
}
