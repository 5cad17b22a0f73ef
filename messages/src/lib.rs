//! Wire message types for Agora proposal and vote propagation.
//!
//! Messages travel over a store-and-forward transport that guarantees
//! at-least-once delivery and nothing else: duplicates, reordering, and
//! hour-long delays are all normal. Everything here is therefore
//! content-addressed — a proposal's identity is the Blake2b-256 hash of its
//! canonical content, not anything the transport assigns.

use agora_types::{ItemHash, MarketAddress, OptionRole, ProposalHash, ProposalKind, Subject, Timestamp};
use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use serde::{Deserialize, Serialize};
use thiserror::Error;

type Blake2b256 = Blake2b<U32>;

/// Maximum encoded message size in bytes.
pub const MAX_MESSAGE_SIZE: usize = 512 * 1024; // 512 KiB

/// Structural validation or framing failure.
///
/// These are terminal: a message that fails structurally will fail the same
/// way on every redelivery, so the transport discards it instead of retrying.
#[derive(Debug, Error)]
pub enum MessageError {
    #[error("proposal has no options")]
    EmptyOptions,

    #[error("option ids must be the ordinals 0..N-1, found {found} at position {position}")]
    NonContiguousOptions { found: u32, position: usize },

    #[error("item ballot does not reference an item")]
    MissingItem,

    #[error("public ballot must not reference an item")]
    UnexpectedItem,

    #[error("voting window is empty: block_start {start} >= block_end {end}")]
    EmptyWindow { start: u64, end: u64 },

    #[error("invalid market address: {0}")]
    InvalidAddress(String),

    #[error("vote references the zero proposal hash")]
    ZeroProposalHash,

    #[error("encoded message exceeds {MAX_MESSAGE_SIZE} bytes: {0}")]
    Oversize(usize),

    #[error("message is truncated: {0}")]
    Truncated(String),

    #[error("malformed message: {0}")]
    Malformed(String),
}

/// Transport metadata accompanying a decoded message.
///
/// `received_at` is stamped by the local node; `posted_at` is the origin
/// time the *sender* claims. The reconciler trusts neither as wall-clock
/// truth — it only compares claimed origins against each other.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct EnvelopeMeta {
    /// When this node received the message.
    pub received_at: Timestamp,
    /// The origin time claimed by the sender.
    pub posted_at: Timestamp,
}

/// One selectable answer on a proposal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionSpec {
    /// Ordinal position, 0..N-1. Stable across nodes.
    pub option_id: u32,
    /// Human-readable answer text.
    pub description: String,
    /// Semantic marker; item ballots are resolved by role, not description.
    pub role: OptionRole,
}

/// A proposal announcement.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProposalMessage {
    pub submitter: MarketAddress,
    pub kind: ProposalKind,
    /// The item this ballot concerns; required for item ballots.
    pub item: Option<ItemHash>,
    pub title: String,
    pub description: String,
    /// The fixed, immutable option set.
    pub options: Vec<OptionSpec>,
    /// First block at which votes count.
    pub block_start: u64,
    /// Block at which voting closes.
    pub block_end: u64,
}

impl ProposalMessage {
    /// Content-derived identity of this proposal.
    ///
    /// Every node that receives the same proposal content derives the same
    /// hash, independent of delivery order or envelope framing.
    pub fn digest(&self) -> ProposalHash {
        let preimage = bincode::serialize(self).expect("proposal content is always serializable");
        let mut hasher = Blake2b256::new();
        hasher.update(&preimage);
        let result = hasher.finalize();
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&result);
        ProposalHash::new(bytes)
    }

    /// The identity this proposal is reconciled under.
    pub fn subject(&self) -> Subject {
        match self.item {
            Some(item) if self.kind.targets_item() => Subject::Item(item),
            _ => Subject::Proposal(self.digest()),
        }
    }

    /// Structural validation. Failures are terminal, never retried.
    ///
    /// Note that an item ballot is *not* required to carry a `Remove`-role
    /// option here — that is checked at vote admission, where its absence
    /// rejects the vote rather than the proposal.
    pub fn validate(&self) -> Result<(), MessageError> {
        if !self.submitter.is_valid() {
            return Err(MessageError::InvalidAddress(self.submitter.to_string()));
        }
        if self.options.is_empty() {
            return Err(MessageError::EmptyOptions);
        }
        for (position, option) in self.options.iter().enumerate() {
            if option.option_id as usize != position {
                return Err(MessageError::NonContiguousOptions {
                    found: option.option_id,
                    position,
                });
            }
        }
        match (self.kind, self.item) {
            (ProposalKind::ItemVote, None) => return Err(MessageError::MissingItem),
            (ProposalKind::PublicVote, Some(_)) => return Err(MessageError::UnexpectedItem),
            _ => {}
        }
        if self.block_start >= self.block_end {
            return Err(MessageError::EmptyWindow {
                start: self.block_start,
                end: self.block_end,
            });
        }
        Ok(())
    }
}

/// A ballot cast by one voter on one proposal.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VoteMessage {
    /// The proposal being voted on, by content hash.
    pub proposal: ProposalHash,
    /// The chosen option's ordinal.
    pub option_id: u32,
    pub voter: MarketAddress,
    /// Chain height at cast time; newer casts supersede older ones.
    pub block: u64,
}

impl VoteMessage {
    /// Structural validation. Failures are terminal, never retried.
    pub fn validate(&self) -> Result<(), MessageError> {
        if !self.voter.is_valid() {
            return Err(MessageError::InvalidAddress(self.voter.to_string()));
        }
        if self.proposal.is_zero() {
            return Err(MessageError::ZeroProposalHash);
        }
        Ok(())
    }
}

/// Any governance message a node can receive.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum MarketMessage {
    Proposal(ProposalMessage),
    Vote(VoteMessage),
}

/// Encode a message for transmission (length-prefixed JSON).
pub fn encode(message: &MarketMessage) -> Result<Vec<u8>, MessageError> {
    let body = serde_json::to_vec(message).map_err(|e| MessageError::Malformed(e.to_string()))?;
    if body.len() > MAX_MESSAGE_SIZE {
        return Err(MessageError::Oversize(body.len()));
    }
    let mut framed = Vec::with_capacity(4 + body.len());
    framed.extend_from_slice(&(body.len() as u32).to_be_bytes());
    framed.extend_from_slice(&body);
    Ok(framed)
}

/// Decode a message from a length-prefixed frame.
pub fn decode(data: &[u8]) -> Result<MarketMessage, MessageError> {
    if data.len() < 4 {
        return Err(MessageError::Truncated("missing length prefix".into()));
    }
    let declared = u32::from_be_bytes([data[0], data[1], data[2], data[3]]) as usize;
    if declared > MAX_MESSAGE_SIZE {
        return Err(MessageError::Oversize(declared));
    }
    let body = &data[4..];
    if body.len() != declared {
        return Err(MessageError::Truncated(format!(
            "declared {declared} bytes, got {}",
            body.len()
        )));
    }
    serde_json::from_slice(body).map_err(|e| MessageError::Malformed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn option(id: u32, text: &str, role: OptionRole) -> OptionSpec {
        OptionSpec {
            option_id: id,
            description: text.to_string(),
            role,
        }
    }

    fn item_proposal() -> ProposalMessage {
        ProposalMessage {
            submitter: MarketAddress::new("agm_submitter"),
            kind: ProposalKind::ItemVote,
            item: Some(ItemHash::new([42u8; 32])),
            title: "flag listing".to_string(),
            description: "remove counterfeit listing".to_string(),
            options: vec![
                option(0, "KEEP", OptionRole::Keep),
                option(1, "REMOVE", OptionRole::Remove),
            ],
            block_start: 100,
            block_end: 1100,
        }
    }

    #[test]
    fn valid_item_proposal_passes() {
        assert!(item_proposal().validate().is_ok());
    }

    #[test]
    fn digest_is_deterministic() {
        let a = item_proposal();
        let b = item_proposal();
        assert_eq!(a.digest(), b.digest());
    }

    #[test]
    fn digest_changes_with_content() {
        let a = item_proposal();
        let mut b = item_proposal();
        b.title = "different title".to_string();
        assert_ne!(a.digest(), b.digest());
    }

    #[test]
    fn item_proposal_subject_is_the_item() {
        let msg = item_proposal();
        assert_eq!(msg.subject(), Subject::Item(ItemHash::new([42u8; 32])));
    }

    #[test]
    fn public_proposal_subject_is_its_digest() {
        let mut msg = item_proposal();
        msg.kind = ProposalKind::PublicVote;
        msg.item = None;
        assert_eq!(msg.subject(), Subject::Proposal(msg.digest()));
    }

    #[test]
    fn empty_options_rejected() {
        let mut msg = item_proposal();
        msg.options.clear();
        assert!(matches!(msg.validate(), Err(MessageError::EmptyOptions)));
    }

    #[test]
    fn non_contiguous_option_ids_rejected() {
        let mut msg = item_proposal();
        msg.options[1].option_id = 5;
        assert!(matches!(
            msg.validate(),
            Err(MessageError::NonContiguousOptions { found: 5, position: 1 })
        ));
    }

    #[test]
    fn item_ballot_without_item_rejected() {
        let mut msg = item_proposal();
        msg.item = None;
        assert!(matches!(msg.validate(), Err(MessageError::MissingItem)));
    }

    #[test]
    fn public_ballot_with_item_rejected() {
        let mut msg = item_proposal();
        msg.kind = ProposalKind::PublicVote;
        assert!(matches!(msg.validate(), Err(MessageError::UnexpectedItem)));
    }

    #[test]
    fn empty_voting_window_rejected() {
        let mut msg = item_proposal();
        msg.block_end = msg.block_start;
        assert!(matches!(
            msg.validate(),
            Err(MessageError::EmptyWindow { .. })
        ));
    }

    #[test]
    fn item_ballot_without_remove_role_still_validates() {
        // Role completeness is a vote-admission concern, not a proposal one.
        let mut msg = item_proposal();
        msg.options = vec![option(0, "A", OptionRole::Custom), option(1, "B", OptionRole::Custom)];
        assert!(msg.validate().is_ok());
    }

    #[test]
    fn vote_with_zero_hash_rejected() {
        let vote = VoteMessage {
            proposal: ProposalHash::ZERO,
            option_id: 0,
            voter: MarketAddress::new("agm_voter"),
            block: 100,
        };
        assert!(matches!(vote.validate(), Err(MessageError::ZeroProposalHash)));
    }

    #[test]
    fn encode_decode_roundtrip() {
        let msg = MarketMessage::Proposal(item_proposal());
        let framed = encode(&msg).unwrap();
        let decoded = decode(&framed).unwrap();
        match decoded {
            MarketMessage::Proposal(p) => assert_eq!(p.digest(), item_proposal().digest()),
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn decode_rejects_truncated_frame() {
        let msg = MarketMessage::Vote(VoteMessage {
            proposal: ProposalHash::new([1u8; 32]),
            option_id: 0,
            voter: MarketAddress::new("agm_voter"),
            block: 1,
        });
        let mut framed = encode(&msg).unwrap();
        framed.truncate(framed.len() - 3);
        assert!(matches!(decode(&framed), Err(MessageError::Truncated(_))));
    }

    #[test]
    fn decode_rejects_short_input() {
        assert!(matches!(decode(&[0, 0]), Err(MessageError::Truncated(_))));
    }

    #[test]
    fn decode_rejects_oversize_declaration() {
        let mut framed = Vec::new();
        framed.extend_from_slice(&(u32::MAX).to_be_bytes());
        framed.extend_from_slice(b"junk");
        assert!(matches!(decode(&framed), Err(MessageError::Oversize(_))));
    }
}
