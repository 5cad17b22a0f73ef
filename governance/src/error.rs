use agora_chain::ChainError;
use agora_messages::MessageError;
use agora_store::StoreError;
use agora_types::ProposalHash;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GovernanceError {
    #[error("malformed message: {0}")]
    Message(#[from] MessageError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("chain error: {0}")]
    Chain(#[from] ChainError),

    /// The referenced proposal has not been stored yet. Transient: with an
    /// at-least-once transport the proposal announcement may simply not have
    /// arrived, so the vote is retried rather than discarded.
    #[error("no proposal known for hash {0}")]
    ProposalNotFound(ProposalHash),

    /// The proposal's option set lacks the option this vote needs. The
    /// option set is immutable, so no retry can fix this.
    #[error("proposal {proposal} has no {wanted} option")]
    OptionNotFound {
        proposal: ProposalHash,
        wanted: String,
    },
}

impl GovernanceError {
    /// Whether the caller should redeliver the message later.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Store(e) => e.is_transient(),
            Self::Chain(e) => e.is_transient(),
            Self::ProposalNotFound(_) => true,
            Self::Message(_) | Self::OptionNotFound { .. } => false,
        }
    }
}
