//! Chain oracle trait.
//!
//! The settlement chain is consulted for exactly two facts: the current
//! block height (the temporal anchor for tally snapshots) and an address's
//! balance at a height (the vote weight source). The node never validates
//! or follows the chain itself.

use agora_types::MarketAddress;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChainError {
    #[error("chain client timed out: {0}")]
    Timeout(String),

    #[error("chain client unavailable: {0}")]
    Unavailable(String),

    #[error("address not known to the chain: {0}")]
    UnknownAddress(String),
}

impl ChainError {
    /// Whether retrying the same query later can succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Timeout(_) | Self::Unavailable(_))
    }
}

/// Read-only view of the settlement chain.
///
/// Both calls cross a network boundary and may block; callers must treat
/// them as suspension points and hold no exclusive resource across them
/// beyond their subject's processing lock.
pub trait ChainOracle {
    /// Current best block height.
    fn current_height(&self) -> Result<u64, ChainError>;

    /// Balance held by `address` at `height`, in base units.
    fn balance_at(&self, address: &MarketAddress, height: u64) -> Result<u128, ChainError>;
}
