//! Terminal processing status reported back to the delivery subsystem.

use crate::GovernanceError;
use serde::{Deserialize, Serialize};

/// What the delivery subsystem should do with an inbound message.
///
/// Policy rejections (a stale vote, a duplicate proposal announcement) are
/// `Processed` — they are successful, idempotent no-ops, not failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProcessingOutcome {
    /// Reconciliation completed; the message carries no further obligation.
    Processed,
    /// A transient dependency failure occurred; state is untouched and the
    /// message must be redelivered later, unmodified.
    Waiting,
    /// Structural validation failed; the message is discarded, never retried.
    ParsingFailed,
}

impl ProcessingOutcome {
    /// Collapse an engine result into the three-state status the transport
    /// understands.
    pub fn from_result<T>(result: &Result<T, GovernanceError>) -> Self {
        match result {
            Ok(_) => Self::Processed,
            Err(e) if e.is_transient() => Self::Waiting,
            Err(_) => Self::ParsingFailed,
        }
    }
}
