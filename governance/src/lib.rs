//! Proposal/vote reconciliation engine for the Agora marketplace.
//!
//! Nodes receive proposal and vote messages over an at-least-once transport
//! with no ordering guarantee. This crate derives convergent local state
//! from that stream: among announcements for one subject the oldest claimed
//! origin wins, each voter holds exactly one current ballot per proposal,
//! and tallies are recomputed — never incremented — so duplicates and
//! reorderings cannot double-count.
//!
//! Key principle: resolution rules are commutative and idempotent, so every
//! node reaches the same state without any cross-node coordination.

pub mod admission;
pub mod composer;
pub mod engine;
pub mod error;
pub mod outcome;
pub mod reconciler;
pub mod tally;

pub use admission::{VoteAdmission, VoteOutcome};
pub use engine::GovernanceEngine;
pub use error::GovernanceError;
pub use outcome::ProcessingOutcome;
pub use reconciler::{ProposalReconciler, ReconcileOutcome};
pub use tally::TallyEngine;
