//! Nullable infrastructure for deterministic testing.
//!
//! Real collaborators (repository, chain client, wall clock) are replaced by
//! in-memory equivalents whose behavior — including failure — is fully under
//! test control. Outages are injected with a switch rather than by racing
//! real infrastructure.

pub mod chain;
pub mod clock;
pub mod store;

pub use chain::NullChain;
pub use clock::NullClock;
pub use store::NullStore;
