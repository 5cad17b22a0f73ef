//! Agora marketplace node — runtime plumbing around the reconciliation
//! engine.
//!
//! The node wires the engine to its collaborators and enforces the
//! concurrency contract: messages for one subject are processed strictly one
//! at a time, independent subjects in parallel. Configuration, logging, and
//! metrics live here too.

pub mod config;
pub mod ingest;
pub mod logging;
pub mod metrics;

pub use config::{ConfigError, NodeConfig};
pub use ingest::IngestService;
pub use logging::{init_logging, LogFormat};
pub use metrics::IngestMetrics;
